use std::fmt::Debug;
use std::hash::Hash;

/// Array layout policy, deciding how indices are translated to memory offsets.
pub trait Layout: Copy + Debug + Default + Eq + Hash + Send + Sync {
    /// True if the layout always gives a regular mapping, i.e. a strided affine map
    /// where the only gaps are the declared padding.
    const IS_REGULAR: bool;
}

/// Column-major layout type, where the first dimension varies fastest in memory.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct Left;

impl Layout for Left {
    const IS_REGULAR: bool = true;
}
