use std::fmt::Debug;
use std::hash::Hash;

use crate::error::LayoutError;
use crate::layout::{Layout, Left};
use crate::shape::Shape;

/// Array layout mapping trait, translating indices to memory offsets.
pub trait Mapping: Clone + Debug + Default + Eq + Hash + Send + Sync {
    /// Array shape type.
    type Shape: Shape;

    /// Array layout type.
    type Layout: Layout;

    /// Returns `true` if the mapping is a strided affine map with declared padding as
    /// the only gaps. This is a property of the layout, not of the mapping value.
    fn is_regular() -> bool {
        Self::Layout::IS_REGULAR
    }

    /// Returns the array shape.
    fn shape(&self) -> &Self::Shape;

    /// Returns the number of storage slots needed to hold every element in the array.
    ///
    /// The result wraps around if it does not fit in `usize`.
    fn span(&self) -> usize;

    /// Returns the stride coefficient for the specified dimension.
    ///
    /// # Panics
    ///
    /// Panics if the dimension is out of bounds.
    fn stride(&self, index: usize) -> usize;

    /// Returns the memory offset for the element at the given index.
    ///
    /// The index is not checked against the array shape. An out-of-bounds index gives
    /// an offset that does not refer to an element of the array.
    ///
    /// # Panics
    ///
    /// Panics if the number of indices is not matching the array rank.
    fn offset(&self, index: &[usize]) -> usize;

    /// Returns the number of elements in the specified dimension.
    ///
    /// # Panics
    ///
    /// Panics if the dimension is out of bounds.
    fn dim(&self, index: usize) -> usize {
        self.shape().dim(index)
    }

    /// Returns `true` if the array contains no elements.
    fn is_empty(&self) -> bool {
        self.shape().is_empty()
    }

    /// Returns the number of elements in the array.
    fn len(&self) -> usize {
        self.shape().len()
    }

    /// Returns the array rank, i.e. the number of dimensions.
    fn rank(&self) -> usize {
        self.shape().rank()
    }
}

/// Column-major layout mapping type, with per-dimension strides and padding.
///
/// The offset for an index `(i0, i1, .., in)` is
///
/// ```text
/// s0*i0 + q0*(s1*i1 + q1*(s2*i2 + .. + q(n-1)*(sn*in)))
/// ```
///
/// where `s` are the strides and `qk = ek*sk + pk` is the padded extent of dimension
/// `k`, with `e` the extents and `p` the padding. With unit strides and no padding,
/// this is the usual column-major mapping `i0 + e0*(i1 + e1*(i2 + ..))`.
///
/// Extents, strides and padding must have the same rank. If the ranks are known
/// statically, this is checked at compile time.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct LeftMapping<E: Shape, S: Shape = E, P: Shape = S> {
    extents: E,
    strides: S,
    padding: P,
}

impl<E: Shape, S: Shape, P: Shape> LeftMapping<E, S, P> {
    const STATIC_RANKS: () = assert!(
        same_rank(E::RANK, S::RANK) && same_rank(S::RANK, P::RANK),
        "ranks of extents, strides and padding are not equal"
    );

    /// Creates a new layout mapping with the specified extents, strides and padding.
    ///
    /// If the ranks are known statically, they are checked at compile time:
    ///
    /// ```compile_fail
    /// use mdlayout::{Dyn, LeftMapping};
    ///
    /// let m = LeftMapping::new((Dyn(3), Dyn(4)), (Dyn(1),), (Dyn(0), Dyn(0)));
    /// ```
    ///
    /// # Panics
    ///
    /// Panics if the ranks of extents, strides and padding are not equal.
    pub fn new(extents: E, strides: S, padding: P) -> Self {
        match Self::try_new(extents, strides, padding) {
            Ok(mapping) => mapping,
            Err(err) => panic!("{err}"),
        }
    }

    /// Creates a new layout mapping with the specified extents, strides and padding,
    /// or returns an error if their ranks are not equal.
    pub fn try_new(extents: E, strides: S, padding: P) -> Result<Self, LayoutError> {
        let () = Self::STATIC_RANKS;

        check_ranks(extents.rank(), strides.rank(), padding.rank()).map_err(reject)?;

        tracing::trace!(rank = extents.rank(), extents = ?extents, "created layout mapping");

        Ok(Self { extents, strides, padding })
    }

    /// Creates a new layout mapping with the specified extents, and with default
    /// strides and padding.
    ///
    /// Dynamic strides and padding default to zero, so that all offsets are zero
    /// unless constant-sized strides are used. See [`packed`](Self::packed) for
    /// unit strides and no padding.
    ///
    /// # Panics
    ///
    /// Panics if the rank of the extents is not matching static rank of the
    /// strides or padding.
    pub fn from_extents(extents: E) -> Self {
        match Self::try_from_extents(extents) {
            Ok(mapping) => mapping,
            Err(err) => panic!("{err}"),
        }
    }

    /// Creates a new layout mapping with the specified extents, and with default
    /// strides and padding, or returns an error if the ranks are not matching.
    pub fn try_from_extents(extents: E) -> Result<Self, LayoutError> {
        let rank = extents.rank();

        check_ranks(rank, S::RANK.unwrap_or(rank), P::RANK.unwrap_or(rank)).map_err(reject)?;

        Self::try_new(extents, S::new(rank), P::new(rank))
    }

    /// Creates a new layout mapping from the sizes of the dynamic dimensions of the
    /// extents, and with default strides and padding.
    ///
    /// # Panics
    ///
    /// Panics if the number of sizes is not matching the number of dynamic dimensions,
    /// or if the ranks are not matching.
    pub fn from_dynamic(sizes: &[usize]) -> Self {
        match Self::try_from_dynamic(sizes) {
            Ok(mapping) => mapping,
            Err(err) => panic!("{err}"),
        }
    }

    /// Creates a new layout mapping from the sizes of the dynamic dimensions of the
    /// extents, and with default strides and padding, or returns an error if the
    /// number of sizes or the ranks are not matching.
    pub fn try_from_dynamic(sizes: &[usize]) -> Result<Self, LayoutError> {
        Self::try_from_extents(E::try_from_dynamic(sizes).map_err(reject)?)
    }

    /// Creates a new layout mapping with the specified extents, unit strides and no
    /// padding, i.e. a contiguous column-major layout.
    ///
    /// # Panics
    ///
    /// Panics if the ranks are not matching, or if strides or padding have
    /// constant-sized dimensions different from one and zero respectively.
    pub fn packed(extents: E) -> Self {
        let rank = extents.rank();

        if let Err(err) = check_ranks(rank, S::RANK.unwrap_or(rank), P::RANK.unwrap_or(rank)) {
            panic!("{err}");
        }

        let mut strides = S::new(rank);
        let mut padding = P::new(rank);

        strides.with_mut_dims(|dims| dims.fill(1));
        padding.with_mut_dims(|dims| dims.fill(0));

        Self::new(extents, strides, padding)
    }

    /// Returns the array extents.
    pub fn extents(&self) -> &E {
        &self.extents
    }

    /// Returns the stride coefficient for each dimension.
    pub fn striding(&self) -> S {
        self.strides.clone()
    }

    /// Returns the padding for each dimension.
    pub fn padding(&self) -> P {
        self.padding.clone()
    }

    /// Returns the memory offset for the element at the given index, where the
    /// number of indices is checked at compile time for static rank.
    ///
    /// The index is not checked against the array shape.
    ///
    /// # Panics
    ///
    /// Panics if the number of indices is not matching the array rank.
    pub fn index(&self, index: E::Dims<usize>) -> usize {
        self.offset(index.as_ref())
    }

    /// Returns the memory offset for the element at the given index, or an error
    /// if the number of indices is not matching the array rank.
    ///
    /// The index is not checked against the array shape.
    pub fn try_offset(&self, index: &[usize]) -> Result<usize, LayoutError> {
        if index.len() != self.rank() {
            return Err(LayoutError::InvalidArity { expected: self.rank(), got: index.len() });
        }

        Ok(self.with_axes(|extents, strides, padding| {
            left_offset(extents, strides, padding, index)
        }))
    }

    /// Returns the stride coefficient for the specified dimension, or an error if
    /// the dimension is out of bounds.
    pub fn try_stride(&self, index: usize) -> Result<usize, LayoutError> {
        if index >= self.rank() {
            return Err(LayoutError::AxisOutOfRange { axis: index, rank: self.rank() });
        }

        Ok(self.strides.dim(index))
    }

    /// Returns the distance in memory between consecutive elements in the specified
    /// dimension.
    ///
    /// Unlike [`stride`](Mapping::stride), which gives the stride coefficient as it
    /// was supplied, this includes the padded extents of all previous dimensions.
    ///
    /// # Panics
    ///
    /// Panics if the dimension is out of bounds.
    pub fn distance(&self, index: usize) -> usize {
        assert!(index < self.rank(), "invalid dimension");

        self.with_axes(|extents, strides, padding| {
            let outer = (0..index).map(|k| padded(extents, strides, padding, k));

            strides[index].wrapping_mul(outer.fold(1, usize::wrapping_mul))
        })
    }

    /// Returns the span, or `None` if the computation overflows.
    pub fn checked_span(&self) -> Option<usize> {
        if self.rank() == 0 || self.extents.is_empty() {
            return Some(0);
        }

        self.with_axes(|extents, strides, padding| {
            (0..extents.len()).try_fold(1usize, |acc, k| {
                let padded = extents[k].checked_mul(strides[k])?.checked_add(padding[k])?;

                acc.checked_mul(padded)
            })
        })
    }

    /// Returns `true` if all strides are one and there is no padding, so that the
    /// elements are stored contiguously in column-major order.
    pub fn is_contiguous(&self) -> bool {
        self.with_axes(|_, strides, padding| {
            strides.iter().all(|&x| x == 1) && padding.iter().all(|&x| x == 0)
        })
    }

    fn with_axes<T, F>(&self, mut f: F) -> T
    where
        F: FnMut(&[usize], &[usize], &[usize]) -> T,
    {
        self.extents.with_dims(|extents| {
            self.strides.with_dims(|strides| {
                self.padding.with_dims(|padding| f(extents, strides, padding))
            })
        })
    }
}

impl<E: Shape + Copy, S: Shape + Copy, P: Shape + Copy> Copy for LeftMapping<E, S, P> {}

impl<E: Shape, S: Shape, P: Shape> Default for LeftMapping<E, S, P> {
    fn default() -> Self {
        Self::from_extents(E::default())
    }
}

impl<E: Shape, S: Shape, P: Shape> From<E> for LeftMapping<E, S, P> {
    fn from(extents: E) -> Self {
        Self::from_extents(extents)
    }
}

impl<E: Shape, S: Shape, P: Shape> Mapping for LeftMapping<E, S, P> {
    type Shape = E;
    type Layout = Left;

    fn shape(&self) -> &E {
        &self.extents
    }

    fn span(&self) -> usize {
        if self.rank() == 0 || self.extents.is_empty() {
            return 0;
        }

        self.with_axes(|extents, strides, padding| {
            let sizes = (0..extents.len()).map(|k| padded(extents, strides, padding, k));

            sizes.fold(1, usize::wrapping_mul)
        })
    }

    fn stride(&self, index: usize) -> usize {
        assert!(index < self.rank(), "invalid dimension");

        self.strides.dim(index)
    }

    fn offset(&self, index: &[usize]) -> usize {
        assert!(index.len() == self.rank(), "invalid number of indices");

        self.with_axes(|extents, strides, padding| left_offset(extents, strides, padding, index))
    }
}

const fn same_rank(a: Option<usize>, b: Option<usize>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => a == b,
        _ => true,
    }
}

fn check_ranks(extents: usize, strides: usize, padding: usize) -> Result<(), LayoutError> {
    if extents == strides && strides == padding {
        Ok(())
    } else {
        Err(LayoutError::RankMismatch { extents, strides, padding })
    }
}

fn reject(err: LayoutError) -> LayoutError {
    tracing::debug!(%err, "invalid layout mapping");

    err
}

// Padded extent of dimension k, modulo the word size.
fn padded(extents: &[usize], strides: &[usize], padding: &[usize], k: usize) -> usize {
    extents[k].wrapping_mul(strides[k]).wrapping_add(padding[k])
}

// Column-major offset, with the cases rank 0, rank 1 and rank >1. For rank >1,
// the remaining dimensions are added recursively by `nested_offset`. The result
// wraps around for out-of-range indices.
fn left_offset(extents: &[usize], strides: &[usize], padding: &[usize], index: &[usize]) -> usize {
    match index.len() {
        0 => 0,
        1 => strides[0].wrapping_mul(index[0]),
        _ => strides[0]
            .wrapping_mul(index[0])
            .wrapping_add(nested_offset(1, extents, strides, padding, index)),
    }
}

// Offset contribution of dimensions n.., scaled by the padded extent of dimension n - 1.
fn nested_offset(
    n: usize,
    extents: &[usize],
    strides: &[usize],
    padding: &[usize],
    index: &[usize],
) -> usize {
    let outer = padded(extents, strides, padding, n - 1);
    let inner = strides[n].wrapping_mul(index[n]);

    if n + 1 == index.len() {
        outer.wrapping_mul(inner)
    } else {
        let rest = nested_offset(n + 1, extents, strides, padding, index);

        outer.wrapping_mul(inner.wrapping_add(rest))
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::shape::DynRank;

    type DynMapping = LeftMapping<DynRank>;

    fn mapping() -> impl Strategy<Value = DynMapping> {
        (1usize..=4).prop_flat_map(|rank| {
            (
                prop::collection::vec(1usize..6, rank),
                prop::collection::vec(1usize..4, rank),
                prop::collection::vec(0usize..3, rank),
            )
                .prop_map(|(e, s, p)| {
                    let dims = |x: Vec<usize>| DynRank::from_dims(&x);

                    LeftMapping::new(dims(e), dims(s), dims(p))
                })
        })
    }

    fn mapping_and_index() -> impl Strategy<Value = (DynMapping, Vec<usize>)> {
        mapping().prop_flat_map(|m| {
            let index: Vec<_> = m.extents().dims().iter().map(|&n| 0..n).collect();

            (Just(m), index)
        })
    }

    fn packed_and_index() -> impl Strategy<Value = (DynMapping, Vec<usize>)> {
        prop::collection::vec(1usize..6, 1..=5).prop_flat_map(|e| {
            let m = DynMapping::packed(DynRank::from_dims(&e));
            let index: Vec<_> = e.iter().map(|&n| 0..n).collect();

            (Just(m), index)
        })
    }

    #[test]
    fn nested_offset_matches_expansion() {
        let e = [3, 4, 5];
        let s = [2, 3, 1];
        let p = [1, 2, 0];
        let i = [2, 1, 4];

        let q0 = e[0] * s[0] + p[0];
        let q1 = e[1] * s[1] + p[1];

        let expected = s[0] * i[0] + q0 * (s[1] * i[1] + q1 * (s[2] * i[2]));

        assert_eq!(left_offset(&e, &s, &p, &i), expected);
        assert_eq!(left_offset(&[], &[], &[], &[]), 0);
        assert_eq!(left_offset(&[7], &[3], &[9], &[5]), 15);
    }

    #[test]
    fn static_rank_check() {
        assert!(same_rank(Some(2), Some(2)));
        assert!(same_rank(Some(2), None));
        assert!(same_rank(None, None));
        assert!(!same_rank(Some(1), Some(2)));
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256, ..ProptestConfig::default()
        })]

        #[test]
        fn packed_matches_mixed_radix((m, index) in packed_and_index()) {
            let dims = m.extents().dims();
            let expected = index.iter().zip(dims).rev().fold(0, |acc, (&i, &n)| acc * n + i);

            prop_assert_eq!(m.offset(&index), expected);
            prop_assert_eq!(m.span(), m.len());
            prop_assert!(m.is_contiguous());
        }

        #[test]
        fn offset_is_within_span((m, index) in mapping_and_index()) {
            prop_assert!(m.offset(&index) < m.span());
            prop_assert_eq!(m.checked_span(), Some(m.span()));
        }

        #[test]
        fn offset_increases_by_distance((m, index) in mapping_and_index()) {
            for axis in 0..m.rank() {
                if index[axis] + 1 < m.dim(axis) {
                    let mut next = index.clone();

                    next[axis] += 1;

                    prop_assert!(m.offset(&next) > m.offset(&index));
                    prop_assert_eq!(m.offset(&next) - m.offset(&index), m.distance(axis));
                }
            }
        }

        #[test]
        fn offset_is_deterministic((m, index) in mapping_and_index()) {
            let copy = m.clone();

            prop_assert_eq!(m.offset(&index), m.offset(&index));
            prop_assert_eq!(m.offset(&index), copy.offset(&index));
            prop_assert_eq!(m.span(), copy.span());
        }
    }
}
