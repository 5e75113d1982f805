use std::fmt::Debug;
use std::hash::{Hash, Hasher};
use std::slice;

use crate::dim::{Dim, Dims, Dyn};
use crate::error::LayoutError;

/// Array shape trait.
///
/// A shape is a fixed-rank sequence of per-dimension values. Besides array extents,
/// the same trait describes the stride and padding vectors of a layout mapping, so
/// that each of their dimensions can also be either constant-sized or dynamic.
pub trait Shape: Clone + Debug + Default + Eq + Hash + Send + Sync {
    #[doc(hidden)]
    type Dims<T: Copy + Debug + Default + Eq + Hash + Send + Sync>: Dims<T>;

    /// Array rank if known statically, or `None` if dynamic.
    const RANK: Option<usize>;

    /// Returns the number of elements in the specified dimension.
    ///
    /// # Panics
    ///
    /// Panics if the dimension is out of bounds.
    fn dim(&self, index: usize) -> usize {
        assert!(index < self.rank(), "invalid dimension");

        self.with_dims(|dims| dims[index])
    }

    /// Returns the number of elements in each dimension.
    fn dims(&self) -> Self::Dims<usize> {
        let mut dims = <Self::Dims<usize> as Dims<usize>>::new(self.rank());

        self.with_dims(|src| dims.as_mut().copy_from_slice(src));

        dims
    }

    /// Creates an array shape with the given dimensions.
    ///
    /// # Panics
    ///
    /// Panics if the dimensions are not matching static rank or constant-sized dimensions.
    fn from_dims(dims: &[usize]) -> Self {
        let mut shape = Self::new(dims.len());

        shape.with_mut_dims(|dst| dst.copy_from_slice(dims));
        shape
    }

    /// Creates an array shape with the given dimensions, or returns an error if the
    /// dimensions are not matching static rank or constant-sized dimensions.
    fn try_from_dims(dims: &[usize]) -> Result<Self, LayoutError> {
        if let Some(rank) = Self::RANK {
            if dims.len() != rank {
                return Err(LayoutError::InvalidRank { expected: rank, got: dims.len() });
            }
        }

        for (axis, &size) in dims.iter().enumerate() {
            if let Some(expected) = Self::static_size(axis) {
                if size != expected {
                    return Err(LayoutError::SizeMismatch { axis, expected, got: size });
                }
            }
        }

        Ok(Self::from_dims(dims))
    }

    /// Creates an array shape from the sizes of the dynamic dimensions only, in order.
    /// Constant-sized dimensions take their size from the type.
    ///
    /// For dynamic rank, every dimension is dynamic and the rank is the number of sizes.
    ///
    /// # Panics
    ///
    /// Panics if the number of sizes is not matching the number of dynamic dimensions.
    fn from_dynamic(sizes: &[usize]) -> Self {
        match Self::try_from_dynamic(sizes) {
            Ok(shape) => shape,
            Err(err) => panic!("{err}"),
        }
    }

    /// Creates an array shape from the sizes of the dynamic dimensions only, or returns
    /// an error if the number of sizes is not matching the number of dynamic dimensions.
    fn try_from_dynamic(sizes: &[usize]) -> Result<Self, LayoutError> {
        let mut shape = Self::new(Self::RANK.unwrap_or(sizes.len()));
        let expected = shape.dynamic_rank();

        if sizes.len() != expected {
            return Err(LayoutError::DynamicSizes { expected, got: sizes.len() });
        }

        shape.with_mut_dims(|dims| {
            let axes = (0..dims.len()).filter(|&axis| Self::static_size(axis).is_none());

            for (axis, &size) in axes.zip(sizes) {
                dims[axis] = size;
            }
        });

        Ok(shape)
    }

    /// Returns the number of dynamic dimensions, i.e. those not fixed by the type.
    fn dynamic_rank(&self) -> usize {
        (0..self.rank()).filter(|&axis| Self::static_size(axis).is_none()).count()
    }

    /// Returns the size of the specified dimension if known statically, or `None` if dynamic.
    ///
    /// # Panics
    ///
    /// Panics if the dimension is out of bounds for a shape with static rank.
    fn static_size(index: usize) -> Option<usize>;

    /// Returns `true` if the array contains no elements.
    fn is_empty(&self) -> bool {
        self.with_dims(|dims| dims.contains(&0))
    }

    /// Returns the number of elements in the array.
    fn len(&self) -> usize {
        self.with_dims(|dims| dims.iter().product())
    }

    /// Returns the array rank, i.e. the number of dimensions.
    fn rank(&self) -> usize {
        self.with_dims(|dims| dims.len())
    }

    #[doc(hidden)]
    fn new(rank: usize) -> Self;

    #[doc(hidden)]
    fn with_dims<T, F: FnMut(&[usize]) -> T>(&self, f: F) -> T;

    #[doc(hidden)]
    fn with_mut_dims<T, F: FnMut(&mut [usize]) -> T>(&mut self, f: F) -> T;
}

/// Conversion trait from an array of sizes into a shape where every dimension is
/// dynamically-sized.
pub trait IntoShape {
    /// Shape type with the same rank as the array.
    type IntoShape: Shape;

    /// Creates the shape from the array of sizes.
    fn into_shape(self) -> Self::IntoShape;
}

/// Array shape type with dynamic rank.
///
/// If the rank is 0 or 1, no heap allocation is necessary. The default value
/// will have rank 1 and contain no elements.
#[derive(Clone)]
pub enum DynRank {
    /// Shape variant with dynamic rank.
    Dyn(Box<[usize]>),
    /// Shape variant with rank 1.
    One(usize),
}

/// Array shape type with dynamically-sized dimensions.
pub type Rank<const N: usize> = <[usize; N] as IntoShape>::IntoShape;

impl DynRank {
    /// Returns the number of elements in each dimension.
    pub fn dims(&self) -> &[usize] {
        match self {
            Self::Dyn(dims) => dims,
            Self::One(size) => slice::from_ref(size),
        }
    }
}

impl Debug for DynRank {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("DynRank").field(&self.dims()).finish()
    }
}

impl Default for DynRank {
    fn default() -> Self {
        Self::One(0)
    }
}

impl Eq for DynRank {}

impl Hash for DynRank {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.dims().hash(state)
    }
}

impl PartialEq for DynRank {
    fn eq(&self, other: &Self) -> bool {
        self.dims() == other.dims()
    }
}

impl Shape for DynRank {
    type Dims<T: Copy + Debug + Default + Eq + Hash + Send + Sync> = Box<[T]>;

    const RANK: Option<usize> = None;

    fn static_size(_: usize) -> Option<usize> {
        None
    }

    fn new(rank: usize) -> Self {
        if rank == 1 {
            DynRank::One(0)
        } else {
            DynRank::Dyn(Dims::new(rank))
        }
    }

    fn with_dims<T, F: FnMut(&[usize]) -> T>(&self, mut f: F) -> T {
        f(self.dims())
    }

    fn with_mut_dims<T, F: FnMut(&mut [usize]) -> T>(&mut self, mut f: F) -> T {
        let dims = match self {
            Self::Dyn(dims) => dims,
            Self::One(size) => slice::from_mut(size),
        };

        f(dims)
    }
}

impl Shape for () {
    type Dims<T: Copy + Debug + Default + Eq + Hash + Send + Sync> = [T; 0];

    const RANK: Option<usize> = Some(0);

    fn static_size(_: usize) -> Option<usize> {
        panic!("invalid dimension");
    }

    fn new(rank: usize) {
        assert!(rank == 0, "invalid rank");
    }

    fn with_dims<T, F: FnMut(&[usize]) -> T>(&self, mut f: F) -> T {
        f(&[])
    }

    fn with_mut_dims<T, F: FnMut(&mut [usize]) -> T>(&mut self, mut f: F) -> T {
        f(&mut [])
    }
}

impl<X: Dim> Shape for (X,) {
    type Dims<T: Copy + Debug + Default + Eq + Hash + Send + Sync> = [T; 1];

    const RANK: Option<usize> = Some(1);

    fn static_size(index: usize) -> Option<usize> {
        [X::SIZE][index]
    }

    fn new(rank: usize) -> Self {
        assert!(rank == 1, "invalid rank");

        Self::default()
    }

    fn with_dims<T, F: FnMut(&[usize]) -> T>(&self, mut f: F) -> T {
        f(&[self.0.size()])
    }

    fn with_mut_dims<T, F: FnMut(&mut [usize]) -> T>(&mut self, mut f: F) -> T {
        let mut dims = [self.0.size()];
        let value = f(&mut dims);

        *self = (X::from_size(dims[0]),);

        value
    }
}

macro_rules! impl_shape {
    ($n:tt, ($($jk:tt),*), ($($yz:tt),*)) => {
        impl<X: Dim, $($yz: Dim,)+> Shape for (X, $($yz,)+) {
            type Dims<T: Copy + Debug + Default + Eq + Hash + Send + Sync> = [T; $n];

            const RANK: Option<usize> = Some($n);

            fn static_size(index: usize) -> Option<usize> {
                [X::SIZE $(,$yz::SIZE)+][index]
            }

            fn new(rank: usize) -> Self {
                assert!(rank == $n, "invalid rank");

                Self::default()
            }

            fn with_dims<T, F: FnMut(&[usize]) -> T>(&self, mut f: F) -> T {
                f(&[self.0.size() $(,self.$jk.size())+])
            }

            fn with_mut_dims<T, F: FnMut(&mut [usize]) -> T>(&mut self, mut f: F) -> T {
                let mut dims = [self.0.size() $(,self.$jk.size())+];
                let value = f(&mut dims);

                *self = (X::from_size(dims[0]) $(,$yz::from_size(dims[$jk]))+);

                value
            }
        }
    };
}

impl_shape!(2, (1), (Y));
impl_shape!(3, (1, 2), (Y, Z));
impl_shape!(4, (1, 2, 3), (Y, Z, W));
impl_shape!(5, (1, 2, 3, 4), (Y, Z, W, U));
impl_shape!(6, (1, 2, 3, 4, 5), (Y, Z, W, U, V));

macro_rules! impl_into_shape {
    ($n:tt, $shape:ty) => {
        impl IntoShape for [usize; $n] {
            type IntoShape = $shape;

            fn into_shape(self) -> Self::IntoShape {
                Self::IntoShape::from_dims(&self)
            }
        }
    };
}

impl_into_shape!(0, ());
impl_into_shape!(1, (Dyn,));
impl_into_shape!(2, (Dyn, Dyn));
impl_into_shape!(3, (Dyn, Dyn, Dyn));
impl_into_shape!(4, (Dyn, Dyn, Dyn, Dyn));
impl_into_shape!(5, (Dyn, Dyn, Dyn, Dyn, Dyn));
impl_into_shape!(6, (Dyn, Dyn, Dyn, Dyn, Dyn, Dyn));
