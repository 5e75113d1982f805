//! # Strided layout mappings for multidimensional arrays
//!
//! ## Overview
//!
//! The mdlayout crate translates multidimensional indices into offsets in a flat
//! memory region. It separates where an element lives in memory from how it is
//! accessed, and is meant as the building block for array and tensor views over
//! a buffer owned elsewhere. It does not allocate or touch any elements.
//!
//! Here are the main features of mdlayout:
//!
//! - Column-major layout mapping with per-dimension strides and padding.
//! - Static rank, where each dimension is either constant-sized or dynamic.
//! - Dynamic rank, where the rank is decided at runtime.
//! - Rank checks at compile time when the ranks are known statically.
//!
//! ## Dimensions and shapes
//!
//! A dimension is either `Const<N>` with the size given by the type, or `Dyn` with
//! the size given at runtime. A shape is a tuple of dimensions such as `(Dyn, Const<4>)`,
//! or `DynRank` for dynamic rank. The same shape types are used for extents, strides
//! and padding, so a unit stride can be written as `Const<1>` and no padding as `Const<0>`.
//!
//! ## Layout mapping
//!
//! A `LeftMapping` combines extents, strides and padding. The offset is computed
//! with the first dimension varying fastest in memory, where each dimension is
//! scaled by the padded extents of the dimensions before it:
//!
//! ```
//! use mdlayout::{Const, Dyn, LeftMapping, Mapping};
//!
//! type Unit = (Const<1>, Const<1>);
//! type NoPad = (Const<0>, Const<0>);
//!
//! let m = LeftMapping::<(Dyn, Dyn), Unit, NoPad>::from_dynamic(&[3, 4]);
//!
//! assert_eq!(m.index([2, 3]), 11);
//! assert_eq!(m.span(), 12);
//! ```
//!
//! Note that [`Mapping::stride`] returns the stride coefficient as it was given,
//! while [`LeftMapping::distance`] returns the distance in memory between
//! consecutive elements in a dimension.

mod dim;
mod error;
mod layout;
mod mapping;
mod shape;

#[cfg(feature = "serde")]
mod serde;

pub use dim::{Const, Dim, Dims, Dyn};
pub use error::LayoutError;
pub use layout::{Layout, Left};
pub use mapping::{LeftMapping, Mapping};
pub use shape::{DynRank, IntoShape, Rank, Shape};

/// Column-major layout mapping with dynamically-sized extents, strides and padding.
pub type DLeftMapping<const N: usize> = LeftMapping<Rank<N>, Rank<N>, Rank<N>>;
