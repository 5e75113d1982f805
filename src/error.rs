/// The type of error for layout construction and indexing.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
#[non_exhaustive]
pub enum LayoutError {
    /// Extents, strides and padding have different ranks.
    #[error("rank mismatch: extents {extents}, strides {strides}, padding {padding}")]
    RankMismatch {
        /// Rank of the extents.
        extents: usize,
        /// Rank of the strides.
        strides: usize,
        /// Rank of the padding.
        padding: usize,
    },

    /// The number of dimensions is not matching the static rank of the shape.
    #[error("invalid rank: expected {expected}, got {got}")]
    InvalidRank {
        /// Expected number.
        expected: usize,
        /// Number that was given.
        got: usize,
    },

    /// The number of indices is not matching the rank of the mapping.
    #[error("invalid number of indices: expected {expected}, got {got}")]
    InvalidArity {
        /// Expected number.
        expected: usize,
        /// Number that was given.
        got: usize,
    },

    /// The number of sizes is not matching the number of dynamic dimensions.
    #[error("invalid number of dynamic sizes: expected {expected}, got {got}")]
    DynamicSizes {
        /// Expected number.
        expected: usize,
        /// Number that was given.
        got: usize,
    },

    /// A size is not matching a constant-sized dimension.
    #[error("invalid size {got} for dimension {axis} with constant size {expected}")]
    SizeMismatch {
        /// Dimension with the invalid size.
        axis: usize,
        /// Constant size of the dimension.
        expected: usize,
        /// Size that was given.
        got: usize,
    },

    /// A dimension is out of bounds.
    #[error("dimension {axis} out of range for rank {rank}")]
    AxisOutOfRange {
        /// Dimension that was given.
        axis: usize,
        /// Rank of the mapping.
        rank: usize,
    },
}
