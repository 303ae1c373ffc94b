//! Errors reported when histogram inputs are rejected.

/// Reasons a cell histogram computation is refused before any work is done.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HogError {
    /// At least one orientation bin is required.
    #[error("number of orientations must be positive")]
    ZeroOrientations,
    /// Cells must cover at least one pixel in each direction.
    #[error("cell size must be positive, got {cell_rows}x{cell_columns}")]
    ZeroCellSize {
        /// Requested cell height in pixels.
        cell_rows: usize,
        /// Requested cell width in pixels.
        cell_columns: usize,
    },
    /// The two gradient arrays have different shapes.
    #[error("gradient shapes differ: rows {rows:?}, columns {columns:?}")]
    GradientShapeMismatch {
        /// Shape of the vertical gradient array.
        rows: (usize, usize),
        /// Shape of the horizontal gradient array.
        columns: (usize, usize),
    },
    /// The output tensor does not have the lengths implied by the options.
    #[error("output histogram has lengths {actual:?}, expected {expected:?}")]
    OutputShapeMismatch {
        /// Lengths implied by the options.
        expected: [usize; 3],
        /// Lengths of the provided tensor.
        actual: [usize; 3],
    },
    /// Raw data does not match the requested array lengths.
    #[error("expected {expected} elements, got {actual}")]
    DataLength {
        /// Product of the requested lengths.
        expected: usize,
        /// Length of the provided vector.
        actual: usize,
    },
}
