//! Error types for grid construction and differencing.

use thiserror::Error;

/// Errors that can occur when working with grids.
#[derive(Debug, Error)]
pub enum GridError {
    /// Grid geometry was invalid (non-positive cell size or empty extent).
    #[error("Invalid grid spec: {0}")]
    InvalidSpec(String),

    /// Cell data length did not match the grid geometry.
    #[error("Cell data length {actual} does not match grid of {rows} x {cols}")]
    CellCountMismatch {
        /// Rows in the spec.
        rows: usize,
        /// Columns in the spec.
        cols: usize,
        /// Cells actually supplied.
        actual: usize,
    },

    /// The two grids handed to `difference` differ in dimensions.
    #[error("Grid mismatch: before is {before_rows} x {before_cols}, after is {after_rows} x {after_cols}")]
    GridMismatch {
        /// Rows in the `before` grid.
        before_rows: usize,
        /// Columns in the `before` grid.
        before_cols: usize,
        /// Rows in the `after` grid.
        after_rows: usize,
        /// Columns in the `after` grid.
        after_cols: usize,
    },

    /// The two grids carry different coordinate-system tags.
    #[error("Coordinate system mismatch: {before} vs {after}")]
    CoordinateSystemMismatch {
        /// CRS tag of the `before` grid.
        before: String,
        /// CRS tag of the `after` grid.
        after: String,
    },

    /// A differencing parameter was outside its valid domain.
    #[error("Invalid difference parameters: {0}")]
    InvalidParams(String),
}
