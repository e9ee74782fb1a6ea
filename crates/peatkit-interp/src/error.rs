//! Error types for interpolation.

use thiserror::Error;

/// Errors that can occur when building an index or interpolating.
///
/// Per-cell failures are not errors: a cell with too few neighbors
/// becomes no-data and a degenerate kriging system falls back to
/// distance weighting, both encoded in the output grid.
#[derive(Debug, Error)]
pub enum InterpError {
    /// The survey set held no measured points to work from.
    #[error("Degenerate input: {0}")]
    DegenerateInput(String),

    /// Survey set and grid spec disagree on coordinate system.
    #[error("Coordinate system mismatch: survey is {survey}, grid is {grid}")]
    CoordinateSystemMismatch {
        /// CRS tag of the survey set.
        survey: String,
        /// CRS tag of the grid spec.
        grid: String,
    },

    /// An estimator or engine parameter was outside its valid domain.
    #[error("Invalid parameters: {0}")]
    InvalidParams(String),
}
