//! Error types for survey data.

use thiserror::Error;

/// Errors that can occur when constructing survey records.
#[derive(Debug, Error)]
pub enum SurveyError {
    /// A polygon ring had fewer than three vertices or no area.
    #[error("Invalid polygon: {0}")]
    InvalidPolygon(String),

    /// A planning parameter was outside its valid domain.
    #[error("Invalid planning parameters: {0}")]
    InvalidPlanParams(String),
}
