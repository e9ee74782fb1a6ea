//! Error types for classification.

use peatkit_survey::ZoneId;
use thiserror::Error;

/// Errors that can occur during classification and smoothing.
#[derive(Debug, Error)]
pub enum ClassifyError {
    /// A zone matched no rule and the rule list had no catch-all
    /// default. This is a configuration defect in the rule list, not a
    /// property of the zone.
    #[error("No matching rule for zone {zone}")]
    NoMatchingRule {
        /// The unmatched zone.
        zone: ZoneId,
    },

    /// A smoothing parameter was outside its valid domain.
    #[error("Invalid smoothing parameters: {0}")]
    InvalidParams(String),
}
