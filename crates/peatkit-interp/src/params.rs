//! Engine parameters.

use crate::{InterpError, Result};
use serde::{Deserialize, Serialize};

/// Neighborhood parameters for the interpolation engine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InterpolationParams {
    /// Cells with fewer neighbors than this in range become no-data
    /// rather than guesses.
    pub min_neighbors: usize,
    /// Neighbor search radius in map units. Cells whose nearest sample
    /// is farther away are no-data; the engine refuses to extrapolate.
    pub search_radius: f64,
    /// At most this many nearest neighbors feed each cell's estimate.
    pub max_neighbors: usize,
}

impl Default for InterpolationParams {
    fn default() -> Self {
        Self {
            min_neighbors: 3,
            search_radius: 250.0,
            max_neighbors: 16,
        }
    }
}

impl InterpolationParams {
    /// Validate parameter domains.
    pub fn validate(&self) -> Result<()> {
        if self.min_neighbors == 0 {
            return Err(InterpError::InvalidParams(
                "min_neighbors must be >= 1".to_string(),
            ));
        }
        if !(self.search_radius > 0.0) || !self.search_radius.is_finite() {
            return Err(InterpError::InvalidParams(format!(
                "search_radius must be positive and finite, got {}",
                self.search_radius
            )));
        }
        if self.max_neighbors < self.min_neighbors {
            return Err(InterpError::InvalidParams(format!(
                "max_neighbors ({}) must be >= min_neighbors ({})",
                self.max_neighbors, self.min_neighbors
            )));
        }
        Ok(())
    }
}
