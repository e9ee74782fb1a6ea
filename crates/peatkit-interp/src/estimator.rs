//! Local estimators: the "given neighbors, produce value and variance"
//! capability.

use crate::{kriging, InterpError, Result, VariogramModel};
use serde::{Deserialize, Serialize};

/// Distance below which a neighbor counts as coincident with the query
/// location and its depth is returned directly.
const COINCIDENT_DISTANCE: f64 = 1e-9;

/// A neighbor handed to an estimator: sample position, depth, quality
/// weight, and its precomputed distance to the query location.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NeighborSample {
    /// Easting.
    pub x: f64,
    /// Northing.
    pub y: f64,
    /// Measured depth in metres.
    pub depth: f64,
    /// Quality weight (> 0).
    pub weight: f64,
    /// Distance to the query location.
    pub distance: f64,
}

/// One cell's estimate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Estimate {
    /// Estimated depth.
    pub value: f64,
    /// Uncertainty measure; semantics depend on the estimator.
    pub variance: f64,
    /// Whether the estimate came from a fallback path (ill-conditioned
    /// kriging system solved by distance weighting instead).
    pub degraded: bool,
}

/// The two local estimators, selected by configuration.
///
/// A closed enumeration rather than an open trait: new estimators are
/// rare, deliberate additions, and the engine needs to know the full
/// set to document per-cell fallback semantics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "estimator", rename_all = "snake_case")]
pub enum Estimator {
    /// Inverse-distance weighting.
    ///
    /// Weight per neighbor is `quality / distance^power`. The variance
    /// reported is the weighted sample variance of neighbor depths - a
    /// confidence proxy that responds to local disagreement, not a
    /// statistical prediction variance.
    DistanceWeighted {
        /// Distance exponent, >= 1. Higher values localize harder.
        power: f64,
    },
    /// Ordinary kriging over a fitted variogram.
    ///
    /// Produces the model-exact kriging variance. Singular or
    /// ill-conditioned neighborhood systems fall back to the
    /// distance-weighted estimate (power 2) for that cell, marked
    /// [`Estimate::degraded`].
    Kriging {
        /// Fitted variogram model.
        variogram: VariogramModel,
        /// Conditioning estimate above which the system is rejected.
        ill_condition_threshold: f64,
    },
}

impl Default for Estimator {
    fn default() -> Self {
        Self::DistanceWeighted { power: 2.0 }
    }
}

impl Estimator {
    /// Kriging with the default conditioning threshold.
    pub fn kriging(variogram: VariogramModel) -> Self {
        Self::Kriging {
            variogram,
            ill_condition_threshold: 1e8,
        }
    }

    /// Validate parameter domains.
    pub fn validate(&self) -> Result<()> {
        match self {
            Self::DistanceWeighted { power } => {
                if !(*power >= 1.0) {
                    return Err(InterpError::InvalidParams(format!(
                        "distance weighting power must be >= 1, got {power}"
                    )));
                }
            }
            Self::Kriging {
                variogram,
                ill_condition_threshold,
            } => {
                variogram.validate()?;
                if !(*ill_condition_threshold > 0.0) {
                    return Err(InterpError::InvalidParams(format!(
                        "ill_condition_threshold must be > 0, got {ill_condition_threshold}"
                    )));
                }
            }
        }
        Ok(())
    }

    /// Estimate depth and uncertainty from a neighborhood.
    ///
    /// Neighbors must already be in the index's deterministic order
    /// (ascending distance, ties by ordinal); accumulation happens in
    /// that order so results do not depend on scheduling. Returns `None`
    /// for an empty neighborhood - the engine screens minimum counts
    /// before calling.
    pub fn estimate(&self, neighbors: &[NeighborSample]) -> Option<Estimate> {
        if neighbors.is_empty() {
            return None;
        }
        match self {
            Self::DistanceWeighted { power } => Some(inverse_distance(neighbors, *power, false)),
            Self::Kriging {
                variogram,
                ill_condition_threshold,
            } => match kriging::solve(neighbors, variogram, *ill_condition_threshold) {
                Some((value, variance)) => Some(Estimate {
                    value,
                    variance,
                    degraded: false,
                }),
                None => Some(inverse_distance(neighbors, 2.0, true)),
            },
        }
    }
}

/// Inverse-distance weighted estimate with weighted sample variance.
fn inverse_distance(neighbors: &[NeighborSample], power: f64, degraded: bool) -> Estimate {
    // A coincident neighbor would blow up the weight; its depth is the
    // answer. Neighbors are distance-sorted, so only the head can hit.
    if let Some(hit) = neighbors.iter().find(|n| n.distance < COINCIDENT_DISTANCE) {
        return Estimate {
            value: hit.depth,
            variance: 0.0,
            degraded,
        };
    }

    let mut weight_sum = 0.0;
    let mut value = 0.0;
    for n in neighbors {
        let w = n.weight / n.distance.powf(power);
        weight_sum += w;
        value += w * n.depth;
    }
    value /= weight_sum;

    let mut variance = 0.0;
    for n in neighbors {
        let w = n.weight / n.distance.powf(power);
        variance += w * (n.depth - value).powi(2);
    }
    variance /= weight_sum;

    Estimate {
        value,
        variance,
        degraded,
    }
}
