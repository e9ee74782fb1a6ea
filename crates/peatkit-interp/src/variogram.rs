//! Variogram models for geostatistical estimation.

use crate::{InterpError, Result};
use serde::{Deserialize, Serialize};

/// A fitted variogram: how measurement dissimilarity grows with
/// separation distance.
///
/// All three shapes share the same parameterization: `nugget` is the
/// variance at zero separation (measurement noise plus micro-scale
/// variation), `sill` the additional variance reached at full
/// decorrelation, and `range` the distance at which that happens (for
/// the asymptotic shapes, the distance at which ~95% of the sill is
/// reached, per the conventional factor of 3 in the exponent).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "model", rename_all = "snake_case")]
pub enum VariogramModel {
    /// Spherical model: rises as `1.5(h/a) - 0.5(h/a)^3`, flat beyond
    /// the range. The most common choice for peat depth.
    Spherical {
        /// Variance at zero separation.
        nugget: f64,
        /// Additional variance at full decorrelation.
        sill: f64,
        /// Distance at which the sill is reached.
        range: f64,
    },
    /// Exponential model: `1 - exp(-3h/a)`, asymptotic to the sill.
    Exponential {
        /// Variance at zero separation.
        nugget: f64,
        /// Additional variance at full decorrelation.
        sill: f64,
        /// Effective range (95% of the sill).
        range: f64,
    },
    /// Gaussian model: `1 - exp(-3(h/a)^2)`, smooth near the origin.
    Gaussian {
        /// Variance at zero separation.
        nugget: f64,
        /// Additional variance at full decorrelation.
        sill: f64,
        /// Effective range (95% of the sill).
        range: f64,
    },
}

impl Default for VariogramModel {
    fn default() -> Self {
        Self::Spherical {
            nugget: 0.0,
            sill: 1.0,
            range: 100.0,
        }
    }
}

impl VariogramModel {
    /// The model's (nugget, sill, range) triple.
    fn components(&self) -> (f64, f64, f64) {
        match *self {
            Self::Spherical {
                nugget,
                sill,
                range,
            }
            | Self::Exponential {
                nugget,
                sill,
                range,
            }
            | Self::Gaussian {
                nugget,
                sill,
                range,
            } => (nugget, sill, range),
        }
    }

    /// Validate parameter domains.
    pub fn validate(&self) -> Result<()> {
        let (nugget, sill, range) = self.components();
        if nugget < 0.0 {
            return Err(InterpError::InvalidParams(format!(
                "variogram nugget must be >= 0, got {nugget}"
            )));
        }
        if !(sill > 0.0) {
            return Err(InterpError::InvalidParams(format!(
                "variogram sill must be > 0, got {sill}"
            )));
        }
        if !(range > 0.0) {
            return Err(InterpError::InvalidParams(format!(
                "variogram range must be > 0, got {range}"
            )));
        }
        Ok(())
    }

    /// Semivariance at separation `h`.
    ///
    /// Zero at (and only at) zero separation; the nugget appears as a
    /// discontinuity for any positive distance.
    pub fn gamma(&self, h: f64) -> f64 {
        if h < 1e-10 {
            return 0.0;
        }
        match *self {
            Self::Spherical {
                nugget,
                sill,
                range,
            } => {
                if h >= range {
                    nugget + sill
                } else {
                    let ratio = h / range;
                    nugget + sill * (1.5 * ratio - 0.5 * ratio.powi(3))
                }
            }
            Self::Exponential {
                nugget,
                sill,
                range,
            } => nugget + sill * (1.0 - (-3.0 * h / range).exp()),
            Self::Gaussian {
                nugget,
                sill,
                range,
            } => nugget + sill * (1.0 - (-3.0 * (h / range).powi(2)).exp()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_spherical_reaches_sill_at_range() {
        let model = VariogramModel::Spherical {
            nugget: 0.1,
            sill: 0.9,
            range: 100.0,
        };
        assert_relative_eq!(model.gamma(0.0), 0.0);
        assert_relative_eq!(model.gamma(100.0), 1.0);
        assert_relative_eq!(model.gamma(250.0), 1.0);
        let mid = model.gamma(50.0);
        assert!(mid > 0.1 && mid < 1.0);
    }

    #[test]
    fn test_exponential_asymptotic() {
        let model = VariogramModel::Exponential {
            nugget: 0.0,
            sill: 1.0,
            range: 100.0,
        };
        assert_relative_eq!(model.gamma(0.0), 0.0);
        assert_relative_eq!(model.gamma(100.0), 1.0 - (-3.0f64).exp());
        assert!((model.gamma(1000.0) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_gaussian_smooth_near_origin() {
        let model = VariogramModel::Gaussian {
            nugget: 0.0,
            sill: 1.0,
            range: 100.0,
        };
        // Quadratic behavior near zero: gamma(1) << gamma(10)
        assert!(model.gamma(1.0) * 50.0 < model.gamma(10.0));
        assert!((model.gamma(500.0) - 1.0).abs() < 0.05);
    }

    #[test]
    fn test_nugget_is_a_discontinuity() {
        let model = VariogramModel::Spherical {
            nugget: 0.5,
            sill: 0.5,
            range: 100.0,
        };
        assert_relative_eq!(model.gamma(0.0), 0.0);
        assert!(model.gamma(0.001) > 0.5);
    }

    #[test]
    fn test_validation() {
        assert!(VariogramModel::default().validate().is_ok());
        let bad = VariogramModel::Spherical {
            nugget: -0.1,
            sill: 1.0,
            range: 100.0,
        };
        assert!(bad.validate().is_err());
        let bad = VariogramModel::Gaussian {
            nugget: 0.0,
            sill: 0.0,
            range: 100.0,
        };
        assert!(bad.validate().is_err());
        let bad = VariogramModel::Exponential {
            nugget: 0.0,
            sill: 1.0,
            range: 0.0,
        };
        assert!(bad.validate().is_err());
    }
}
