//! Interpolated depth surfaces.

use crate::{GridError, GridSpec, Result};
use serde::{Deserialize, Serialize};

/// No-data sentinel for cell values.
///
/// Stored as NaN internally; accessors translate it to `None` so callers
/// never compare against the sentinel themselves.
pub const NO_DATA: f64 = f64::NAN;

/// Sentinel stored in the variance field of a cell whose estimate was
/// produced by a fallback path (e.g. an ill-conditioned kriging system
/// solved by distance weighting instead). The value is usable; the
/// uncertainty is not.
pub const DEGRADED_VARIANCE: f64 = -1.0;

/// A dense depth surface with per-cell uncertainty.
///
/// Values are peat depth in metres; variances are the estimator's
/// uncertainty measure for the cell (kriging variance, or weighted
/// sample variance for distance weighting). Both arrays are flat
/// row-major over the shared [`GridSpec`]. Immutable after construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepthGrid {
    spec: GridSpec,
    values: Vec<f64>,
    variances: Vec<f64>,
}

impl DepthGrid {
    /// Assemble a grid from row-major cell arrays.
    ///
    /// Fails with [`GridError::CellCountMismatch`] if either array does
    /// not match the spec's extent.
    pub fn from_parts(spec: GridSpec, values: Vec<f64>, variances: Vec<f64>) -> Result<Self> {
        for len in [values.len(), variances.len()] {
            if len != spec.cell_count() {
                return Err(GridError::CellCountMismatch {
                    rows: spec.rows(),
                    cols: spec.cols(),
                    actual: len,
                });
            }
        }
        Ok(Self {
            spec,
            values,
            variances,
        })
    }

    /// The grid geometry.
    pub fn spec(&self) -> &GridSpec {
        &self.spec
    }

    /// Cell value, or `None` for no-data.
    pub fn value(&self, row: usize, col: usize) -> Option<f64> {
        let v = self.values[self.spec.index(row, col)];
        if v.is_nan() {
            None
        } else {
            Some(v)
        }
    }

    /// Cell variance, or `None` when the cell is no-data or degraded.
    pub fn variance(&self, row: usize, col: usize) -> Option<f64> {
        let v = self.variances[self.spec.index(row, col)];
        if v.is_nan() || v < 0.0 {
            None
        } else {
            Some(v)
        }
    }

    /// Whether the cell's estimate came from a fallback path.
    pub fn is_degraded(&self, row: usize, col: usize) -> bool {
        let idx = self.spec.index(row, col);
        !self.values[idx].is_nan() && self.variances[idx] < 0.0
    }

    /// Whether the cell holds no value.
    pub fn is_no_data(&self, row: usize, col: usize) -> bool {
        self.values[self.spec.index(row, col)].is_nan()
    }

    /// Raw row-major value array (no-data cells are NaN).
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Raw row-major variance array (sentinel semantics per [`DEGRADED_VARIANCE`]).
    pub fn variances(&self) -> &[f64] {
        &self.variances
    }

    /// Count of no-data cells.
    pub fn no_data_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_nan()).count()
    }

    /// Count of degraded-estimate cells.
    pub fn degraded_count(&self) -> usize {
        self.values
            .iter()
            .zip(&self.variances)
            .filter(|(v, var)| !v.is_nan() && **var < 0.0)
            .count()
    }
}
