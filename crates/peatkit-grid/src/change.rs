//! Raster differencing between repeat surveys.

use crate::{DepthGrid, GridError, GridSpec, Result, DEGRADED_VARIANCE, NO_DATA};
use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, Normal};

/// Confidence qualifier for a [`VolumeReport`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    /// Enough of the grid was valid to trust the aggregate.
    Nominal,
    /// Too many cells were missing or degraded; treat the aggregate as
    /// indicative only.
    Low,
}

/// Parameters for differencing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DifferenceParams {
    /// Fraction of cells (no-data plus degraded) above which the report
    /// confidence drops to [`Confidence::Low`].
    pub low_confidence_fraction: f64,
}

impl Default for DifferenceParams {
    fn default() -> Self {
        Self {
            low_confidence_fraction: 0.2,
        }
    }
}

impl DifferenceParams {
    /// Validate parameter domains.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.low_confidence_fraction) {
            return Err(GridError::InvalidParams(format!(
                "low_confidence_fraction must be in [0, 1], got {}",
                self.low_confidence_fraction
            )));
        }
        Ok(())
    }
}

/// A signed change surface between two depth grids.
///
/// Positive deltas are accumulation (after deeper than before).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeGrid {
    spec: GridSpec,
    deltas: Vec<f64>,
    variances: Vec<f64>,
}

impl ChangeGrid {
    /// The grid geometry.
    pub fn spec(&self) -> &GridSpec {
        &self.spec
    }

    /// Cell delta, or `None` for no-data.
    pub fn delta(&self, row: usize, col: usize) -> Option<f64> {
        let v = self.deltas[self.spec.index(row, col)];
        if v.is_nan() {
            None
        } else {
            Some(v)
        }
    }

    /// Combined variance, or `None` when the cell is no-data or either
    /// input carried a degraded estimate.
    pub fn variance(&self, row: usize, col: usize) -> Option<f64> {
        let v = self.variances[self.spec.index(row, col)];
        if v.is_nan() || v < 0.0 {
            None
        } else {
            Some(v)
        }
    }

    /// Whether the cell holds no delta.
    pub fn is_no_data(&self, row: usize, col: usize) -> bool {
        self.deltas[self.spec.index(row, col)].is_nan()
    }

    /// Raw row-major delta array (no-data cells are NaN).
    pub fn deltas(&self) -> &[f64] {
        &self.deltas
    }

    /// Raw row-major variance array.
    pub fn variances(&self) -> &[f64] {
        &self.variances
    }
}

/// Aggregate volume change over a [`ChangeGrid`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VolumeReport {
    /// Net volume change: positive = net gain, negative = net loss.
    pub net_volume: f64,
    /// Valid cells that contributed to the aggregate.
    pub cells_considered: usize,
    /// Cells excluded as no-data.
    pub cells_missing: usize,
    /// Confidence qualifier; see [`DifferenceParams::low_confidence_fraction`].
    pub confidence: Confidence,
    /// 95% interval on the net volume, propagated from cell variances
    /// under the independence assumption. Absent when any contributing
    /// cell carried a degraded variance.
    pub interval95: Option<(f64, f64)>,
}

/// Compute a change grid and volume report from two depth grids.
///
/// Both grids must share dimensions and coordinate system. Per cell: if
/// either input is no-data, the output is no-data; otherwise the delta is
/// `after - before` and the combined variance is the sum of the two input
/// variances. Treating the surveys as independent overstates variance
/// where errors correlate in the field; it is a deliberate simplifying
/// choice, not a claim about the data.
///
/// # Arguments
/// * `before`, `after` - Depth grids from the two campaigns.
/// * `cell_area` - Area of one grid cell in squared map units.
/// * `params` - Reporting thresholds; see [`DifferenceParams`].
///
/// # Returns
/// The change grid and its volume report.
pub fn difference(
    before: &DepthGrid,
    after: &DepthGrid,
    cell_area: f64,
    params: &DifferenceParams,
) -> Result<(ChangeGrid, VolumeReport)> {
    params.validate()?;
    if !before.spec().same_shape(after.spec()) {
        return Err(GridError::GridMismatch {
            before_rows: before.spec().rows(),
            before_cols: before.spec().cols(),
            after_rows: after.spec().rows(),
            after_cols: after.spec().cols(),
        });
    }
    if before.spec().crs() != after.spec().crs() {
        return Err(GridError::CoordinateSystemMismatch {
            before: before.spec().crs().to_string(),
            after: after.spec().crs().to_string(),
        });
    }

    let cell_count = before.spec().cell_count();
    let mut deltas = Vec::with_capacity(cell_count);
    let mut variances = Vec::with_capacity(cell_count);

    let mut net_volume = 0.0;
    let mut volume_variance = 0.0;
    let mut cells_missing = 0usize;
    let mut cells_degraded = 0usize;
    let mut any_degraded = false;

    for idx in 0..cell_count {
        let b = before.values()[idx];
        let a = after.values()[idx];
        if b.is_nan() || a.is_nan() {
            deltas.push(NO_DATA);
            variances.push(NO_DATA);
            cells_missing += 1;
            continue;
        }
        let delta = a - b;
        deltas.push(delta);
        net_volume += delta * cell_area;

        let bv = before.variances()[idx];
        let av = after.variances()[idx];
        if bv < 0.0 || av < 0.0 {
            // A degraded input makes the combined uncertainty meaningless.
            variances.push(DEGRADED_VARIANCE);
            cells_degraded += 1;
            any_degraded = true;
        } else {
            let combined = bv + av;
            variances.push(combined);
            volume_variance += combined * cell_area * cell_area;
        }
    }

    let cells_considered = cell_count - cells_missing;
    let suspect_fraction = (cells_missing + cells_degraded) as f64 / cell_count as f64;
    let confidence = if suspect_fraction > params.low_confidence_fraction {
        Confidence::Low
    } else {
        Confidence::Nominal
    };

    let interval95 = if any_degraded || cells_considered == 0 {
        None
    } else {
        // Normal::new(0, 1) cannot fail for these constants.
        let z = Normal::new(0.0, 1.0)
            .map(|n| n.inverse_cdf(0.975))
            .unwrap_or(1.96);
        let half_width = z * volume_variance.sqrt();
        Some((net_volume - half_width, net_volume + half_width))
    };

    let report = VolumeReport {
        net_volume,
        cells_considered,
        cells_missing,
        confidence,
        interval95,
    };
    let grid = ChangeGrid {
        spec: before.spec().clone(),
        deltas,
        variances,
    };
    Ok((grid, report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use peatkit_survey::CrsTag;

    fn spec(rows: usize, cols: usize) -> GridSpec {
        GridSpec::new(0.0, 100.0, 10.0, rows, cols, CrsTag::new("EPSG:27700")).unwrap()
    }

    fn uniform_grid(rows: usize, cols: usize, value: f64, variance: f64) -> DepthGrid {
        let n = rows * cols;
        DepthGrid::from_parts(spec(rows, cols), vec![value; n], vec![variance; n]).unwrap()
    }

    #[test]
    fn test_self_difference_is_zero() {
        let g = uniform_grid(4, 4, 1.5, 0.1);
        let (change, report) = difference(&g, &g, 100.0, &DifferenceParams::default()).unwrap();
        for r in 0..4 {
            for c in 0..4 {
                assert_relative_eq!(change.delta(r, c).unwrap(), 0.0);
            }
        }
        assert_relative_eq!(report.net_volume, 0.0);
        assert_eq!(report.cells_considered, 16);
        assert_eq!(report.cells_missing, 0);
        assert_eq!(report.confidence, Confidence::Nominal);
    }

    #[test]
    fn test_dimension_mismatch_rejected() {
        let a = uniform_grid(4, 4, 1.0, 0.0);
        let b = uniform_grid(4, 5, 1.0, 0.0);
        assert!(matches!(
            difference(&a, &b, 100.0, &DifferenceParams::default()),
            Err(GridError::GridMismatch { .. })
        ));
    }

    #[test]
    fn test_crs_mismatch_rejected() {
        let a = uniform_grid(2, 2, 1.0, 0.0);
        let other_spec =
            GridSpec::new(0.0, 100.0, 10.0, 2, 2, CrsTag::new("EPSG:4326")).unwrap();
        let b = DepthGrid::from_parts(other_spec, vec![1.0; 4], vec![0.0; 4]).unwrap();
        assert!(matches!(
            difference(&a, &b, 100.0, &DifferenceParams::default()),
            Err(GridError::CoordinateSystemMismatch { .. })
        ));
    }

    #[test]
    fn test_no_data_is_absorbing() {
        let before = DepthGrid::from_parts(
            spec(1, 3),
            vec![1.0, NO_DATA, 1.0],
            vec![0.0, NO_DATA, 0.0],
        )
        .unwrap();
        let after = DepthGrid::from_parts(
            spec(1, 3),
            vec![2.0, 2.0, NO_DATA],
            vec![0.0, 0.0, NO_DATA],
        )
        .unwrap();
        let (change, report) =
            difference(&before, &after, 1.0, &DifferenceParams::default()).unwrap();
        assert_relative_eq!(change.delta(0, 0).unwrap(), 1.0);
        assert!(change.is_no_data(0, 1));
        assert!(change.is_no_data(0, 2));
        assert_eq!(report.cells_missing, 2);
        // 2 of 3 cells suspect -> low confidence at the default threshold
        assert_eq!(report.confidence, Confidence::Low);
    }

    #[test]
    fn test_volume_accumulates_delta_times_area() {
        let before = uniform_grid(2, 2, 1.0, 0.0);
        let after = uniform_grid(2, 2, 1.25, 0.0);
        let (_, report) = difference(&before, &after, 100.0, &DifferenceParams::default()).unwrap();
        // 4 cells x 0.25 m x 100 m^2
        assert_relative_eq!(report.net_volume, 100.0, epsilon = 1e-9);
    }

    #[test]
    fn test_interval_from_propagated_variance() {
        let before = uniform_grid(1, 1, 1.0, 0.02);
        let after = uniform_grid(1, 1, 1.5, 0.02);
        let (_, report) = difference(&before, &after, 4.0, &DifferenceParams::default()).unwrap();
        let (lo, hi) = report.interval95.unwrap();
        // sigma = sqrt(0.04 * 16) = 0.8, z ~ 1.96
        assert_relative_eq!(report.net_volume, 2.0, epsilon = 1e-9);
        assert_relative_eq!(hi - lo, 2.0 * 1.959964 * 0.8, epsilon = 1e-3);
        assert!(lo < report.net_volume && report.net_volume < hi);
    }

    #[test]
    fn test_degraded_input_suppresses_interval() {
        let before = DepthGrid::from_parts(
            spec(1, 2),
            vec![1.0, 1.0],
            vec![0.1, DEGRADED_VARIANCE],
        )
        .unwrap();
        let after = uniform_grid(1, 2, 2.0, 0.1);
        let (change, report) =
            difference(&before, &after, 1.0, &DifferenceParams::default()).unwrap();
        assert!(report.interval95.is_none());
        // Delta is still produced; only the uncertainty is poisoned.
        assert_relative_eq!(change.delta(0, 1).unwrap(), 1.0);
        assert_eq!(change.variance(0, 1), None);
        assert_eq!(report.confidence, Confidence::Low);
    }
}
