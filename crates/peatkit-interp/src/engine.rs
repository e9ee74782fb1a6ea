//! The grid interpolation engine.

use crate::{Estimator, InterpError, InterpolationParams, NeighborSample, PointIndex, Result};
use peatkit_grid::{DepthGrid, GridSpec, DEGRADED_VARIANCE, NO_DATA};
use peatkit_metrics::metric_defs;
use peatkit_survey::SurveySet;
use rayon::prelude::*;
use std::time::Instant;

/// Interpolate a depth surface over a grid from a survey set.
///
/// Per cell: query the index for up to `max_neighbors` samples within
/// `search_radius` of the cell centre; with fewer than `min_neighbors`
/// in range the cell becomes no-data (extrapolation refused). A kriging
/// neighborhood whose system is singular or ill-conditioned degrades to
/// a distance-weighted estimate for that cell, marked with the
/// [`DEGRADED_VARIANCE`] sentinel; one bad neighborhood never aborts the
/// grid.
///
/// Rows are computed in parallel; each worker owns its rows' cell
/// arrays and the rows are concatenated in row order afterward, so the
/// result is bit-identical however the work was scheduled.
///
/// # Arguments
/// * `set` - The survey set (for coordinate-system checking).
/// * `index` - Index built from `set` via [`PointIndex::build`].
/// * `spec` - Geometry of the output grid.
/// * `estimator` - Local estimator configuration.
/// * `params` - Neighborhood parameters.
///
/// # Errors
/// [`InterpError::DegenerateInput`] for an empty survey set and
/// [`InterpError::CoordinateSystemMismatch`] when set and spec disagree;
/// invalid parameters are rejected up front.
pub fn interpolate(
    set: &SurveySet,
    index: &PointIndex,
    spec: &GridSpec,
    estimator: &Estimator,
    params: &InterpolationParams,
) -> Result<DepthGrid> {
    estimator.validate()?;
    params.validate()?;

    if set.is_empty() {
        return Err(InterpError::DegenerateInput(format!(
            "survey set '{}' is empty",
            set.campaign()
        )));
    }
    if set.crs() != spec.crs() {
        return Err(InterpError::CoordinateSystemMismatch {
            survey: set.crs().to_string(),
            grid: spec.crs().to_string(),
        });
    }

    let started = Instant::now();
    let cols = spec.cols();

    let rows: Vec<(Vec<f64>, Vec<f64>)> = (0..spec.rows())
        .into_par_iter()
        .map(|row| {
            let mut values = Vec::with_capacity(cols);
            let mut variances = Vec::with_capacity(cols);
            for col in 0..cols {
                let (value, variance) = estimate_cell(index, spec, estimator, params, row, col);
                values.push(value);
                variances.push(variance);
            }
            (values, variances)
        })
        .collect();

    let mut values = Vec::with_capacity(spec.cell_count());
    let mut variances = Vec::with_capacity(spec.cell_count());
    for (row_values, row_variances) in rows {
        values.extend(row_values);
        variances.extend(row_variances);
    }

    let grid = DepthGrid::from_parts(spec.clone(), values, variances)
        .map_err(|e| InterpError::InvalidParams(e.to_string()))?;

    let no_data = grid.no_data_count();
    let degraded = grid.degraded_count();
    let filled = grid.spec().cell_count() - no_data;
    metrics::counter!(metric_defs::INTERP_CELLS_FILLED.name).increment(filled as u64);
    metrics::counter!(metric_defs::INTERP_CELLS_NODATA.name).increment(no_data as u64);
    metrics::counter!(metric_defs::INTERP_KRIGING_FALLBACKS.name).increment(degraded as u64);
    metrics::histogram!(metric_defs::INTERP_RUN_TIME.name)
        .record(started.elapsed().as_secs_f64() * 1000.0);
    log::debug!(
        "interpolated {} cells for '{}': {} filled, {} no-data, {} degraded",
        grid.spec().cell_count(),
        set.campaign(),
        filled,
        no_data,
        degraded
    );
    if degraded > 0 {
        log::warn!(
            "{degraded} cells fell back to distance weighting (ill-conditioned kriging systems)"
        );
    }

    Ok(grid)
}

/// Compute one cell's (value, variance) pair, using the grid sentinels
/// for no-data and degraded estimates.
fn estimate_cell(
    index: &PointIndex,
    spec: &GridSpec,
    estimator: &Estimator,
    params: &InterpolationParams,
    row: usize,
    col: usize,
) -> (f64, f64) {
    let center = spec.cell_center(row, col);
    let mut found = index.within(center.x, center.y, params.search_radius);
    found.truncate(params.max_neighbors);

    if found.len() < params.min_neighbors {
        return (NO_DATA, NO_DATA);
    }

    let neighbors: Vec<NeighborSample> = found
        .iter()
        .map(|n| {
            let s = index.samples()[n.ordinal];
            NeighborSample {
                x: s.x,
                y: s.y,
                depth: s.depth,
                weight: s.weight,
                distance: n.distance,
            }
        })
        .collect();

    match estimator.estimate(&neighbors) {
        Some(est) if est.degraded => (est.value, DEGRADED_VARIANCE),
        Some(est) => (est.value, est.variance),
        None => (NO_DATA, NO_DATA),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::VariogramModel;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;
    use peatkit_survey::{CrsTag, SurveyPoint};

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()
    }

    fn crs() -> CrsTag {
        CrsTag::new("EPSG:27700")
    }

    fn corners_set() -> SurveySet {
        // Corners of a 10 x 10 unit square, depths 1..4
        let points = vec![
            SurveyPoint::new(1, 0.0, 0.0, Some(1.0), date()),
            SurveyPoint::new(2, 10.0, 0.0, Some(2.0), date()),
            SurveyPoint::new(3, 0.0, 10.0, Some(3.0), date()),
            SurveyPoint::new(4, 10.0, 10.0, Some(4.0), date()),
        ];
        SurveySet::new("corners", crs(), points)
    }

    fn single_cell_spec() -> GridSpec {
        // One 10 x 10 cell covering the square; centre at (5, 5)
        GridSpec::new(0.0, 10.0, 10.0, 1, 1, crs()).unwrap()
    }

    fn params(radius: f64) -> InterpolationParams {
        InterpolationParams {
            search_radius: radius,
            ..InterpolationParams::default()
        }
    }

    #[test]
    fn test_center_cell_is_mean_of_symmetric_corners() {
        let set = corners_set();
        let index = PointIndex::build(&set).unwrap();
        let grid = interpolate(
            &set,
            &index,
            &single_cell_spec(),
            &Estimator::default(),
            &params(10.0),
        )
        .unwrap();
        assert_relative_eq!(grid.value(0, 0).unwrap(), 2.5, epsilon = 1e-12);
        assert!(grid.variance(0, 0).unwrap() > 0.0);
    }

    #[test]
    fn test_crs_mismatch_rejected() {
        let set = corners_set();
        let index = PointIndex::build(&set).unwrap();
        let spec = GridSpec::new(0.0, 10.0, 10.0, 1, 1, CrsTag::new("EPSG:4326")).unwrap();
        assert!(matches!(
            interpolate(&set, &index, &spec, &Estimator::default(), &params(10.0)),
            Err(InterpError::CoordinateSystemMismatch { .. })
        ));
    }

    #[test]
    fn test_out_of_range_cells_are_no_data() {
        let set = corners_set();
        let index = PointIndex::build(&set).unwrap();
        // Search radius too small to reach any corner from the centre
        let grid = interpolate(
            &set,
            &index,
            &single_cell_spec(),
            &Estimator::default(),
            &params(5.0),
        )
        .unwrap();
        assert!(grid.is_no_data(0, 0));
    }

    #[test]
    fn test_min_neighbors_enforced() {
        let set = corners_set();
        let index = PointIndex::build(&set).unwrap();
        // Radius reaches all four corners from the centre (sqrt(50) ~ 7.07)
        let p = InterpolationParams {
            min_neighbors: 5,
            search_radius: 10.0,
            max_neighbors: 8,
        };
        let grid = interpolate(&set, &index, &single_cell_spec(), &Estimator::default(), &p)
            .unwrap();
        assert!(grid.is_no_data(0, 0));
    }

    #[test]
    fn test_kriging_degraded_cells_marked_not_fatal() {
        // Duplicate locations make every kriging neighborhood singular.
        let points = vec![
            SurveyPoint::new(1, 2.0, 2.0, Some(1.0), date()),
            SurveyPoint::new(2, 2.0, 2.0, Some(2.0), date()),
            SurveyPoint::new(3, 8.0, 8.0, Some(3.0), date()),
        ];
        let set = SurveySet::new("dupes", crs(), points);
        let index = PointIndex::build(&set).unwrap();
        let grid = interpolate(
            &set,
            &index,
            &single_cell_spec(),
            &Estimator::kriging(VariogramModel::default()),
            &params(20.0),
        )
        .unwrap();
        assert!(grid.value(0, 0).is_some());
        assert!(grid.is_degraded(0, 0));
        assert_eq!(grid.degraded_count(), 1);
    }

    #[test]
    fn test_kriging_grid_has_variances() {
        let set = corners_set();
        let index = PointIndex::build(&set).unwrap();
        let grid = interpolate(
            &set,
            &index,
            &single_cell_spec(),
            &Estimator::kriging(VariogramModel::Spherical {
                nugget: 0.0,
                sill: 1.0,
                range: 50.0,
            }),
            &params(10.0),
        )
        .unwrap();
        // Symmetric corners: kriging also averages to 2.5
        assert_relative_eq!(grid.value(0, 0).unwrap(), 2.5, epsilon = 1e-9);
        assert!(grid.variance(0, 0).unwrap() > 0.0);
        assert!(!grid.is_degraded(0, 0));
    }
}
