//! # peatkit-zonal
//!
//! Area-weighted zonal statistics: summarize a depth or change grid
//! over management zone polygons, and roll classification results up
//! into per-class area shares.
//!
//! Cells contribute to a zone in proportion to the area of the
//! cell-polygon intersection (computed exactly by rectangle clipping),
//! so partial-overlap cells contribute partially rather than
//! all-or-nothing. Zones where too little of the intersecting area
//! holds valid data are flagged [`ZoneSummary::insufficient_coverage`]
//! and report no mean instead of a mean from a handful of samples.

use peatkit_classify::ConditionClass;
use peatkit_grid::{ChangeGrid, DepthGrid, GridSpec};
use peatkit_survey::{Zone, ZoneId, ZoneSet};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Errors that can occur during zonal aggregation.
#[derive(Debug, Error)]
pub enum ZonalError {
    /// An aggregation parameter was outside its valid domain.
    #[error("Invalid aggregation parameters: {0}")]
    InvalidParams(String),
}

/// Result type for zonal operations.
pub type Result<T> = std::result::Result<T, ZonalError>;

/// Read access to per-cell values of a raster product.
///
/// The aggregator works the same way over depth surfaces and change
/// surfaces; this seam is the only thing it needs from either.
pub trait ValueGrid {
    /// The grid geometry.
    fn spec(&self) -> &GridSpec;
    /// Cell value, or `None` for no-data.
    fn cell_value(&self, row: usize, col: usize) -> Option<f64>;
}

impl ValueGrid for DepthGrid {
    fn spec(&self) -> &GridSpec {
        DepthGrid::spec(self)
    }

    fn cell_value(&self, row: usize, col: usize) -> Option<f64> {
        self.value(row, col)
    }
}

impl ValueGrid for ChangeGrid {
    fn spec(&self) -> &GridSpec {
        ChangeGrid::spec(self)
    }

    fn cell_value(&self, row: usize, col: usize) -> Option<f64> {
        self.delta(row, col)
    }
}

/// Parameters for zonal aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AggregationParams {
    /// Minimum valid-area fraction below which a zone is flagged as
    /// insufficiently covered and its mean withheld.
    pub insufficient_coverage_threshold: f64,
}

impl Default for AggregationParams {
    fn default() -> Self {
        Self {
            insufficient_coverage_threshold: 0.5,
        }
    }
}

impl AggregationParams {
    /// Validate parameter domains.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.insufficient_coverage_threshold) {
            return Err(ZonalError::InvalidParams(format!(
                "insufficient_coverage_threshold must be in [0, 1], got {}",
                self.insufficient_coverage_threshold
            )));
        }
        Ok(())
    }
}

/// Per-zone summary of a raster product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneSummary {
    /// The summarized zone.
    pub zone: ZoneId,
    /// Area-weighted mean over valid cells; `None` when coverage was
    /// insufficient.
    pub area_weighted_mean: Option<f64>,
    /// Fraction of the zone-intersecting cell area holding valid data.
    pub valid_cell_fraction: f64,
    /// Whether the valid fraction fell below the configured threshold.
    pub insufficient_coverage: bool,
    /// The zone's condition class, when a classification map was given.
    pub assigned_class: Option<ConditionClass>,
}

/// Summarize one zone over a grid.
///
/// # Arguments
/// * `zone` - The zone to summarize.
/// * `grid` - A depth or change grid.
/// * `classes` - Classification results to attach, if any.
/// * `params` - Coverage threshold; see [`AggregationParams`].
pub fn aggregate<G: ValueGrid>(
    zone: &Zone,
    grid: &G,
    classes: Option<&BTreeMap<ZoneId, ConditionClass>>,
    params: &AggregationParams,
) -> Result<ZoneSummary> {
    params.validate()?;

    let spec = grid.spec();
    let bbox = zone.polygon.bbox();

    let mut total_weight = 0.0;
    let mut valid_weight = 0.0;
    let mut weighted_sum = 0.0;

    for row in spec.row_range(&bbox) {
        for col in spec.col_range(&bbox) {
            let cell = spec.cell_bounds(row, col);
            let weight = zone.polygon.intersection_area_with_rect(&cell);
            if weight <= 0.0 {
                continue;
            }
            total_weight += weight;
            if let Some(value) = grid.cell_value(row, col) {
                valid_weight += weight;
                weighted_sum += value * weight;
            }
        }
    }

    let valid_cell_fraction = if total_weight > 0.0 {
        valid_weight / total_weight
    } else {
        0.0
    };
    let insufficient_coverage = valid_cell_fraction < params.insufficient_coverage_threshold;
    let area_weighted_mean = if insufficient_coverage || valid_weight <= 0.0 {
        None
    } else {
        Some(weighted_sum / valid_weight)
    };

    Ok(ZoneSummary {
        zone: zone.id,
        area_weighted_mean,
        valid_cell_fraction,
        insufficient_coverage,
        assigned_class: classes.and_then(|m| m.get(&zone.id).copied()),
    })
}

/// Area-weighted share of each condition class across a zone set.
///
/// Unclassified zones are excluded from the total; shares over the
/// classified area sum to 1.
pub fn class_distribution(
    zones: &ZoneSet,
    classes: &BTreeMap<ZoneId, ConditionClass>,
) -> BTreeMap<ConditionClass, f64> {
    let mut areas: BTreeMap<ConditionClass, f64> = BTreeMap::new();
    let mut total = 0.0;
    for zone in zones.zones() {
        if let Some(class) = classes.get(&zone.id) {
            let area = zone.polygon.area();
            *areas.entry(*class).or_insert(0.0) += area;
            total += area;
        }
    }
    if total > 0.0 {
        for share in areas.values_mut() {
            *share /= total;
        }
    }
    areas
}
