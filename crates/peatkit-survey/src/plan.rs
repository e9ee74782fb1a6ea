//! Survey planning: regular sample lattices inside a site boundary.
//!
//! Field protocols for peat surveys lay out probe locations on a coarse
//! lattice (typically 100 m) aligned to the national grid, optionally
//! infilled with a finer lattice (typically 50 m) where more detail is
//! wanted. This module generates those planned locations from a site
//! polygon, before any fieldwork happens.

use crate::{Point2, Polygon, Result, SurveyError};
use serde::{Deserialize, Serialize};

/// Which lattice a planned point belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpacingClass {
    /// Point sits on the coarse lattice.
    Coarse,
    /// Infill point on the fine lattice only.
    Fine,
}

/// A planned (not yet surveyed) sample location.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlannedPoint {
    /// Sequence number in scan order (south to north, west to east).
    pub id: u32,
    /// Easting, a multiple of the generating spacing.
    pub easting: f64,
    /// Northing, a multiple of the generating spacing.
    pub northing: f64,
    /// Which lattice generated the point.
    pub spacing: SpacingClass,
}

/// Parameters for sample-lattice planning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlanParams {
    /// Coarse lattice spacing in map units.
    pub coarse_spacing: f64,
    /// Fine lattice spacing in map units; must divide the coarse spacing.
    pub fine_spacing: f64,
    /// Whether to generate fine infill points at all.
    pub include_fine: bool,
}

impl Default for PlanParams {
    fn default() -> Self {
        Self {
            coarse_spacing: 100.0,
            fine_spacing: 50.0,
            include_fine: true,
        }
    }
}

impl PlanParams {
    /// Validate the parameter combination.
    pub fn validate(&self) -> Result<()> {
        if !(self.coarse_spacing > 0.0) || !(self.fine_spacing > 0.0) {
            return Err(SurveyError::InvalidPlanParams(
                "spacings must be positive".to_string(),
            ));
        }
        if self.include_fine && self.fine_spacing >= self.coarse_spacing {
            return Err(SurveyError::InvalidPlanParams(format!(
                "fine spacing {} must be smaller than coarse spacing {}",
                self.fine_spacing, self.coarse_spacing
            )));
        }
        Ok(())
    }

    fn active_spacing(&self) -> f64 {
        if self.include_fine {
            self.fine_spacing
        } else {
            self.coarse_spacing
        }
    }
}

/// Generate planned sample points inside a site polygon.
///
/// Points are placed at absolute multiples of the lattice spacing (grid
/// alignment, not polygon-relative), scanned south to north then west to
/// east, and kept only where they fall inside the polygon. A fine point
/// that also sits on the coarse lattice is labelled
/// [`SpacingClass::Coarse`].
///
/// # Arguments
/// * `site` - Site boundary polygon.
/// * `params` - Lattice spacings; see [`PlanParams`].
///
/// # Returns
/// Planned points in scan order with sequential ids starting at 1.
pub fn plan_survey_points(site: &Polygon, params: &PlanParams) -> Result<Vec<PlannedPoint>> {
    params.validate()?;

    let bbox = site.bbox();
    let spacing = params.active_spacing();
    let start_x = round_up_to_multiple(bbox.min_x, spacing);
    let start_y = round_up_to_multiple(bbox.min_y, spacing);

    let mut planned = Vec::new();
    let mut id = 1u32;

    let mut y = start_y;
    while y < bbox.max_y {
        let mut x = start_x;
        while x < bbox.max_x {
            if site.contains(&Point2::new(x, y)) {
                let spacing_class = if on_lattice(x, params.coarse_spacing)
                    && on_lattice(y, params.coarse_spacing)
                {
                    SpacingClass::Coarse
                } else {
                    SpacingClass::Fine
                };
                planned.push(PlannedPoint {
                    id,
                    easting: x,
                    northing: y,
                    spacing: spacing_class,
                });
                id += 1;
            }
            x += spacing;
        }
        y += spacing;
    }

    Ok(planned)
}

/// Smallest multiple of `step` that is >= `v`.
fn round_up_to_multiple(v: f64, step: f64) -> f64 {
    (v / step).ceil() * step
}

fn on_lattice(v: f64, step: f64) -> bool {
    let r = (v / step).round();
    (v - r * step).abs() < 1e-6
}
