//! Survey point records.

use crate::Point2;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Identifier of a survey point, unique within its [`SurveySet`](crate::SurveySet).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct PointId(pub u32);

impl PointId {
    /// Create a new point id.
    pub fn new(id: u32) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for PointId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "p{}", self.0)
    }
}

/// A single probed location from a field survey.
///
/// Depth is in metres. `depth: None` records a visited location where no
/// measurement could be taken (probe refusal, standing water); such
/// points are carried through the data model but never contribute to
/// interpolation. The optional quality weight (> 0) lets a surveyor mark
/// readings as more or less trustworthy; it scales the point's influence
/// in distance-weighted estimates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurveyPoint {
    /// Point identifier.
    pub id: PointId,
    /// Easting in the survey coordinate system.
    pub x: f64,
    /// Northing in the survey coordinate system.
    pub y: f64,
    /// Measured peat depth in metres, if a reading was obtained.
    pub depth: Option<f64>,
    /// Optional quality weight (> 0); `None` means weight 1.
    pub weight: Option<f64>,
    /// Date the reading was recorded.
    pub recorded: NaiveDate,
}

impl SurveyPoint {
    /// Create a survey point with unit quality weight.
    pub fn new(id: u32, x: f64, y: f64, depth: Option<f64>, recorded: NaiveDate) -> Self {
        Self {
            id: PointId::new(id),
            x,
            y,
            depth,
            weight: None,
            recorded,
        }
    }

    /// Set a quality weight.
    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = Some(weight);
        self
    }

    /// The point's position.
    pub fn position(&self) -> Point2 {
        Point2::new(self.x, self.y)
    }

    /// Effective quality weight (1.0 when unset).
    pub fn effective_weight(&self) -> f64 {
        self.weight.unwrap_or(1.0)
    }
}
