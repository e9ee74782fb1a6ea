//! Survey sets: one campaign's worth of points.

use crate::SurveyPoint;
use serde::{Deserialize, Serialize};

/// Opaque coordinate-reference-system tag, e.g. `"EPSG:27700"`.
///
/// The core never interprets the tag; it only checks that inputs which
/// must share a coordinate system carry equal tags.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CrsTag(String);

impl CrsTag {
    /// Create a tag from any identifier string.
    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }

    /// The tag string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CrsTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// An immutable collection of survey points from one campaign.
///
/// Points are sorted by id on construction so that iteration order (and
/// therefore every downstream tie-break that falls back to insertion
/// order) is independent of the order the host handed them over in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurveySet {
    campaign: String,
    crs: CrsTag,
    points: Vec<SurveyPoint>,
}

impl SurveySet {
    /// Create a survey set, taking ownership of the points.
    pub fn new(campaign: impl Into<String>, crs: CrsTag, mut points: Vec<SurveyPoint>) -> Self {
        points.sort_by_key(|p| p.id);
        Self {
            campaign: campaign.into(),
            crs,
            points,
        }
    }

    /// Campaign label (e.g. `"baseline-2024"`).
    pub fn campaign(&self) -> &str {
        &self.campaign
    }

    /// Coordinate system all points share.
    pub fn crs(&self) -> &CrsTag {
        &self.crs
    }

    /// The points, ordered by id.
    pub fn points(&self) -> &[SurveyPoint] {
        &self.points
    }

    /// Number of points (measured or not).
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the set holds no points at all.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Iterate over points that carry a depth measurement.
    pub fn measured_points(&self) -> impl Iterator<Item = &SurveyPoint> {
        self.points.iter().filter(|p| p.depth.is_some())
    }
}
