//! # peatkit-survey
//!
//! Data model for peat depth and condition surveys.
//!
//! This crate holds the immutable input records the processing crates
//! operate on: measured survey points ([`SurveyPoint`], [`SurveySet`]),
//! management zones with attribute mappings ([`Zone`], [`ZoneSet`]), and
//! the planar geometry primitives they are built from ([`Point2`],
//! [`Polygon`], [`BoundingBox`]). It also provides survey planning
//! ([`plan_survey_points`]): laying out sample locations on a regular
//! lattice inside a site boundary before anyone goes into the field.
//!
//! All positions are planar coordinates in a single projected coordinate
//! system identified by an opaque [`CrsTag`]. The crate performs no
//! coordinate transformation; reprojection happens in the host before
//! records enter the core.
//!
//! ## Example
//!
//! ```
//! use peatkit_survey::{CrsTag, SurveyPoint, SurveySet};
//! use chrono::NaiveDate;
//!
//! let date = NaiveDate::from_ymd_opt(2024, 6, 12).unwrap();
//! let points = vec![
//!     SurveyPoint::new(1, 1250.0, 3400.0, Some(1.6), date),
//!     SurveyPoint::new(2, 1300.0, 3400.0, Some(1.2), date),
//! ];
//! let set = SurveySet::new("baseline", CrsTag::new("EPSG:27700"), points);
//! assert_eq!(set.len(), 2);
//! ```

mod error;
mod geom;
mod plan;
mod point;
mod set;
mod zone;

pub use error::SurveyError;
pub use geom::{point_segment_distance, segment_overlap_length, BoundingBox, Point2, Polygon};
pub use plan::{plan_survey_points, PlanParams, PlannedPoint, SpacingClass};
pub use point::{PointId, SurveyPoint};
pub use set::{CrsTag, SurveySet};
pub use zone::{AttributeValue, Zone, ZoneId, ZoneSet};

/// Result type for survey data operations.
pub type Result<T> = std::result::Result<T, SurveyError>;
