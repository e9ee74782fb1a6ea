//! # peatkit-classify
//!
//! Assigns a [`ConditionClass`] to every management zone from an ordered
//! rule list, then suppresses isolated misclassifications with a
//! majority-vote smoothing pass over derived zone adjacency.
//!
//! Rules are a closed predicate language (threshold and range tests over
//! zone attributes, composed with all/any) evaluated by one interpreter
//! in priority order; the first matching rule decides. Callers always
//! include a catch-all default rule - a zone matching nothing is a
//! configuration defect and surfaces as
//! [`ClassifyError::NoMatchingRule`], never as a silent default.
//!
//! ## Example
//!
//! ```
//! use peatkit_classify::{classify, smooth, ClassificationRule, CmpOp,
//!     ConditionClass, Predicate, SmoothingParams};
//! use peatkit_survey::{Polygon, Zone, ZoneSet};
//!
//! let rules = vec![
//!     ClassificationRule::new(
//!         10,
//!         ConditionClass::Degraded,
//!         Predicate::Threshold {
//!             attribute: "vegetation_cover_pct".into(),
//!             op: CmpOp::Lt,
//!             value: 30.0,
//!         },
//!     ),
//!     ClassificationRule::new(100, ConditionClass::Stable, Predicate::Always),
//! ];
//!
//! let zones = ZoneSet::new(vec![
//!     Zone::new(1, "north", Polygon::rectangle(0.0, 0.0, 100.0, 100.0).unwrap())
//!         .with_attribute("vegetation_cover_pct", 22.0),
//! ]);
//!
//! let classes = classify(&zones, &rules)?;
//! assert_eq!(classes[&peatkit_survey::ZoneId::new(1)], ConditionClass::Degraded);
//! let smoothed = smooth(&zones, &classes, &SmoothingParams::default())?;
//! # Ok::<(), peatkit_classify::ClassifyError>(())
//! ```

mod adjacency;
mod classify;
mod error;
mod rule;
mod smooth;

pub use adjacency::ZoneAdjacency;
pub use classify::classify;
pub use error::ClassifyError;
pub use rule::{ClassificationRule, CmpOp, ConditionClass, Predicate};
pub use smooth::{smooth, SmoothingParams};

/// Result type for classification operations.
pub type Result<T> = std::result::Result<T, ClassifyError>;
