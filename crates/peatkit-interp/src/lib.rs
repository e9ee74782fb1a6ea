//! # peatkit-interp
//!
//! Turns an irregular set of survey points into a continuous depth
//! surface with per-cell uncertainty.
//!
//! The crate has three layers:
//! - [`PointIndex`] - a deterministic spatial index over the measured
//!   points of a survey set (k-nearest and radius queries, ties broken
//!   by point insertion order, never by memory layout);
//! - [`Estimator`] - the two local estimators, inverse-distance
//!   weighting and ordinary kriging over a fitted [`VariogramModel`];
//! - [`interpolate`] - the grid engine: queries the index per cell,
//!   runs the estimator, and assembles a
//!   [`DepthGrid`](peatkit_grid::DepthGrid) in parallel over rows.
//!
//! Output is bit-identical for a given input regardless of how many
//! rayon workers run the rows: per-cell work depends only on the index
//! and the grid spec, and neighbor accumulation always happens in
//! (distance, insertion order).
//!
//! ## Example
//!
//! ```
//! use chrono::NaiveDate;
//! use peatkit_grid::GridSpec;
//! use peatkit_interp::{interpolate, Estimator, InterpolationParams, PointIndex};
//! use peatkit_survey::{CrsTag, SurveyPoint, SurveySet};
//!
//! let date = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
//! let points = (0..16)
//!     .map(|i| {
//!         let (x, y) = ((i % 4) as f64 * 50.0, (i / 4) as f64 * 50.0);
//!         SurveyPoint::new(i + 1, x, y, Some(1.0 + 0.01 * x), date)
//!     })
//!     .collect();
//! let set = SurveySet::new("baseline", CrsTag::new("EPSG:27700"), points);
//!
//! let index = PointIndex::build(&set)?;
//! let spec = GridSpec::new(0.0, 150.0, 25.0, 6, 6, CrsTag::new("EPSG:27700")).unwrap();
//! let params = InterpolationParams {
//!     search_radius: 100.0,
//!     ..InterpolationParams::default()
//! };
//! let grid = interpolate(&set, &index, &spec, &Estimator::default(), &params)?;
//! assert_eq!(grid.no_data_count(), 0);
//! # Ok::<(), peatkit_interp::InterpError>(())
//! ```

mod engine;
mod error;
mod estimator;
mod index;
mod kriging;
mod params;
mod variogram;

pub use engine::interpolate;
pub use error::InterpError;
pub use estimator::{Estimate, Estimator, NeighborSample};
pub use index::{Neighbor, PointIndex, Sample};
pub use params::InterpolationParams;
pub use variogram::VariogramModel;

/// Result type for interpolation operations.
pub type Result<T> = std::result::Result<T, InterpError>;
