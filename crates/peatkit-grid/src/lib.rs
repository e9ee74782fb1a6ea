//! # peatkit-grid
//!
//! Dense raster products for peat surveys: grid geometry ([`GridSpec`]),
//! interpolated depth surfaces with per-cell uncertainty ([`DepthGrid`]),
//! signed change surfaces between repeat surveys ([`ChangeGrid`]) and the
//! aggregate [`VolumeReport`] produced by [`difference`].
//!
//! Grids are flat row-major arrays with row 0 at the northern edge,
//! immutable once constructed. A cell is either valid (value plus a
//! variance >= 0), valid-but-degraded (value present, variance carries
//! the [`DEGRADED_VARIANCE`] sentinel because the estimator had to fall
//! back for that cell), or no-data. No-data is absorbing: it never
//! silently becomes zero.

mod change;
mod depth;
mod error;
mod spec;

pub use change::{difference, ChangeGrid, Confidence, DifferenceParams, VolumeReport};
pub use depth::{DepthGrid, DEGRADED_VARIANCE, NO_DATA};
pub use error::GridError;
pub use spec::GridSpec;

/// Result type for grid operations.
pub type Result<T> = std::result::Result<T, GridError>;
