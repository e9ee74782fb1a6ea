//! Metric declarations for the peatkit processing pipeline.
//!
//! This crate re-exports the `metrics` facade and declares every metric
//! the pipeline records as a structured [`Metric`] constant, so names
//! live in one place and exporters can be given descriptions up front.
//! With no recorder installed the recording calls are no-ops, which is
//! the normal state for library consumers that don't care about metrics.
//!
//! # Example
//!
//! ```rust,ignore
//! use peatkit_metrics::{describe_metrics, metric_defs};
//!
//! // Once at startup, after installing a recorder:
//! describe_metrics();
//!
//! // At a recording site:
//! metrics::counter!(metric_defs::INTERP_CELLS_FILLED.name).increment(n);
//! ```

pub use metrics;

use metrics::{describe_counter, describe_gauge, describe_histogram, Unit};

/// The kind of metric (counter, gauge, or histogram).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricKind {
    /// A monotonically increasing counter.
    Counter,
    /// A gauge that can go up and down.
    Gauge,
    /// A histogram for recording distributions.
    Histogram,
}

/// A metric declaration with its metadata.
///
/// Declared as consts so recording sites and exporters share one name.
#[derive(Debug, Clone)]
pub struct Metric {
    /// The metric name (e.g. `"peatkit.interp.cells_filled"`).
    pub name: &'static str,
    /// The kind of metric.
    pub kind: MetricKind,
    /// Human-readable description.
    pub description: &'static str,
    /// The unit of measurement, if any.
    pub unit: Option<Unit>,
}

impl Metric {
    /// Declare a counter.
    pub const fn counter(name: &'static str) -> Self {
        Self {
            name,
            kind: MetricKind::Counter,
            description: "",
            unit: None,
        }
    }

    /// Declare a gauge.
    pub const fn gauge(name: &'static str) -> Self {
        Self {
            name,
            kind: MetricKind::Gauge,
            description: "",
            unit: None,
        }
    }

    /// Declare a histogram.
    pub const fn histogram(name: &'static str) -> Self {
        Self {
            name,
            kind: MetricKind::Histogram,
            description: "",
            unit: None,
        }
    }

    /// Set the description.
    pub const fn with_description(mut self, description: &'static str) -> Self {
        self.description = description;
        self
    }

    /// Set the unit.
    pub const fn with_unit(mut self, unit: Unit) -> Self {
        self.unit = Some(unit);
        self
    }

    /// Register this metric's description with the installed recorder.
    pub fn describe(&self) {
        match (self.kind, self.unit) {
            (MetricKind::Counter, Some(unit)) => describe_counter!(self.name, unit, self.description),
            (MetricKind::Counter, None) => describe_counter!(self.name, self.description),
            (MetricKind::Gauge, Some(unit)) => describe_gauge!(self.name, unit, self.description),
            (MetricKind::Gauge, None) => describe_gauge!(self.name, self.description),
            (MetricKind::Histogram, Some(unit)) => {
                describe_histogram!(self.name, unit, self.description)
            }
            (MetricKind::Histogram, None) => describe_histogram!(self.name, self.description),
        }
    }
}

/// All metric definitions for the pipeline.
pub mod metric_defs {
    use super::{Metric, Unit};

    // ========================================================================
    // Interpolation engine
    // ========================================================================

    /// Grid cells that received an interpolated value.
    pub const INTERP_CELLS_FILLED: Metric = Metric::counter("peatkit.interp.cells_filled")
        .with_description("Grid cells that received an interpolated value")
        .with_unit(Unit::Count);

    /// Grid cells left as no-data (too few neighbors in range).
    pub const INTERP_CELLS_NODATA: Metric = Metric::counter("peatkit.interp.cells_nodata")
        .with_description("Grid cells left as no-data")
        .with_unit(Unit::Count);

    /// Cells whose kriging system was degenerate and fell back to
    /// distance weighting.
    pub const INTERP_KRIGING_FALLBACKS: Metric = Metric::counter("peatkit.interp.kriging_fallbacks")
        .with_description("Cells that fell back from kriging to distance weighting")
        .with_unit(Unit::Count);

    /// Wall-clock duration of one interpolation run.
    pub const INTERP_RUN_TIME: Metric = Metric::histogram("peatkit.interp.run_time_ms")
        .with_description("Wall-clock duration of one interpolation run in milliseconds")
        .with_unit(Unit::Milliseconds);

    // ========================================================================
    // Classifier
    // ========================================================================

    /// Zones classified per run.
    pub const CLASSIFY_ZONES: Metric = Metric::counter("peatkit.classify.zones")
        .with_description("Zones classified")
        .with_unit(Unit::Count);

    /// Zones reclassified by the smoothing pass.
    pub const CLASSIFY_SMOOTHED: Metric = Metric::counter("peatkit.classify.smoothed")
        .with_description("Zones reclassified by majority smoothing")
        .with_unit(Unit::Count);

    /// Returns a slice of all defined metrics.
    pub const ALL: &[&Metric] = &[
        &INTERP_CELLS_FILLED,
        &INTERP_CELLS_NODATA,
        &INTERP_KRIGING_FALLBACKS,
        &INTERP_RUN_TIME,
        &CLASSIFY_ZONES,
        &CLASSIFY_SMOOTHED,
    ];
}

/// Register descriptions for all pipeline metrics.
///
/// Call once at startup after installing a metrics recorder.
pub fn describe_metrics() {
    for metric in metric_defs::ALL {
        metric.describe();
    }
}
