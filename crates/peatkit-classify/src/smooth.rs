//! Majority smoothing over zone adjacency.

use crate::{ClassifyError, ConditionClass, Result, ZoneAdjacency};
use peatkit_metrics::metric_defs;
use peatkit_survey::{ZoneId, ZoneSet};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Parameters for the smoothing pass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SmoothingParams {
    /// Zones with fewer neighbors than this are never reclassified;
    /// a two-zone "majority" is not evidence of noise.
    pub min_neighbors: usize,
    /// How many passes to run. Zero disables smoothing. Repetition is a
    /// caller decision, deliberately not an internal fixed-point loop.
    pub passes: usize,
    /// Boundary separation tolerance for deriving adjacency.
    pub tolerance: f64,
}

impl Default for SmoothingParams {
    fn default() -> Self {
        Self {
            min_neighbors: 3,
            passes: 1,
            tolerance: 0.01,
        }
    }
}

impl SmoothingParams {
    /// Validate parameter domains.
    pub fn validate(&self) -> Result<()> {
        if self.min_neighbors == 0 {
            return Err(ClassifyError::InvalidParams(
                "min_neighbors must be >= 1".to_string(),
            ));
        }
        if !(self.tolerance >= 0.0) || !self.tolerance.is_finite() {
            return Err(ClassifyError::InvalidParams(format!(
                "tolerance must be >= 0 and finite, got {}",
                self.tolerance
            )));
        }
        Ok(())
    }
}

/// Suppress isolated misclassifications by neighbor majority vote.
///
/// A zone is reclassified when a strict majority (more than half) of
/// its adjacent zones hold one class, that class differs from the
/// zone's own, and the zone has at least `min_neighbors` neighbors.
/// Ties leave the zone unchanged. Each pass reads the full
/// pre-pass snapshot before writing anything, so the outcome never
/// depends on the order zones are visited within a pass.
///
/// Adjacency is derived once per call and reused across passes.
pub fn smooth(
    zones: &ZoneSet,
    classes: &BTreeMap<ZoneId, ConditionClass>,
    params: &SmoothingParams,
) -> Result<BTreeMap<ZoneId, ConditionClass>> {
    params.validate()?;

    let adjacency = ZoneAdjacency::build(zones, params.tolerance);
    let mut current = classes.clone();
    let mut total_changed = 0usize;

    for _ in 0..params.passes {
        let snapshot = current;
        let mut next = snapshot.clone();
        let mut changed = 0usize;

        for zone in zones.zones() {
            let neighbors = adjacency.neighbors(zone.id);
            if neighbors.len() < params.min_neighbors {
                continue;
            }
            let Some(own) = snapshot.get(&zone.id).copied() else {
                continue;
            };
            if let Some(majority) = strict_majority(neighbors, &snapshot) {
                if majority != own {
                    next.insert(zone.id, majority);
                    changed += 1;
                }
            }
        }

        current = next;
        total_changed += changed;
        if changed == 0 {
            break;
        }
    }

    if total_changed > 0 {
        metrics::counter!(metric_defs::CLASSIFY_SMOOTHED.name).increment(total_changed as u64);
        log::debug!("smoothing reclassified {total_changed} zones");
    }
    Ok(current)
}

/// The class held by more than half of the neighbors, if any.
///
/// The denominator is the full neighbor count: an unclassified neighbor
/// weakens every candidate majority rather than being ignored.
fn strict_majority(
    neighbors: &[ZoneId],
    classes: &BTreeMap<ZoneId, ConditionClass>,
) -> Option<ConditionClass> {
    let mut counts: BTreeMap<ConditionClass, usize> = BTreeMap::new();
    for id in neighbors {
        if let Some(class) = classes.get(id) {
            *counts.entry(*class).or_insert(0) += 1;
        }
    }
    counts
        .into_iter()
        .find(|(_, count)| *count * 2 > neighbors.len())
        .map(|(class, _)| class)
}
