//! Derived zone adjacency.

use peatkit_survey::{segment_overlap_length, ZoneId, ZoneSet};
use std::collections::BTreeMap;

/// Which zones touch which: derived once per classification run, used
/// by the smoothing pass, then discarded.
///
/// Two zones are adjacent when their boundaries run together for more
/// than `tolerance` of shared length. Touching at a single corner does
/// not count: a corner contact carries no shared boundary for
/// misclassification noise to bleed across, and counting it makes
/// checkerboard zone layouts oscillate under majority smoothing.
/// Candidate pairs are prefiltered by tolerance-expanded bounding boxes
/// so the segment work only runs on plausible neighbors. Stored as a
/// plain id-to-ids mapping rather than a persistent graph; there is
/// nothing to keep in sync.
#[derive(Debug, Clone)]
pub struct ZoneAdjacency {
    neighbors: BTreeMap<ZoneId, Vec<ZoneId>>,
}

impl ZoneAdjacency {
    /// Derive adjacency for a zone set.
    ///
    /// # Arguments
    /// * `zones` - The zone set.
    /// * `tolerance` - Maximum boundary separation (map units) still
    ///   counted as shared, and the minimum shared length that counts
    ///   as adjacency; covers digitization slivers between polygons
    ///   that share a surveyed boundary.
    pub fn build(zones: &ZoneSet, tolerance: f64) -> Self {
        let zone_list = zones.zones();
        let bboxes: Vec<_> = zone_list
            .iter()
            .map(|z| z.polygon.bbox().expand(tolerance))
            .collect();

        let mut neighbors: BTreeMap<ZoneId, Vec<ZoneId>> = zone_list
            .iter()
            .map(|z| (z.id, Vec::new()))
            .collect();

        for i in 0..zone_list.len() {
            for j in (i + 1)..zone_list.len() {
                if !bboxes[i].intersects(&bboxes[j]) {
                    continue;
                }
                if boundaries_touch(&zone_list[i], &zone_list[j], tolerance) {
                    let (a, b) = (zone_list[i].id, zone_list[j].id);
                    neighbors.entry(a).or_default().push(b);
                    neighbors.entry(b).or_default().push(a);
                }
            }
        }

        // Ids were visited in set order, so the lists are already sorted;
        // keep that as an explicit invariant.
        for list in neighbors.values_mut() {
            list.sort_unstable();
        }

        Self { neighbors }
    }

    /// Neighbor ids of a zone, ascending.
    pub fn neighbors(&self, id: ZoneId) -> &[ZoneId] {
        self.neighbors.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of neighbors of a zone.
    pub fn degree(&self, id: ZoneId) -> usize {
        self.neighbors(id).len()
    }
}

fn boundaries_touch(
    a: &peatkit_survey::Zone,
    b: &peatkit_survey::Zone,
    tolerance: f64,
) -> bool {
    let mut shared = 0.0;
    for (a1, a2) in a.polygon.edges() {
        for (b1, b2) in b.polygon.edges() {
            shared += segment_overlap_length(a1, a2, b1, b2, tolerance);
            if shared > tolerance {
                return true;
            }
        }
    }
    false
}
