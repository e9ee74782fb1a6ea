//! Deterministic spatial index over measured survey points.

use crate::{InterpError, Result};
use peatkit_survey::SurveySet;
use rstar::{PointDistance, RTree, RTreeObject, AABB};

/// A measured sample held by the index.
///
/// Samples are the subset of survey points that carry a depth reading,
/// in survey-set (id) order. The `ordinal` of a [`Neighbor`] indexes
/// into this sequence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    /// Easting.
    pub x: f64,
    /// Northing.
    pub y: f64,
    /// Measured depth in metres.
    pub depth: f64,
    /// Effective quality weight (1.0 when the surveyor set none).
    pub weight: f64,
}

/// One query result: a sample ordinal and its distance to the query
/// location.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    /// Index into [`PointIndex::samples`].
    pub ordinal: usize,
    /// Euclidean distance to the query location.
    pub distance: f64,
}

#[derive(Debug, Clone)]
struct TreeEntry {
    pos: [f64; 2],
    ordinal: usize,
}

impl RTreeObject for TreeEntry {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.pos)
    }
}

impl PointDistance for TreeEntry {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.pos[0] - point[0];
        let dy = self.pos[1] - point[1];
        dx * dx + dy * dy
    }
}

/// Spatial index over the measured points of one survey set.
///
/// Backed by a bulk-loaded R*-tree, so query cost stays sub-linear even
/// for strongly clustered surveys. Query results are ordered ascending
/// by distance with ties broken by sample ordinal (the survey set's id
/// order) - the ordering is part of the contract, because downstream
/// accumulation must not depend on tree internals.
///
/// The index is immutable; a new survey set needs a new index.
#[derive(Debug)]
pub struct PointIndex {
    tree: RTree<TreeEntry>,
    samples: Vec<Sample>,
}

impl PointIndex {
    /// Build an index from the measured points of a survey set.
    ///
    /// Fails with [`InterpError::DegenerateInput`] if the set contains
    /// no point with a depth reading.
    pub fn build(set: &SurveySet) -> Result<Self> {
        let samples: Vec<Sample> = set
            .points()
            .iter()
            .filter_map(|p| {
                p.depth.map(|depth| Sample {
                    x: p.x,
                    y: p.y,
                    depth,
                    weight: p.effective_weight(),
                })
            })
            .collect();

        if samples.is_empty() {
            return Err(InterpError::DegenerateInput(format!(
                "survey set '{}' has no measured points",
                set.campaign()
            )));
        }

        let entries: Vec<TreeEntry> = samples
            .iter()
            .enumerate()
            .map(|(ordinal, s)| TreeEntry {
                pos: [s.x, s.y],
                ordinal,
            })
            .collect();

        Ok(Self {
            tree: RTree::bulk_load(entries),
            samples,
        })
    }

    /// The indexed samples, in survey-set order.
    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    /// Number of indexed samples.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether the index is empty (never true for a built index).
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// The `k` nearest samples to a location.
    ///
    /// Candidates are drawn from the tree until the k-th distance is
    /// strictly exceeded, so equidistant samples at the cut rank all
    /// compete; the final (distance, ordinal) sort then decides
    /// deterministically which survive truncation.
    pub fn nearest(&self, x: f64, y: f64, k: usize) -> Vec<Neighbor> {
        if k == 0 {
            return Vec::new();
        }
        let query = [x, y];
        let mut candidates: Vec<(f64, usize)> = Vec::with_capacity(k + 4);
        let mut kth_d2 = f64::INFINITY;
        for entry in self.tree.nearest_neighbor_iter(&query) {
            let d2 = entry.distance_2(&query);
            if candidates.len() >= k && d2 > kth_d2 {
                break;
            }
            candidates.push((d2, entry.ordinal));
            if candidates.len() == k {
                kth_d2 = d2;
            }
        }
        let mut neighbors: Vec<Neighbor> = candidates
            .into_iter()
            .map(|(d2, ordinal)| Neighbor {
                ordinal,
                distance: d2.sqrt(),
            })
            .collect();
        sort_neighbors(&mut neighbors);
        neighbors.truncate(k);
        neighbors
    }

    /// All samples within `radius` of a location (inclusive).
    pub fn within(&self, x: f64, y: f64, radius: f64) -> Vec<Neighbor> {
        let query = [x, y];
        let r2 = radius * radius;
        let mut neighbors: Vec<Neighbor> = self
            .tree
            .locate_within_distance(query, r2)
            .map(|entry| Neighbor {
                ordinal: entry.ordinal,
                distance: entry.distance_2(&query).sqrt(),
            })
            .collect();
        sort_neighbors(&mut neighbors);
        neighbors
    }
}

/// Ascending by distance, ties by ordinal.
fn sort_neighbors(neighbors: &mut [Neighbor]) {
    neighbors.sort_by(|a, b| {
        a.distance
            .total_cmp(&b.distance)
            .then(a.ordinal.cmp(&b.ordinal))
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;
    use peatkit_survey::{CrsTag, SurveyPoint};

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()
    }

    fn set_from(coords: &[(f64, f64)]) -> SurveySet {
        let points = coords
            .iter()
            .enumerate()
            .map(|(i, &(x, y))| SurveyPoint::new(i as u32 + 1, x, y, Some(i as f64), date()))
            .collect();
        SurveySet::new("test", CrsTag::new("EPSG:27700"), points)
    }

    #[test]
    fn test_build_rejects_unmeasured_set() {
        let points = vec![
            SurveyPoint::new(1, 0.0, 0.0, None, date()),
            SurveyPoint::new(2, 1.0, 0.0, None, date()),
        ];
        let set = SurveySet::new("empty", CrsTag::new("EPSG:27700"), points);
        assert!(matches!(
            PointIndex::build(&set),
            Err(InterpError::DegenerateInput(_))
        ));
    }

    #[test]
    fn test_unmeasured_points_excluded() {
        let points = vec![
            SurveyPoint::new(1, 0.0, 0.0, Some(1.0), date()),
            SurveyPoint::new(2, 5.0, 0.0, None, date()),
            SurveyPoint::new(3, 9.0, 0.0, Some(2.0), date()),
        ];
        let set = SurveySet::new("mixed", CrsTag::new("EPSG:27700"), points);
        let index = PointIndex::build(&set).unwrap();
        assert_eq!(index.len(), 2);
        // The unmeasured point at x=5 must not appear as a neighbor
        let n = index.nearest(5.0, 0.0, 1);
        assert_relative_eq!(n[0].distance, 4.0);
    }

    #[test]
    fn test_nearest_ordering() {
        let index = PointIndex::build(&set_from(&[(10.0, 0.0), (1.0, 0.0), (5.0, 0.0)])).unwrap();
        let n = index.nearest(0.0, 0.0, 3);
        let distances: Vec<f64> = n.iter().map(|n| n.distance).collect();
        assert_relative_eq!(distances[0], 1.0);
        assert_relative_eq!(distances[1], 5.0);
        assert_relative_eq!(distances[2], 10.0);
    }

    #[test]
    fn test_nearest_tie_breaks_by_ordinal() {
        // Four points equidistant from the origin; ask for two.
        let index = PointIndex::build(&set_from(&[
            (3.0, 0.0),
            (0.0, 3.0),
            (-3.0, 0.0),
            (0.0, -3.0),
        ]))
        .unwrap();
        let n = index.nearest(0.0, 0.0, 2);
        assert_eq!(n.len(), 2);
        // Insertion order wins: ordinals 0 and 1
        assert_eq!(n[0].ordinal, 0);
        assert_eq!(n[1].ordinal, 1);
    }

    #[test]
    fn test_within_radius_inclusive() {
        let index = PointIndex::build(&set_from(&[(1.0, 0.0), (5.0, 0.0), (10.0, 0.0)])).unwrap();
        let n = index.within(0.0, 0.0, 5.0);
        assert_eq!(n.len(), 2);
        assert_eq!(n[0].ordinal, 0);
        assert_eq!(n[1].ordinal, 1);
    }

    #[test]
    fn test_within_empty_when_out_of_range() {
        let index = PointIndex::build(&set_from(&[(100.0, 100.0)])).unwrap();
        assert!(index.within(0.0, 0.0, 10.0).is_empty());
    }
}
