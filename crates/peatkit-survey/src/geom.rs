//! Planar geometry primitives.
//!
//! Everything here assumes a single projected coordinate system with
//! metre-like units; no geodesic math is performed.

use crate::{Result, SurveyError};
use serde::{Deserialize, Serialize};

/// A point in planar coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point2 {
    /// Easting.
    pub x: f64,
    /// Northing.
    pub y: f64,
}

impl Point2 {
    /// Create a new point.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    pub fn distance_to(&self, other: &Point2) -> f64 {
        ((other.x - self.x).powi(2) + (other.y - self.y).powi(2)).sqrt()
    }
}

impl From<(f64, f64)> for Point2 {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Minimum easting.
    pub min_x: f64,
    /// Minimum northing.
    pub min_y: f64,
    /// Maximum easting.
    pub max_x: f64,
    /// Maximum northing.
    pub max_y: f64,
}

impl BoundingBox {
    /// Create a bounding box, normalizing corner order.
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x: min_x.min(max_x),
            min_y: min_y.min(max_y),
            max_x: min_x.max(max_x),
            max_y: min_y.max(max_y),
        }
    }

    /// Check whether a point lies inside or on the boundary.
    pub fn contains(&self, p: &Point2) -> bool {
        p.x >= self.min_x && p.x <= self.max_x && p.y >= self.min_y && p.y <= self.max_y
    }

    /// Check whether two boxes overlap (touching counts).
    pub fn intersects(&self, other: &BoundingBox) -> bool {
        self.min_x <= other.max_x
            && self.max_x >= other.min_x
            && self.min_y <= other.max_y
            && self.max_y >= other.min_y
    }

    /// Grow the box outward by `amount` on every side.
    pub fn expand(&self, amount: f64) -> Self {
        Self {
            min_x: self.min_x - amount,
            min_y: self.min_y - amount,
            max_x: self.max_x + amount,
            max_y: self.max_y + amount,
        }
    }
}

/// A simple polygon: one exterior ring, no holes.
///
/// The ring is stored open (the last vertex is not a repeat of the
/// first) and may wind in either direction; area accessors return
/// absolute values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polygon {
    ring: Vec<Point2>,
}

impl Polygon {
    /// Create a polygon from an exterior ring.
    ///
    /// Fails with [`SurveyError::InvalidPolygon`] if the ring has fewer
    /// than three vertices or encloses no area. A closing vertex equal
    /// to the first is dropped if present.
    pub fn new(mut ring: Vec<Point2>) -> Result<Self> {
        if ring.len() > 1 && ring.first() == ring.last() {
            ring.pop();
        }
        if ring.len() < 3 {
            return Err(SurveyError::InvalidPolygon(format!(
                "ring has {} vertices, need at least 3",
                ring.len()
            )));
        }
        let poly = Self { ring };
        if poly.area() <= 0.0 {
            return Err(SurveyError::InvalidPolygon(
                "ring encloses no area".to_string(),
            ));
        }
        Ok(poly)
    }

    /// Convenience constructor for an axis-aligned rectangle.
    pub fn rectangle(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Result<Self> {
        Self::new(vec![
            Point2::new(min_x, min_y),
            Point2::new(max_x, min_y),
            Point2::new(max_x, max_y),
            Point2::new(min_x, max_y),
        ])
    }

    /// The exterior ring vertices, in input order.
    pub fn ring(&self) -> &[Point2] {
        &self.ring
    }

    /// Iterate over ring edges as vertex pairs, wrapping around.
    pub fn edges(&self) -> impl Iterator<Item = (Point2, Point2)> + '_ {
        let n = self.ring.len();
        (0..n).map(move |i| (self.ring[i], self.ring[(i + 1) % n]))
    }

    /// Enclosed area (shoelace formula, absolute value).
    pub fn area(&self) -> f64 {
        shoelace(&self.ring).abs()
    }

    /// Axis-aligned bounding box of the ring.
    pub fn bbox(&self) -> BoundingBox {
        let first = self.ring[0];
        let mut bb = BoundingBox::new(first.x, first.y, first.x, first.y);
        for p in &self.ring[1..] {
            bb.min_x = bb.min_x.min(p.x);
            bb.min_y = bb.min_y.min(p.y);
            bb.max_x = bb.max_x.max(p.x);
            bb.max_y = bb.max_y.max(p.y);
        }
        bb
    }

    /// Even-odd point-in-polygon test.
    ///
    /// Points exactly on an edge may fall on either side; survey
    /// coordinates are not expected to sit exactly on zone boundaries.
    pub fn contains(&self, p: &Point2) -> bool {
        let mut inside = false;
        for (a, b) in self.edges() {
            if (a.y > p.y) != (b.y > p.y) {
                let x_cross = a.x + (p.y - a.y) / (b.y - a.y) * (b.x - a.x);
                if p.x < x_cross {
                    inside = !inside;
                }
            }
        }
        inside
    }

    /// Area of the intersection between this polygon and an axis-aligned
    /// rectangle.
    ///
    /// Clips the ring against each of the rectangle's four half-planes
    /// (Sutherland-Hodgman) and measures what remains. Exact for simple
    /// rings against a convex clip window, which is all the zonal
    /// aggregation needs.
    pub fn intersection_area_with_rect(&self, rect: &BoundingBox) -> f64 {
        let mut ring = self.ring.clone();
        // Each closure keeps points on the inner side of one rect edge.
        let clips: [(fn(&Point2, f64) -> bool, fn(Point2, Point2, f64) -> Point2, f64); 4] = [
            (inside_min_x, cross_x, rect.min_x),
            (inside_max_x, cross_x, rect.max_x),
            (inside_min_y, cross_y, rect.min_y),
            (inside_max_y, cross_y, rect.max_y),
        ];
        for (inside, crossing, bound) in clips {
            if ring.is_empty() {
                return 0.0;
            }
            let mut out = Vec::with_capacity(ring.len() + 4);
            for i in 0..ring.len() {
                let cur = ring[i];
                let prev = ring[(i + ring.len() - 1) % ring.len()];
                let cur_in = inside(&cur, bound);
                let prev_in = inside(&prev, bound);
                if cur_in {
                    if !prev_in {
                        out.push(crossing(prev, cur, bound));
                    }
                    out.push(cur);
                } else if prev_in {
                    out.push(crossing(prev, cur, bound));
                }
            }
            ring = out;
        }
        if ring.len() < 3 {
            0.0
        } else {
            shoelace(&ring).abs()
        }
    }
}

/// Signed shoelace area of an open ring.
fn shoelace(ring: &[Point2]) -> f64 {
    let n = ring.len();
    let mut sum = 0.0;
    for i in 0..n {
        let a = ring[i];
        let b = ring[(i + 1) % n];
        sum += a.x * b.y - b.x * a.y;
    }
    sum / 2.0
}

// Half-plane predicates and edge crossings for rectangle clipping. The
// clip direction is encoded in which predicate is paired with which bound.
fn inside_min_x(p: &Point2, bound: f64) -> bool {
    p.x >= bound
}
fn inside_max_x(p: &Point2, bound: f64) -> bool {
    p.x <= bound
}
fn inside_min_y(p: &Point2, bound: f64) -> bool {
    p.y >= bound
}
fn inside_max_y(p: &Point2, bound: f64) -> bool {
    p.y <= bound
}

fn cross_x(a: Point2, b: Point2, x: f64) -> Point2 {
    let t = (x - a.x) / (b.x - a.x);
    Point2::new(x, a.y + t * (b.y - a.y))
}

fn cross_y(a: Point2, b: Point2, y: f64) -> Point2 {
    let t = (y - a.y) / (b.y - a.y);
    Point2::new(a.x + t * (b.x - a.x), y)
}

/// Length over which two segments run together within `tolerance`.
///
/// Projects `b` onto `a`'s direction, clips to `a`'s extent, and checks
/// the separation at the middle of the overlapping stretch. Zone
/// boundaries that are genuinely shared are collinear to digitization
/// noise, which is exactly what the midpoint check tolerates; a mere
/// corner contact projects to a zero-length overlap and contributes
/// nothing. Used for deriving zone adjacency.
pub fn segment_overlap_length(
    a1: Point2,
    a2: Point2,
    b1: Point2,
    b2: Point2,
    tolerance: f64,
) -> f64 {
    let dx = a2.x - a1.x;
    let dy = a2.y - a1.y;
    let len = (dx * dx + dy * dy).sqrt();
    if len <= 0.0 {
        return 0.0;
    }
    let (ux, uy) = (dx / len, dy / len);
    let t1 = (b1.x - a1.x) * ux + (b1.y - a1.y) * uy;
    let t2 = (b2.x - a1.x) * ux + (b2.y - a1.y) * uy;
    let lo = t1.min(t2).max(0.0);
    let hi = t1.max(t2).min(len);
    if hi <= lo {
        return 0.0;
    }
    let tm = (lo + hi) / 2.0;
    let mid = Point2::new(a1.x + tm * ux, a1.y + tm * uy);
    if point_segment_distance(mid, b1, b2) <= tolerance {
        hi - lo
    } else {
        0.0
    }
}

/// Distance from a point to a line segment.
pub fn point_segment_distance(p: Point2, a: Point2, b: Point2) -> f64 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let len2 = dx * dx + dy * dy;
    if len2 == 0.0 {
        return p.distance_to(&a);
    }
    let t = (((p.x - a.x) * dx + (p.y - a.y) * dy) / len2).clamp(0.0, 1.0);
    p.distance_to(&Point2::new(a.x + t * dx, a.y + t * dy))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn unit_square() -> Polygon {
        Polygon::rectangle(0.0, 0.0, 10.0, 10.0).unwrap()
    }

    #[test]
    fn test_polygon_rejects_degenerate_rings() {
        assert!(Polygon::new(vec![Point2::new(0.0, 0.0), Point2::new(1.0, 1.0)]).is_err());
        // Collinear ring encloses no area
        let collinear = vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(2.0, 0.0),
        ];
        assert!(Polygon::new(collinear).is_err());
    }

    #[test]
    fn test_polygon_drops_closing_vertex() {
        let poly = Polygon::new(vec![
            Point2::new(0.0, 0.0),
            Point2::new(4.0, 0.0),
            Point2::new(4.0, 4.0),
            Point2::new(0.0, 4.0),
            Point2::new(0.0, 0.0),
        ])
        .unwrap();
        assert_eq!(poly.ring().len(), 4);
        assert_relative_eq!(poly.area(), 16.0);
    }

    #[test]
    fn test_polygon_area_and_bbox() {
        let poly = unit_square();
        assert_relative_eq!(poly.area(), 100.0);
        let bb = poly.bbox();
        assert_relative_eq!(bb.min_x, 0.0);
        assert_relative_eq!(bb.max_y, 10.0);
    }

    #[test]
    fn test_polygon_contains() {
        let poly = unit_square();
        assert!(poly.contains(&Point2::new(5.0, 5.0)));
        assert!(!poly.contains(&Point2::new(15.0, 5.0)));
        assert!(!poly.contains(&Point2::new(-0.1, 5.0)));
    }

    #[test]
    fn test_intersection_area_full_overlap() {
        let poly = unit_square();
        let rect = BoundingBox::new(2.0, 2.0, 4.0, 4.0);
        assert_relative_eq!(poly.intersection_area_with_rect(&rect), 4.0);
    }

    #[test]
    fn test_intersection_area_partial_overlap() {
        let poly = unit_square();
        // Rect half in, half out on the east side
        let rect = BoundingBox::new(8.0, 0.0, 12.0, 10.0);
        assert_relative_eq!(poly.intersection_area_with_rect(&rect), 20.0);
    }

    #[test]
    fn test_intersection_area_disjoint() {
        let poly = unit_square();
        let rect = BoundingBox::new(20.0, 20.0, 30.0, 30.0);
        assert_relative_eq!(poly.intersection_area_with_rect(&rect), 0.0);
    }

    #[test]
    fn test_intersection_area_triangle() {
        let tri = Polygon::new(vec![
            Point2::new(0.0, 0.0),
            Point2::new(4.0, 0.0),
            Point2::new(0.0, 4.0),
        ])
        .unwrap();
        // Whole triangle fits in the rect
        let rect = BoundingBox::new(-1.0, -1.0, 5.0, 5.0);
        assert_relative_eq!(tri.intersection_area_with_rect(&rect), 8.0);
    }

    #[test]
    fn test_overlap_length_collinear_segments() {
        let d = segment_overlap_length(
            Point2::new(0.0, 0.0),
            Point2::new(10.0, 0.0),
            Point2::new(4.0, 0.0),
            Point2::new(14.0, 0.0),
            0.01,
        );
        assert_relative_eq!(d, 6.0);
    }

    #[test]
    fn test_overlap_length_sliver_within_tolerance() {
        let d = segment_overlap_length(
            Point2::new(0.0, 0.0),
            Point2::new(10.0, 0.0),
            Point2::new(2.0, 0.05),
            Point2::new(8.0, 0.05),
            0.1,
        );
        assert_relative_eq!(d, 6.0);
        // Same sliver, tighter tolerance: no overlap
        let d = segment_overlap_length(
            Point2::new(0.0, 0.0),
            Point2::new(10.0, 0.0),
            Point2::new(2.0, 0.05),
            Point2::new(8.0, 0.05),
            0.01,
        );
        assert_relative_eq!(d, 0.0);
    }

    #[test]
    fn test_overlap_length_corner_contact_is_zero() {
        // Segments meeting end-to-end at a point share no length.
        let d = segment_overlap_length(
            Point2::new(0.0, 0.0),
            Point2::new(10.0, 0.0),
            Point2::new(10.0, 0.0),
            Point2::new(10.0, 10.0),
            0.01,
        );
        assert_relative_eq!(d, 0.0);
    }

    #[test]
    fn test_overlap_length_distant_parallel_is_zero() {
        let d = segment_overlap_length(
            Point2::new(0.0, 0.0),
            Point2::new(10.0, 0.0),
            Point2::new(0.0, 3.0),
            Point2::new(10.0, 3.0),
            0.01,
        );
        assert_relative_eq!(d, 0.0);
    }

    #[test]
    fn test_bounding_box_intersects() {
        let a = BoundingBox::new(0.0, 0.0, 10.0, 10.0);
        let b = BoundingBox::new(5.0, 5.0, 15.0, 15.0);
        let c = BoundingBox::new(20.0, 20.0, 30.0, 30.0);
        assert!(a.intersects(&b));
        assert!(!a.intersects(&c));
        assert!(a.expand(10.0).intersects(&c));
    }
}
