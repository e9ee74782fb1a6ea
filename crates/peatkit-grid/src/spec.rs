//! Grid geometry.

use crate::{GridError, Result};
use peatkit_survey::{BoundingBox, CrsTag, Point2};
use serde::{Deserialize, Serialize};

/// Geometry of a raster grid: origin, cell size, extent, coordinate system.
///
/// The origin is the north-west corner; row 0 is the northernmost row and
/// rows increase southward, matching the usual raster convention. Cells
/// are square. Two grids produced against the same `GridSpec` are
/// cell-for-cell comparable, which is what differencing requires.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridSpec {
    origin_x: f64,
    origin_y: f64,
    cell_size: f64,
    rows: usize,
    cols: usize,
    crs: CrsTag,
}

impl GridSpec {
    /// Create a grid spec.
    ///
    /// # Arguments
    /// * `origin_x`, `origin_y` - North-west corner of the grid.
    /// * `cell_size` - Cell edge length, must be > 0.
    /// * `rows`, `cols` - Grid extent, must both be > 0.
    /// * `crs` - Coordinate system tag the origin and cell size are in.
    pub fn new(
        origin_x: f64,
        origin_y: f64,
        cell_size: f64,
        rows: usize,
        cols: usize,
        crs: CrsTag,
    ) -> Result<Self> {
        if !(cell_size > 0.0) || !cell_size.is_finite() {
            return Err(GridError::InvalidSpec(format!(
                "cell size must be positive and finite, got {cell_size}"
            )));
        }
        if rows == 0 || cols == 0 {
            return Err(GridError::InvalidSpec(format!(
                "grid extent must be non-empty, got {rows} x {cols}"
            )));
        }
        Ok(Self {
            origin_x,
            origin_y,
            cell_size,
            rows,
            cols,
            crs,
        })
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Cell edge length.
    pub fn cell_size(&self) -> f64 {
        self.cell_size
    }

    /// Area of one cell.
    pub fn cell_area(&self) -> f64 {
        self.cell_size * self.cell_size
    }

    /// Coordinate system tag.
    pub fn crs(&self) -> &CrsTag {
        &self.crs
    }

    /// Total number of cells.
    pub fn cell_count(&self) -> usize {
        self.rows * self.cols
    }

    /// Flat row-major index of a cell.
    #[inline]
    pub fn index(&self, row: usize, col: usize) -> usize {
        debug_assert!(row < self.rows && col < self.cols);
        row * self.cols + col
    }

    /// Centre coordinate of a cell.
    pub fn cell_center(&self, row: usize, col: usize) -> Point2 {
        Point2::new(
            self.origin_x + (col as f64 + 0.5) * self.cell_size,
            self.origin_y - (row as f64 + 0.5) * self.cell_size,
        )
    }

    /// Bounding box of a cell.
    pub fn cell_bounds(&self, row: usize, col: usize) -> BoundingBox {
        let west = self.origin_x + col as f64 * self.cell_size;
        let north = self.origin_y - row as f64 * self.cell_size;
        BoundingBox::new(west, north - self.cell_size, west + self.cell_size, north)
    }

    /// Bounding box of the whole grid.
    pub fn bounds(&self) -> BoundingBox {
        BoundingBox::new(
            self.origin_x,
            self.origin_y - self.rows as f64 * self.cell_size,
            self.origin_x + self.cols as f64 * self.cell_size,
            self.origin_y,
        )
    }

    /// Range of rows whose cells can intersect the given box, clamped to
    /// the grid extent.
    pub fn row_range(&self, bbox: &BoundingBox) -> std::ops::Range<usize> {
        let first = ((self.origin_y - bbox.max_y) / self.cell_size).floor().max(0.0) as usize;
        let last = ((self.origin_y - bbox.min_y) / self.cell_size).ceil().max(0.0) as usize;
        first.min(self.rows)..last.min(self.rows)
    }

    /// Range of columns whose cells can intersect the given box, clamped
    /// to the grid extent.
    pub fn col_range(&self, bbox: &BoundingBox) -> std::ops::Range<usize> {
        let first = ((bbox.min_x - self.origin_x) / self.cell_size).floor().max(0.0) as usize;
        let last = ((bbox.max_x - self.origin_x) / self.cell_size).ceil().max(0.0) as usize;
        first.min(self.cols)..last.min(self.cols)
    }

    /// Whether another spec has identical dimensions.
    pub fn same_shape(&self, other: &GridSpec) -> bool {
        self.rows == other.rows && self.cols == other.cols
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn crs() -> CrsTag {
        CrsTag::new("EPSG:27700")
    }

    #[test]
    fn test_rejects_bad_geometry() {
        assert!(GridSpec::new(0.0, 0.0, 0.0, 10, 10, crs()).is_err());
        assert!(GridSpec::new(0.0, 0.0, -5.0, 10, 10, crs()).is_err());
        assert!(GridSpec::new(0.0, 0.0, 10.0, 0, 10, crs()).is_err());
        assert!(GridSpec::new(0.0, 0.0, 10.0, 10, 0, crs()).is_err());
    }

    #[test]
    fn test_cell_center_north_west_origin() {
        let spec = GridSpec::new(1000.0, 2000.0, 10.0, 4, 5, crs()).unwrap();
        let c = spec.cell_center(0, 0);
        assert_relative_eq!(c.x, 1005.0);
        assert_relative_eq!(c.y, 1995.0);
        let c = spec.cell_center(3, 4);
        assert_relative_eq!(c.x, 1045.0);
        assert_relative_eq!(c.y, 1965.0);
    }

    #[test]
    fn test_flat_indexing_row_major() {
        let spec = GridSpec::new(0.0, 0.0, 1.0, 3, 4, crs()).unwrap();
        assert_eq!(spec.index(0, 0), 0);
        assert_eq!(spec.index(0, 3), 3);
        assert_eq!(spec.index(1, 0), 4);
        assert_eq!(spec.index(2, 3), 11);
        assert_eq!(spec.cell_count(), 12);
    }

    #[test]
    fn test_cell_bounds_and_grid_bounds() {
        let spec = GridSpec::new(0.0, 100.0, 10.0, 10, 10, crs()).unwrap();
        let b = spec.cell_bounds(0, 0);
        assert_relative_eq!(b.min_x, 0.0);
        assert_relative_eq!(b.max_y, 100.0);
        assert_relative_eq!(b.min_y, 90.0);
        let g = spec.bounds();
        assert_relative_eq!(g.min_y, 0.0);
        assert_relative_eq!(g.max_x, 100.0);
    }

    #[test]
    fn test_row_col_ranges_clamped() {
        let spec = GridSpec::new(0.0, 100.0, 10.0, 10, 10, crs()).unwrap();
        let bbox = BoundingBox::new(25.0, 65.0, 45.0, 95.0);
        assert_eq!(spec.row_range(&bbox), 0..4);
        assert_eq!(spec.col_range(&bbox), 2..5);
        // Box entirely outside the grid
        let far = BoundingBox::new(500.0, 500.0, 600.0, 600.0);
        assert!(spec.row_range(&far).is_empty() || spec.col_range(&far).is_empty());
    }
}
