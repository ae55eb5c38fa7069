//! Curvilinear latitude/longitude grids.

use crate::{VortexError, VortexResult};
use ndarray::Array2;
use serde::{Deserialize, Serialize};

/// A (row, column) position on the grid.
///
/// Rows run along the meridional axis and columns along the zonal axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridIndex {
    pub row: usize,
    pub col: usize,
}

impl GridIndex {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Index tuple in ndarray order.
    pub fn as_tuple(&self) -> (usize, usize) {
        (self.row, self.col)
    }

    /// Largest of the row and column distances to another index.
    pub fn chebyshev_distance(&self, other: &GridIndex) -> usize {
        self.row.abs_diff(other.row).max(self.col.abs_diff(other.col))
    }
}

impl From<(usize, usize)> for GridIndex {
    fn from((row, col): (usize, usize)) -> Self {
        Self { row, col }
    }
}

/// A point on the grid with both its index and its coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridPoint {
    pub index: GridIndex,
    /// Latitude in degrees
    pub lat: f64,
    /// Longitude in degrees
    pub lon: f64,
}

/// Latitude and longitude (degrees) of every grid cell.
///
/// Both arrays always share the same, non-empty shape and hold only finite
/// values.
#[derive(Debug, Clone)]
pub struct LatLonGrid {
    lat: Array2<f64>,
    lon: Array2<f64>,
}

impl LatLonGrid {
    /// Create a grid, rejecting mismatched shapes and non-finite coordinates.
    pub fn new(lat: Array2<f64>, lon: Array2<f64>) -> VortexResult<Self> {
        if lat.dim() != lon.dim() {
            return Err(VortexError::shape_mismatch("lon_grid", lat.dim(), lon.dim()));
        }

        if lat.is_empty() {
            return Err(VortexError::InvalidCoordinates(
                "coordinate grids are empty".to_string(),
            ));
        }

        if let Some(bad) = lat.iter().find(|v| !v.is_finite() || v.abs() > 90.0) {
            return Err(VortexError::InvalidCoordinates(format!(
                "latitude {} is not a finite value in [-90, 90]",
                bad
            )));
        }

        if let Some(bad) = lon.iter().find(|v| !v.is_finite()) {
            return Err(VortexError::InvalidCoordinates(format!(
                "longitude {} is not finite",
                bad
            )));
        }

        Ok(Self { lat, lon })
    }

    /// Latitude grid in degrees.
    pub fn lat(&self) -> &Array2<f64> {
        &self.lat
    }

    /// Longitude grid in degrees.
    pub fn lon(&self) -> &Array2<f64> {
        &self.lon
    }

    /// Grid shape as (rows, cols).
    pub fn shape(&self) -> (usize, usize) {
        self.lat.dim()
    }

    /// Number of rows (meridional points).
    pub fn rows(&self) -> usize {
        self.lat.nrows()
    }

    /// Number of columns (zonal points).
    pub fn cols(&self) -> usize {
        self.lat.ncols()
    }

    /// Total number of grid cells.
    pub fn len(&self) -> usize {
        self.lat.len()
    }

    /// Always false; empty grids are rejected at construction.
    pub fn is_empty(&self) -> bool {
        self.lat.is_empty()
    }

    /// Check whether an index lies on the grid.
    pub fn contains(&self, index: GridIndex) -> bool {
        index.row < self.rows() && index.col < self.cols()
    }

    /// Coordinates of a grid cell, or `None` if the index is off the grid.
    pub fn point(&self, index: GridIndex) -> Option<GridPoint> {
        if !self.contains(index) {
            return None;
        }

        Some(GridPoint {
            index,
            lat: self.lat[index.as_tuple()],
            lon: self.lon[index.as_tuple()],
        })
    }

    /// Central index: half of each axis length, rounded half to even.
    pub fn midpoint(&self) -> GridIndex {
        GridIndex::new(half_rounded(self.rows()), half_rounded(self.cols()))
    }
}

/// `n / 2` rounded to the nearest integer, ties to even.
fn half_rounded(n: usize) -> usize {
    let half = n / 2;
    if n % 2 == 1 && half % 2 == 1 {
        half + 1
    } else {
        half
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn small_grid() -> LatLonGrid {
        let lat = array![[10.0, 10.0, 10.0], [10.5, 10.5, 10.5]];
        let lon = array![[-60.0, -59.5, -59.0], [-60.0, -59.5, -59.0]];
        LatLonGrid::new(lat, lon).unwrap()
    }

    #[test]
    fn test_shape_and_point() {
        let grid = small_grid();
        assert_eq!(grid.shape(), (2, 3));
        assert_eq!(grid.len(), 6);

        let point = grid.point(GridIndex::new(1, 2)).unwrap();
        assert_eq!(point.lat, 10.5);
        assert_eq!(point.lon, -59.0);
        assert!(grid.point(GridIndex::new(2, 0)).is_none());
    }

    #[test]
    fn test_midpoint_rounds_half_to_even() {
        // 2 rows -> 1.0 -> 1, 3 cols -> 1.5 -> 2
        let grid = small_grid();
        assert_eq!(grid.midpoint(), GridIndex::new(1, 2));
    }

    #[test]
    fn test_midpoint_odd_axes() {
        let grid = LatLonGrid::new(Array2::zeros((21, 23)), Array2::zeros((21, 23))).unwrap();
        assert_eq!(grid.midpoint(), GridIndex::new(10, 12));

        assert_eq!(half_rounded(1), 0);
        assert_eq!(half_rounded(4), 2);
        assert_eq!(half_rounded(9), 4);
        assert_eq!(half_rounded(15), 8);
        assert_eq!(half_rounded(41), 20);
    }

    #[test]
    fn test_rejects_shape_mismatch() {
        let lat = Array2::<f64>::zeros((2, 3));
        let lon = Array2::<f64>::zeros((3, 2));
        let err = LatLonGrid::new(lat, lon).unwrap_err();
        assert!(matches!(err, VortexError::InputShapeMismatch { .. }));
    }

    #[test]
    fn test_rejects_non_finite_coordinates() {
        let lat = array![[10.0, f64::NAN]];
        let lon = array![[0.0, 1.0]];
        assert!(matches!(
            LatLonGrid::new(lat, lon),
            Err(VortexError::InvalidCoordinates(_))
        ));

        let lat = array![[10.0, 95.0]];
        let lon = array![[0.0, 1.0]];
        assert!(LatLonGrid::new(lat, lon).is_err());
    }

    #[test]
    fn test_rejects_empty_grid() {
        let lat = Array2::<f64>::zeros((0, 0));
        let lon = Array2::<f64>::zeros((0, 0));
        assert!(LatLonGrid::new(lat, lon).is_err());
    }

    #[test]
    fn test_chebyshev_distance() {
        let a = GridIndex::new(3, 7);
        let b = GridIndex::new(5, 4);
        assert_eq!(a.chebyshev_distance(&b), 3);
        assert_eq!(a.chebyshev_distance(&a), 0);
    }
}
