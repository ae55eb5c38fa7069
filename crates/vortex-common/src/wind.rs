//! Storm-relative horizontal wind fields.

use crate::{LatLonGrid, VortexError, VortexResult};
use ndarray::{Array2, Zip};

/// Zonal (u) and meridional (v) wind components on a grid.
///
/// Missing observations are NaN.
#[derive(Debug, Clone)]
pub struct WindField {
    u: Array2<f64>,
    v: Array2<f64>,
}

impl WindField {
    /// Create a wind field, rejecting components of different shapes.
    pub fn new(u: Array2<f64>, v: Array2<f64>) -> VortexResult<Self> {
        if u.dim() != v.dim() {
            return Err(VortexError::shape_mismatch("v", u.dim(), v.dim()));
        }
        Ok(Self { u, v })
    }

    /// Zonal component.
    pub fn u(&self) -> &Array2<f64> {
        &self.u
    }

    /// Meridional component.
    pub fn v(&self) -> &Array2<f64> {
        &self.v
    }

    /// Shape as (rows, cols).
    pub fn shape(&self) -> (usize, usize) {
        self.u.dim()
    }

    /// Ensure the wind field is co-located with a coordinate grid.
    pub fn check_grid(&self, grid: &LatLonGrid) -> VortexResult<()> {
        if self.shape() != grid.shape() {
            return Err(VortexError::shape_mismatch(
                "wind field",
                grid.shape(),
                self.shape(),
            ));
        }
        Ok(())
    }

    /// Wind speed at every cell.
    pub fn speed(&self) -> Array2<f64> {
        Zip::from(&self.u)
            .and(&self.v)
            .map_collect(|&u, &v| u.hypot(v))
    }

    /// Direction the wind blows toward, in radians counterclockwise from east.
    ///
    /// Values lie in (-π, π]; missing cells stay NaN.
    pub fn direction(&self) -> Array2<f64> {
        Zip::from(&self.u)
            .and(&self.v)
            .map_collect(|&u, &v| v.atan2(u))
    }

    /// Fraction of cells where both components are present.
    pub fn valid_fraction(&self) -> f64 {
        if self.u.is_empty() {
            return 0.0;
        }
        let valid = Zip::from(&self.u)
            .and(&self.v)
            .fold(0usize, |acc, &u, &v| {
                acc + usize::from(u.is_finite() && v.is_finite())
            });
        valid as f64 / self.u.len() as f64
    }
}
