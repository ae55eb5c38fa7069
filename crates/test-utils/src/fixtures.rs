//! Common test fixtures for vortex-center tests.
//!
//! This module provides pre-defined scenarios that recur across the test
//! suite.

use crate::generators::{rankine_vortex, regular_grid_km};
use ndarray::Array2;

/// A complete synthetic case: coordinate grids plus wind components.
#[derive(Debug, Clone)]
pub struct VortexCase {
    pub lat: Array2<f64>,
    pub lon: Array2<f64>,
    pub u: Array2<f64>,
    pub v: Array2<f64>,
    /// Grid index of the constructed vortex center
    pub center: (usize, usize),
    /// Constructed radius of maximum wind (km)
    pub rmw_km: f64,
    /// Constructed peak tangential wind
    pub vmax: f64,
}

/// Definition of a synthetic Rankine vortex scenario.
#[derive(Debug, Clone, Copy)]
pub struct RankineSpec {
    pub rows: usize,
    pub cols: usize,
    pub spacing_km: f64,
    pub center: (usize, usize),
    pub center_lat: f64,
    pub center_lon: f64,
    pub rmw_km: f64,
    pub vmax: f64,
}

impl RankineSpec {
    /// Build the grids and wind field for this scenario.
    pub fn build(&self) -> VortexCase {
        let (lat, lon) = regular_grid_km(
            self.rows,
            self.cols,
            self.spacing_km,
            self.center,
            self.center_lat,
            self.center_lon,
        );
        let (u, v) = rankine_vortex(
            self.rows,
            self.cols,
            self.spacing_km,
            self.center,
            self.rmw_km,
            self.vmax,
        );
        VortexCase {
            lat,
            lon,
            u,
            v,
            center: self.center,
            rmw_km: self.rmw_km,
            vmax: self.vmax,
        }
    }
}

/// Common scenario definitions.
pub mod scenarios {
    use super::RankineSpec;

    /// 21x21 grid at 2 km spacing, vortex centered on the middle cell.
    pub const RANKINE_21X21: RankineSpec = RankineSpec {
        rows: 21,
        cols: 21,
        spacing_km: 2.0,
        center: (10, 10),
        center_lat: 20.0,
        center_lon: -60.0,
        rmw_km: 10.0,
        vmax: 40.0,
    };

    /// 41x41 grid at 2 km spacing with the vortex displaced from the middle.
    pub const RANKINE_OFFSET_41X41: RankineSpec = RankineSpec {
        rows: 41,
        cols: 41,
        spacing_km: 2.0,
        center: (17, 24),
        center_lat: 25.5,
        center_lon: -85.0,
        rmw_km: 16.0,
        vmax: 55.0,
    };

    /// Southern-hemisphere placement of the 21x21 case.
    pub const RANKINE_SOUTH_21X21: RankineSpec = RankineSpec {
        rows: 21,
        cols: 21,
        spacing_km: 2.0,
        center: (10, 10),
        center_lat: -15.0,
        center_lon: 130.0,
        rmw_km: 10.0,
        vmax: 40.0,
    };
}
