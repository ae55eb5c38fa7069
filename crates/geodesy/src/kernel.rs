//! Grid-wide distance and bearing kernels.
//!
//! Each kernel evaluates the scalar primitives from [`crate::haversine`] at
//! every grid cell. Kernels differ only in how the cells are traversed, so
//! every implementation returns bit-identical arrays for the same inputs.

use crate::haversine::{haversine_km, pseudo_bearing};
use ndarray::{Array2, Zip};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Distance and bearing from a reference point to every cell of a grid.
pub trait GeodesicKernel: Send + Sync {
    /// Great-circle distance (km) from (lat0, lon0) to each cell.
    fn distance_km(
        &self,
        lat0: f64,
        lon0: f64,
        lat: &Array2<f64>,
        lon: &Array2<f64>,
        radius_km: f64,
    ) -> Array2<f64>;

    /// Bearing (radians, counterclockwise from east) from (lat0, lon0) to each cell.
    fn bearing(&self, lat0: f64, lon0: f64, lat: &Array2<f64>, lon: &Array2<f64>)
        -> Array2<f64>;

    /// Short name for logging.
    fn name(&self) -> &'static str;
}

/// Row-major, element-by-element evaluation.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReferenceKernel;

impl GeodesicKernel for ReferenceKernel {
    fn distance_km(
        &self,
        lat0: f64,
        lon0: f64,
        lat: &Array2<f64>,
        lon: &Array2<f64>,
        radius_km: f64,
    ) -> Array2<f64> {
        let (rows, cols) = lat.dim();
        let mut out = Array2::<f64>::zeros((rows, cols));
        for row in 0..rows {
            for col in 0..cols {
                out[[row, col]] =
                    haversine_km(lat0, lon0, lat[[row, col]], lon[[row, col]], radius_km);
            }
        }
        out
    }

    fn bearing(
        &self,
        lat0: f64,
        lon0: f64,
        lat: &Array2<f64>,
        lon: &Array2<f64>,
    ) -> Array2<f64> {
        let (rows, cols) = lat.dim();
        let mut out = Array2::<f64>::zeros((rows, cols));
        for row in 0..rows {
            for col in 0..cols {
                out[[row, col]] = pseudo_bearing(lat0, lon0, lat[[row, col]], lon[[row, col]]);
            }
        }
        out
    }

    fn name(&self) -> &'static str {
        "reference"
    }
}

/// Rayon-backed evaluation over all cells.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParallelKernel;

impl GeodesicKernel for ParallelKernel {
    fn distance_km(
        &self,
        lat0: f64,
        lon0: f64,
        lat: &Array2<f64>,
        lon: &Array2<f64>,
        radius_km: f64,
    ) -> Array2<f64> {
        Zip::from(lat)
            .and(lon)
            .par_map_collect(|&la, &lo| haversine_km(lat0, lon0, la, lo, radius_km))
    }

    fn bearing(
        &self,
        lat0: f64,
        lon0: f64,
        lat: &Array2<f64>,
        lon: &Array2<f64>,
    ) -> Array2<f64> {
        Zip::from(lat)
            .and(lon)
            .par_map_collect(|&la, &lo| pseudo_bearing(lat0, lon0, la, lo))
    }

    fn name(&self) -> &'static str {
        "parallel"
    }
}

/// Kernel selection, made at configuration time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum KernelKind {
    #[default]
    Reference,
    Parallel,
}

impl KernelKind {
    /// Parse a known kernel name (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "reference" | "loop" => Some(Self::Reference),
            "parallel" | "rayon" | "fast" => Some(Self::Parallel),
            _ => None,
        }
    }

    /// Parse from string, falling back to the reference kernel with a warning.
    pub fn from_str(s: &str) -> Self {
        Self::parse(s).unwrap_or_else(|| {
            warn!(kernel = s, "Unknown kernel, using reference");
            Self::Reference
        })
    }

    /// Get the kernel name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Reference => "reference",
            Self::Parallel => "parallel",
        }
    }

    /// Instantiate the selected kernel.
    pub fn build(&self) -> Box<dyn GeodesicKernel> {
        match self {
            Self::Reference => Box::new(ReferenceKernel),
            Self::Parallel => Box::new(ParallelKernel),
        }
    }
}

impl std::fmt::Display for KernelKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
