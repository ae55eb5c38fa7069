//! Geodesic primitives for vortex center estimation.
//!
//! Everything here is pure: distances and bearings from a reference point to
//! every cell of a lat/lon grid, plus angle wrapping helpers. The grid-wide
//! operations are exposed through [`GeodesicKernel`] so that a parallel
//! implementation can be swapped in without changing any output value.

pub mod angle;
pub mod haversine;
pub mod kernel;

pub use angle::{normalize_angle, normalize_angles, wrap_to_pi};
pub use haversine::{haversine_km, pseudo_bearing, sign, EARTH_RADIUS_KM};
pub use kernel::{GeodesicKernel, KernelKind, ParallelKernel, ReferenceKernel};
