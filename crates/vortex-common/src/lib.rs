//! Common types and utilities shared across the vortex-center crates.

pub mod error;
pub mod grid;
pub mod wind;

pub use error::{VortexError, VortexResult};
pub use grid::{GridIndex, GridPoint, LatLonGrid};
pub use wind::WindField;
