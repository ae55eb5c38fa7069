//! Wind-only tropical cyclone center finding
//!
//! This crate locates the center of a vortex from a storm-relative wind
//! field on a regular lat/lon grid, then estimates its radius of maximum
//! azimuthal-mean tangential wind (RMW). It works from wind alone:
//!
//! - **Initial guess**: maximum of box-smoothed relative vorticity, or a
//!   caller-supplied position
//! - **Center search**: iterative window search minimizing the sector-averaged
//!   deviation from ideal tangential flow
//! - **RMW**: peak of the annulus-mean tangential wind profile
//!
//! # Architecture
//!
//! ```text
//! find_center(wind, grid, params, first_guess, config)
//!      │
//!      ├─► initial_guess()  ──► smoothed vorticity, start index
//!      │
//!      ├─► CenterSearch::run(start)
//!      │         │
//!      │         ├─► window around current center (± spad)
//!      │         │
//!      │         ├─► CandidateScorer::score() for unscored cells
//!      │         │        (rayon, memoized in SectorErrorTable)
//!      │         │
//!      │         └─► row-major reduction: first strictly lower score wins
//!      │
//!      └─► converged? ──► estimate_rmw() + data coverage
//!               │
//!               ▼
//!          CenterResult
//! ```
//!
//! # Example
//!
//! ```ignore
//! use center_finder::{find_center, CenterFinderConfig, SearchParams};
//! use vortex_common::{LatLonGrid, WindField};
//!
//! let grid = LatLonGrid::new(lat, lon)?;
//! let wind = WindField::new(u, v)?;
//! let params = SearchParams::default();
//! let result = find_center(&wind, &grid, &params, None, &CenterFinderConfig::default())?;
//!
//! if result.status.is_converged() {
//!     println!(
//!         "center {:.3} {:.3}, rmw {} km",
//!         result.center_lon, result.center_lat, result.rmw_km
//!     );
//! }
//! ```

pub mod config;
pub mod finder;
pub mod first_guess;
pub mod rmw;
pub mod scoring;
pub mod search;
pub mod sector;
pub mod smoothing;
pub mod types;

// Re-export commonly used types at crate root
pub use config::{CenterFinderConfig, FirstGuess, SearchParams};
pub use finder::find_center;
pub use first_guess::{initial_guess, GuessSource, InitialGuess};
pub use rmw::{estimate_rmw, AnnulusMean, RmwEstimate};
pub use scoring::{CandidateOutcome, CandidateScorer, Coverage};
pub use search::{CenterSearch, SearchOutcome, SearchWindow};
pub use sector::{SectorBins, SectorErrorTable};
pub use types::{CenterDiagnostics, CenterResult, SearchStatus};
pub use vortex_common::{GridIndex, LatLonGrid, VortexError, VortexResult, WindField};
