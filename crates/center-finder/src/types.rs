//! Result types for center finding.

use crate::first_guess::GuessSource;
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use vortex_common::GridIndex;

/// How the center search ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchStatus {
    /// The best candidate stayed put for a full iteration.
    Converged,
    /// The iteration budget ran out while the best candidate was still moving.
    BudgetExhausted,
    /// No candidate in any window passed the coverage gate with a finite score.
    NoValidCandidate,
}

impl SearchStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Converged => "converged",
            Self::BudgetExhausted => "budget_exhausted",
            Self::NoValidCandidate => "no_valid_candidate",
        }
    }

    pub fn is_converged(&self) -> bool {
        matches!(self, Self::Converged)
    }
}

impl std::fmt::Display for SearchStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Per-cell grids for the best candidate found.
#[derive(Debug, Clone)]
pub struct CenterDiagnostics {
    /// Combined weight × angular deviation, NaN beyond the search radius.
    pub weighted_deviation: Array2<f64>,
    /// Observed minus ideal tangential direction (radians).
    pub angular_deviation: Array2<f64>,
    /// Observed wind direction (radians, counterclockwise from east).
    pub wind_direction: Array2<f64>,
    /// Mean absolute weighted deviation per sector.
    pub sector_errors: Vec<f64>,
}

/// Output of [`crate::find_center`].
///
/// Numerical failure never raises: check [`CenterResult::status`] or the
/// NaN sentinels before using the center.
#[derive(Debug, Clone)]
pub struct CenterResult {
    /// Center longitude (degrees), NaN if no candidate was ever scored.
    pub center_lon: f64,
    /// Center latitude (degrees), NaN if no candidate was ever scored.
    pub center_lat: f64,
    /// Peak azimuthal-mean tangential wind, NaN unless converged.
    pub peak_tangential_wind: f64,
    /// Radius of maximum tangential wind (km), NaN unless converged.
    pub rmw_km: f64,
    /// Smaller of the inner and outer data-coverage fractions, NaN unless converged.
    pub data_coverage: f64,
    /// Smoothed relative vorticity, NaN where coverage was insufficient.
    pub smoothed_vorticity: Array2<f64>,
    pub status: SearchStatus,
    /// Grid index of the best candidate.
    pub center_index: Option<GridIndex>,
    /// Where the search started and why.
    pub start_index: GridIndex,
    pub start_source: GuessSource,
    /// Score of the best candidate, +∞ if none.
    pub min_error: f64,
    /// Iterations performed.
    pub iterations: usize,
    /// Cells scored over the whole search.
    pub candidates_scored: usize,
    /// Cells rejected by the coverage gate over the whole search.
    pub candidates_rejected: usize,
    pub diagnostics: Option<CenterDiagnostics>,
}

impl CenterResult {
    /// True when both center coordinates are finite.
    pub fn is_valid(&self) -> bool {
        self.center_lon.is_finite() && self.center_lat.is_finite()
    }
}
