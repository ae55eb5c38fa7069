//! Starting position for the center search.
//!
//! Without a caller-supplied guess the search starts at the maximum of the
//! box-smoothed relative vorticity. When no positive maximum exists the grid
//! midpoint is used instead. This never fails.

use crate::config::{CenterFinderConfig, FirstGuess};
use crate::smoothing::smooth_with_coverage;
use geodesy::GeodesicKernel;
use ndarray::{Array2, Axis};
use tracing::{debug, warn};
use vortex_common::{GridIndex, LatLonGrid, WindField};

/// How the starting index was chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GuessSource {
    /// Nearest grid cell to a caller-supplied lon/lat.
    Supplied,
    /// Maximum of smoothed relative vorticity.
    Vorticity,
    /// Grid midpoint, used when no positive vorticity maximum exists.
    Midpoint,
}

/// Starting index plus the smoothed vorticity used to pick it.
#[derive(Debug, Clone)]
pub struct InitialGuess {
    pub index: GridIndex,
    pub source: GuessSource,
    /// Smoothed relative vorticity (s⁻¹), NaN where coverage was insufficient.
    pub smoothed_vorticity: Array2<f64>,
}

/// Derivative along one axis with centered differences in the interior and
/// one-sided differences at the edges. Axes shorter than 2 give NaN.
pub fn gradient(data: &Array2<f64>, axis: Axis, spacing: f64) -> Array2<f64> {
    let mut out = Array2::<f64>::from_elem(data.dim(), f64::NAN);
    let len = data.len_of(axis);
    if len < 2 {
        return out;
    }

    for (lane_in, mut lane_out) in data.lanes(axis).into_iter().zip(out.lanes_mut(axis)) {
        lane_out[0] = (lane_in[1] - lane_in[0]) / spacing;
        for i in 1..len - 1 {
            lane_out[i] = (lane_in[i + 1] - lane_in[i - 1]) / (2.0 * spacing);
        }
        lane_out[len - 1] = (lane_in[len - 1] - lane_in[len - 2]) / spacing;
    }

    out
}

/// Relative vorticity ∂v/∂x − ∂u/∂y.
///
/// Columns run along x (east) and rows along y (north).
pub fn relative_vorticity(wind: &WindField, dx_m: f64, dy_m: f64) -> Array2<f64> {
    let dv_dx = gradient(wind.v(), Axis(1), dx_m);
    let du_dy = gradient(wind.u(), Axis(0), dy_m);
    dv_dx - du_dy
}

/// Relative vorticity smoothed with the configured box filter.
pub fn smoothed_vorticity(wind: &WindField, config: &CenterFinderConfig) -> Array2<f64> {
    let vorticity = relative_vorticity(wind, config.vorticity_dx_m, config.vorticity_dy_m);
    smooth_with_coverage(
        &vorticity,
        config.smoothing_half_width,
        config.min_smoothing_coverage,
    )
}

/// Index and value of the largest finite element; the first one wins ties.
pub fn nan_argmax(data: &Array2<f64>) -> Option<(GridIndex, f64)> {
    let mut best: Option<(GridIndex, f64)> = None;
    for ((row, col), &value) in data.indexed_iter() {
        if !value.is_finite() {
            continue;
        }
        match best {
            Some((_, current)) if value <= current => {}
            _ => best = Some((GridIndex::new(row, col), value)),
        }
    }
    best
}

/// Grid cell closest (great-circle) to a lon/lat; the first one wins ties.
pub fn nearest_index(
    grid: &LatLonGrid,
    lat: f64,
    lon: f64,
    kernel: &dyn GeodesicKernel,
    earth_radius_km: f64,
) -> GridIndex {
    let distance = kernel.distance_km(lat, lon, grid.lat(), grid.lon(), earth_radius_km);
    let mut best = grid.midpoint();
    let mut best_distance = f64::INFINITY;
    for ((row, col), &d) in distance.indexed_iter() {
        if d < best_distance {
            best_distance = d;
            best = GridIndex::new(row, col);
        }
    }
    best
}

/// Choose where the center search starts.
///
/// The smoothed vorticity is always computed so it can be reported as a
/// diagnostic, even when a first guess is supplied.
pub fn initial_guess(
    wind: &WindField,
    grid: &LatLonGrid,
    first_guess: Option<FirstGuess>,
    kernel: &dyn GeodesicKernel,
    config: &CenterFinderConfig,
) -> InitialGuess {
    let smoothed = smoothed_vorticity(wind, config);

    if let Some(guess) = first_guess {
        if guess.lat.is_finite() && guess.lon.is_finite() {
            let index = nearest_index(grid, guess.lat, guess.lon, kernel, config.earth_radius_km);
            debug!(
                lon = guess.lon,
                lat = guess.lat,
                row = index.row,
                col = index.col,
                "Using supplied first guess"
            );
            return InitialGuess {
                index,
                source: GuessSource::Supplied,
                smoothed_vorticity: smoothed,
            };
        }
        warn!(
            lon = guess.lon,
            lat = guess.lat,
            "Ignoring non-finite first guess"
        );
    }

    match nan_argmax(&smoothed) {
        Some((index, value)) if value > 0.0 => {
            debug!(
                row = index.row,
                col = index.col,
                vorticity = value,
                "Using smoothed vorticity maximum as first guess"
            );
            InitialGuess {
                index,
                source: GuessSource::Vorticity,
                smoothed_vorticity: smoothed,
            }
        }
        other => {
            let index = grid.midpoint();
            warn!(
                max_vorticity = ?other.map(|(_, v)| v),
                row = index.row,
                col = index.col,
                "No positive vorticity maximum, falling back to grid midpoint"
            );
            InitialGuess {
                index,
                source: GuessSource::Midpoint,
                smoothed_vorticity: smoothed,
            }
        }
    }
}
