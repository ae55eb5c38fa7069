//! `find_center` entry point.

use crate::config::{CenterFinderConfig, FirstGuess, SearchParams};
use crate::first_guess::initial_guess;
use crate::rmw::{estimate_rmw, RmwEstimate};
use crate::scoring::CandidateScorer;
use crate::search::CenterSearch;
use crate::types::{CenterDiagnostics, CenterResult};
use std::time::Instant;
use tracing::{debug, info};
use vortex_common::{LatLonGrid, VortexError, VortexResult, WindField};

/// Locate the vortex center of a storm-relative wind field.
///
/// Only malformed inputs and invalid parameters return `Err`. A search that
/// never converges still returns `Ok` with NaN outputs and a non-converged
/// [`crate::SearchStatus`].
pub fn find_center(
    wind: &WindField,
    grid: &LatLonGrid,
    params: &SearchParams,
    first_guess: Option<FirstGuess>,
    config: &CenterFinderConfig,
) -> VortexResult<CenterResult> {
    let start = Instant::now();

    config.validate().map_err(VortexError::Config)?;
    params.validate()?;
    wind.check_grid(grid)?;

    debug!(
        rows = grid.rows(),
        cols = grid.cols(),
        valid_fraction = wind.valid_fraction(),
        sectors = params.num_sectors,
        spad = params.spad,
        iterations = params.num_iterations,
        "Finding center"
    );

    let kernel = config.kernel.build();
    let guess = initial_guess(wind, grid, first_guess, kernel.as_ref(), config);

    let scorer = CandidateScorer::new(wind, grid, params.num_sectors, kernel.as_ref(), config);
    let outcome = CenterSearch::new(
        &scorer,
        grid.shape(),
        params.spad,
        params.num_iterations,
        config.parallel_scoring,
    )
    .run(guess.index);

    let best_point = outcome.best.and_then(|(index, _)| grid.point(index));
    let (center_lat, center_lon) = best_point
        .map(|p| (p.lat, p.lon))
        .unwrap_or((f64::NAN, f64::NAN));

    let mut rmw = RmwEstimate::undefined();
    let mut data_coverage = f64::NAN;
    let mut diagnostics = None;

    if let Some(point) = best_point {
        let grids = scorer.grids(point.index);

        if outcome.status.is_converged() {
            rmw = estimate_rmw(wind, grid, &point, kernel.as_ref(), config).0;
            data_coverage = scorer.coverage(&grids).min_fraction();
        }

        diagnostics = Some(CenterDiagnostics {
            sector_errors: outcome
                .best_sector_errors
                .clone()
                .unwrap_or_else(|| scorer.sector_errors(&grids)),
            weighted_deviation: grids.weighted_deviation,
            angular_deviation: grids.angular_deviation,
            wind_direction: scorer.direction().clone(),
        });
    }

    let min_error = outcome.best.map(|(_, e)| e).unwrap_or(f64::INFINITY);

    info!(
        status = %outcome.status,
        center_lon,
        center_lat,
        rmw_km = rmw.rmw_km,
        peak_wind = rmw.peak_wind,
        data_coverage,
        iterations = outcome.iterations,
        scored = outcome.candidates_scored,
        rejected = outcome.candidates_rejected,
        kernel = kernel.name(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Center finding complete"
    );

    Ok(CenterResult {
        center_lon,
        center_lat,
        peak_tangential_wind: rmw.peak_wind,
        rmw_km: rmw.rmw_km,
        data_coverage,
        smoothed_vorticity: guess.smoothed_vorticity,
        status: outcome.status,
        center_index: outcome.best.map(|(index, _)| index),
        start_index: guess.index,
        start_source: guess.source,
        min_error,
        iterations: outcome.iterations,
        candidates_scored: outcome.candidates_scored,
        candidates_rejected: outcome.candidates_rejected,
        diagnostics,
    })
}
