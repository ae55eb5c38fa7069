//! JSON report written by the CLI.

use crate::input::{array_to_rows, Rows};
use center_finder::{CenterResult, GuessSource, SearchStatus};
use serde::Serialize;
use vortex_common::GridIndex;

#[derive(Debug, Serialize)]
pub struct CenterReport {
    pub status: SearchStatus,
    pub center_lon: Option<f64>,
    pub center_lat: Option<f64>,
    pub center_index: Option<GridIndex>,
    pub peak_tangential_wind: Option<f64>,
    pub rmw_km: Option<f64>,
    pub data_coverage: Option<f64>,
    pub min_error: Option<f64>,
    pub start_index: GridIndex,
    pub start_source: GuessSource,
    pub iterations: usize,
    pub candidates_scored: usize,
    pub candidates_rejected: usize,
    pub kernel: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grids: Option<GridReport>,
}

/// Full-resolution grids, included on request.
#[derive(Debug, Serialize)]
pub struct GridReport {
    pub smoothed_vorticity: Rows,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weighted_deviation: Option<Rows>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub angular_deviation: Option<Rows>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wind_direction: Option<Rows>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sector_errors: Option<Vec<Option<f64>>>,
}

fn finite(value: f64) -> Option<f64> {
    value.is_finite().then_some(value)
}

impl CenterReport {
    pub fn new(result: &CenterResult, kernel: &str, include_grids: bool) -> Self {
        let grids = include_grids.then(|| {
            let diag = result.diagnostics.as_ref();
            GridReport {
                smoothed_vorticity: array_to_rows(&result.smoothed_vorticity),
                weighted_deviation: diag.map(|d| array_to_rows(&d.weighted_deviation)),
                angular_deviation: diag.map(|d| array_to_rows(&d.angular_deviation)),
                wind_direction: diag.map(|d| array_to_rows(&d.wind_direction)),
                sector_errors: diag.map(|d| d.sector_errors.iter().map(|v| finite(*v)).collect()),
            }
        });

        Self {
            status: result.status,
            center_lon: finite(result.center_lon),
            center_lat: finite(result.center_lat),
            center_index: result.center_index,
            peak_tangential_wind: finite(result.peak_tangential_wind),
            rmw_km: finite(result.rmw_km),
            data_coverage: finite(result.data_coverage),
            min_error: finite(result.min_error),
            start_index: result.start_index,
            start_source: result.start_source,
            iterations: result.iterations,
            candidates_scored: result.candidates_scored,
            candidates_rejected: result.candidates_rejected,
            kernel: kernel.to_string(),
            grids,
        }
    }
}
