//! Radius of maximum azimuthal-mean tangential wind.

use crate::config::CenterFinderConfig;
use geodesy::GeodesicKernel;
use ndarray::{Array2, Zip};
use serde::{Deserialize, Serialize};
use vortex_common::{GridPoint, LatLonGrid, WindField};

/// Mean tangential wind in one annulus.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnnulusMean {
    /// Central radius (km).
    pub radius_km: f64,
    /// Mean tangential wind, NaN when the annulus is empty.
    pub mean_wind: f64,
    /// Number of cells with data in the annulus.
    pub count: usize,
}

/// Peak of the annulus profile.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RmwEstimate {
    /// Radius of maximum mean tangential wind (km), NaN if every annulus is empty.
    pub rmw_km: f64,
    /// Maximum mean tangential wind, NaN if every annulus is empty.
    pub peak_wind: f64,
}

impl RmwEstimate {
    pub fn undefined() -> Self {
        Self {
            rmw_km: f64::NAN,
            peak_wind: f64::NAN,
        }
    }
}

/// Tangential wind around a center: `-(u·sin(bearing) − v·cos(bearing))`.
///
/// Positive values are counterclockwise; the formula is not hemisphere-aware.
pub fn tangential_wind(wind: &WindField, bearing: &Array2<f64>) -> Array2<f64> {
    Zip::from(wind.u())
        .and(wind.v())
        .and(bearing)
        .map_collect(|&u, &v, &b| -(u * b.sin() - v * b.cos()))
}

/// Mean tangential wind in each configured annulus.
///
/// Annulus `r` holds the cells with `r - step/2 <= distance < r + step/2`.
pub fn annulus_profile(
    tangential: &Array2<f64>,
    distance_km: &Array2<f64>,
    config: &CenterFinderConfig,
) -> Vec<AnnulusMean> {
    let half = config.annulus_step_km / 2.0;

    config
        .annulus_radii()
        .into_iter()
        .map(|radius_km| {
            let (lo, hi) = (radius_km - half, radius_km + half);
            let (sum, count) = Zip::from(tangential).and(distance_km).fold(
                (0.0, 0usize),
                |(sum, count), &vt, &d| {
                    if d >= lo && d < hi && vt.is_finite() {
                        (sum + vt, count + 1)
                    } else {
                        (sum, count)
                    }
                },
            );
            AnnulusMean {
                radius_km,
                mean_wind: if count == 0 { f64::NAN } else { sum / count as f64 },
                count,
            }
        })
        .collect()
}

/// Largest finite annulus mean; the innermost annulus wins ties.
pub fn peak_of_profile(profile: &[AnnulusMean]) -> RmwEstimate {
    let mut best = RmwEstimate::undefined();
    for annulus in profile {
        if !annulus.mean_wind.is_finite() {
            continue;
        }
        if best.peak_wind.is_nan() || annulus.mean_wind > best.peak_wind {
            best = RmwEstimate {
                rmw_km: annulus.radius_km,
                peak_wind: annulus.mean_wind,
            };
        }
    }
    best
}

/// RMW and peak tangential wind around a fixed center.
pub fn estimate_rmw(
    wind: &WindField,
    grid: &LatLonGrid,
    center: &GridPoint,
    kernel: &dyn GeodesicKernel,
    config: &CenterFinderConfig,
) -> (RmwEstimate, Vec<AnnulusMean>) {
    let distance = kernel.distance_km(
        center.lat,
        center.lon,
        grid.lat(),
        grid.lon(),
        config.earth_radius_km,
    );
    let bearing = kernel.bearing(center.lat, center.lon, grid.lat(), grid.lon());

    let tangential = tangential_wind(wind, &bearing);
    let profile = annulus_profile(&tangential, &distance, config);
    (peak_of_profile(&profile), profile)
}
