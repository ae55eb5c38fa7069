//! Configuration for the center finder.

use geodesy::{KernelKind, EARTH_RADIUS_KM};
use serde::{Deserialize, Serialize};
use vortex_common::{VortexError, VortexResult};

/// Physical and numerical constants of the center search.
///
/// Distances are in km unless the field name says otherwise.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CenterFinderConfig {
    /// Earth radius used for all great-circle distances.
    pub earth_radius_km: f64,

    /// Cells farther than this from a candidate do not contribute to its score.
    pub search_radius_km: f64,

    /// Standard deviation of the Gaussian distance weight.
    pub core_radius_km: f64,

    /// Radius of the data-coverage gate around a candidate.
    pub coverage_radius_km: f64,

    /// Minimum fraction of scored cells inside the coverage radius.
    pub min_data_frac: f64,

    /// Floor applied to the Gaussian distance weight.
    pub min_dist_weight: f64,

    /// Central radius of the innermost annulus used for the RMW.
    pub annulus_min_km: f64,

    /// Annulus centers stop below this radius.
    pub annulus_max_km: f64,

    /// Width of each annulus and spacing between annulus centers.
    pub annulus_step_km: f64,

    /// Zonal grid spacing assumed by the vorticity first guess (meters).
    pub vorticity_dx_m: f64,

    /// Meridional grid spacing assumed by the vorticity first guess (meters).
    pub vorticity_dy_m: f64,

    /// Half-width (cells) of the box filter applied to vorticity.
    pub smoothing_half_width: usize,

    /// Smoothed valid-data weight below which smoothed vorticity is dropped.
    pub min_smoothing_coverage: f64,

    /// Geodesic kernel used for distance and bearing grids.
    pub kernel: KernelKind,

    /// Score the candidates of a search window on the rayon thread pool.
    pub parallel_scoring: bool,
}

impl Default for CenterFinderConfig {
    fn default() -> Self {
        Self {
            earth_radius_km: EARTH_RADIUS_KM,
            search_radius_km: 150.0,
            core_radius_km: 50.0,
            coverage_radius_km: 100.0,
            min_data_frac: 0.02,
            min_dist_weight: 1e-6,
            annulus_min_km: 2.0,
            annulus_max_km: 175.0,
            annulus_step_km: 2.0,
            vorticity_dx_m: 2000.0,
            vorticity_dy_m: 2000.0,
            smoothing_half_width: 10,
            min_smoothing_coverage: 0.25,
            kernel: KernelKind::Reference,
            parallel_scoring: true,
        }
    }
}

/// Parse an environment variable into `target`, leaving it untouched when
/// the variable is unset or unparsable.
fn env_override<T: std::str::FromStr>(name: &str, target: &mut T) {
    if let Ok(val) = std::env::var(name) {
        if let Ok(parsed) = val.parse() {
            *target = parsed;
        }
    }
}

impl CenterFinderConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        env_override("VORTEX_EARTH_RADIUS_KM", &mut config.earth_radius_km);
        env_override("VORTEX_SEARCH_RADIUS_KM", &mut config.search_radius_km);
        env_override("VORTEX_CORE_RADIUS_KM", &mut config.core_radius_km);
        env_override("VORTEX_COVERAGE_RADIUS_KM", &mut config.coverage_radius_km);
        env_override("VORTEX_MIN_DATA_FRAC", &mut config.min_data_frac);
        env_override("VORTEX_MIN_DIST_WEIGHT", &mut config.min_dist_weight);
        env_override("VORTEX_ANNULUS_MIN_KM", &mut config.annulus_min_km);
        env_override("VORTEX_ANNULUS_MAX_KM", &mut config.annulus_max_km);
        env_override("VORTEX_ANNULUS_STEP_KM", &mut config.annulus_step_km);
        env_override("VORTEX_VORTICITY_DX_M", &mut config.vorticity_dx_m);
        env_override("VORTEX_VORTICITY_DY_M", &mut config.vorticity_dy_m);
        env_override("VORTEX_SMOOTHING_HALF_WIDTH", &mut config.smoothing_half_width);
        env_override(
            "VORTEX_MIN_SMOOTHING_COVERAGE",
            &mut config.min_smoothing_coverage,
        );

        if let Ok(val) = std::env::var("VORTEX_KERNEL") {
            config.kernel = KernelKind::from_str(&val);
        }

        if let Ok(val) = std::env::var("VORTEX_PARALLEL_SCORING") {
            config.parallel_scoring = val.to_lowercase() == "true" || val == "1";
        }

        config
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), String> {
        let positive = [
            ("earth_radius_km", self.earth_radius_km),
            ("search_radius_km", self.search_radius_km),
            ("core_radius_km", self.core_radius_km),
            ("coverage_radius_km", self.coverage_radius_km),
            ("annulus_step_km", self.annulus_step_km),
            ("vorticity_dx_m", self.vorticity_dx_m),
            ("vorticity_dy_m", self.vorticity_dy_m),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(format!("{} must be > 0", name));
            }
        }

        if !(0.0..=1.0).contains(&self.min_data_frac) {
            return Err("min_data_frac must be in [0, 1]".to_string());
        }

        if !(self.min_dist_weight.is_finite() && self.min_dist_weight >= 0.0) {
            return Err("min_dist_weight must be >= 0".to_string());
        }

        if !(self.annulus_min_km.is_finite() && self.annulus_min_km >= 0.0) {
            return Err("annulus_min_km must be >= 0".to_string());
        }

        if !(self.annulus_max_km.is_finite() && self.annulus_min_km < self.annulus_max_km) {
            return Err("annulus_min_km must be < annulus_max_km".to_string());
        }

        if !(0.0..=1.0).contains(&self.min_smoothing_coverage) {
            return Err("min_smoothing_coverage must be in [0, 1]".to_string());
        }

        Ok(())
    }

    /// Central radii of the annuli used for the RMW: min, min + step, ... < max.
    pub fn annulus_radii(&self) -> Vec<f64> {
        let mut radii = Vec::new();
        let mut k = 0usize;
        loop {
            let r = self.annulus_min_km + k as f64 * self.annulus_step_km;
            if r >= self.annulus_max_km {
                break;
            }
            radii.push(r);
            k += 1;
        }
        radii
    }
}

/// Per-call parameters of the center search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchParams {
    /// Number of equal azimuthal sectors spanning -π..π.
    pub num_sectors: usize,
    /// Half-width of the square search window, in cells.
    pub spad: usize,
    /// Maximum number of search iterations.
    pub num_iterations: usize,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            num_sectors: 8,
            spad: 6,
            num_iterations: 5,
        }
    }
}

impl SearchParams {
    pub fn new(num_sectors: usize, spad: usize, num_iterations: usize) -> Self {
        Self {
            num_sectors,
            spad,
            num_iterations,
        }
    }

    /// Validate the parameters.
    pub fn validate(&self) -> VortexResult<()> {
        if self.num_sectors == 0 {
            return Err(VortexError::invalid_parameter("num_sectors", "must be >= 1"));
        }
        if self.num_iterations == 0 {
            return Err(VortexError::invalid_parameter(
                "num_iterations",
                "must be >= 1",
            ));
        }
        Ok(())
    }
}

/// A caller-supplied starting position, in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FirstGuess {
    pub lon: f64,
    pub lat: f64,
}

impl FirstGuess {
    pub fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }

    /// Build a guess only when both coordinates are present.
    pub fn from_parts(lon: Option<f64>, lat: Option<f64>) -> Option<Self> {
        match (lon, lat) {
            (Some(lon), Some(lat)) => Some(Self { lon, lat }),
            _ => None,
        }
    }
}
