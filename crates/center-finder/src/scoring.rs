//! Goodness-of-fit of the observed wind to an ideal tangential vortex.
//!
//! For a candidate center every grid cell gets an angular deviation between
//! the observed wind direction and the direction of a perfectly tangential,
//! counterclockwise flow around the candidate. Deviations are weighted by a
//! Gaussian in distance and by `sqrt(speed + 1)`, then averaged per
//! azimuthal sector. The candidate's score is the mean over sectors.

use crate::config::CenterFinderConfig;
use crate::sector::{aggregate_sector_errors, SectorBins};
use geodesy::{normalize_angle, wrap_to_pi, GeodesicKernel};
use ndarray::{Array2, Zip};
use std::f64::consts::{FRAC_PI_2, PI};
use vortex_common::{GridIndex, LatLonGrid, WindField};

/// Result of evaluating one candidate center.
#[derive(Debug, Clone, PartialEq)]
pub enum CandidateOutcome {
    /// Sector errors (NaN for sectors without data) and their mean.
    Scored {
        sector_errors: Vec<f64>,
        aggregate: f64,
    },
    /// Too little data around the candidate; it must not become the center.
    InsufficientCoverage { fraction: f64 },
}

/// Per-cell grids behind a candidate's score.
#[derive(Debug, Clone)]
pub struct CandidateGrids {
    /// Distance from the candidate (km).
    pub distance_km: Array2<f64>,
    /// Bearing from the candidate (radians).
    pub bearing: Array2<f64>,
    /// Combined weight × angular deviation, NaN beyond the search radius.
    pub weighted_deviation: Array2<f64>,
    /// Observed minus ideal direction, wrapped into (-π, π].
    pub angular_deviation: Array2<f64>,
}

/// Data-coverage fractions around a point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coverage {
    /// Scored cells / all cells within the coverage radius.
    pub inner: f64,
    /// Scored cells / all cells between the coverage and search radii.
    pub outer: f64,
}

impl Coverage {
    /// Smaller of the two fractions, ignoring a NaN term.
    pub fn min_fraction(&self) -> f64 {
        match (self.inner.is_nan(), self.outer.is_nan()) {
            (true, _) => self.outer,
            (_, true) => self.inner,
            _ => self.inner.min(self.outer),
        }
    }
}

/// Evaluates candidate centers against one wind field.
///
/// Holds the candidate-independent inputs so that each evaluation only
/// computes the geometry that depends on the candidate. Shared read-only
/// across worker threads.
pub struct CandidateScorer<'a> {
    grid: &'a LatLonGrid,
    kernel: &'a dyn GeodesicKernel,
    config: &'a CenterFinderConfig,
    bins: SectorBins,
    /// Observed wind direction (radians), NaN where missing.
    direction: Array2<f64>,
    /// `sqrt(speed + 1)`, NaN where missing.
    speed_weight: Array2<f64>,
}

impl<'a> CandidateScorer<'a> {
    pub fn new(
        wind: &WindField,
        grid: &'a LatLonGrid,
        num_sectors: usize,
        kernel: &'a dyn GeodesicKernel,
        config: &'a CenterFinderConfig,
    ) -> Self {
        let direction = wind.direction();
        let speed_weight = wind.speed().mapv(|s| (s + 1.0).sqrt());
        Self {
            grid,
            kernel,
            config,
            bins: SectorBins::new(num_sectors),
            direction,
            speed_weight,
        }
    }

    pub fn num_sectors(&self) -> usize {
        self.bins.len()
    }

    /// Observed wind direction grid.
    pub fn direction(&self) -> &Array2<f64> {
        &self.direction
    }

    /// Gaussian distance weight (normal density with σ = core radius), floored.
    #[inline]
    fn distance_weight(&self, distance_km: f64) -> f64 {
        let sigma = self.config.core_radius_km;
        let z = distance_km / sigma;
        let density = (-0.5 * z * z).exp() / (sigma * (2.0 * PI).sqrt());
        density.max(self.config.min_dist_weight)
    }

    /// Distance, bearing and deviation grids for a candidate.
    pub fn grids(&self, index: GridIndex) -> CandidateGrids {
        let (lat0, lon0) = (
            self.grid.lat()[index.as_tuple()],
            self.grid.lon()[index.as_tuple()],
        );
        let distance_km = self.kernel.distance_km(
            lat0,
            lon0,
            self.grid.lat(),
            self.grid.lon(),
            self.config.earth_radius_km,
        );
        let bearing = self.kernel.bearing(lat0, lon0, self.grid.lat(), self.grid.lon());

        let dist_weight = distance_km.mapv(|d| self.distance_weight(d));

        // Normalize by the mean weight over cells with wind data
        let (sum, count) = Zip::from(&dist_weight)
            .and(&self.speed_weight)
            .fold((0.0, 0usize), |(sum, count), &w, &s| {
                if s.is_finite() {
                    (sum + w, count + 1)
                } else {
                    (sum, count)
                }
            });
        let mean_weight = if count == 0 { f64::NAN } else { sum / count as f64 };

        let angular_deviation = Zip::from(&self.direction)
            .and(&bearing)
            .map_collect(|&observed, &b| {
                let ideal = wrap_to_pi(b + FRAC_PI_2);
                normalize_angle(observed - ideal)
            });

        let search_radius = self.config.search_radius_km;
        let weighted_deviation = Zip::from(&angular_deviation)
            .and(&dist_weight)
            .and(&self.speed_weight)
            .and(&distance_km)
            .map_collect(|&dev, &dw, &sw, &d| {
                if d > search_radius {
                    f64::NAN
                } else {
                    (dw / mean_weight) * sw * dev
                }
            });

        CandidateGrids {
            distance_km,
            bearing,
            weighted_deviation,
            angular_deviation,
        }
    }

    /// Fraction of scored cells within the coverage radius, or `None` when
    /// no cell lies within it.
    fn gate_fraction(&self, grids: &CandidateGrids) -> Option<f64> {
        let radius = self.config.coverage_radius_km;
        let (valid, total) = Zip::from(&grids.distance_km)
            .and(&grids.weighted_deviation)
            .fold((0usize, 0usize), |(valid, total), &d, &wd| {
                if d <= radius {
                    (valid + usize::from(wd.is_finite()), total + 1)
                } else {
                    (valid, total)
                }
            });
        (total > 0).then(|| valid as f64 / total as f64)
    }

    /// Mean absolute weighted deviation per sector, NaN for empty sectors.
    pub fn sector_errors(&self, grids: &CandidateGrids) -> Vec<f64> {
        let n = self.bins.len();
        let mut sums = vec![0.0; n];
        let mut counts = vec![0usize; n];

        Zip::from(&grids.weighted_deviation)
            .and(&grids.bearing)
            .for_each(|&wd, &b| {
                if !wd.is_finite() {
                    return;
                }
                if let Some(sector) = self.bins.sector_of(b) {
                    sums[sector] += wd.abs();
                    counts[sector] += 1;
                }
            });

        sums.iter()
            .zip(&counts)
            .map(|(&sum, &count)| {
                if count == 0 {
                    f64::NAN
                } else {
                    sum / count as f64
                }
            })
            .collect()
    }

    /// Evaluate a candidate center.
    pub fn score(&self, index: GridIndex) -> CandidateOutcome {
        let grids = self.grids(index);

        match self.gate_fraction(&grids) {
            Some(fraction) if fraction >= self.config.min_data_frac => {}
            other => {
                return CandidateOutcome::InsufficientCoverage {
                    fraction: other.unwrap_or(0.0),
                }
            }
        }

        let sector_errors = self.sector_errors(&grids);
        let aggregate = aggregate_sector_errors(&sector_errors);
        CandidateOutcome::Scored {
            sector_errors,
            aggregate,
        }
    }

    /// Inner and outer data coverage around a point.
    pub fn coverage(&self, grids: &CandidateGrids) -> Coverage {
        let inner_radius = self.config.coverage_radius_km;
        let outer_radius = self.config.search_radius_km;
        let mut inner = (0usize, 0usize);
        let mut outer = (0usize, 0usize);

        Zip::from(&grids.distance_km)
            .and(&grids.weighted_deviation)
            .for_each(|&d, &wd| {
                let valid = usize::from(wd.is_finite());
                if d <= inner_radius {
                    inner = (inner.0 + valid, inner.1 + 1);
                } else if d <= outer_radius {
                    outer = (outer.0 + valid, outer.1 + 1);
                }
            });

        let fraction = |(valid, total): (usize, usize)| {
            if total == 0 {
                f64::NAN
            } else {
                valid as f64 / total as f64
            }
        };

        Coverage {
            inner: fraction(inner),
            outer: fraction(outer),
        }
    }
}
