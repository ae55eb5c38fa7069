//! Azimuthal sectors and the per-invocation sector error memo.

use ndarray::{Array2, Array3};
use std::f64::consts::PI;
use vortex_common::GridIndex;

/// Equal-width azimuthal bins spanning -π..π.
///
/// Bins are half-open `[lo, hi)` except the last, which also holds π.
#[derive(Debug, Clone)]
pub struct SectorBins {
    edges: Vec<f64>,
    width: f64,
}

impl SectorBins {
    pub fn new(num_sectors: usize) -> Self {
        let num_sectors = num_sectors.max(1);
        let width = 2.0 * PI / num_sectors as f64;
        let mut edges: Vec<f64> = (0..=num_sectors)
            .map(|k| -PI + k as f64 * width)
            .collect();
        edges[num_sectors] = PI;
        Self { edges, width }
    }

    pub fn len(&self) -> usize {
        self.edges.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Bin edges, `len() + 1` values from -π to π.
    pub fn edges(&self) -> &[f64] {
        &self.edges
    }

    /// Sector containing `bearing`, or `None` for NaN and values outside [-π, π].
    #[inline]
    pub fn sector_of(&self, bearing: f64) -> Option<usize> {
        let n = self.len();
        if !(bearing >= self.edges[0] && bearing <= self.edges[n]) {
            return None;
        }

        let mut k = (((bearing - self.edges[0]) / self.width).floor() as usize).min(n - 1);
        // Guard against rounding in the division
        while k > 0 && bearing < self.edges[k] {
            k -= 1;
        }
        while k < n - 1 && bearing >= self.edges[k + 1] {
            k += 1;
        }
        Some(k)
    }
}

/// Scoring state of a grid cell within one search invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CellState {
    #[default]
    Unscored,
    /// Sector errors recorded in the table.
    Scored,
    /// Failed the data-coverage gate; never scored.
    Rejected,
}

/// Mean absolute weighted angular deviation per (sector, row, col).
///
/// Each cell is written at most once per invocation and reused by every
/// later iteration whose window covers it.
#[derive(Debug, Clone)]
pub struct SectorErrorTable {
    values: Array3<f64>,
    state: Array2<CellState>,
}

impl SectorErrorTable {
    pub fn new(num_sectors: usize, shape: (usize, usize)) -> Self {
        Self {
            values: Array3::from_elem((num_sectors, shape.0, shape.1), f64::NAN),
            state: Array2::from_elem(shape, CellState::Unscored),
        }
    }

    pub fn num_sectors(&self) -> usize {
        self.values.dim().0
    }

    pub fn state(&self, index: GridIndex) -> CellState {
        self.state[index.as_tuple()]
    }

    /// Whether the cell still needs to be evaluated.
    pub fn needs_scoring(&self, index: GridIndex) -> bool {
        self.state(index) == CellState::Unscored
    }

    /// Store the sector errors of a cell. A cell is recorded only once.
    pub fn record(&mut self, index: GridIndex, sector_errors: &[f64]) {
        debug_assert_eq!(sector_errors.len(), self.num_sectors());
        debug_assert!(self.needs_scoring(index), "cell {:?} scored twice", index);

        for (sector, &value) in sector_errors.iter().enumerate() {
            self.values[[sector, index.row, index.col]] = value;
        }
        self.state[index.as_tuple()] = CellState::Scored;
    }

    /// Mark a cell as excluded by the coverage gate.
    pub fn reject(&mut self, index: GridIndex) {
        debug_assert!(self.needs_scoring(index), "cell {:?} scored twice", index);
        self.state[index.as_tuple()] = CellState::Rejected;
    }

    /// Sector errors of a cell, NaN where a sector had no data.
    pub fn sector_errors(&self, index: GridIndex) -> Vec<f64> {
        (0..self.num_sectors())
            .map(|sector| self.values[[sector, index.row, index.col]])
            .collect()
    }

    /// Mean over sectors with data, or `None` when the cell has no score.
    pub fn aggregate(&self, index: GridIndex) -> Option<f64> {
        if self.state(index) != CellState::Scored {
            return None;
        }
        let value = aggregate_sector_errors(&self.sector_errors(index));
        value.is_finite().then_some(value)
    }

    /// Number of cells scored so far.
    pub fn scored_count(&self) -> usize {
        self.state.iter().filter(|s| **s == CellState::Scored).count()
    }

    /// Number of cells rejected by the coverage gate so far.
    pub fn rejected_count(&self) -> usize {
        self.state.iter().filter(|s| **s == CellState::Rejected).count()
    }
}

/// Mean of the finite sector errors; NaN when no sector has data.
pub fn aggregate_sector_errors(sector_errors: &[f64]) -> f64 {
    let (sum, count) = sector_errors
        .iter()
        .filter(|v| v.is_finite())
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 {
        f64::NAN
    } else {
        sum / count as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn test_sector_edges() {
        let bins = SectorBins::new(4);
        assert_eq!(bins.len(), 4);
        assert_eq!(bins.edges()[0], -PI);
        assert_eq!(bins.edges()[4], PI);
    }

    #[test]
    fn test_sector_of() {
        let bins = SectorBins::new(4);
        assert_eq!(bins.sector_of(-PI), Some(0));
        assert_eq!(bins.sector_of(-FRAC_PI_2 - 1e-9), Some(0));
        assert_eq!(bins.sector_of(bins.edges()[1]), Some(1));
        assert_eq!(bins.sector_of(0.0), Some(2));
        assert_eq!(bins.sector_of(3.0), Some(3));
        assert_eq!(bins.sector_of(PI), Some(3));
        assert_eq!(bins.sector_of(f64::NAN), None);
        assert_eq!(bins.sector_of(4.0), None);
    }

    #[test]
    fn test_single_sector_holds_everything() {
        let bins = SectorBins::new(1);
        for &b in &[-PI, -1.0, 0.0, 2.5, PI] {
            assert_eq!(bins.sector_of(b), Some(0));
        }
    }

    #[test]
    fn test_every_edge_starts_its_sector() {
        let bins = SectorBins::new(16);
        for k in 0..16 {
            assert_eq!(bins.sector_of(bins.edges()[k]), Some(k));
        }
    }

    #[test]
    fn test_table_records_once_and_aggregates() {
        let mut table = SectorErrorTable::new(3, (4, 5));
        let idx = GridIndex::new(2, 3);
        assert!(table.needs_scoring(idx));
        assert_eq!(table.aggregate(idx), None);

        table.record(idx, &[1.0, f64::NAN, 3.0]);
        assert_eq!(table.state(idx), CellState::Scored);
        assert!(!table.needs_scoring(idx));
        assert_eq!(table.aggregate(idx), Some(2.0));
        assert_eq!(table.scored_count(), 1);

        let other = GridIndex::new(0, 0);
        table.reject(other);
        assert_eq!(table.aggregate(other), None);
        assert_eq!(table.rejected_count(), 1);
    }

    #[test]
    fn test_all_empty_sectors_have_no_aggregate() {
        let mut table = SectorErrorTable::new(2, (1, 1));
        let idx = GridIndex::new(0, 0);
        table.record(idx, &[f64::NAN, f64::NAN]);
        assert_eq!(table.aggregate(idx), None);
        assert!(aggregate_sector_errors(&[f64::NAN]).is_nan());
    }

    #[test]
    #[should_panic(expected = "scored twice")]
    #[cfg(debug_assertions)]
    fn test_double_record_panics_in_debug() {
        let mut table = SectorErrorTable::new(1, (1, 1));
        let idx = GridIndex::new(0, 0);
        table.record(idx, &[1.0]);
        table.record(idx, &[2.0]);
    }
}
