//! Iterative fixed-point search for the vortex center.
//!
//! Each iteration scores every cell of a square window around the current
//! center and moves the center to the best-scoring cell. The search has
//! converged once an iteration after the first keeps the center in place.
//!
//! Scores live in a [`SectorErrorTable`] owned by the search, so cells shared
//! by overlapping windows are evaluated once. Candidates of a window may be
//! evaluated on the rayon pool; results are applied in row-major order so the
//! outcome matches a sequential scan exactly.

use crate::scoring::{CandidateOutcome, CandidateScorer};
use crate::sector::SectorErrorTable;
use crate::types::SearchStatus;
use rayon::prelude::*;
use tracing::{debug, info, warn};
use vortex_common::GridIndex;

/// Inclusive window of grid indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchWindow {
    pub center: GridIndex,
    pub row_min: usize,
    pub row_max: usize,
    pub col_min: usize,
    pub col_max: usize,
}

impl SearchWindow {
    /// Square window of half-width `spad` around `center`, clipped to the grid.
    pub fn around(center: GridIndex, spad: usize, shape: (usize, usize)) -> Self {
        Self {
            center,
            row_min: center.row.saturating_sub(spad),
            row_max: center.row.saturating_add(spad).min(shape.0 - 1),
            col_min: center.col.saturating_sub(spad),
            col_max: center.col.saturating_add(spad).min(shape.1 - 1),
        }
    }

    /// Indices in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = GridIndex> + '_ {
        (self.row_min..=self.row_max).flat_map(move |row| {
            (self.col_min..=self.col_max).map(move |col| GridIndex::new(row, col))
        })
    }

    pub fn len(&self) -> usize {
        (self.row_max - self.row_min + 1) * (self.col_max - self.col_min + 1)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Final state of a search.
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub status: SearchStatus,
    /// Best cell and its score.
    pub best: Option<(GridIndex, f64)>,
    pub iterations: usize,
    pub candidates_scored: usize,
    pub candidates_rejected: usize,
    /// Sector errors of the best cell.
    pub best_sector_errors: Option<Vec<f64>>,
}

/// One invocation of the center search.
pub struct CenterSearch<'s, 'a> {
    scorer: &'s CandidateScorer<'a>,
    shape: (usize, usize),
    spad: usize,
    num_iterations: usize,
    parallel: bool,
    table: SectorErrorTable,
    best_error: f64,
    best_index: Option<GridIndex>,
}

impl<'s, 'a> CenterSearch<'s, 'a> {
    pub fn new(
        scorer: &'s CandidateScorer<'a>,
        shape: (usize, usize),
        spad: usize,
        num_iterations: usize,
        parallel: bool,
    ) -> Self {
        Self {
            scorer,
            shape,
            spad,
            num_iterations,
            parallel,
            table: SectorErrorTable::new(scorer.num_sectors(), shape),
            best_error: f64::INFINITY,
            best_index: None,
        }
    }

    /// Evaluate every not-yet-visited cell of the window and record the results.
    fn score_window(&mut self, window: &SearchWindow) {
        let pending: Vec<GridIndex> = window
            .cells()
            .filter(|idx| self.table.needs_scoring(*idx))
            .collect();

        let scorer = self.scorer;
        let outcomes: Vec<CandidateOutcome> = if self.parallel {
            pending.par_iter().map(|idx| scorer.score(*idx)).collect()
        } else {
            pending.iter().map(|idx| scorer.score(*idx)).collect()
        };

        for (idx, outcome) in pending.into_iter().zip(outcomes) {
            match outcome {
                CandidateOutcome::Scored { sector_errors, .. } => {
                    self.table.record(idx, &sector_errors)
                }
                CandidateOutcome::InsufficientCoverage { fraction } => {
                    debug!(
                        row = idx.row,
                        col = idx.col,
                        coverage = fraction,
                        "Candidate skipped for insufficient data coverage"
                    );
                    self.table.reject(idx);
                }
            }
        }
    }

    /// Scan the window in row-major order; the first strictly lower score wins.
    fn select_best(&mut self, window: &SearchWindow) {
        for idx in window.cells() {
            if let Some(score) = self.table.aggregate(idx) {
                if score < self.best_error {
                    self.best_error = score;
                    self.best_index = Some(idx);
                }
            }
        }
    }

    /// Run the search from `start`.
    pub fn run(mut self, start: GridIndex) -> SearchOutcome {
        let mut current = start;
        let mut status = SearchStatus::BudgetExhausted;
        let mut iterations = 0;

        for iteration in 0..self.num_iterations {
            iterations = iteration + 1;
            let window = SearchWindow::around(current, self.spad, self.shape);

            self.score_window(&window);
            self.select_best(&window);

            debug!(
                iteration,
                center_row = current.row,
                center_col = current.col,
                rows = ?(window.row_min, window.row_max),
                cols = ?(window.col_min, window.col_max),
                best = ?self.best_index,
                best_error = self.best_error,
                "Search iteration complete"
            );

            let Some(best) = self.best_index else {
                warn!(iteration, "No candidate passed the coverage gate");
                status = SearchStatus::NoValidCandidate;
                break;
            };

            if iteration > 0 && best == window.center {
                info!(
                    iteration,
                    row = best.row,
                    col = best.col,
                    error = self.best_error,
                    "Center search converged"
                );
                status = SearchStatus::Converged;
                break;
            }

            current = best;
        }

        if status == SearchStatus::BudgetExhausted {
            warn!(
                iterations,
                best = ?self.best_index,
                "Iteration budget exhausted before the center stabilized"
            );
        }

        SearchOutcome {
            status,
            best: self.best_index.map(|idx| (idx, self.best_error)),
            iterations,
            candidates_scored: self.table.scored_count(),
            candidates_rejected: self.table.rejected_count(),
            best_sector_errors: self.best_index.map(|idx| self.table.sector_errors(idx)),
        }
    }
}
