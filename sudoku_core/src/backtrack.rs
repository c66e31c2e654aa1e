//! Backtracking solver: the reference brute-force DFS over `Grid`,
//! implemented against [`solution_iter`]'s generic `Solvable` search.
//! Cell-by-cell, row-major, checking local validity only; no propagation
//! beyond the direct peer-elimination `Grid::assign` already performs.
//!
//! The row/column/box duplicate check falls out by construction: a value
//! is only ever tried if it's still in the cell's candidate mask, which
//! `Grid`'s invariants already keep free of anything placed in a peer row,
//! column, or box.

use crate::bits::Mask;
use crate::grid::Grid;
use crate::observer;
use crate::stats::SolveStats;
use crate::text;
use crate::Mode;
use solution_iter::{Solvable, SolutionIterator};

impl Solvable for Grid {
    type Guess = Mask;

    fn assign(&mut self, next_idx: usize, guess: Mask) -> bool {
        Grid::assign(self, next_idx, guess).is_ok()
    }

    /// The reference solver does no logical deduction; it is a pure DFS.
    fn deduce(&mut self) -> bool {
        true
    }

    fn next_idx_to_guess(&self) -> Option<usize> {
        (0..self.len()).find(|&i| self.value_at(i).is_none())
    }

    fn guesses(&self, idx: usize) -> Vec<Mask> {
        let mask = self.cell_mask(idx);
        (0..self.n()).map(|b| 1 << b).filter(|&bit| mask & bit != 0).collect()
    }

    fn solved(&self) -> bool {
        Grid::solved(self)
    }
}

/// Runs the reference DFS from `grid`, publishing a `SOLVED` event and
/// appending to `stats` for each solution found.
pub(crate) fn solve(grid: &Grid, mode: Mode, stats: &mut SolveStats) -> Vec<Grid> {
    let mut solutions = Vec::new();
    for solution in SolutionIterator::new(grid) {
        stats.solutions_found += 1;
        stats.hypothesis_count += 1;
        stats.solution_log.push(text::format_grid(&solution.to_values(), solution.n()));
        observer::publish_solved(&solution);
        solutions.push(solution);
        if matches!(mode, Mode::First) {
            break;
        }
    }
    solutions
}
