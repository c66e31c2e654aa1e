//! The public entry point: `solve(initial, method, mode)`, plus a
//! `count_solutions` helper for bounded solution counting.

use crate::errors::GridError;
use crate::grid::Grid;
use crate::observer;
use crate::stats::SolveStats;
use crate::text;
use crate::{backtrack, driver, exact_cover};

/// Which solving strategy to run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Method {
    /// The constraint-propagation driver, falling back to hypothesis when
    /// stuck.
    Elimination,
    /// The reference brute-force DFS.
    Backtracking,
    /// The Dancing-Links exact-cover encoding.
    ExactCover,
}

/// Whether to stop at the first solution or enumerate every one.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    /// Stop as soon as one solution is found.
    First,
    /// Keep searching, accumulating every solution.
    All,
}

/// The method that actually terminated the search: elimination promotes
/// to `Backtracking` when it had to fall back to hypothesis.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MethodUsed {
    /// Elimination solved the grid without ever guessing.
    EliminationOnly,
    /// Elimination guessed at least once, or `Method::Backtracking` was
    /// requested directly.
    Backtracking,
    /// `Method::ExactCover` was requested.
    ExactCover,
}

/// The full result of a [`solve`] call: every solution found (one, unless
/// `mode` was [`Mode::All`]), which method actually terminated, and the
/// accumulated [`SolveStats`].
#[derive(Clone, Debug)]
pub struct SolveOutcome {
    /// `None` if the input was invalid or had no solution.
    pub method_used: Option<MethodUsed>,
    /// Every solution found, in discovery order.
    pub solutions: Vec<Grid>,
    /// Counters and trace accumulated while solving.
    pub stats: SolveStats,
}

impl SolveOutcome {
    /// The process exit code contract: `0` no solution, `1` elimination
    /// solved without hypothesis, `2` elimination required hypothesis (or
    /// pure backtracking), `3` exact cover.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self.method_used {
            None => 0,
            Some(MethodUsed::EliminationOnly) => 1,
            Some(MethodUsed::Backtracking) => 2,
            Some(MethodUsed::ExactCover) => 3,
        }
    }
}

/// Builds a grid from `initial` (row-major, `0` for empty) and runs `method`
/// to termination under `mode`, firing the `INIT` event immediately after
/// the grid is built.
///
/// Returns a [`SolveOutcome`] with `method_used = None` on invalid input;
/// there is no separate error type here, since invalid input collapses
/// into the same `NONE` result as "no solution exists".
#[must_use]
pub fn solve(initial: &[usize], s: usize, method: Method, mode: Mode) -> SolveOutcome {
    let mut stats = SolveStats::default();
    let Ok(mut grid) = Grid::build(initial, s) else {
        return SolveOutcome { method_used: None, solutions: Vec::new(), stats };
    };
    observer::publish_init(&grid);

    match method {
        Method::Elimination => match driver::solve(&mut grid, mode, &mut stats) {
            Ok(solutions) if !solutions.is_empty() => {
                let used = if stats.hypothesis_count > 0 { MethodUsed::Backtracking } else { MethodUsed::EliminationOnly };
                SolveOutcome { method_used: Some(used), solutions, stats }
            }
            _ => SolveOutcome { method_used: None, solutions: Vec::new(), stats },
        },
        Method::Backtracking => {
            let solutions = backtrack::solve(&grid, mode, &mut stats);
            if solutions.is_empty() {
                SolveOutcome { method_used: None, solutions, stats }
            } else {
                SolveOutcome { method_used: Some(MethodUsed::Backtracking), solutions, stats }
            }
        }
        Method::ExactCover => match exact_cover::solve(&grid, mode, &mut stats) {
            Ok(solutions) if !solutions.is_empty() => {
                SolveOutcome { method_used: Some(MethodUsed::ExactCover), solutions, stats }
            }
            _ => SolveOutcome { method_used: None, solutions: Vec::new(), stats },
        },
    }
}

/// Parses `repr` and solves it, combining
/// [`text::parse_grid`]'s [`crate::ParseError`] and [`solve`]'s outcome.
///
/// # Errors
/// Returns [`GridError`] if `repr` doesn't parse to a supported grid size
/// (wrapping the underlying [`crate::ParseError`] isn't needed here since
/// both failure domains collapse to the same "can't build a grid" case for
/// this convenience wrapper).
pub fn solve_str(repr: &str, method: Method, mode: Mode) -> Result<SolveOutcome, GridError> {
    let (s, values) = text::parse_grid(repr).map_err(|_| GridError::WrongCellCount)?;
    Ok(solve(&values, s, method, mode))
}

/// Counts solutions up to `max`, stopping the search early once the cap is
/// reached; useful for bounding the search on pathological grids without
/// materializing every solution.
#[must_use]
pub fn count_solutions(initial: &[usize], s: usize, max: usize) -> usize {
    let Ok(grid) = Grid::build(initial, s) else {
        return 0;
    };
    solution_iter::SolutionIterator::new(&grid).take(max).count()
}
