//! Elimination driver: drives the region, line, and intersection rule
//! engines to a fixed point, falling back to recursive hypothesis
//! (guess-and-recurse on a cloned grid) when no rule can progress.

use crate::errors::Contradiction;
use crate::grid::Grid;
use crate::observer::{self, MessageLevel};
use crate::rules::{intersection, line, region};
use crate::stats::SolveStats;
use crate::text;
use crate::Mode;

/// Runs the driver to completion from the root grid. Returns every
/// solution found (one if `mode` is [`Mode::First`]); a root-level
/// contradiction (invalid input, not a rejected hypothesis) propagates as
/// `Err`.
///
/// # Errors
/// Returns [`Contradiction`] if the root grid itself is logically invalid.
pub(crate) fn solve(grid: &mut Grid, mode: Mode, stats: &mut SolveStats) -> Result<Vec<Grid>, Contradiction> {
    run(grid, 0, mode, stats)
}

fn run(grid: &mut Grid, depth: usize, mode: Mode, stats: &mut SolveStats) -> Result<Vec<Grid>, Contradiction> {
    propagate(grid, depth, stats)?;
    stats.max_recursion_depth = stats.max_recursion_depth.max(depth);
    observer::publish_change(grid);

    if grid.solved() {
        stats.solutions_found += 1;
        stats.solution_log.push(text::format_grid(&grid.to_values(), grid.n()));
        observer::publish_solved(grid);
        return Ok(vec![grid.clone()]);
    }

    let idx = pick_hypothesis_cell(grid).expect("an unsolved grid always has a cell with >=2 candidates");
    let mask = grid.cell_mask(idx);
    let mut solutions = Vec::new();
    let mut remaining = mask;
    while remaining != 0 {
        let bit = remaining & remaining.wrapping_neg();
        remaining &= remaining - 1;

        let mut branch = grid.copy();
        stats.hypothesis_count += 1;
        if branch.assign(idx, bit).is_err() {
            observer::publish_message(
                branch.id(),
                MessageLevel::Info,
                format!("{} <> {}: incorrect guess", grid.cell_name(idx), text::value_name(bit_value(bit), grid.n())),
            );
            continue;
        }

        match run(&mut branch, depth + 1, mode, stats) {
            Ok(found) => {
                solutions.extend(found);
                if matches!(mode, Mode::First) && !solutions.is_empty() {
                    return Ok(solutions);
                }
            }
            Err(Contradiction(())) => {
                observer::publish_message(
                    branch.id(),
                    MessageLevel::Info,
                    format!("{} = {}: incorrect guess", grid.cell_name(idx), text::value_name(bit_value(bit), grid.n())),
                );
            }
        }
    }
    Ok(solutions)
}

fn bit_value(bit: u32) -> usize {
    bit.trailing_zeros() as usize + 1
}

/// Drives regions, lines, and intersections to a fixed point, repeating
/// the three passes while any of them made progress.
fn propagate(grid: &mut Grid, depth: usize, stats: &mut SolveStats) -> Result<(), Contradiction> {
    loop {
        let mut progressed = false;
        if run_regions(grid, depth, stats)? {
            progressed = true;
        }
        if run_lines(grid, depth, stats)? {
            progressed = true;
        }
        if run_intersections(grid, depth, stats)? {
            progressed = true;
        }
        if !progressed {
            return Ok(());
        }
    }
}

/// Scans regions in stored order; any firing restarts the scan from the
/// top so a fresh deduction is always re-driven against the whole grid
/// before moving on.
fn run_regions(grid: &mut Grid, depth: usize, stats: &mut SolveStats) -> Result<bool, Contradiction> {
    let mut any = false;
    'outer: loop {
        for r in 0..grid.regions().len() {
            if grid.region_changed(r) {
                grid.clear_region_changed(r);
                if region::apply(grid, r)? > 0 {
                    stats.record_rule(depth);
                    any = true;
                    continue 'outer;
                }
            }
        }
        return Ok(any);
    }
}

/// Scans digits `1..=N`; any firing restarts the scan, mirroring the
/// region retry policy above.
fn run_lines(grid: &mut Grid, depth: usize, stats: &mut SolveStats) -> Result<bool, Contradiction> {
    let n = grid.n();
    let mut any = false;
    'outer: loop {
        for v in 1..=n {
            let bit = 1 << (v - 1);
            if line::apply(grid, bit)? > 0 {
                stats.record_rule(depth);
                any = true;
                continue 'outer;
            }
        }
        return Ok(any);
    }
}

/// One pass over changed intersections; does not restart, feeding
/// straight back into the outer fixed-point loop instead.
fn run_intersections(grid: &mut Grid, depth: usize, stats: &mut SolveStats) -> Result<bool, Contradiction> {
    let mut any = false;
    for ix in 0..grid.intersections().len() {
        if grid.intersection_changed(ix) {
            grid.clear_intersection_changed(ix);
            if intersection::apply(grid, ix)? > 0 {
                stats.record_rule(depth);
                any = true;
            }
        }
    }
    Ok(any)
}

/// The unsolved cell with the fewest candidates (ties broken by scan
/// order), short-circuiting as soon as a 2-candidate cell turns up since
/// nothing can beat it.
fn pick_hypothesis_cell(grid: &Grid) -> Option<usize> {
    let mut best: Option<(usize, u32)> = None;
    for idx in 0..grid.len() {
        let count = grid.cell_mask(idx).count_ones();
        if count < 2 {
            continue;
        }
        if count == 2 {
            return Some(idx);
        }
        if best.map_or(true, |(_, best_count)| count < best_count) {
            best = Some((idx, count));
        }
    }
    best.map(|(idx, _)| idx)
}
