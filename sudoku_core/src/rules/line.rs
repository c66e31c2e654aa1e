//! Line rule engine: row-locked and column-locked propagation for a
//! single digit across the whole grid (the generalized fish family: a
//! one-row subset is a hidden single, two rows an X-wing, three a
//! swordfish, and so on).

use crate::bits::{self, Mask};
use crate::errors::Contradiction;
use crate::grid::{Elimination, Grid};
use crate::observer::{self, MessageLevel};
use crate::text;

#[derive(Clone, Copy)]
enum Direction {
    Row,
    Column,
}

fn line_cell(n: usize, line: usize, pos: usize, dir: Direction) -> usize {
    match dir {
        Direction::Row => line * n + pos,
        Direction::Column => pos * n + line,
    }
}

/// Runs both the row-direction and column-direction rule for one digit
/// (`bit` is the digit's single-bit mask): every size-1 subset runs to
/// completion before returning; anything larger returns as soon as it
/// fires so the driver can re-scan.
///
/// # Errors
/// Returns [`Contradiction`] if Hall's condition fails in either direction.
pub(crate) fn apply(grid: &mut Grid, bit: Mask) -> Result<usize, Contradiction> {
    let n = grid.n();
    let table = bits::subset_table(n);

    let mut fired_at_one = false;
    for &subset in table.of_size(1) {
        if apply_subset(grid, n, bit, subset, 1, Direction::Row)? {
            fired_at_one = true;
        }
        if apply_subset(grid, n, bit, subset, 1, Direction::Column)? {
            fired_at_one = true;
        }
    }
    if fired_at_one {
        return Ok(1);
    }

    for k in 2..=n {
        for &subset in table.of_size(k) {
            if apply_subset(grid, n, bit, subset, k, Direction::Row)? {
                return Ok(k);
            }
            if apply_subset(grid, n, bit, subset, k, Direction::Column)? {
                return Ok(k);
            }
        }
    }
    Ok(0)
}

/// `subset`'s bits are indices into the `n` lines in direction `dir`.
/// Computes the union of cross-lines holding `bit`; if that union has
/// exactly `k` members, `bit` is cleared from every other line's matching
/// cross-lines.
fn apply_subset(
    grid: &mut Grid,
    n: usize,
    bit: Mask,
    subset: Mask,
    k: usize,
    dir: Direction,
) -> Result<bool, Contradiction> {
    let lines: Vec<usize> = (0..n).filter(|i| subset & (1 << i) != 0).collect();

    let mut crossings: Mask = 0;
    for &line in &lines {
        for pos in 0..n {
            if grid.cell_mask(line_cell(n, line, pos, dir)) & bit != 0 {
                crossings |= 1 << pos;
            }
        }
    }

    if (crossings.count_ones() as usize) < k {
        return Err(Contradiction(()));
    }
    if crossings.count_ones() as usize != k {
        return Ok(false);
    }

    let other_lines: Vec<usize> = (0..n).filter(|l| !lines.contains(l)).collect();
    let will_fire = other_lines.iter().any(|&other_line| {
        (0..n).any(|pos| crossings & (1 << pos) != 0 && grid.cell_mask(line_cell(n, other_line, pos, dir)) & bit != 0)
    });
    if will_fire {
        let axis = match dir {
            Direction::Row => "rows",
            Direction::Column => "columns",
        };
        observer::publish_message(
            grid.id(),
            MessageLevel::Trace,
            format!("digit {}: {k} {axis} lock value to {k} cross-lines", text::value_name(bit_value(bit), n)),
        );
    }

    let mut fired = false;
    for &other_line in &other_lines {
        for pos in 0..n {
            if crossings & (1 << pos) != 0 {
                let cell = line_cell(n, other_line, pos, dir);
                if grid.eliminate(cell, bit)? == Elimination::Eliminated {
                    fired = true;
                }
            }
        }
    }
    Ok(fired)
}

fn bit_value(bit: Mask) -> usize {
    bit.trailing_zeros() as usize + 1
}
