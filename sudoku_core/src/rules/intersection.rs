//! Intersection rule engine: box/line elimination via the symmetric
//! difference of the two sides' outside-overlap candidate unions.
//!
//! Unifies "pointing" and "claiming" in one computation: let `A` be every
//! candidate still usable in the box outside the overlap (`r1`) and `B` the
//! same for the line outside the overlap (`r2`). A value in `A \ B` is
//! absent from the line outside the overlap, so the line can only place it
//! in the overlap; eliminate it from the rest of the box too (claiming,
//! `r1`'s own copy is a no-op since the box already lacks it there). A
//! value in `B \ A` is the pointing mirror image. Values in neither or both
//! sides need no action, so `A ^ B` covers exactly the eliminable set.

use crate::bits::Mask;
use crate::errors::Contradiction;
use crate::grid::{Elimination, Grid};
use crate::observer::{self, MessageLevel};
use crate::text;

/// # Errors
/// Returns [`Contradiction`] if an elimination empties a cell's mask.
pub(crate) fn apply(grid: &mut Grid, ix: usize) -> Result<usize, Contradiction> {
    let n = grid.n();
    let (name, r1, r2) = {
        let meta = &grid.intersections()[ix];
        (meta.name.clone(), meta.r1.clone(), meta.r2.clone())
    };

    let union = |cells: &[usize]| -> Mask { cells.iter().fold(0, |acc, &c| acc | grid.cell_mask(c)) };
    let xor = union(&r1) ^ union(&r2);
    if xor == 0 {
        return Ok(0);
    }

    let will_fire = r1.iter().chain(r2.iter()).any(|&cell| grid.cell_mask(cell) & xor != 0);
    if will_fire {
        observer::publish_message(
            grid.id(),
            MessageLevel::Trace,
            format!("{name}: eliminates {} outside the overlap", text::mask_names(xor, n)),
        );
    }

    let mut count = 0;
    for &cell in r1.iter().chain(r2.iter()) {
        if grid.eliminate(cell, xor)? == Elimination::Eliminated {
            count += 1;
        }
    }
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::IntersectionKind;
    use crate::Grid as PublicGrid;

    fn first_row_intersection(grid: &PublicGrid) -> usize {
        grid.intersections()
            .iter()
            .position(|ix| ix.kind == IntersectionKind::Row)
            .unwrap()
    }

    #[test]
    fn pointing_pair_clears_the_rest_of_the_line() {
        // Box1 confines digit 9 to its Row-A cells (the intersection with
        // row A): clear everything else on row A outside the box.
        let mut grid = PublicGrid::build(&[0; 81], 3).unwrap();
        let bit: Mask = 1 << 8;
        // Clear 9 from Box1's rows B and C (cells 9..11, 12..14, 18..20, 21..23
        // i.e. rows 1..3, cols 0..3 minus row 0).
        for row in 1..3 {
            for col in 0..3 {
                grid.eliminate(row * 9 + col, bit).unwrap();
            }
        }

        let ix = first_row_intersection(&grid);
        let eliminated = apply(&mut grid, ix).unwrap();
        assert!(eliminated > 0);
        // Row A outside Box1 (cols 3..9) must have lost the candidate.
        for col in 3..9 {
            assert_eq!(grid.cell_mask(col) & bit, 0);
        }
        // Row A inside Box1 keeps it.
        for col in 0..3 {
            assert_ne!(grid.cell_mask(col) & bit, 0);
        }
    }

    #[test]
    fn claiming_clears_the_rest_of_the_box() {
        // Row A confines digit 9 to Box1's overlap cells: clear the rest of
        // Box1.
        let mut grid = PublicGrid::build(&[0; 81], 3).unwrap();
        let bit: Mask = 1 << 8;
        for col in 3..9 {
            grid.eliminate(col, bit).unwrap();
        }

        let ix = first_row_intersection(&grid);
        let eliminated = apply(&mut grid, ix).unwrap();
        assert!(eliminated > 0);
        // Box1 rows B, C (outside the overlap with row A) must have lost it.
        for row in 1..3 {
            for col in 0..3 {
                assert_eq!(grid.cell_mask(row * 9 + col) & bit, 0);
            }
        }
    }

    #[test]
    fn no_action_when_both_sides_already_agree() {
        let mut grid = PublicGrid::build(&[0; 81], 3).unwrap();
        let ix = first_row_intersection(&grid);
        assert_eq!(apply(&mut grid, ix).unwrap(), 0);
    }
}
