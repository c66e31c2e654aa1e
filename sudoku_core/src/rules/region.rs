//! Region rule engine: candidate-exclusion and value-exclusion over
//! subset enumeration inside one region.

use crate::bits::{self, Mask};
use crate::errors::Contradiction;
use crate::grid::{Elimination, Grid};
use crate::observer::{self, MessageLevel};
use crate::text;

/// Runs both Hall-condition rules for `region_idx`: size-1 subsets
/// (naked/hidden singles) always run to completion before returning; any
/// larger subset that fires returns immediately so the driver can re-scan
/// from the top.
///
/// Returns the largest subset size at which something fired, or `0` if
/// nothing did.
///
/// # Errors
/// Returns [`Contradiction`] if Hall's condition fails for any subset, or a
/// clearing empties a cell's mask.
pub(crate) fn apply(grid: &mut Grid, region_idx: usize) -> Result<usize, Contradiction> {
    let n = grid.n();
    let cells = grid.regions()[region_idx].cells.clone();
    let region_name = grid.regions()[region_idx].name.clone();
    let table = bits::subset_table(n);

    let mut fired_at_one = false;
    for &subset in table.of_size(1) {
        if apply_subset(grid, &cells, &region_name, n, subset, 1)? {
            fired_at_one = true;
        }
    }
    if fired_at_one {
        return Ok(1);
    }

    for k in 2..=n {
        for &subset in table.of_size(k) {
            if apply_subset(grid, &cells, &region_name, n, subset, k)? {
                return Ok(k);
            }
        }
    }
    Ok(0)
}

/// `subset`'s bits are positions `0..n` into `cells`. Runs both rules for
/// this one subset and returns whether either cleared a candidate.
fn apply_subset(
    grid: &mut Grid,
    cells: &[usize],
    region_name: &str,
    n: usize,
    subset: Mask,
    k: usize,
) -> Result<bool, Contradiction> {
    let mut fired = false;

    // Candidate-exclusion (direct Hall): subset as a set of cells.
    let mut values: Mask = 0;
    for i in 0..n {
        if subset & (1 << i) != 0 {
            values |= grid.cell_mask(cells[i]);
        }
    }
    if (values.count_ones() as usize) < k {
        return Err(Contradiction(()));
    }
    if values.count_ones() as usize == k {
        let will_fire = (0..n).any(|i| subset & (1 << i) == 0 && grid.cell_mask(cells[i]) & values != 0);
        if will_fire {
            observer::publish_message(
                grid.id(),
                MessageLevel::Trace,
                format!("{region_name}: {k} cells confine values {} (candidate-exclusion)", text::mask_names(values, n)),
            );
        }
        for i in 0..n {
            if subset & (1 << i) == 0 && grid.eliminate(cells[i], values)? == Elimination::Eliminated {
                fired = true;
            }
        }
    }

    // Value-exclusion (dual Hall): subset as a set of values.
    let matching: Vec<usize> = (0..n).filter(|&i| grid.cell_mask(cells[i]) & subset != 0).collect();
    if subset.count_ones() as usize > matching.len() {
        return Err(Contradiction(()));
    }
    if subset.count_ones() as usize == matching.len() {
        let to_clear = bits::full_mask(n) & !subset;
        let will_fire = matching.iter().any(|&i| grid.cell_mask(i) & to_clear != 0);
        if will_fire {
            observer::publish_message(
                grid.id(),
                MessageLevel::Trace,
                format!("{region_name}: values {} confined to {k} cells (value-exclusion)", text::mask_names(subset, n)),
            );
        }
        for &i in &matching {
            if grid.eliminate(cells[i], to_clear)? == Elimination::Eliminated {
                fired = true;
            }
        }
    }

    Ok(fired)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Grid as PublicGrid;

    fn region_index_for_cell(grid: &PublicGrid, idx: usize, kind: crate::grid::RegionKind) -> usize {
        grid.regions()
            .iter()
            .position(|r| r.kind == kind && r.cells.contains(&idx))
            .unwrap()
    }

    #[test]
    fn naked_single_clears_peers_in_region() {
        // Narrow cell 8 (row A, col i) down to a single candidate (9) by
        // hand, leaving its row peers untouched and still full, so the
        // region rule itself (not `Grid::build`'s own given-cascade) is
        // what has to propagate the naked single to its row.
        let mut grid = PublicGrid::build(&[0; 81], 3).unwrap();
        let row = region_index_for_cell(&grid, 8, crate::grid::RegionKind::Row);
        let cells = grid.regions()[row].cells.clone();
        grid.eliminate(8, bits::full_mask(9) & !(1 << 8)).unwrap();

        let k = apply(&mut grid, row).unwrap();
        assert_eq!(k, 1);
        assert_eq!(grid.value_at(8), Some(9));
        for &c in &cells {
            if c != 8 {
                assert_eq!(grid.cell_mask(c) & (1 << 8), 0, "peer {c} should have lost candidate 9");
            }
        }
    }

    #[test]
    fn hidden_single_is_detected() {
        // In an otherwise empty row, restrict value 9 to exactly one cell by
        // hand-clearing the candidate everywhere else in the row.
        let mut grid = PublicGrid::build(&[0; 81], 3).unwrap();
        let row = region_index_for_cell(&grid, 0, crate::grid::RegionKind::Row);
        let cells = grid.regions()[row].cells.clone();
        for &c in &cells[1..] {
            grid.eliminate(c, 1 << 8).unwrap();
        }
        let k = apply(&mut grid, row).unwrap();
        assert_eq!(k, 1);
        assert_eq!(grid.value_at(cells[0]), Some(9));
    }

    #[test]
    fn a_firing_rule_publishes_a_trace_message() {
        use std::sync::atomic::{AtomicBool, Ordering};
        use std::sync::Arc;

        crate::clear_all();
        let saw_trace = Arc::new(AtomicBool::new(false));
        let saw_trace2 = Arc::clone(&saw_trace);
        crate::on_message(Arc::new(move |level, _text| {
            if level == crate::MessageLevel::Trace {
                saw_trace2.store(true, Ordering::SeqCst);
            }
        }));

        let mut grid = PublicGrid::build(&[0; 81], 3).unwrap();
        let row = region_index_for_cell(&grid, 8, crate::grid::RegionKind::Row);
        grid.eliminate(8, bits::full_mask(9) & !(1 << 8)).unwrap();
        apply(&mut grid, row).unwrap();

        assert!(saw_trace.load(Ordering::SeqCst));
        crate::clear_all();
    }

    #[test]
    fn hall_violation_is_a_contradiction() {
        // Two cells restricted to the very same single value is impossible.
        let mut grid = PublicGrid::build(&[0; 81], 3).unwrap();
        let row = region_index_for_cell(&grid, 0, crate::grid::RegionKind::Row);
        let cells = grid.regions()[row].cells.clone();
        for &c in &cells[2..] {
            grid.eliminate(c, bits::full_mask(9) & !1).unwrap();
        }
        // Now seven cells are all narrowed to the same singleton {1}; the
        // first one to be processed as a naked single clears value 1 from
        // the rest, instantly emptying their already-singleton masks.
        assert!(apply(&mut grid, row).is_err());
    }
}
