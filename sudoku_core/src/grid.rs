//! The cell/region/intersection grid model.
//!
//! Cyclic ownership is avoided by flattening it: cells live in one flat
//! `Vec`, and regions/intersections reference them by index rather than by
//! pointer. A hypothesis branch is then a plain value copy of the cell
//! array; the shared, read-only membership structure (`GridMeta`) is an
//! `Arc` so cloning a grid never re-derives it.

use crate::bits::Mask;
use crate::errors::{Contradiction, GridError};
use crate::observer::{self, MessageLevel};
use crate::text;
use std::fmt;
use std::ops::{BitAnd, BitAndAssign};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Tracks whether an elimination operator actually cleared a bit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Elimination {
    /// At least one candidate was cleared.
    Eliminated,
    /// Nothing changed.
    Same,
}

impl BitAnd for Elimination {
    type Output = Elimination;

    fn bitand(self, rhs: Elimination) -> Elimination {
        if self == Self::Eliminated {
            Self::Eliminated
        } else {
            rhs
        }
    }
}

impl BitAndAssign for Elimination {
    fn bitand_assign(&mut self, rhs: Self) {
        if *self != Self::Eliminated {
            *self = rhs;
        }
    }
}

/// A row, column, or box: `N` cells that must each hold a distinct value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RegionKind {
    /// A horizontal region.
    Row,
    /// A vertical region.
    Column,
    /// An `S x S` sub-square.
    Box,
}

#[derive(Clone, Debug)]
pub(crate) struct RegionMeta {
    pub(crate) kind: RegionKind,
    pub(crate) name: String,
    pub(crate) cells: Vec<usize>,
}

/// Which kind of line a box is intersected against.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IntersectionKind {
    /// Box-row intersection.
    Row,
    /// Box-column intersection.
    Column,
}

#[derive(Clone, Debug)]
pub(crate) struct IntersectionMeta {
    pub(crate) kind: IntersectionKind,
    pub(crate) name: String,
    /// The box's cells outside the overlap.
    pub(crate) r1: Vec<usize>,
    /// The line's cells outside the overlap.
    pub(crate) r2: Vec<usize>,
}

#[derive(Debug)]
struct GridMeta {
    s: usize,
    n: usize,
    regions: Vec<RegionMeta>,
    intersections: Vec<IntersectionMeta>,
    cell_regions: Vec<[usize; 3]>,
    cell_intersections: Vec<Vec<usize>>,
}

fn build_regions(s: usize, n: usize) -> (Vec<RegionMeta>, Vec<[usize; 3]>) {
    let mut regions = Vec::with_capacity(3 * n);
    let mut cell_regions = vec![[0usize; 3]; n * n];

    for r in 0..n {
        let cells: Vec<usize> = (r * n..r * n + n).collect();
        for &c in &cells {
            cell_regions[c][0] = r;
        }
        regions.push(RegionMeta {
            kind: RegionKind::Row,
            name: text::row_name(r, n),
            cells,
        });
    }
    for c in 0..n {
        let cells: Vec<usize> = (c..n * n).step_by(n).collect();
        for &idx in &cells {
            cell_regions[idx][1] = n + c;
        }
        regions.push(RegionMeta {
            kind: RegionKind::Column,
            name: text::col_name(c, n),
            cells,
        });
    }
    for b in 0..n {
        let box_row = b / s;
        let box_col = b % s;
        let mut cells = Vec::with_capacity(n);
        for dy in 0..s {
            for dx in 0..s {
                cells.push((box_row * s + dy) * n + box_col * s + dx);
            }
        }
        for &idx in &cells {
            cell_regions[idx][2] = 2 * n + b;
        }
        regions.push(RegionMeta {
            kind: RegionKind::Box,
            name: format!("Box{}", b + 1),
            cells,
        });
    }

    (regions, cell_regions)
}

fn build_intersections(s: usize, n: usize) -> (Vec<IntersectionMeta>, Vec<Vec<usize>>) {
    let mut intersections = Vec::with_capacity(2 * n * s);
    let mut cell_intersections = vec![Vec::new(); n * n];

    // Row-type: one per (box, row-within-box).
    for b in 0..n {
        let box_row = b / s;
        let box_col = b % s;
        for dy in 0..s {
            let row = box_row * s + dy;
            let mut r1 = Vec::with_capacity(n - s);
            for dy2 in 0..s {
                if dy2 == dy {
                    continue;
                }
                for dx in 0..s {
                    r1.push((box_row * s + dy2) * n + box_col * s + dx);
                }
            }
            let mut r2 = Vec::with_capacity(n - s);
            for col in 0..n {
                if col >= box_col * s && col < box_col * s + s {
                    continue;
                }
                r2.push(row * n + col);
            }

            let idx = intersections.len();
            for &cell in r1.iter().chain(r2.iter()) {
                cell_intersections[cell].push(idx);
            }
            intersections.push(IntersectionMeta {
                kind: IntersectionKind::Row,
                name: format!("Box{}Row{}", b + 1, text::row_name(row, n)),
                r1,
                r2,
            });
        }
    }

    // Column-type: one per (box, column-within-box).
    for b in 0..n {
        let box_row = b / s;
        let box_col = b % s;
        for dx in 0..s {
            let col = box_col * s + dx;
            let mut r1 = Vec::with_capacity(n - s);
            for dx2 in 0..s {
                if dx2 == dx {
                    continue;
                }
                for dy in 0..s {
                    r1.push((box_row * s + dy) * n + box_col * s + dx2);
                }
            }
            let mut r2 = Vec::with_capacity(n - s);
            for row in 0..n {
                if row >= box_row * s && row < box_row * s + s {
                    continue;
                }
                r2.push(row * n + col);
            }

            let idx = intersections.len();
            for &cell in r1.iter().chain(r2.iter()) {
                cell_intersections[cell].push(idx);
            }
            intersections.push(IntersectionMeta {
                kind: IntersectionKind::Column,
                name: format!("Box{}Col{}", b + 1, text::col_name(col, n)),
                r1,
                r2,
            });
        }
    }

    (intersections, cell_intersections)
}

#[derive(Clone, Debug)]
struct Cell {
    mask: Mask,
    name: String,
    given: bool,
}

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

/// A sudoku grid: cells, the regions and intersections that constrain them,
/// and the dirty flags the rule engines use to avoid re-scanning unchanged
/// state.
#[derive(Clone)]
pub struct Grid {
    id: u64,
    cells: Vec<Cell>,
    region_changed: Vec<bool>,
    intersection_changed: Vec<bool>,
    meta: Arc<GridMeta>,
}

impl fmt::Debug for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Grid")
            .field("id", &self.id)
            .field("n", &self.meta.n)
            .field("values", &self.to_values())
            .finish()
    }
}

impl Grid {
    /// Builds a grid from a flat `N*N` row-major array of givens (`0` for
    /// empty), propagating the givens' peer-eliminations immediately.
    ///
    /// # Errors
    /// Returns [`GridError`] if `s` is unsupported, `given` isn't `N*N`
    /// long, a value is out of range, or the givens are mutually
    /// contradictory (e.g. two equal values sharing a region).
    pub fn build(given: &[usize], s: usize) -> Result<Self, GridError> {
        if !(2..=5).contains(&s) {
            return Err(GridError::UnsupportedOrder);
        }
        let n = s * s;
        if given.len() != n * n {
            return Err(GridError::WrongCellCount);
        }
        if given.iter().any(|&v| v > n) {
            return Err(GridError::ValueOutOfRange);
        }

        let (regions, cell_regions) = build_regions(s, n);
        let (intersections, cell_intersections) = build_intersections(s, n);
        let meta = Arc::new(GridMeta {
            s,
            n,
            regions,
            intersections,
            cell_regions,
            cell_intersections,
        });

        let full = crate::bits::full_mask(n);
        let cells = (0..n * n)
            .map(|idx| {
                let row = idx / n;
                let col = idx % n;
                let given_value = given[idx];
                Cell {
                    mask: if given_value == 0 {
                        full
                    } else {
                        1 << (given_value - 1)
                    },
                    name: text::cell_name(row, col, n),
                    given: given_value != 0,
                }
            })
            .collect();

        let mut grid = Grid {
            id: NEXT_ID.fetch_add(1, Ordering::Relaxed),
            cells,
            region_changed: vec![true; 3 * n],
            intersection_changed: vec![true; 2 * n * s],
            meta,
        };

        for idx in 0..grid.len() {
            if grid.cells[idx].given {
                let value = grid.cells[idx].mask;
                grid.assign(idx, value)?;
            }
        }

        Ok(grid)
    }

    /// Deep copy for a hypothesis branch. Cheap: the only owned data is the
    /// flat cell array and the change-flag vectors; the membership metadata
    /// is shared through the `Arc`.
    #[must_use]
    pub fn copy(&self) -> Self {
        Grid {
            id: NEXT_ID.fetch_add(1, Ordering::Relaxed),
            cells: self.cells.clone(),
            region_changed: self.region_changed.clone(),
            intersection_changed: self.intersection_changed.clone(),
            meta: Arc::clone(&self.meta),
        }
    }

    /// Number of cells, i.e. `N*N`.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// `false` only for the degenerate zero-order case, which never occurs
    /// for a grid built through [`Grid::build`].
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// This grid's identifier, used to tag observer events.
    #[must_use]
    pub fn id(&self) -> u64 {
        self.id
    }

    /// The order `S`.
    #[must_use]
    pub fn s(&self) -> usize {
        self.meta.s
    }

    /// The side length `N = S^2`.
    #[must_use]
    pub fn n(&self) -> usize {
        self.meta.n
    }

    /// Current candidate mask at `idx`.
    #[must_use]
    pub fn cell_mask(&self, idx: usize) -> Mask {
        self.cells[idx].mask
    }

    /// Whether `idx` was supplied in the original input.
    #[must_use]
    pub fn is_given(&self, idx: usize) -> bool {
        self.cells[idx].given
    }

    /// The cell's display name, e.g. `"Ab"`.
    #[must_use]
    pub fn cell_name(&self, idx: usize) -> &str {
        &self.cells[idx].name
    }

    /// Number of cells whose mask doesn't have population 1.
    #[must_use]
    pub fn empty_count(&self) -> usize {
        self.cells.iter().filter(|c| c.mask.count_ones() != 1).count()
    }

    /// `N*N - empty_count()`.
    #[must_use]
    pub fn solved_count(&self) -> usize {
        self.len() - self.empty_count()
    }

    /// A grid is solved when every cell has exactly one candidate. The
    /// no-peer-collision half of that invariant is maintained by every
    /// elimination operator, so checking mask population alone suffices.
    #[must_use]
    pub fn solved(&self) -> bool {
        self.empty_count() == 0
    }

    /// The current value at `idx`, or `None` if it isn't solved yet.
    #[must_use]
    pub fn value_at(&self, idx: usize) -> Option<usize> {
        let mask = self.cells[idx].mask;
        (mask.count_ones() == 1).then(|| mask.trailing_zeros() as usize + 1)
    }

    /// Flat row-major values, `0` for still-unsolved cells.
    #[must_use]
    pub fn to_values(&self) -> Vec<usize> {
        (0..self.len()).map(|i| self.value_at(i).unwrap_or(0)).collect()
    }

    /// The `N x N x N` candidate cube: `payload[r][c][v-1]` is `v` if `v`
    /// is still a candidate at `(r, c)`, else `0`.
    #[must_use]
    pub fn event_payload(&self) -> Vec<Vec<Vec<usize>>> {
        let n = self.n();
        (0..n)
            .map(|r| {
                (0..n)
                    .map(|c| {
                        let mask = self.cells[r * n + c].mask;
                        (1..=n)
                            .map(|v| if mask & (1 << (v - 1)) != 0 { v } else { 0 })
                            .collect()
                    })
                    .collect()
            })
            .collect()
    }

    pub(crate) fn regions(&self) -> &[RegionMeta] {
        &self.meta.regions
    }

    pub(crate) fn intersections(&self) -> &[IntersectionMeta] {
        &self.meta.intersections
    }

    pub(crate) fn region_changed(&self, r: usize) -> bool {
        self.region_changed[r]
    }

    pub(crate) fn clear_region_changed(&mut self, r: usize) {
        self.region_changed[r] = false;
    }

    pub(crate) fn intersection_changed(&self, idx: usize) -> bool {
        self.intersection_changed[idx]
    }

    pub(crate) fn clear_intersection_changed(&mut self, idx: usize) {
        self.intersection_changed[idx] = false;
    }

    fn on_cell_mutated(&mut self, idx: usize) {
        let regions = self.meta.cell_regions[idx];
        for r in regions {
            self.region_changed[r] = true;
        }
        for &ix in &self.meta.cell_intersections[idx] {
            self.intersection_changed[ix] = true;
        }
        if self.cells[idx].mask.count_ones() == 1 {
            let value = self.cells[idx].mask.trailing_zeros() as usize + 1;
            observer::publish_message(
                self.id,
                MessageLevel::Detail,
                format!("{} = {}", self.cells[idx].name, text::value_name(value, self.meta.n)),
            );
        }
    }

    /// Assigns `value` (a singleton mask) at `idx` and clears it from every
    /// peer in `idx`'s row, column, and box.
    ///
    /// # Errors
    /// Returns [`Contradiction`] if clearing a peer's last candidate empties
    /// its mask.
    pub(crate) fn assign(&mut self, idx: usize, value: Mask) -> Result<Elimination, Contradiction> {
        debug_assert_eq!(value.count_ones(), 1);
        self.cells[idx].mask = value;
        self.on_cell_mutated(idx);

        let mut ret = Elimination::Same;
        let region_ids = self.meta.cell_regions[idx];
        for r in region_ids {
            let cells = self.meta.regions[r].cells.clone();
            for peer in cells {
                if peer != idx {
                    ret &= self.eliminate(peer, value)?;
                }
            }
        }
        Ok(ret)
    }

    /// Clears every bit of `value` from the mask at `idx`.
    ///
    /// # Errors
    /// Returns [`Contradiction`] if the mask becomes empty.
    pub(crate) fn eliminate(&mut self, idx: usize, value: Mask) -> Result<Elimination, Contradiction> {
        if self.cells[idx].mask & value == 0 {
            return Ok(Elimination::Same);
        }
        self.cells[idx].mask &= !value;
        if self.cells[idx].mask == 0 {
            return Err(Contradiction(()));
        }
        self.on_cell_mutated(idx);
        Ok(Elimination::Eliminated)
    }
}
