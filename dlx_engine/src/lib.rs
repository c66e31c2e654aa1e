//! A generic Dancing Links (Algorithm X) exact-cover solver.
//!
//! This is the "external Dancing Links library" that a constraint-propagation
//! engine delegates to once a problem has been encoded as an exact cover: a
//! universe of columns that must each be covered exactly once by a selection
//! of rows. The encoding itself (turning a specific puzzle into columns and
//! rows) is the caller's job; this crate only knows about columns, rows, and
//! Knuth's covering algorithm.
//!
//! The implementation follows the classic circular doubly linked list of
//! `Node`s threaded through the universe (four links per node: left, right,
//! up, down), with column headers kept in their own circular list off a
//! sentinel root. Covering a column splices it and every row that intersects
//! it out of the matrix in O(1) per node; uncovering reverses the splice
//! exactly, which is what lets the search backtrack without rebuilding
//! anything.

use std::fmt;

/// A problem that can be phrased as an exact cover: select some subset of
/// `rows()` such that every column in `0..num_columns()` is covered by
/// exactly one selected row.
pub trait ExactCover {
    /// Caller-chosen label carried by each row, returned back when a row is
    /// selected by the solver. For a sudoku encoding this is typically the
    /// `(row, col, value)` triple the row represents.
    type Label: Copy;

    /// Number of columns in the universe.
    fn num_columns(&self) -> usize;

    /// All candidate rows, each as a label plus the (0-indexed) columns it
    /// covers. A row must cover at least one column.
    fn rows(&self) -> Vec<(Self::Label, Vec<usize>)>;
}

/// Failure covering a row outright (used for pre-covering given cells before
/// search starts). Indicates the row shares a column with one that is
/// already covered, i.e. the underlying puzzle is contradictory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Conflict;

impl fmt::Display for Conflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "row conflicts with an already-covered column")
    }
}

impl std::error::Error for Conflict {}

const ROOT: usize = 0;

/// The dancing-links matrix for one exact-cover problem.
struct DlxMatrix<L> {
    left: Vec<usize>,
    right: Vec<usize>,
    up: Vec<usize>,
    down: Vec<usize>,
    /// Column header a node belongs to. For header nodes this is the node's
    /// own index.
    column_of: Vec<usize>,
    /// Live node count per column header, indexed by column header id.
    size: Vec<usize>,
    /// Whether a column header is still spliced into the root's row.
    active: Vec<bool>,
    /// First node of each row, indexed by row id, used by `pre_cover`.
    row_start: Vec<usize>,
    /// Row id a node belongs to (meaningless for header/root nodes).
    row_of: Vec<usize>,
    row_labels: Vec<L>,
}

impl<L: Copy> DlxMatrix<L> {
    fn build<E: ExactCover<Label = L>>(problem: &E) -> Self {
        let num_columns = problem.num_columns();
        let rows = problem.rows();
        let body_len: usize = rows.iter().map(|(_, cols)| cols.len()).sum();
        let capacity = 1 + num_columns + body_len;

        let mut m = DlxMatrix {
            left: vec![0; capacity],
            right: vec![0; capacity],
            up: vec![0; capacity],
            down: vec![0; capacity],
            column_of: vec![0; capacity],
            size: vec![0; num_columns + 1],
            active: vec![true; num_columns + 1],
            row_start: vec![0; rows.len()],
            row_of: vec![0; capacity],
            row_labels: Vec::with_capacity(rows.len()),
        };

        // Header row: root plus one header node per column, linked in a circle.
        for c in 1..=num_columns {
            m.left[c] = if c == 1 { ROOT } else { c - 1 };
            m.right[c] = if c == num_columns { ROOT } else { c + 1 };
            m.up[c] = c;
            m.down[c] = c;
            m.column_of[c] = c;
        }
        if num_columns > 0 {
            m.left[ROOT] = num_columns;
            m.right[ROOT] = 1;
        } else {
            m.left[ROOT] = ROOT;
            m.right[ROOT] = ROOT;
        }

        let mut next = num_columns + 1;
        for (row_id, (label, cols)) in rows.into_iter().enumerate() {
            m.row_labels.push(label);
            if cols.is_empty() {
                log::error!("row {row_id} covers no columns; ExactCover::rows() should never yield one");
            }
            let mut first = None;
            let mut prev = None;
            for col in cols {
                let header = col + 1;
                let node = next;
                next += 1;

                m.column_of[node] = header;
                m.row_of[node] = row_id;

                let last = m.up[header];
                m.up[node] = last;
                m.down[node] = header;
                m.down[last] = node;
                m.up[header] = node;
                m.size[header] += 1;

                if let Some(p) = prev {
                    m.left[node] = p;
                    m.right[p] = node;
                } else {
                    first = Some(node);
                }
                prev = Some(node);
            }
            if let (Some(first), Some(last)) = (first, prev) {
                m.left[first] = last;
                m.right[last] = first;
                m.row_start[row_id] = first;
            }
        }

        m
    }

    fn cover(&mut self, c: usize) {
        self.right[self.left[c]] = self.right[c];
        self.left[self.right[c]] = self.left[c];
        self.active[c] = false;

        let mut i = self.down[c];
        while i != c {
            let mut j = self.right[i];
            while j != i {
                self.down[self.up[j]] = self.down[j];
                self.up[self.down[j]] = self.up[j];
                self.size[self.column_of[j]] -= 1;
                j = self.right[j];
            }
            i = self.down[i];
        }
    }

    fn uncover(&mut self, c: usize) {
        let mut i = self.up[c];
        while i != c {
            let mut j = self.left[i];
            while j != i {
                self.size[self.column_of[j]] += 1;
                self.down[self.up[j]] = j;
                self.up[self.down[j]] = j;
                j = self.left[j];
            }
            i = self.up[i];
        }
        self.right[self.left[c]] = c;
        self.left[self.right[c]] = c;
        self.active[c] = true;
    }

    /// Covers every column of `row_id` outright, as if the search had chosen
    /// it, without recursing. Used to commit to given cells before search
    /// explores the rest of the puzzle.
    fn pre_cover(&mut self, row_id: usize) -> Result<(), Conflict> {
        let start = self.row_start[row_id];
        let mut j = start;
        loop {
            if !self.active[self.column_of[j]] {
                return Err(Conflict);
            }
            j = self.right[j];
            if j == start {
                break;
            }
        }

        let mut j = start;
        loop {
            self.cover(self.column_of[j]);
            j = self.right[j];
            if j == start {
                break;
            }
        }
        Ok(())
    }

    /// The column with fewest live rows among those still uncovered, or
    /// `None` if every column is already covered (the matrix is solved).
    fn choose_column(&self) -> Option<usize> {
        let mut c = self.right[ROOT];
        if c == ROOT {
            return None;
        }
        let mut best = c;
        let mut best_size = self.size[c];
        let mut j = self.right[c];
        while j != ROOT {
            if self.size[j] < best_size {
                best = j;
                best_size = self.size[j];
            }
            j = self.right[j];
        }
        Some(best)
    }

    /// Depth-first Algorithm X search. Returns `true` once `results` has
    /// reached `limit` solutions, signalling the caller to stop unwinding.
    fn search(&mut self, partial: &mut Vec<L>, results: &mut Vec<Vec<L>>, limit: usize) -> bool {
        let Some(c) = self.choose_column() else {
            results.push(partial.clone());
            return results.len() >= limit;
        };

        if self.size[c] == 0 {
            return false;
        }

        self.cover(c);
        let mut r = self.down[c];
        let mut stop = false;
        while r != c && !stop {
            let mut j = self.right[r];
            while j != r {
                self.cover(self.column_of[j]);
                j = self.right[j];
            }

            partial.push(self.row_labels[self.row_of[r]]);
            stop = self.search(partial, results, limit);
            partial.pop();

            let mut j = self.left[r];
            while j != r {
                self.uncover(self.column_of[j]);
                j = self.left[j];
            }
            r = self.down[r];
        }
        self.uncover(c);
        stop
    }
}

/// Finds one exact cover, if any exists.
pub fn solve_first<E: ExactCover>(problem: &E) -> Option<Vec<E::Label>> {
    let mut matrix = DlxMatrix::build(problem);
    let mut results = Vec::new();
    let mut partial = Vec::new();
    matrix.search(&mut partial, &mut results, 1);
    results.into_iter().next()
}

/// Finds up to `limit` distinct exact covers.
pub fn solve_all<E: ExactCover>(problem: &E, limit: usize) -> Vec<Vec<E::Label>> {
    let mut matrix = DlxMatrix::build(problem);
    let mut results = Vec::new();
    let mut partial = Vec::new();
    matrix.search(&mut partial, &mut results, limit);
    results
}

/// Pre-covers `given_rows` (by index into [`ExactCover::rows`]) and then
/// searches for up to `limit` exact covers of what remains. `given_rows`'
/// labels are not repeated in the returned solutions; the caller already
/// knows it selected them.
///
/// # Errors
/// Returns [`Conflict`] if two given rows cover the same column.
pub fn solve_with_givens<E: ExactCover>(
    problem: &E,
    given_rows: &[usize],
    limit: usize,
) -> Result<Vec<Vec<E::Label>>, Conflict> {
    let mut matrix = DlxMatrix::build(problem);
    for &row in given_rows {
        matrix.pre_cover(row)?;
    }
    let mut results = Vec::new();
    let mut partial = Vec::new();
    matrix.search(&mut partial, &mut results, limit);
    Ok(results)
}
