//! Population-count table and cardinality-ordered subset enumeration.
//!
//! `N <= 25` always fits in a `u32`, so candidate masks and value-subsets
//! alike are plain `u32`s here rather than reaching for a bit-array crate.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, OnceLock};

/// A candidate mask / value-subset over `{0..N-1}`, one bit per value.
pub type Mask = u32;

/// `SUBSETS[0..2^n)` lists every non-empty subset of `{0..n-1}` exactly
/// once, sorted by ascending population count. `SUBSET_INDEX[k]` is the
/// first position in `subsets` whose popcount exceeds `k` (so
/// `subsets[SUBSET_INDEX[k-1]..SUBSET_INDEX[k]]` is exactly the subsets of
/// size `k`).
pub struct SubsetTable {
    subsets: Vec<Mask>,
    /// `index[k]` = first position with popcount `> k`, for `k` in `0..=n`.
    index: Vec<usize>,
}

impl SubsetTable {
    fn build(n: usize) -> Self {
        let total = 1usize << n;
        let mut subsets: Vec<Mask> = (1..total as u32).collect();
        subsets.sort_by_key(|m| m.count_ones());

        let mut index = vec![subsets.len(); n + 1];
        for k in 0..=n {
            index[k] = subsets.partition_point(|m| (m.count_ones() as usize) <= k);
        }

        SubsetTable { subsets, index }
    }

    /// All non-empty subsets of `{0..n-1}` with exactly `k` members, in the
    /// table's stored order.
    #[must_use]
    pub fn of_size(&self, k: usize) -> &[Mask] {
        if k == 0 || k >= self.index.len() {
            return &[];
        }
        &self.subsets[self.index[k - 1]..self.index[k]]
    }
}

static TABLES: OnceLock<Mutex<HashMap<usize, Arc<SubsetTable>>>> = OnceLock::new();

/// The process-wide subset table for order `n`, built once and shared
/// read-only afterward. Initialization is idempotent: concurrent callers
/// race harmlessly to populate the same cache entry.
#[must_use]
pub fn subset_table(n: usize) -> Arc<SubsetTable> {
    let tables = TABLES.get_or_init(|| Mutex::new(HashMap::new()));
    let mut guard = tables.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
    guard
        .entry(n)
        .or_insert_with(|| Arc::new(SubsetTable::build(n)))
        .clone()
}

/// Full candidate mask for `n` values: bits `0..n` set.
#[must_use]
pub fn full_mask(n: usize) -> Mask {
    if n == 0 {
        0
    } else {
        ((1u128 << n) - 1) as Mask
    }
}
