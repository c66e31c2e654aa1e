//! The observer bus: grid-event fan-out plus a separate human-readable
//! message channel. Process-wide and single-threaded: concurrent solving
//! of multiple puzzles isn't supported, so a global `Mutex`-guarded bus
//! (rather than a context threaded through every call) is the right shape.

use crate::grid::Grid;
use std::sync::{Arc, Mutex, OnceLock};

/// The three moments the elimination driver and exact-cover encoder
/// publish a grid snapshot at.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EventKind {
    /// The grid was just built from its givens.
    Init,
    /// One or more cells were mutated.
    Change,
    /// The grid reached a full solution.
    Solved,
}

impl EventKind {
    fn bit(self) -> u8 {
        match self {
            EventKind::Init => 0b001,
            EventKind::Change => 0b010,
            EventKind::Solved => 0b100,
        }
    }
}

/// A bitmask of [`EventKind`]s, used to register or remove sinks for more
/// than one kind at once.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EventKinds(u8);

impl EventKinds {
    /// Only [`EventKind::Init`].
    pub const INIT: EventKinds = EventKinds(EventKind::Init.bit());
    /// Only [`EventKind::Change`].
    pub const CHANGE: EventKinds = EventKinds(EventKind::Change.bit());
    /// Only [`EventKind::Solved`].
    pub const SOLVED: EventKinds = EventKinds(EventKind::Solved.bit());
    /// Every kind, used with `off_grid_event` to deregister everything.
    pub const ALL: EventKinds = EventKinds(0b111);

    #[must_use]
    fn contains(self, kind: EventKind) -> bool {
        self.0 & kind.bit() != 0
    }

    #[must_use]
    fn intersects(self, other: EventKinds) -> bool {
        self.0 & other.0 != 0
    }
}

impl std::ops::BitOr for EventKinds {
    type Output = EventKinds;

    fn bitor(self, rhs: EventKinds) -> EventKinds {
        EventKinds(self.0 | rhs.0)
    }
}

/// The `N x N x N` candidate cube plus the solved-cell count.
#[derive(Clone, Debug)]
pub struct GridEventPayload {
    /// `candidates[r][c][v-1]` is `v` if still a candidate at `(r, c)`, `0`
    /// otherwise.
    pub candidates: Vec<Vec<Vec<usize>>>,
    /// `N^2 - empty_count()`.
    pub solved_count: usize,
}

/// Verbosity level of a rule-trace message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum MessageLevel {
    /// Top-level milestones: solved, contradiction, rejected guess.
    Info,
    /// One cell resolved to a value.
    Detail,
    /// Individual rule firings inside a propagation pass.
    Trace,
}

/// A grid-event sink: invoked with `(grid_id, payload)`.
pub type GridSink = Arc<dyn Fn(u64, &GridEventPayload) + Send + Sync>;

/// A message sink: invoked with `(level, text)`.
pub type MessageSink = Arc<dyn Fn(MessageLevel, &str) + Send + Sync>;

#[derive(Default)]
struct Bus {
    grid_sinks: Vec<(EventKinds, GridSink)>,
    message_sinks: Vec<MessageSink>,
}

static BUS: OnceLock<Mutex<Bus>> = OnceLock::new();

fn bus() -> &'static Mutex<Bus> {
    BUS.get_or_init(|| Mutex::new(Bus::default()))
}

/// Registers `sink` for every kind in `kinds`. A sink already registered
/// for the exact same kinds (compared by pointer identity) is a no-op.
pub fn on_grid_event(kinds: EventKinds, sink: GridSink) {
    let mut bus = bus().lock().unwrap_or_else(std::sync::PoisonError::into_inner);
    let duplicate = bus
        .grid_sinks
        .iter()
        .any(|(k, s)| *k == kinds && Arc::ptr_eq(s, &sink));
    if !duplicate {
        bus.grid_sinks.push((kinds, sink));
    }
}

/// Removes `sink` (by pointer identity) if given, or every sink registered
/// for any kind in `kinds` if `None`.
pub fn off_grid_event(kinds: EventKinds, sink: Option<GridSink>) {
    let mut bus = bus().lock().unwrap_or_else(std::sync::PoisonError::into_inner);
    match sink {
        Some(target) => bus.grid_sinks.retain(|(_, s)| !Arc::ptr_eq(s, &target)),
        None => bus.grid_sinks.retain(|(k, _)| !k.intersects(kinds)),
    }
}

/// Registers a message sink. Duplicate registrations (by pointer identity)
/// are ignored.
pub fn on_message(sink: MessageSink) {
    let mut bus = bus().lock().unwrap_or_else(std::sync::PoisonError::into_inner);
    if !bus.message_sinks.iter().any(|s| Arc::ptr_eq(s, &sink)) {
        bus.message_sinks.push(sink);
    }
}

/// Removes `sink` (by pointer identity), or every message sink if `None`.
pub fn off_message(sink: Option<MessageSink>) {
    let mut bus = bus().lock().unwrap_or_else(std::sync::PoisonError::into_inner);
    match sink {
        Some(target) => bus.message_sinks.retain(|s| !Arc::ptr_eq(s, &target)),
        None => bus.message_sinks.clear(),
    }
}

/// Removes every grid-event and message sink.
pub fn clear_all() {
    let mut bus = bus().lock().unwrap_or_else(std::sync::PoisonError::into_inner);
    bus.grid_sinks.clear();
    bus.message_sinks.clear();
}

fn dispatch(kind: EventKind, grid_id: u64, payload: &GridEventPayload) {
    let bus = bus().lock().unwrap_or_else(std::sync::PoisonError::into_inner);
    for (kinds, sink) in &bus.grid_sinks {
        if kinds.contains(kind) {
            sink(grid_id, payload);
        }
    }
}

fn payload_for(grid: &Grid) -> GridEventPayload {
    GridEventPayload {
        candidates: grid.event_payload(),
        solved_count: grid.solved_count(),
    }
}

pub(crate) fn publish_init(grid: &Grid) {
    dispatch(EventKind::Init, grid.id(), &payload_for(grid));
}

pub(crate) fn publish_change(grid: &Grid) {
    dispatch(EventKind::Change, grid.id(), &payload_for(grid));
}

pub(crate) fn publish_solved(grid: &Grid) {
    dispatch(EventKind::Solved, grid.id(), &payload_for(grid));
}

pub(crate) fn publish_message(_grid_id: u64, level: MessageLevel, text: impl AsRef<str>) {
    let bus = bus().lock().unwrap_or_else(std::sync::PoisonError::into_inner);
    for sink in &bus.message_sinks {
        sink(level, text.as_ref());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn duplicate_registration_is_ignored() {
        clear_all();
        let calls = Arc::new(AtomicUsize::new(0));
        let calls2 = Arc::clone(&calls);
        let sink: GridSink = Arc::new(move |_id, _payload| {
            calls2.fetch_add(1, Ordering::SeqCst);
        });
        on_grid_event(EventKinds::ALL, Arc::clone(&sink));
        on_grid_event(EventKinds::ALL, Arc::clone(&sink));
        dispatch(
            EventKind::Change,
            1,
            &GridEventPayload { candidates: Vec::new(), solved_count: 0 },
        );
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        clear_all();
    }

    #[test]
    fn off_grid_event_with_null_removes_matching_kinds() {
        clear_all();
        let calls = Arc::new(AtomicUsize::new(0));
        let calls2 = Arc::clone(&calls);
        let sink: GridSink = Arc::new(move |_id, _payload| {
            calls2.fetch_add(1, Ordering::SeqCst);
        });
        on_grid_event(EventKinds::SOLVED, sink);
        off_grid_event(EventKinds::SOLVED, None);
        dispatch(
            EventKind::Solved,
            1,
            &GridEventPayload { candidates: Vec::new(), solved_count: 0 },
        );
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        clear_all();
    }

    #[test]
    fn kind_filters_dispatch() {
        clear_all();
        let calls = Arc::new(AtomicUsize::new(0));
        let calls2 = Arc::clone(&calls);
        let sink: GridSink = Arc::new(move |_id, _payload| {
            calls2.fetch_add(1, Ordering::SeqCst);
        });
        on_grid_event(EventKinds::INIT, sink);
        dispatch(
            EventKind::Change,
            1,
            &GridEventPayload { candidates: Vec::new(), solved_count: 0 },
        );
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        dispatch(
            EventKind::Init,
            1,
            &GridEventPayload { candidates: Vec::new(), solved_count: 0 },
        );
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        clear_all();
    }
}
