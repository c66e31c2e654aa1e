//! Configurable-order sudoku constraint propagation: bit utilities, a
//! grid model, region/line/intersection rule engines, an elimination
//! driver with recursive hypothesis fallback, a reference backtracking
//! solver, an exact-cover encoder, and a process-wide observer bus.

#![warn(missing_docs)]

mod api;
mod backtrack;
mod bits;
mod driver;
mod errors;
mod exact_cover;
mod grid;
mod observer;
mod rules;
mod stats;
mod text;

pub use api::{count_solutions, solve, solve_str, Method, Mode, MethodUsed, SolveOutcome};
pub use errors::{GridError, ParseError};
pub use grid::{Elimination, Grid, IntersectionKind, RegionKind};
pub use observer::{
    clear_all, off_grid_event, off_message, on_grid_event, on_message, EventKind, EventKinds, GridEventPayload, GridSink, MessageLevel,
    MessageSink,
};
pub use stats::SolveStats;
pub use text::{cell_name, col_name, format_grid, parse_grid, row_name, value_name};
