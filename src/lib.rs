//! # Link-Up Solver Library
//!
//! Core logic for a link-up (pair-matching) tile puzzle: a rectangular board
//! of paired symbols, and a search engine that decides whether two cells may
//! be connected under the game's routing rule (at most 2 direction changes,
//! only empty cells in between, bounded path length).
//!
//! It is used by two binaries:
//! - `auto_solver`: Populates a board and clears it pair by pair, printing
//!   per-move search telemetry.
//! - `step_trace`: Runs one search in simulation mode and prints every
//!   recorded step event.
//!
//! The library renders nothing and owns no timers; a presentation layer
//! drives it, consuming paths, step events, and stats.
//!
//! ## Modules
//! - `board`: The grid of cells (`Board`, `Cell`) and its mutation
//!   primitives (populate, pair removal, reshuffle, occupied-cell scan).
//! - `search`: The turn-limited path search (`SearchEngine`, `Strategy`,
//!   `SearchStats`, `StepEvent`), pair discovery, and the simulation trace.
//! - `utils`: Utility functions, such as parsing board layouts from strings.

pub mod board;
pub mod search;
pub mod utils;

// Items from sub-modules, if public, should be accessed via their full
// path, e.g., `linkup_solver::search::SearchEngine`. This keeps the
// top-level library namespace cleaner.
