//! Magnetboard placement engine — where units may go and how often.
//!
//! The engine keeps one weekly grid per year group. Every grid cell holds
//! at most one unit, a unit only goes on its own year's grid, and a unit
//! never occupies more cells than its `module_count`.
//!
//! # Components
//!
//! - **`registry`** — the unit catalog (create, patch, delete)
//! - **`grid`** — cell occupancy, capacity accounting, move/swap
//! - **`policy`** — optional placement checks (teacher double-booking)
//! - **`board`** — the controller that owns both and persists after every mutation
//! - **`rejection`** — why an operation was refused

pub mod board;
pub mod grid;
pub mod policy;
pub mod registry;
pub mod rejection;

pub use board::Board;
pub use grid::{Grid, MoveKind};
pub use policy::{PlacementPolicy, TeacherConflictPolicy};
pub use registry::Registry;
pub use rejection::{Outcome, Rejection};
