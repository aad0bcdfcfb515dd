pub mod config;
pub mod id;
pub mod seed;
pub mod types;

pub use config::{BoardConfig, OccupiedCell};
pub use types::*;
