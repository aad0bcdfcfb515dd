//! magnetboard-state — persisted board snapshots.
//!
//! Backed by [redb](https://docs.rs/redb). The whole board (units and
//! placements) is stored as one JSON document under a versioned key
//! (`board/v{N}`). Documents written by older schema versions are migrated
//! forward on load and rewritten under the current key.
//!
//! The `StateStore` is `Clone` (backed by `Arc<Database>`), so the CLI and
//! tests can hold several handles to the same database.

pub mod error;
pub mod migrate;
pub mod store;
pub mod tables;
pub mod types;

pub use error::{StateError, StateResult};
pub use migrate::SCHEMA_VERSION;
pub use store::StateStore;
pub use types::BoardSnapshot;
