//! redb table definitions for the Magnetboard state store.

use redb::TableDefinition;

/// Board snapshots keyed by `board/v{schema_version}`, JSON values.
pub const SNAPSHOTS: TableDefinition<&str, &[u8]> = TableDefinition::new("snapshots");

/// Key under which a snapshot of the given schema version is stored.
pub fn board_key(version: u32) -> String {
    format!("board/v{version}")
}
