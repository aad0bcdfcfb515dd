//! StateStore — redb-backed snapshot persistence for the board.
//!
//! The board is saved as a single JSON document per schema version. Saving
//! always writes the current key; loading falls back to the newest older
//! key and migrates it. The store runs on disk, in memory (for testing), or
//! over any other [`StorageBackend`].

use std::path::Path;
use std::sync::Arc;

use redb::{Database, ReadableDatabase, StorageBackend};
use tracing::{debug, info};

use crate::error::{StateError, StateResult};
use crate::migrate::{SCHEMA_VERSION, migrate};
use crate::tables::{SNAPSHOTS, board_key};
use crate::types::BoardSnapshot;

/// Convert any `Display` error into a `StateError` variant via a closure factory.
macro_rules! map_err {
    ($variant:ident) => {
        |e| StateError::$variant(e.to_string())
    };
}

/// Snapshot store backed by redb.
#[derive(Clone)]
pub struct StateStore {
    db: Arc<Database>,
}

impl StateStore {
    /// Open (or create) a persistent store at the given path.
    pub fn open(path: &Path) -> StateResult<Self> {
        let db = Database::create(path).map_err(map_err!(Open))?;
        let store = Self::from_database(db)?;
        debug!(?path, "state store opened");
        Ok(store)
    }

    /// Create an ephemeral in-memory store (for testing).
    pub fn open_in_memory() -> StateResult<Self> {
        let store = Self::open_with_backend(redb::backends::InMemoryBackend::new())?;
        debug!("in-memory state store opened");
        Ok(store)
    }

    /// Create a store over a caller-supplied redb backend.
    pub fn open_with_backend(backend: impl StorageBackend) -> StateResult<Self> {
        let db = Database::builder()
            .create_with_backend(backend)
            .map_err(map_err!(Open))?;
        Self::from_database(db)
    }

    fn from_database(db: Database) -> StateResult<Self> {
        let store = Self { db: Arc::new(db) };
        store.ensure_tables()?;
        Ok(store)
    }

    fn ensure_tables(&self) -> StateResult<()> {
        let txn = self.db.begin_write().map_err(map_err!(Storage))?;
        // Opening a table in a write transaction creates it if absent.
        txn.open_table(SNAPSHOTS).map_err(map_err!(Storage))?;
        txn.commit().map_err(map_err!(Storage))?;
        Ok(())
    }

    /// Write the board under the current schema key.
    pub fn save_board(&self, snapshot: &BoardSnapshot) -> StateResult<()> {
        let key = board_key(SCHEMA_VERSION);
        let value = serde_json::to_vec(snapshot).map_err(map_err!(Encode))?;
        self.put_raw(&key, &value)?;
        debug!(
            %key,
            units = snapshot.units.len(),
            placements = snapshot.placements.len(),
            "board stored"
        );
        Ok(())
    }

    /// Load the board, migrating an older snapshot if that is all there is.
    ///
    /// Returns `None` for a store that has never been saved to.
    pub fn load_board(&self) -> StateResult<Option<BoardSnapshot>> {
        let Some((version, bytes)) = self.newest_raw()? else {
            return Ok(None);
        };

        if version == SCHEMA_VERSION {
            let snapshot = serde_json::from_slice(&bytes)
                .map_err(|e| StateError::corrupt(version, e))?;
            return Ok(Some(snapshot));
        }

        let doc: serde_json::Value =
            serde_json::from_slice(&bytes).map_err(|e| StateError::corrupt(version, e))?;
        let migrated = migrate(doc, version)?;
        let snapshot: BoardSnapshot = serde_json::from_value(migrated)
            .map_err(|e| StateError::corrupt(version, e))?;
        self.replace_legacy(&snapshot)?;
        info!(
            from = version,
            to = SCHEMA_VERSION,
            units = snapshot.units.len(),
            "board snapshot migrated"
        );
        Ok(Some(snapshot))
    }

    /// Schema version of the newest stored snapshot, if any.
    pub fn stored_version(&self) -> StateResult<Option<u32>> {
        Ok(self.newest_raw()?.map(|(version, _)| version))
    }

    /// Delete every stored snapshot, current and legacy.
    pub fn clear(&self) -> StateResult<()> {
        let txn = self.db.begin_write().map_err(map_err!(Storage))?;
        {
            let mut table = txn.open_table(SNAPSHOTS).map_err(map_err!(Storage))?;
            for version in 1..=SCHEMA_VERSION {
                let key = board_key(version);
                table
                    .remove(key.as_str())
                    .map_err(|e| StateError::write(&key, e))?;
            }
        }
        txn.commit().map_err(map_err!(Storage))?;
        debug!("board snapshots cleared");
        Ok(())
    }

    /// Store raw bytes under a key. Used to plant legacy documents.
    pub fn put_raw(&self, key: &str, value: &[u8]) -> StateResult<()> {
        let txn = self.db.begin_write().map_err(map_err!(Storage))?;
        {
            let mut table = txn.open_table(SNAPSHOTS).map_err(map_err!(Storage))?;
            table
                .insert(key, value)
                .map_err(|e| StateError::write(key, e))?;
        }
        txn.commit().map_err(|e| StateError::write(key, e))?;
        Ok(())
    }

    /// Newest snapshot version present, with its bytes.
    fn newest_raw(&self) -> StateResult<Option<(u32, Vec<u8>)>> {
        let txn = self.db.begin_read().map_err(map_err!(Storage))?;
        let table = txn.open_table(SNAPSHOTS).map_err(map_err!(Storage))?;
        for version in (1..=SCHEMA_VERSION).rev() {
            let key = board_key(version);
            if let Some(guard) = table
                .get(key.as_str())
                .map_err(|e| StateError::read(&key, e))?
            {
                return Ok(Some((version, guard.value().to_vec())));
            }
        }
        Ok(None)
    }

    /// Write the migrated snapshot and drop the legacy keys in one transaction.
    fn replace_legacy(&self, snapshot: &BoardSnapshot) -> StateResult<()> {
        let current = board_key(SCHEMA_VERSION);
        let value = serde_json::to_vec(snapshot).map_err(map_err!(Encode))?;
        let txn = self.db.begin_write().map_err(map_err!(Storage))?;
        {
            let mut table = txn.open_table(SNAPSHOTS).map_err(map_err!(Storage))?;
            table
                .insert(current.as_str(), value.as_slice())
                .map_err(|e| StateError::write(&current, e))?;
            for version in 1..SCHEMA_VERSION {
                let key = board_key(version);
                table
                    .remove(key.as_str())
                    .map_err(|e| StateError::write(&key, e))?;
            }
        }
        txn.commit().map_err(|e| StateError::write(&current, e))?;
        Ok(())
    }
}
