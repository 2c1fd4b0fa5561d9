//! File-backed key-value store on top of redb

use std::path::{Path, PathBuf};

use redb::{Database, ReadableTable, TableDefinition, TableError};
use riff_core::KeyValueStore;
use tracing::{debug, info};

use crate::error::{Result, StorageError};

/// Single table holding every key
const ENTRIES: TableDefinition<&str, &str> = TableDefinition::new("entries");

/// Durable store in a single redb file
///
/// Every `set` is its own committed write transaction, so each key is
/// written atomically and independently of the others.
pub struct RedbStore {
    db: Database,
    path: PathBuf,
}

impl RedbStore {
    /// Open the database at `path`, creating it and its parent directories if
    /// needed
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let db = Database::create(&path).map_err(StorageError::database)?;
        info!(path = %path.display(), "Opened key-value store");
        Ok(Self { db, path })
    }

    /// Location of the database file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the value stored under `key`
    pub fn get(&self, key: &str) -> Result<Option<String>> {
        let txn = self.db.begin_read().map_err(StorageError::database)?;
        let table = match txn.open_table(ENTRIES) {
            Ok(table) => table,
            // Nothing has been written yet
            Err(TableError::TableDoesNotExist(_)) => return Ok(None),
            Err(e) => return Err(StorageError::database(e)),
        };

        let value = table.get(key).map_err(StorageError::database)?;
        Ok(value.map(|guard| guard.value().to_string()))
    }

    /// Store `value` under `key`
    pub fn put(&self, key: &str, value: &str) -> Result<()> {
        let txn = self.db.begin_write().map_err(StorageError::database)?;
        {
            let mut table = txn.open_table(ENTRIES).map_err(StorageError::database)?;
            table.insert(key, value).map_err(StorageError::database)?;
        }
        txn.commit().map_err(StorageError::database)?;

        debug!(key = %key, bytes = value.len(), "Stored value");
        Ok(())
    }

    /// Delete `key`, returning whether it existed
    pub fn remove(&self, key: &str) -> Result<bool> {
        let txn = self.db.begin_write().map_err(StorageError::database)?;
        let existed = {
            let mut table = txn.open_table(ENTRIES).map_err(StorageError::database)?;
            let removed = table.remove(key).map_err(StorageError::database)?;
            removed.is_some()
        };
        txn.commit().map_err(StorageError::database)?;
        Ok(existed)
    }
}

impl KeyValueStore for RedbStore {
    fn get_string(&self, key: &str) -> riff_core::Result<Option<String>> {
        Ok(self.get(key)?)
    }

    fn set(&self, key: &str, value: &str) -> riff_core::Result<()> {
        Ok(self.put(key, value)?)
    }
}
