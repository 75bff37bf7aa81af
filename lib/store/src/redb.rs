use std::path::Path;
use std::sync::Arc;

use redb::{Database, TableDefinition};
use tracing::debug;

use crate::error::StoreError;
use crate::traits::DocStore;

const TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("fleet");

/// The single key the whole document lives under.
const DOC_KEY: &str = "document";

/// RedbDocStore is a DocStore implementation backed by redb — a pure-Rust
/// embedded key-value database. Every write is one redb write
/// transaction, so a document write is never partially applied.
pub struct RedbDocStore {
    db: Arc<Database>,
}

impl RedbDocStore {
    /// Open or create a redb database at the given path.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        debug!("opening document store at {}", path.display());
        let db = Database::create(path).map_err(|e| StoreError::Storage(e.to_string()))?;

        // Ensure the table exists by doing a write transaction.
        let write_txn = db
            .begin_write()
            .map_err(|e| StoreError::Storage(e.to_string()))?;
        {
            let _table = write_txn
                .open_table(TABLE)
                .map_err(|e| StoreError::Storage(e.to_string()))?;
        }
        write_txn
            .commit()
            .map_err(|e| StoreError::Storage(e.to_string()))?;

        Ok(Self {
            db: Arc::new(db),
        })
    }
}

impl DocStore for RedbDocStore {
    fn read(&self) -> Result<Option<Vec<u8>>, StoreError> {
        let read_txn = self
            .db
            .begin_read()
            .map_err(|e| StoreError::Storage(e.to_string()))?;
        let table = read_txn
            .open_table(TABLE)
            .map_err(|e| StoreError::Storage(e.to_string()))?;

        match table.get(DOC_KEY) {
            Ok(Some(val)) => Ok(Some(val.value().to_vec())),
            Ok(None) => Ok(None),
            Err(e) => Err(StoreError::Storage(e.to_string())),
        }
    }

    fn write(&self, doc: &[u8]) -> Result<(), StoreError> {
        let write_txn = self
            .db
            .begin_write()
            .map_err(|e| StoreError::Storage(e.to_string()))?;
        {
            let mut table = write_txn
                .open_table(TABLE)
                .map_err(|e| StoreError::Storage(e.to_string()))?;
            table
                .insert(DOC_KEY, doc)
                .map_err(|e| StoreError::Storage(e.to_string()))?;
        }
        write_txn
            .commit()
            .map_err(|e| StoreError::Storage(e.to_string()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_temp() -> (tempfile::TempDir, RedbDocStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = RedbDocStore::open(&dir.path().join("fleet.redb")).unwrap();
        (dir, store)
    }

    #[test]
    fn read_empty_store() {
        let (_dir, store) = open_temp();
        assert_eq!(store.read().unwrap(), None);
    }

    #[test]
    fn write_then_read() {
        let (_dir, store) = open_temp();
        store.write(b"{\"packs\":{}}").unwrap();
        assert_eq!(store.read().unwrap().unwrap(), b"{\"packs\":{}}");
    }

    #[test]
    fn write_replaces_previous() {
        let (_dir, store) = open_temp();
        store.write(b"one").unwrap();
        store.write(b"two").unwrap();
        assert_eq!(store.read().unwrap().unwrap(), b"two");
    }

    #[test]
    fn survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fleet.redb");
        {
            let store = RedbDocStore::open(&path).unwrap();
            store.write(b"persisted").unwrap();
        }
        let store = RedbDocStore::open(&path).unwrap();
        assert_eq!(store.read().unwrap().unwrap(), b"persisted");
    }
}
