use std::path::Path;

use redb::backends::InMemoryBackend;
use redb::{Database, ReadableTable, TableDefinition};
use tracing::debug;

use crate::error::KVError;
use crate::traits::KVStore;

const TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("kv");

/// RedbStore is a KVStore implementation backed by redb, a pure-Rust embedded
/// key-value database.
pub struct RedbStore {
    db: Database,
}

impl RedbStore {
    /// Open or create a redb database at the given path.
    pub fn open(path: &Path) -> Result<Self, KVError> {
        let db = Database::create(path).map_err(KVError::storage)?;
        debug!(path = %path.display(), "opened redb store");
        Self::with_table(db)
    }

    /// Create a database that lives only in memory (useful for tests).
    pub fn open_in_memory() -> Result<Self, KVError> {
        let db = Database::builder()
            .create_with_backend(InMemoryBackend::new())
            .map_err(KVError::storage)?;
        Self::with_table(db)
    }

    // The table must exist before the first read transaction opens it.
    fn with_table(db: Database) -> Result<Self, KVError> {
        let write_txn = db.begin_write().map_err(KVError::storage)?;
        write_txn.open_table(TABLE).map_err(KVError::storage)?;
        write_txn.commit().map_err(KVError::storage)?;
        Ok(Self { db })
    }

    /// Insert `value` when the key's presence matches `present`.
    fn write_if(&self, key: &str, value: &[u8], present: bool) -> Result<bool, KVError> {
        let write_txn = self.db.begin_write().map_err(KVError::storage)?;
        let written = {
            let mut table = write_txn.open_table(TABLE).map_err(KVError::storage)?;
            let exists = table.get(key).map_err(KVError::storage)?.is_some();
            if exists == present {
                table.insert(key, value).map_err(KVError::storage)?;
            }
            exists == present
        };
        write_txn.commit().map_err(KVError::storage)?;
        Ok(written)
    }
}

impl KVStore for RedbStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, KVError> {
        let read_txn = self.db.begin_read().map_err(KVError::storage)?;
        let table = read_txn.open_table(TABLE).map_err(KVError::storage)?;
        let value = table.get(key).map_err(KVError::storage)?;
        Ok(value.map(|v| v.value().to_vec()))
    }

    fn insert_new(&self, key: &str, value: &[u8]) -> Result<bool, KVError> {
        self.write_if(key, value, false)
    }

    fn replace(&self, key: &str, value: &[u8]) -> Result<bool, KVError> {
        self.write_if(key, value, true)
    }

    fn delete(&self, key: &str) -> Result<bool, KVError> {
        let write_txn = self.db.begin_write().map_err(KVError::storage)?;
        let existed = {
            let mut table = write_txn.open_table(TABLE).map_err(KVError::storage)?;
            let removed = table.remove(key).map_err(KVError::storage)?;
            removed.is_some()
        };
        write_txn.commit().map_err(KVError::storage)?;
        Ok(existed)
    }

    fn scan(&self, prefix: &str) -> Result<Vec<(String, Vec<u8>)>, KVError> {
        let read_txn = self.db.begin_read().map_err(KVError::storage)?;
        let table = read_txn.open_table(TABLE).map_err(KVError::storage)?;

        let mut results = Vec::new();
        for entry in table.range(prefix..).map_err(KVError::storage)? {
            let (key, value) = entry.map_err(KVError::storage)?;
            let key = key.value();
            if !key.starts_with(prefix) {
                break;
            }
            results.push((key.to_string(), value.value().to_vec()));
        }
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_replace_delete() {
        let store = RedbStore::open_in_memory().unwrap();
        assert_eq!(store.get("book/a").unwrap(), None);

        assert!(!store.replace("book/a", b"zero").unwrap());
        assert_eq!(store.get("book/a").unwrap(), None);

        assert!(store.insert_new("book/a", b"one").unwrap());
        assert!(!store.insert_new("book/a", b"again").unwrap());
        assert_eq!(store.get("book/a").unwrap(), Some(b"one".to_vec()));

        assert!(store.replace("book/a", b"two").unwrap());
        assert_eq!(store.get("book/a").unwrap(), Some(b"two".to_vec()));

        assert!(store.delete("book/a").unwrap());
        assert!(!store.delete("book/a").unwrap());
        assert_eq!(store.get("book/a").unwrap(), None);
    }

    #[test]
    fn test_scan_prefix() {
        let store = RedbStore::open_in_memory().unwrap();
        store.insert_new("book/b", b"2").unwrap();
        store.insert_new("book/a", b"1").unwrap();
        store.insert_new("booking/x", b"x").unwrap();
        store.insert_new("author/z", b"z").unwrap();

        let rows = store.scan("book/").unwrap();
        let keys: Vec<&str> = rows.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["book/a", "book/b"]);
    }

    #[test]
    fn test_persists_across_open() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.redb");
        {
            let store = RedbStore::open(&path).unwrap();
            store.insert_new("book/a", b"1").unwrap();
        }
        let store = RedbStore::open(&path).unwrap();
        assert_eq!(store.get("book/a").unwrap(), Some(b"1".to_vec()));
    }
}
