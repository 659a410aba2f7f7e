use crate::error::KVError;

/// KVStore provides a key-value storage interface.
///
/// Keys follow a namespaced convention: `book/<uuid>`. Each call runs in its
/// own transaction; nothing is held open between calls.
pub trait KVStore: Send + Sync {
    /// Get the value for a key. Returns None if the key does not exist.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, KVError>;

    /// Write a key only if it is absent. Returns whether the value was written.
    fn insert_new(&self, key: &str, value: &[u8]) -> Result<bool, KVError>;

    /// Overwrite a key only if it is present. Returns whether the value was
    /// written. The presence check and the write share one transaction.
    fn replace(&self, key: &str, value: &[u8]) -> Result<bool, KVError>;

    /// Delete a key. Returns whether the key was present.
    fn delete(&self, key: &str) -> Result<bool, KVError>;

    /// Scan all keys matching a prefix. Returns sorted (key, value) pairs.
    fn scan(&self, prefix: &str) -> Result<Vec<(String, Vec<u8>)>, KVError>;
}
