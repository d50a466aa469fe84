//! KvStore - local key-value persistence
//!
//! Stores whole string values under string keys. Callers own the encoding;
//! the store only guarantees that a `set` either fully replaces the previous
//! value or leaves it untouched.
//!
//! # Backends
//!
//! ```text
//! FileStore    {root}/{key}.json    one file per key, atomic rename on write
//! SqliteStore  {db} table `kv`      upsert per key
//! MemoryStore  HashMap              tests and throwaway sessions
//! ```
//!
//! # Example
//!
//! ```ignore
//! use kvstore::{FileStore, KvStore};
//!
//! let mut store = FileStore::open(".tasklist")?;
//! store.set("todo-list-storage-key", "[]")?;
//! assert_eq!(store.get("todo-list-storage-key")?.as_deref(), Some("[]"));
//! ```

mod error;
mod file;
mod memory;
mod sqlite;

pub use error::{KvError, KvResult};
pub use file::FileStore;
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// A string key-value store.
///
/// Every `set` is a full overwrite of the value stored under `key`.
pub trait KvStore {
    /// Read the value stored under `key`, if any
    fn get(&self, key: &str) -> KvResult<Option<String>>;

    /// Store `value` under `key`, replacing any previous value
    fn set(&mut self, key: &str, value: &str) -> KvResult<()>;

    /// Remove `key`. Removing a missing key is not an error.
    fn remove(&mut self, key: &str) -> KvResult<()>;

    /// Human-readable backend name for logs
    fn backend(&self) -> &'static str;
}

/// Current time in Unix milliseconds
pub fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Reject keys no backend can address
pub fn validate_key(key: &str) -> KvResult<()> {
    if key.trim().is_empty() {
        return Err(KvError::InvalidKey(key.to_string()));
    }
    Ok(())
}
