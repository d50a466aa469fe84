//! File backend - one file per key in a store directory

use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use fs2::FileExt;
use tempfile::NamedTempFile;
use tracing::{debug, trace};

use crate::{KvError, KvResult, KvStore, validate_key};

/// Name of the writer lock file inside the store directory
const LOCK_FILE: &str = ".lock";

/// Directory-backed store.
///
/// Writes land in a temp file in the same directory and are renamed over
/// the target, so readers see either the old or the new value.
#[derive(Debug)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Open or create a store rooted at `path`
    pub fn open(path: impl AsRef<Path>) -> KvResult<Self> {
        let root = path.as_ref().to_path_buf();
        fs::create_dir_all(&root)?;
        debug!(?root, "Opened file store");
        Ok(Self { root })
    }

    /// File that holds the value for `key`
    pub fn key_path(&self, key: &str) -> KvResult<PathBuf> {
        validate_key(key)?;
        Ok(self.root.join(format!("{}.json", encode_key(key))))
    }

    fn lock(&self) -> KvResult<File> {
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(self.root.join(LOCK_FILE))?;
        FileExt::lock_exclusive(&file).map_err(KvError::Lock)?;
        Ok(file)
    }
}

impl KvStore for FileStore {
    fn get(&self, key: &str) -> KvResult<Option<String>> {
        let path = self.key_path(key)?;
        trace!(?path, "FileStore::get: called");
        match fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> KvResult<()> {
        let path = self.key_path(key)?;
        trace!(?path, bytes = value.len(), "FileStore::set: called");
        let lock = self.lock()?;

        let mut tmp = NamedTempFile::new_in(&self.root)?;
        tmp.write_all(value.as_bytes())?;
        tmp.as_file().sync_all()?;
        tmp.persist(&path).map_err(|e| KvError::Io(e.error))?;

        FileExt::unlock(&lock).map_err(KvError::Lock)?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> KvResult<()> {
        let path = self.key_path(key)?;
        trace!(?path, "FileStore::remove: called");
        let lock = self.lock()?;
        let result = match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        };
        FileExt::unlock(&lock).map_err(KvError::Lock)?;
        result
    }

    fn backend(&self) -> &'static str {
        "file"
    }
}

/// Map a key onto a file stem. Bytes outside `[A-Za-z0-9_-]` are
/// percent-escaped, so distinct keys never share a file.
fn encode_key(key: &str) -> String {
    let mut stem = String::with_capacity(key.len());
    for byte in key.bytes() {
        if byte.is_ascii_alphanumeric() || byte == b'_' || byte == b'-' {
            stem.push(char::from(byte));
        } else {
            stem.push_str(&format!("%{byte:02X}"));
        }
    }
    stem
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_set_and_get() {
        let temp = TempDir::new().unwrap();
        let mut store = FileStore::open(temp.path()).unwrap();

        store.set("todo-list-storage-key", r#"[{"text":"a"}]"#).unwrap();

        assert_eq!(
            store.get("todo-list-storage-key").unwrap().as_deref(),
            Some(r#"[{"text":"a"}]"#)
        );
        assert!(temp.path().join("todo-list-storage-key.json").exists());
    }

    #[test]
    fn test_values_survive_reopen() {
        let temp = TempDir::new().unwrap();
        {
            let mut store = FileStore::open(temp.path()).unwrap();
            store.set("k", "persisted").unwrap();
        }
        let store = FileStore::open(temp.path()).unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("persisted"));
    }

    #[test]
    fn test_overwrite_leaves_no_temp_files() {
        let temp = TempDir::new().unwrap();
        let mut store = FileStore::open(temp.path()).unwrap();
        store.set("k", "one").unwrap();
        store.set("k", "two").unwrap();

        let names: Vec<String> = fs::read_dir(temp.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
            .filter(|n| n != LOCK_FILE)
            .collect();
        assert_eq!(names, vec!["k.json".to_string()]);
        assert_eq!(store.get("k").unwrap().as_deref(), Some("two"));
    }

    #[test]
    fn test_missing_key_and_remove() {
        let temp = TempDir::new().unwrap();
        let mut store = FileStore::open(temp.path().join("nested").join("store")).unwrap();
        assert_eq!(store.get("absent").unwrap(), None);

        store.set("k", "v").unwrap();
        store.remove("k").unwrap();
        store.remove("k").unwrap();
        assert_eq!(store.get("k").unwrap(), None);
    }

    #[test]
    fn test_encode_key() {
        assert_eq!(encode_key("todo-list-storage-key"), "todo-list-storage-key");
        assert_eq!(encode_key("../etc/passwd"), "%2E%2E%2Fetc%2Fpasswd");
        assert_eq!(encode_key("a b:c"), "a%20b%3Ac");
        assert_eq!(encode_key("a%20b"), "a%2520b");
        assert_eq!(encode_key("ü"), "%C3%BC");
    }

    #[test]
    fn test_similar_keys_do_not_collide() {
        let temp = TempDir::new().unwrap();
        let mut store = FileStore::open(temp.path()).unwrap();
        store.set("a b", "spaced").unwrap();
        store.set("a_b", "underscored").unwrap();
        store.set("a%20b", "escaped").unwrap();

        assert_eq!(store.get("a b").unwrap().as_deref(), Some("spaced"));
        assert_eq!(store.get("a_b").unwrap().as_deref(), Some("underscored"));
        assert_eq!(store.get("a%20b").unwrap().as_deref(), Some("escaped"));
    }

    proptest::proptest! {
        #[test]
        fn prop_distinct_keys_map_to_distinct_files(a in "\\PC{1,8}", b in "\\PC{1,8}") {
            proptest::prop_assume!(a != b);
            proptest::prop_assert_ne!(encode_key(&a), encode_key(&b));
        }

        #[test]
        fn prop_get_returns_last_set(key in "[a-z][a-z0-9-]{0,15}", first in ".*", second in ".*") {
            let temp = TempDir::new().unwrap();
            let mut store = FileStore::open(temp.path()).unwrap();
            store.set(&key, &first).unwrap();
            store.set(&key, &second).unwrap();
            proptest::prop_assert_eq!(store.get(&key).unwrap(), Some(second));
        }
    }

    #[test]
    fn test_key_path_stays_in_root() {
        let temp = TempDir::new().unwrap();
        let store = FileStore::open(temp.path()).unwrap();
        let path = store.key_path("../../escape").unwrap();
        assert_eq!(path.parent(), Some(temp.path()));
    }
}
