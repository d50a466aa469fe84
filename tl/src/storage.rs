//! TaskRepository - persists the whole task list as one blob
//!
//! The list lives under a single key in a [`KvStore`]. Every save rewrites
//! the full blob; loads never fail; anything unreadable is treated as an
//! empty list.
//!
//! # Layout
//!
//! ```text
//! {"version": 1, "next_id": 3, "tasks": [{"id": 1, "text": "buy milk", "completed": true}, ...]}
//! ```
//!
//! A bare array of `{"text", "completed"}` objects (the unversioned layout)
//! is still accepted on load and gets sequential ids. A versioned blob that
//! repeats an id is rejected like any other unreadable blob.

use std::collections::HashSet;
use std::path::Path;

use kvstore::{FileStore, KvError, KvStore, MemoryStore, SqliteStore, validate_key};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::{Backend, StorageConfig};
use crate::domain::{Task, TaskId};

/// Well-known key the list is stored under
pub const DEFAULT_STORAGE_KEY: &str = "todo-list-storage-key";

/// Current persisted layout version
pub const SCHEMA_VERSION: u64 = 1;

/// Database file name for the sqlite backend
const SQLITE_FILE: &str = "tasklist.db";

/// Errors from persisting or decoding the list
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Store error: {0}")]
    Kv(#[from] KvError),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unsupported schema version: {0}")]
    UnsupportedVersion(u64),

    #[error("Unrecognized layout: expected an object with a version or an array of tasks")]
    UnrecognizedLayout,

    #[error("Duplicate task id: {0}")]
    DuplicateId(TaskId),
}

/// Everything a load produces
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    /// Tasks in display order
    pub tasks: Vec<Task>,
    /// Id the next added task receives
    pub next_id: TaskId,
}

#[derive(Serialize)]
struct EnvelopeRef<'a> {
    version: u64,
    next_id: TaskId,
    tasks: &'a [Task],
}

#[derive(Deserialize)]
struct Envelope {
    #[serde(default)]
    next_id: Option<TaskId>,
    #[serde(default)]
    tasks: Vec<Task>,
}

#[derive(Deserialize)]
struct LegacyTask {
    text: String,
    #[serde(default)]
    completed: bool,
}

/// Encode the list into the current layout
pub fn encode(tasks: &[Task], next_id: TaskId) -> Result<String, StorageError> {
    let envelope = EnvelopeRef {
        version: SCHEMA_VERSION,
        next_id,
        tasks,
    };
    Ok(serde_json::to_string(&envelope)?)
}

/// Decode a stored blob, accepting the current and the unversioned layout
pub fn decode(blob: &str) -> Result<Snapshot, StorageError> {
    let value: Value = serde_json::from_str(blob)?;
    let snapshot = match value {
        Value::Null => Snapshot::default(),
        Value::Array(_) => {
            let legacy: Vec<LegacyTask> = serde_json::from_value(value)?;
            debug!(count = legacy.len(), "decode: upgrading unversioned list");
            let tasks = legacy
                .into_iter()
                .zip(1u64..)
                .map(|(t, id)| Task {
                    id: TaskId::new(id),
                    text: t.text,
                    completed: t.completed,
                })
                .collect();
            Snapshot {
                tasks,
                next_id: TaskId::FIRST,
            }
        }
        Value::Object(ref map) => {
            let version = map
                .get("version")
                .and_then(Value::as_u64)
                .ok_or(StorageError::UnrecognizedLayout)?;
            if version != SCHEMA_VERSION {
                return Err(StorageError::UnsupportedVersion(version));
            }
            let envelope: Envelope = serde_json::from_value(value)?;
            Snapshot {
                tasks: envelope.tasks,
                next_id: envelope.next_id.unwrap_or(TaskId::FIRST),
            }
        }
        _ => return Err(StorageError::UnrecognizedLayout),
    };
    normalize(snapshot)
}

/// Check ids are unique and raise `next_id` past every stored id
fn normalize(mut snapshot: Snapshot) -> Result<Snapshot, StorageError> {
    let mut seen = HashSet::with_capacity(snapshot.tasks.len());
    for task in &snapshot.tasks {
        if !seen.insert(task.id) {
            return Err(StorageError::DuplicateId(task.id));
        }
    }

    if let Some(max) = snapshot.tasks.iter().map(|t| t.id).max()
        && snapshot.next_id <= max
    {
        snapshot.next_id = max.next();
    }
    Ok(snapshot)
}

/// Reads and writes the task list under one key
pub struct TaskRepository {
    kv: Box<dyn KvStore>,
    key: String,
}

impl TaskRepository {
    pub fn new(kv: Box<dyn KvStore>, key: impl Into<String>) -> Self {
        Self { kv, key: key.into() }
    }

    /// Repository over a fresh in-memory store
    pub fn in_memory() -> Self {
        Self::new(Box::new(MemoryStore::new()), DEFAULT_STORAGE_KEY)
    }

    /// Open the backend described by `config`
    pub fn open(config: &StorageConfig) -> Result<Self, StorageError> {
        validate_key(&config.key)?;
        let kv = open_backend(config.backend, &config.path)?;
        info!(backend = kv.backend(), path = %config.path.display(), key = %config.key, "Opened task repository");
        Ok(Self::new(kv, config.key.clone()))
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Underlying key-value store
    pub fn kv(&self) -> &dyn KvStore {
        self.kv.as_ref()
    }

    /// Load the stored list. Absent or unreadable data yields an empty list.
    pub fn load(&self) -> Snapshot {
        debug!(key = %self.key, "TaskRepository::load: called");
        let blob = match self.kv.get(&self.key) {
            Ok(Some(blob)) => blob,
            Ok(None) => {
                debug!("TaskRepository::load: nothing stored");
                return Snapshot::default();
            }
            Err(e) => {
                warn!(error = %e, key = %self.key, "Failed to read task list, starting empty");
                return Snapshot::default();
            }
        };

        match decode(&blob) {
            Ok(snapshot) => {
                debug!(count = snapshot.tasks.len(), next_id = %snapshot.next_id, "TaskRepository::load: decoded");
                snapshot
            }
            Err(e) => {
                warn!(error = %e, key = %self.key, "Stored task list is unreadable, starting empty");
                Snapshot::default()
            }
        }
    }

    /// Overwrite the stored list with `tasks`
    pub fn save(&mut self, tasks: &[Task], next_id: TaskId) -> Result<(), StorageError> {
        debug!(count = tasks.len(), %next_id, "TaskRepository::save: called");
        let blob = encode(tasks, next_id)?;
        self.kv.set(&self.key, &blob)?;
        Ok(())
    }
}

/// Open the key-value backend rooted at `path`
pub fn open_backend(backend: Backend, path: &Path) -> Result<Box<dyn KvStore>, KvError> {
    let kv: Box<dyn KvStore> = match backend {
        Backend::File => Box::new(FileStore::open(path)?),
        Backend::Sqlite => Box::new(SqliteStore::open(path.join(SQLITE_FILE))?),
        Backend::Memory => Box::new(MemoryStore::new()),
    };
    Ok(kv)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use tempfile::TempDir;

    fn task(id: u64, text: &str, completed: bool) -> Task {
        Task {
            id: TaskId::new(id),
            text: text.to_string(),
            completed,
        }
    }

    #[test]
    fn test_round_trip() {
        let mut repo = TaskRepository::in_memory();
        let tasks = vec![task(1, "buy milk", true), task(3, "walk dog", false)];

        repo.save(&tasks, TaskId::new(4)).unwrap();
        let loaded = repo.load();

        assert_eq!(loaded.tasks, tasks);
        assert_eq!(loaded.next_id, TaskId::new(4));
    }

    #[test]
    fn test_blob_carries_version() {
        let mut repo = TaskRepository::in_memory();
        repo.save(&[task(1, "a", false)], TaskId::new(2)).unwrap();

        let blob = repo.kv().get(DEFAULT_STORAGE_KEY).unwrap().unwrap();
        let value: Value = serde_json::from_str(&blob).unwrap();
        assert_eq!(value["version"], 1);
        assert_eq!(value["next_id"], 2);
        assert_eq!(value["tasks"][0]["text"], "a");
        assert_eq!(value["tasks"][0]["completed"], false);
    }

    #[test]
    fn test_missing_loads_empty() {
        let repo = TaskRepository::in_memory();
        assert_eq!(repo.load(), Snapshot::default());
    }

    #[test]
    fn test_garbage_loads_empty() {
        for blob in ["not json", "42", r#"{"tasks": []}"#, r#"[{"completed": true}]"#] {
            let mut kv = MemoryStore::new();
            kv.set(DEFAULT_STORAGE_KEY, blob).unwrap();
            let repo = TaskRepository::new(Box::new(kv), DEFAULT_STORAGE_KEY);
            assert_eq!(repo.load(), Snapshot::default(), "blob: {blob}");
        }
    }

    #[test]
    fn test_unknown_version_loads_empty() {
        let blob = r#"{"version": 2, "next_id": 2, "tasks": [{"id": 1, "text": "a", "completed": false}]}"#;
        assert!(matches!(decode(blob), Err(StorageError::UnsupportedVersion(2))));

        let mut kv = MemoryStore::new();
        kv.set(DEFAULT_STORAGE_KEY, blob).unwrap();
        let repo = TaskRepository::new(Box::new(kv), DEFAULT_STORAGE_KEY);
        assert!(repo.load().tasks.is_empty());
    }

    #[test]
    fn test_null_decodes_empty() {
        assert_eq!(decode("null").unwrap(), Snapshot::default());
    }

    #[test]
    fn test_legacy_array_gets_sequential_ids() {
        let blob = r#"[{"text":"buy milk","completed":true},{"text":"walk dog","completed":false}]"#;
        let snapshot = decode(blob).unwrap();

        assert_eq!(snapshot.tasks, vec![task(1, "buy milk", true), task(2, "walk dog", false)]);
        assert_eq!(snapshot.next_id, TaskId::new(3));
    }

    #[test]
    fn test_next_id_raised_past_stored_ids() {
        let blob = r#"{"version": 1, "next_id": 2, "tasks": [{"id": 7, "text": "a", "completed": false}]}"#;
        assert_eq!(decode(blob).unwrap().next_id, TaskId::new(8));

        let blob = r#"{"version": 1, "tasks": [{"id": 2, "text": "a"}]}"#;
        assert_eq!(decode(blob).unwrap().next_id, TaskId::new(3));
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let blob = r#"{"version":1,"tasks":[{"id":1,"text":"a"},{"id":1,"text":"b"}]}"#;
        assert!(matches!(decode(blob), Err(StorageError::DuplicateId(id)) if id == TaskId::new(1)));

        let mut kv = MemoryStore::new();
        kv.set(DEFAULT_STORAGE_KEY, blob).unwrap();
        let repo = TaskRepository::new(Box::new(kv), DEFAULT_STORAGE_KEY);
        assert_eq!(repo.load(), Snapshot::default());
    }

    #[test]
    fn test_stored_max_id_marks_counter_exhausted() {
        let blob = format!(r#"{{"version":1,"next_id":2,"tasks":[{{"id":{},"text":"last"}}]}}"#, u64::MAX);
        let snapshot = decode(&blob).unwrap();
        assert_eq!(snapshot.tasks.len(), 1);
        assert!(snapshot.next_id.is_exhausted());
    }

    #[test]
    fn test_open_rejects_blank_key() {
        let temp = TempDir::new().unwrap();
        for key in ["", "   "] {
            let config = StorageConfig {
                backend: Backend::File,
                path: temp.path().to_path_buf(),
                key: key.to_string(),
            };
            let result = TaskRepository::open(&config);
            assert!(matches!(result, Err(StorageError::Kv(KvError::InvalidKey(_)))), "key: {key:?}");
        }
    }

    #[test]
    fn test_open_file_and_sqlite_backends() {
        let temp = TempDir::new().unwrap();
        for backend in [Backend::File, Backend::Sqlite] {
            let config = StorageConfig {
                backend,
                path: temp.path().join(format!("{backend:?}")),
                key: DEFAULT_STORAGE_KEY.to_string(),
            };
            {
                let mut repo = TaskRepository::open(&config).unwrap();
                repo.save(&[task(1, "persisted", false)], TaskId::new(2)).unwrap();
            }
            let repo = TaskRepository::open(&config).unwrap();
            assert_eq!(repo.load().tasks, vec![task(1, "persisted", false)]);
        }
    }

    /// Texts a committed edit can store: blank, padded, quoted, non-ASCII
    fn stored_text() -> impl Strategy<Value = String> {
        prop_oneof![
            Just(String::new()),
            "[ \t\n]{1,4}",
            "\"[a-z \\\\\"]{0,8}\"",
            "[a-zäöüß日本語✓ ]{0,12}",
            any::<String>(),
        ]
    }

    fn task_list() -> impl Strategy<Value = Vec<Task>> {
        proptest::collection::vec((stored_text(), any::<bool>()), 0..8).prop_map(|items| {
            items
                .into_iter()
                .zip(1u64..)
                .map(|((text, completed), id)| task(id, &text, completed))
                .collect()
        })
    }

    proptest! {
        #[test]
        fn prop_encode_decode_round_trip(tasks in task_list()) {
            let next_id = TaskId::new(tasks.len() as u64 + 1);
            let snapshot = decode(&encode(&tasks, next_id).unwrap()).unwrap();
            prop_assert_eq!(snapshot.tasks, tasks);
            prop_assert_eq!(snapshot.next_id, next_id);
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn prop_save_load_round_trip_on_disk(tasks in task_list()) {
            let temp = TempDir::new().unwrap();
            let next_id = TaskId::new(tasks.len() as u64 + 1);
            for backend in [Backend::File, Backend::Sqlite] {
                let config = StorageConfig {
                    backend,
                    path: temp.path().join(format!("{backend:?}")),
                    key: DEFAULT_STORAGE_KEY.to_string(),
                };
                TaskRepository::open(&config).unwrap().save(&tasks, next_id).unwrap();

                let loaded = TaskRepository::open(&config).unwrap().load();
                prop_assert_eq!(&loaded.tasks, &tasks);
                prop_assert_eq!(loaded.next_id, next_id);
            }
        }
    }
}
