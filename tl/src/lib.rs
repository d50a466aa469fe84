//! tasklist - a local to-do list
//!
//! Users add, edit, complete, delete and filter short text items. The list
//! is kept in memory by [`TaskList`] and persisted as one blob under one key
//! in a local key-value store (see [`storage`]).
//!
//! # Modules
//!
//! - [`domain`] - Task, TaskId, Filter
//! - [`storage`] - TaskRepository, the versioned blob layout
//! - [`store`] - TaskList intents and reads
//! - [`notice`] - transient confirmation notices
//! - [`config`] - configuration types and loading
//! - [`cli`] - command-line interface
//! - [`tui`] - terminal UI
//!
//! # Example
//!
//! ```
//! use tasklist::{Filter, TaskList, TaskRepository};
//!
//! let mut list = TaskList::open(TaskRepository::in_memory());
//! let milk = list.add("buy milk").unwrap();
//! list.add("walk dog");
//! list.toggle(milk).unwrap();
//!
//! list.set_filter(Filter::Active);
//! let visible: Vec<&str> = list.visible_tasks().iter().map(|t| t.text.as_str()).collect();
//! assert_eq!(visible, ["walk dog"]);
//! ```

pub mod cli;
pub mod config;
pub mod domain;
pub mod notice;
pub mod storage;
pub mod store;
pub mod tui;

pub use config::{Backend, Config, StorageConfig, UiConfig};
pub use domain::{Filter, Task, TaskId};
pub use notice::{Notice, NoticeLevel, NoticeQueue};
pub use storage::{DEFAULT_STORAGE_KEY, Snapshot, StorageError, TaskRepository};
pub use store::{EditSlot, TaskCounts, TaskList, TaskListError};
