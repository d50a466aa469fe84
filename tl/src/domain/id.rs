//! Task identifiers
//!
//! Ids come from a per-list counter starting at 1. They are never reused
//! within a persisted list, so deleting a task never shifts another task's
//! identity.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Stable identifier for a task
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(u64);

impl TaskId {
    /// First id handed out by an empty list
    pub const FIRST: TaskId = TaskId(1);

    /// Counter value marking the id space as used up. Never assigned to a task.
    pub const EXHAUSTED: TaskId = TaskId(u64::MAX);

    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn get(self) -> u64 {
        self.0
    }

    /// The id that follows this one, stopping at [`TaskId::EXHAUSTED`]
    pub fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }

    pub fn is_exhausted(self) -> bool {
        self == Self::EXHAUSTED
    }
}

impl Default for TaskId {
    fn default() -> Self {
        Self::FIRST
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for TaskId {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid task id: {0:?}")]
pub struct ParseTaskIdError(String);

impl FromStr for TaskId {
    type Err = ParseTaskIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Accept the "#3" form the CLI prints
        let digits = s.trim().trim_start_matches('#');
        digits
            .parse::<u64>()
            .map(Self)
            .map_err(|_| ParseTaskIdError(s.to_string()))
    }
}
