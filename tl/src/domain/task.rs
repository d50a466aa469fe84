//! Task record

use serde::{Deserialize, Serialize};

use super::id::TaskId;

/// A single to-do entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Stable identifier
    pub id: TaskId,

    /// Display text
    pub text: String,

    /// Whether the task is done
    #[serde(default)]
    pub completed: bool,
}

impl Task {
    /// Create an open task
    pub fn new(id: TaskId, text: impl Into<String>) -> Self {
        Self {
            id,
            text: text.into(),
            completed: false,
        }
    }

    /// Flip the completion flag, returning the new value
    pub fn toggle(&mut self) -> bool {
        self.completed = !self.completed;
        self.completed
    }
}
