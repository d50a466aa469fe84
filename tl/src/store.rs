//! TaskList - the in-memory task list and its intents
//!
//! TaskList owns the tasks, the active filter and the edit slot. Front ends
//! never touch the list directly; they call intents and read snapshots.
//! Every intent that changes the list persists the whole list before
//! returning, so a read right after an intent always observes it.

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::domain::{Filter, Task, TaskId};
use crate::storage::TaskRepository;

/// Errors from task list intents
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TaskListError {
    #[error("Task not found: {0}")]
    NotFound(TaskId),

    #[error("No edit in progress")]
    NoEditInProgress,
}

/// In-progress edit of one task
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditSlot {
    id: TaskId,
    text: String,
}

impl EditSlot {
    /// Task being edited
    pub fn id(&self) -> TaskId {
        self.id
    }

    /// Scratch text, not yet written to the task
    pub fn text(&self) -> &str {
        &self.text
    }
}

/// Task totals for status lines
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskCounts {
    pub total: usize,
    pub active: usize,
    pub completed: usize,
}

/// The task list store
pub struct TaskList {
    tasks: Vec<Task>,
    next_id: TaskId,
    filter: Filter,
    edit: Option<EditSlot>,
    repo: TaskRepository,
}

impl TaskList {
    /// Load the list from `repo`
    pub fn open(repo: TaskRepository) -> Self {
        let snapshot = repo.load();
        info!(count = snapshot.tasks.len(), key = repo.key(), "Loaded task list");
        Self {
            tasks: snapshot.tasks,
            next_id: snapshot.next_id,
            filter: Filter::default(),
            edit: None,
            repo,
        }
    }

    // === Intents ===

    /// Append a task. Blank input is ignored and returns `None`, as does
    /// any add once the id counter is exhausted.
    pub fn add(&mut self, raw: &str) -> Option<TaskId> {
        let text = raw.trim();
        if text.is_empty() {
            debug!("TaskList::add: ignoring blank input");
            return None;
        }
        if self.ids_exhausted() {
            warn!(next_id = %self.next_id, "Task ids exhausted, not adding");
            return None;
        }

        let id = self.next_id;
        self.next_id = id.next();
        self.tasks.push(Task::new(id, text));
        debug!(%id, "TaskList::add: appended");
        self.persist();
        Some(id)
    }

    /// Flip completion of `id`, returning the new value
    pub fn toggle(&mut self, id: TaskId) -> Result<bool, TaskListError> {
        let pos = self.position(id)?;
        let completed = self.tasks[pos].toggle();
        debug!(%id, completed, "TaskList::toggle: flipped");
        self.persist();
        Ok(completed)
    }

    /// Open the edit slot on `id` with a copy of its text.
    ///
    /// Any edit already open is replaced and its scratch text dropped.
    pub fn begin_edit(&mut self, id: TaskId) -> Result<(), TaskListError> {
        let pos = self.position(id)?;
        if let Some(prev) = &self.edit
            && prev.id != id
        {
            debug!(prev = %prev.id, %id, "TaskList::begin_edit: discarding open edit");
        }
        self.edit = Some(EditSlot {
            id,
            text: self.tasks[pos].text.clone(),
        });
        Ok(())
    }

    /// Replace the scratch text of the open edit
    pub fn set_edit_text(&mut self, text: impl Into<String>) -> Result<(), TaskListError> {
        let slot = self.edit.as_mut().ok_or(TaskListError::NoEditInProgress)?;
        slot.text = text.into();
        Ok(())
    }

    /// Write the scratch text into the edited task and close the slot.
    ///
    /// Unlike `add`, the text is stored as-is: no trim, blank allowed.
    pub fn commit_edit(&mut self) -> Result<TaskId, TaskListError> {
        let slot = self.edit.take().ok_or(TaskListError::NoEditInProgress)?;
        let pos = self.position(slot.id)?;
        self.tasks[pos].text = slot.text;
        debug!(id = %slot.id, "TaskList::commit_edit: written");
        self.persist();
        Ok(slot.id)
    }

    /// Remove `id`. Other tasks keep their ids and order.
    pub fn delete(&mut self, id: TaskId) -> Result<Task, TaskListError> {
        let pos = self.position(id)?;
        let removed = self.tasks.remove(pos);
        if self.edit.as_ref().is_some_and(|slot| slot.id == id) {
            debug!(%id, "TaskList::delete: closing edit on deleted task");
            self.edit = None;
        }
        debug!(%id, "TaskList::delete: removed");
        self.persist();
        Ok(removed)
    }

    /// Remove every completed task, returning how many went
    pub fn clear_completed(&mut self) -> usize {
        let before = self.tasks.len();
        self.tasks.retain(|t| !t.completed);
        let removed = before - self.tasks.len();
        if removed == 0 {
            return 0;
        }
        let tasks = &self.tasks;
        if self.edit.as_ref().is_some_and(|slot| !tasks.iter().any(|t| t.id == slot.id)) {
            self.edit = None;
        }
        debug!(removed, "TaskList::clear_completed: removed");
        self.persist();
        removed
    }

    /// Change the visible subset. The list itself is untouched.
    pub fn set_filter(&mut self, filter: Filter) {
        debug!(%filter, "TaskList::set_filter: called");
        self.filter = filter;
    }

    // === Reads ===

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn filter(&self) -> Filter {
        self.filter
    }

    pub fn edit_slot(&self) -> Option<&EditSlot> {
        self.edit.as_ref()
    }

    /// Tasks under the active filter, in list order
    pub fn visible_tasks(&self) -> Vec<&Task> {
        let filter = self.filter;
        self.tasks.iter().filter(|t| filter.matches(t)).collect()
    }

    pub fn counts(&self) -> TaskCounts {
        let completed = self.tasks.iter().filter(|t| t.completed).count();
        TaskCounts {
            total: self.tasks.len(),
            active: self.tasks.len() - completed,
            completed,
        }
    }

    /// Whether `add` can no longer hand out fresh ids
    pub fn ids_exhausted(&self) -> bool {
        self.next_id.is_exhausted()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn repository(&self) -> &TaskRepository {
        &self.repo
    }

    fn position(&self, id: TaskId) -> Result<usize, TaskListError> {
        self.tasks
            .iter()
            .position(|t| t.id == id)
            .ok_or(TaskListError::NotFound(id))
    }

    /// Save the full list. Failures are logged, not returned.
    fn persist(&mut self) {
        if let Err(e) = self.repo.save(&self.tasks, self.next_id) {
            warn!(error = %e, count = self.tasks.len(), "Failed to persist task list");
        }
    }
}
