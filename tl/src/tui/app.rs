//! TUI application - key handling
//!
//! The App owns the TaskList and turns keystrokes into intents. It does not
//! render; that is the views module's job.

use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::{debug, warn};

use crate::domain::{Filter, TaskId};
use crate::notice::{Notice, NoticeQueue};
use crate::store::TaskList;

use super::state::{AppState, InteractionMode};

/// TUI application
pub struct App {
    list: TaskList,
    state: AppState,
    notices: NoticeQueue,
}

impl App {
    pub fn new(list: TaskList, notice_duration: Duration) -> Self {
        debug!("App::new: called");
        Self {
            list,
            state: AppState::new(),
            notices: NoticeQueue::new(notice_duration),
        }
    }

    pub fn list(&self) -> &TaskList {
        &self.list
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn notices(&self) -> &NoticeQueue {
        &self.notices
    }

    pub fn should_quit(&self) -> bool {
        self.state.should_quit
    }

    /// Id of the task under the cursor
    pub fn selected_id(&self) -> Option<TaskId> {
        self.list.visible_tasks().get(self.state.selected).map(|t| t.id)
    }

    /// Periodic housekeeping
    pub fn tick(&mut self, now: Instant) {
        self.notices.prune(now);
    }

    /// Handle a key event
    ///
    /// Returns true if the application should exit.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        debug!(?key, mode = ?self.state.mode, "App::handle_key: called");
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.state.should_quit = true;
            return true;
        }

        match self.state.mode {
            InteractionMode::Normal => self.handle_normal_key(key),
            InteractionMode::Input => self.handle_input_key(key),
            InteractionMode::Edit => self.handle_edit_key(key),
            InteractionMode::Help => self.state.mode = InteractionMode::Normal,
        }

        self.state.clamp_selection(self.list.visible_tasks().len());
        self.state.should_quit
    }

    fn handle_normal_key(&mut self, key: KeyEvent) {
        let visible = self.list.visible_tasks().len();
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.state.should_quit = true,
            KeyCode::Char('j') | KeyCode::Down => self.state.select_next(visible),
            KeyCode::Char('k') | KeyCode::Up => self.state.select_prev(),
            KeyCode::Char('g') | KeyCode::Home => self.state.selected = 0,
            KeyCode::Char('G') | KeyCode::End => self.state.selected = visible.saturating_sub(1),
            KeyCode::Char('a') | KeyCode::Char('i') => {
                self.state.input.clear();
                self.state.mode = InteractionMode::Input;
            }
            KeyCode::Char(' ') | KeyCode::Char('x') | KeyCode::Enter => self.toggle_selected(),
            KeyCode::Char('e') => self.edit_selected(),
            KeyCode::Char('d') | KeyCode::Delete => self.delete_selected(),
            KeyCode::Char('f') | KeyCode::Tab => self.list.set_filter(self.list.filter().cycle()),
            KeyCode::Char('1') => self.list.set_filter(Filter::All),
            KeyCode::Char('2') => self.list.set_filter(Filter::Active),
            KeyCode::Char('3') => self.list.set_filter(Filter::Completed),
            KeyCode::Char('c') => {
                let removed = self.list.clear_completed();
                if removed > 0 {
                    self.notices.push(Notice::cleared(removed));
                }
            }
            KeyCode::Char('?') => self.state.mode = InteractionMode::Help,
            _ => {}
        }
    }

    fn handle_input_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter => {
                let text = std::mem::take(&mut self.state.input);
                if let Some(id) = self.list.add(&text) {
                    self.notices.push(Notice::added());
                    self.select(id);
                }
                self.state.mode = InteractionMode::Normal;
            }
            KeyCode::Esc => {
                self.state.input.clear();
                self.state.mode = InteractionMode::Normal;
            }
            KeyCode::Backspace => {
                self.state.input.pop();
            }
            KeyCode::Char(c) => self.state.input.push(c),
            _ => {}
        }
    }

    fn handle_edit_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter => {
                match self.list.commit_edit() {
                    Ok(_) => self.notices.push(Notice::updated()),
                    Err(e) => warn!(error = %e, "Commit edit failed"),
                }
                self.state.mode = InteractionMode::Normal;
            }
            // Leaves the slot open; `e` on the same row resumes it
            KeyCode::Esc => self.state.mode = InteractionMode::Normal,
            KeyCode::Backspace => self.update_scratch(|text| {
                text.pop();
            }),
            KeyCode::Char(c) => self.update_scratch(|text| text.push(c)),
            _ => {}
        }
    }

    fn update_scratch(&mut self, f: impl FnOnce(&mut String)) {
        let Some(slot) = self.list.edit_slot() else {
            self.state.mode = InteractionMode::Normal;
            return;
        };
        let mut text = slot.text().to_string();
        f(&mut text);
        if let Err(e) = self.list.set_edit_text(text) {
            warn!(error = %e, "Edit text update failed");
        }
    }

    fn toggle_selected(&mut self) {
        if let Some(id) = self.selected_id()
            && let Err(e) = self.list.toggle(id)
        {
            warn!(error = %e, "Toggle failed");
        }
    }

    fn edit_selected(&mut self) {
        let Some(id) = self.selected_id() else {
            return;
        };
        let resuming = self.list.edit_slot().is_some_and(|slot| slot.id() == id);
        if !resuming && let Err(e) = self.list.begin_edit(id) {
            warn!(error = %e, "Begin edit failed");
            return;
        }
        self.state.mode = InteractionMode::Edit;
    }

    fn delete_selected(&mut self) {
        let Some(id) = self.selected_id() else {
            return;
        };
        match self.list.delete(id) {
            Ok(_) => self.notices.push(Notice::deleted()),
            Err(e) => warn!(error = %e, "Delete failed"),
        }
    }

    /// Move the cursor onto `id` if it is visible
    fn select(&mut self, id: TaskId) {
        if let Some(pos) = self.list.visible_tasks().iter().position(|t| t.id == id) {
            self.state.selected = pos;
        }
    }
}
