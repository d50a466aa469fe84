//! TUI state - interaction mode and selection
//!
//! Holds only presentation state. Tasks, filter and the edit slot live in
//! the TaskList.

/// What keystrokes currently mean
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InteractionMode {
    /// Navigate and trigger intents
    #[default]
    Normal,
    /// Typing a new task
    Input,
    /// Typing into the open edit slot
    Edit,
    /// Key help overlay
    Help,
}

/// Presentation state
#[derive(Debug, Default)]
pub struct AppState {
    pub mode: InteractionMode,

    /// Row index into the visible tasks
    pub selected: usize,

    /// New-task input buffer
    pub input: String,

    pub should_quit: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep the selection inside `0..len`
    pub fn clamp_selection(&mut self, len: usize) {
        if len == 0 {
            self.selected = 0;
        } else if self.selected >= len {
            self.selected = len - 1;
        }
    }

    pub fn select_next(&mut self, len: usize) {
        if len > 0 {
            self.selected = (self.selected + 1).min(len - 1);
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selection_bounds() {
        let mut state = AppState::new();
        state.select_prev();
        assert_eq!(state.selected, 0);

        state.select_next(3);
        state.select_next(3);
        state.select_next(3);
        assert_eq!(state.selected, 2);

        state.clamp_selection(1);
        assert_eq!(state.selected, 0);

        state.clamp_selection(0);
        assert_eq!(state.selected, 0);
    }
}
