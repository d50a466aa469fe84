//! Transient confirmation notices
//!
//! Notices are informational only. They expire after a fixed duration and
//! nothing depends on their content.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use tracing::trace;

/// Default lifetime of a notice
pub const DEFAULT_NOTICE_DURATION: Duration = Duration::from_millis(2000);

/// Maximum notices kept at once
const MAX_NOTICES: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Info,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    pub fn added() -> Self {
        Self::success("Todo added.")
    }

    pub fn updated() -> Self {
        Self::success("Todo updated.")
    }

    pub fn deleted() -> Self {
        Self::info("Todo deleted.")
    }

    pub fn cleared(count: usize) -> Self {
        let noun = if count == 1 { "todo" } else { "todos" };
        Self::info(format!("Cleared {count} completed {noun}."))
    }
}

/// Queue of live notices, newest last
#[derive(Debug)]
pub struct NoticeQueue {
    duration: Duration,
    entries: VecDeque<(Instant, Notice)>,
}

impl Default for NoticeQueue {
    fn default() -> Self {
        Self::new(DEFAULT_NOTICE_DURATION)
    }
}

impl NoticeQueue {
    pub fn new(duration: Duration) -> Self {
        Self {
            duration,
            entries: VecDeque::new(),
        }
    }

    pub fn push(&mut self, notice: Notice) {
        self.push_at(notice, Instant::now());
    }

    /// Push a notice that was raised at `now`
    pub fn push_at(&mut self, notice: Notice, now: Instant) {
        trace!(?notice, "NoticeQueue::push_at: called");
        if self.entries.len() == MAX_NOTICES {
            self.entries.pop_front();
        }
        self.entries.push_back((now + self.duration, notice));
    }

    /// Drop notices that expired at or before `now`
    pub fn prune(&mut self, now: Instant) {
        self.entries.retain(|(expires, _)| *expires > now);
    }

    /// Most recent live notice
    pub fn latest(&self) -> Option<&Notice> {
        self.entries.back().map(|(_, notice)| notice)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
