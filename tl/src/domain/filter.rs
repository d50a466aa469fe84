//! View filter

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::task::Task;

/// Which subset of the list is visible
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Filter {
    /// Every task
    #[default]
    All,
    /// Tasks not yet completed
    Active,
    /// Completed tasks
    Completed,
}

impl Filter {
    /// All filters in selector order
    pub const VALUES: [Filter; 3] = [Filter::All, Filter::Active, Filter::Completed];

    /// Whether `task` is visible under this filter
    pub fn matches(self, task: &Task) -> bool {
        match self {
            Self::All => true,
            Self::Active => !task.completed,
            Self::Completed => task.completed,
        }
    }

    /// Next filter in selector order, wrapping around
    pub fn cycle(self) -> Self {
        match self {
            Self::All => Self::Active,
            Self::Active => Self::Completed,
            Self::Completed => Self::All,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::All => "All",
            Self::Active => "Active",
            Self::Completed => "Completed",
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => write!(f, "all"),
            Self::Active => write!(f, "active"),
            Self::Completed => write!(f, "completed"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown filter {0:?} (expected all, active or completed)")]
pub struct ParseFilterError(String);

impl FromStr for Filter {
    type Err = ParseFilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Self::All),
            "active" => Ok(Self::Active),
            "completed" => Ok(Self::Completed),
            _ => Err(ParseFilterError(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TaskId;

    #[test]
    fn test_matches() {
        let open = Task::new(TaskId::new(1), "open");
        let mut done = Task::new(TaskId::new(2), "done");
        done.completed = true;

        assert!(Filter::All.matches(&open) && Filter::All.matches(&done));
        assert!(Filter::Active.matches(&open) && !Filter::Active.matches(&done));
        assert!(!Filter::Completed.matches(&open) && Filter::Completed.matches(&done));
    }

    #[test]
    fn test_parse_case_insensitive() {
        assert_eq!("ALL".parse::<Filter>().unwrap(), Filter::All);
        assert_eq!("Active".parse::<Filter>().unwrap(), Filter::Active);
        assert_eq!("completed".parse::<Filter>().unwrap(), Filter::Completed);
        assert!("pending".parse::<Filter>().is_err());
        assert!("done".parse::<Filter>().is_err());
    }

    #[test]
    fn test_cycle_visits_all() {
        let mut filter = Filter::default();
        for expected in Filter::VALUES {
            assert_eq!(filter, expected);
            filter = filter.cycle();
        }
        assert_eq!(filter, Filter::All);
    }
}
