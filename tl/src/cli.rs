//! CLI command definitions and subcommands

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::config::default_data_dir;
use crate::domain::{Filter, TaskId};

/// tasklist - a local to-do list
#[derive(Parser, Debug)]
#[command(
    name = "tl",
    author,
    version,
    about = "Add, edit, complete and filter a local to-do list"
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand to execute (defaults to the TUI)
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Add a task
    Add {
        /// Task text (words are joined with spaces)
        #[arg(required = true, num_args = 1.., allow_hyphen_values = true)]
        text: Vec<String>,
    },

    /// List tasks
    #[command(alias = "ls")]
    List {
        /// Which tasks to show: all, active or completed
        #[arg(short, long, default_value = "all")]
        filter: Filter,

        /// Output format
        #[arg(long, default_value = "text")]
        format: OutputFormat,
    },

    /// Flip a task between active and completed
    Toggle {
        /// Task id
        id: TaskId,
    },

    /// Replace a task's text
    Edit {
        /// Task id
        id: TaskId,

        /// New text, stored as given
        #[arg(num_args = 0.., allow_hyphen_values = true)]
        text: Vec<String>,
    },

    /// Delete a task
    #[command(alias = "rm")]
    Delete {
        /// Task id
        id: TaskId,
    },

    /// Delete every completed task
    ClearCompleted,

    /// Launch the interactive TUI
    Tui,
}

/// Log file written by every run
pub fn get_log_path() -> PathBuf {
    default_data_dir().join("logs").join("tasklist.log")
}

/// after_help text pointing at the log file
pub fn generate_after_help() -> String {
    format!("Logs are written to: {}", get_log_path().display())
}

/// Output format for listings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}
