//! tasklist - CLI entry point

use std::fs;

use clap::{CommandFactory, FromArgMatches};
use colored::*;
use eyre::{Context, Result};
use tracing::info;

use tasklist::cli::{Cli, Command, OutputFormat, generate_after_help, get_log_path};
use tasklist::config::Config;
use tasklist::{Filter, Notice, NoticeLevel, Task, TaskId, TaskList, TaskRepository, tui};

fn setup_logging(verbose: bool) -> Result<()> {
    let log_path = get_log_path();
    if let Some(log_dir) = log_path.parent() {
        fs::create_dir_all(log_dir).context("Failed to create log directory")?;
    }

    // Log to a file, never stdout/stderr: the TUI owns the terminal
    let level = if verbose { tracing::Level::DEBUG } else { tracing::Level::INFO };
    let log_file = fs::File::create(&log_path).context("Failed to create log file")?;

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    info!("Logging initialized (verbose: {})", verbose);
    Ok(())
}

fn main() -> Result<()> {
    let cmd = Cli::command().after_help(generate_after_help());
    let cli = Cli::from_arg_matches(&cmd.get_matches())?;

    setup_logging(cli.verbose).context("Failed to setup logging")?;

    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    info!(
        "tasklist loaded config: backend={:?}, path={}",
        config.storage.backend,
        config.storage.path.display()
    );

    let repo = TaskRepository::open(&config.storage).context("Failed to open task storage")?;
    let mut list = TaskList::open(repo);

    match cli.command {
        Some(Command::Add { text }) => cmd_add(&mut list, &text.join(" ")),
        Some(Command::List { filter, format }) => cmd_list(&mut list, filter, format),
        Some(Command::Toggle { id }) => cmd_toggle(&mut list, id),
        Some(Command::Edit { id, text }) => cmd_edit(&mut list, id, text.join(" ")),
        Some(Command::Delete { id }) => cmd_delete(&mut list, id),
        Some(Command::ClearCompleted) => cmd_clear_completed(&mut list),
        Some(Command::Tui) | None => tui::run(list, &config.ui),
    }
}

fn cmd_add(list: &mut TaskList, text: &str) -> Result<()> {
    if list.ids_exhausted() && !text.trim().is_empty() {
        eyre::bail!("Task ids exhausted; delete the stored list to start over");
    }
    if let Some(id) = list.add(text) {
        print_notice(&Notice::added());
        if let Some(task) = list.get(id) {
            print_task(task);
        }
    }
    Ok(())
}

fn cmd_list(list: &mut TaskList, filter: Filter, format: OutputFormat) -> Result<()> {
    list.set_filter(filter);
    let visible = list.visible_tasks();

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&visible)?);
        }
        OutputFormat::Text => {
            if visible.is_empty() {
                println!("{}", "No todos".dimmed());
            }
            for task in &visible {
                print_task(task);
            }
            let counts = list.counts();
            println!(
                "{}",
                format!("{} active, {} completed ({})", counts.active, counts.completed, filter).dimmed()
            );
        }
    }
    Ok(())
}

fn cmd_toggle(list: &mut TaskList, id: TaskId) -> Result<()> {
    list.toggle(id)?;
    if let Some(task) = list.get(id) {
        print_task(task);
    }
    Ok(())
}

fn cmd_edit(list: &mut TaskList, id: TaskId, text: String) -> Result<()> {
    list.begin_edit(id)?;
    list.set_edit_text(text)?;
    list.commit_edit()?;
    print_notice(&Notice::updated());
    if let Some(task) = list.get(id) {
        print_task(task);
    }
    Ok(())
}

fn cmd_delete(list: &mut TaskList, id: TaskId) -> Result<()> {
    let removed = list.delete(id)?;
    print_notice(&Notice::deleted());
    println!("  {} {}", format!("#{}", removed.id).dimmed(), removed.text.strikethrough());
    Ok(())
}

fn cmd_clear_completed(list: &mut TaskList) -> Result<()> {
    let removed = list.clear_completed();
    print_notice(&Notice::cleared(removed));
    Ok(())
}

fn print_notice(notice: &Notice) {
    match notice.level {
        NoticeLevel::Success => println!("{} {}", "✓".green(), notice.message),
        NoticeLevel::Info => println!("{} {}", "i".blue(), notice.message),
    }
}

fn print_task(task: &Task) {
    let id = format!("#{}", task.id).dimmed();
    if task.completed {
        println!("  {} {} {}", id, "[x]".green(), task.text.dimmed());
    } else {
        println!("  {} {} {}", id, "[ ]".yellow(), task.text);
    }
}
