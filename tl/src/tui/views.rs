//! TUI views and rendering
//!
//! Draws the App; never mutates it.

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph};
use tracing::trace;

use crate::domain::{Filter, Task};
use crate::notice::NoticeLevel;

use super::app::App;
use super::state::InteractionMode;

mod colors {
    use ratatui::style::Color;

    pub const HEADER: Color = Color::Rgb(0, 255, 255); // Cyan
    pub const KEYBIND: Color = Color::Rgb(0, 255, 255);
    pub const ACTIVE: Color = Color::Rgb(255, 215, 0); // Gold
    pub const COMPLETE: Color = Color::Rgb(50, 205, 50); // Lime green
    pub const EDITING: Color = Color::Rgb(100, 149, 237); // Cornflower blue
    pub const SELECTED_BG: Color = Color::Rgb(40, 40, 40);
    pub const DIM: Color = Color::DarkGray;
}

/// Main render function
pub fn render(app: &App, frame: &mut Frame) {
    trace!("render: called");
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header + filter tabs
            Constraint::Length(3), // New task input
            Constraint::Min(0),    // Task rows
            Constraint::Length(3), // Footer
        ])
        .split(frame.area());

    render_header(app, frame, chunks[0]);
    render_input(app, frame, chunks[1]);
    render_tasks(app, frame, chunks[2]);
    render_footer(app, frame, chunks[3]);

    if app.state().mode == InteractionMode::Help {
        render_help_overlay(frame, frame.area());
    }
}

fn render_header(app: &App, frame: &mut Frame, area: Rect) {
    let list = app.list();
    let mut spans = vec![
        Span::styled(" Todo App", Style::default().fg(colors::HEADER).add_modifier(Modifier::BOLD)),
        Span::raw(" │ "),
    ];
    for (i, filter) in Filter::VALUES.into_iter().enumerate() {
        let label = format!("{}:{}", i + 1, filter.label());
        let style = if filter == list.filter() {
            Style::default().fg(colors::HEADER).add_modifier(Modifier::BOLD | Modifier::REVERSED)
        } else {
            Style::default().fg(colors::DIM)
        };
        spans.push(Span::styled(label, style));
        spans.push(Span::raw(" "));
    }
    let counts = list.counts();
    spans.push(Span::styled(
        format!("│ {} active, {} done", counts.active, counts.completed),
        Style::default().fg(colors::DIM),
    ));

    let header = Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::ALL));
    frame.render_widget(header, area);
}

fn render_input(app: &App, frame: &mut Frame, area: Rect) {
    let state = app.state();
    let content = if state.mode == InteractionMode::Input {
        Line::from(vec![Span::raw(state.input.as_str()), Span::styled("█", Style::default().fg(colors::KEYBIND))])
    } else {
        Line::from(Span::styled("Enter a new todo (a)", Style::default().fg(colors::DIM)))
    };
    let input = Paragraph::new(content).block(Block::default().borders(Borders::ALL).title(" New "));
    frame.render_widget(input, area);
}

fn render_tasks(app: &App, frame: &mut Frame, area: Rect) {
    let list = app.list();
    let editing = list.edit_slot();
    let in_edit_mode = app.state().mode == InteractionMode::Edit;

    let items: Vec<ListItem> = list
        .visible_tasks()
        .into_iter()
        .map(|task| match editing {
            Some(slot) if slot.id() == task.id => editing_row(task, slot.text(), in_edit_mode),
            _ => task_row(task),
        })
        .collect();

    let title = format!(" Tasks ({}) ", list.filter().label());
    let widget = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(title))
        .highlight_style(Style::default().bg(colors::SELECTED_BG).add_modifier(Modifier::BOLD))
        .highlight_symbol("▶ ");

    let mut state = ListState::default();
    if !list.visible_tasks().is_empty() {
        state.select(Some(app.state().selected));
    }
    frame.render_stateful_widget(widget, area, &mut state);
}

fn task_row(task: &Task) -> ListItem<'_> {
    let (icon, style) = if task.completed {
        (
            "✓",
            Style::default().fg(colors::COMPLETE).add_modifier(Modifier::CROSSED_OUT | Modifier::DIM),
        )
    } else {
        ("○", Style::default().fg(colors::ACTIVE))
    };
    ListItem::new(Line::from(vec![
        Span::styled(format!("{icon} "), style),
        Span::styled(format!("#{:<4}", task.id), Style::default().fg(colors::DIM)),
        Span::styled(task.text.as_str(), style),
    ]))
}

fn editing_row<'a>(task: &'a Task, scratch: &'a str, typing: bool) -> ListItem<'a> {
    let cursor = if typing { "█" } else { "" };
    ListItem::new(Line::from(vec![
        Span::styled("✎ ", Style::default().fg(colors::EDITING)),
        Span::styled(format!("#{:<4}", task.id), Style::default().fg(colors::DIM)),
        Span::styled(scratch, Style::default().fg(colors::EDITING).add_modifier(Modifier::UNDERLINED)),
        Span::styled(cursor, Style::default().fg(colors::KEYBIND)),
    ]))
}

fn render_footer(app: &App, frame: &mut Frame, area: Rect) {
    let line = if let Some(notice) = app.notices().latest() {
        let color = match notice.level {
            NoticeLevel::Success => Color::Green,
            NoticeLevel::Info => Color::Blue,
        };
        Line::from(Span::styled(
            format!(" {}", notice.message),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ))
    } else {
        let keys: &[(&str, &str)] = match app.state().mode {
            InteractionMode::Input => &[("[Enter]", "Add"), ("[Esc]", "Cancel")],
            InteractionMode::Edit => &[("[Enter]", "Update"), ("[Esc]", "Leave open")],
            InteractionMode::Normal | InteractionMode::Help => &[
                ("a", "Add"),
                ("space", "Toggle"),
                ("e", "Edit"),
                ("d", "Delete"),
                ("f", "Filter"),
                ("?", "Help"),
                ("q", "Quit"),
            ],
        };
        let mut spans = vec![Span::raw(" ")];
        for (key, action) in keys {
            spans.push(Span::styled(*key, Style::default().fg(colors::KEYBIND)));
            spans.push(Span::raw(format!(" {action}  ")));
        }
        Line::from(spans)
    };

    let footer = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
    frame.render_widget(footer, area);
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let popup_area = centered_rect(50, 60, area);
    frame.render_widget(Clear, popup_area);

    let key_line = |key: &'static str, desc: &'static str| {
        Line::from(vec![
            Span::styled(format!("{key:>10}"), Style::default().fg(colors::KEYBIND)),
            Span::raw(format!("  {desc}")),
        ])
    };
    let help_text = vec![
        key_line("j/k", "Move selection"),
        key_line("a", "Add a task"),
        key_line("space", "Toggle completed"),
        key_line("e", "Edit (Enter to update)"),
        key_line("d", "Delete"),
        key_line("f / 1-3", "Filter all/active/completed"),
        key_line("c", "Clear completed"),
        key_line("q", "Quit"),
    ];
    let help = Paragraph::new(help_text).block(Block::default().borders(Borders::ALL).title(" Help "));
    frame.render_widget(help, popup_area);
}

/// Rect centered in `area`, sized by percentage
fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::TaskRepository;
    use crate::store::TaskList;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;
    use std::time::Duration;

    fn screen(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(60, 16)).unwrap();
        terminal.draw(|frame| render(app, frame)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_render_rows_and_filter() {
        let mut list = TaskList::open(TaskRepository::in_memory());
        let milk = list.add("buy milk").unwrap();
        list.add("walk dog").unwrap();
        list.toggle(milk).unwrap();
        list.set_filter(Filter::Active);
        let app = App::new(list, Duration::from_millis(2000));

        let text = screen(&app);
        assert!(text.contains("walk dog"));
        assert!(!text.contains("buy milk"));
        assert!(text.contains("Tasks (Active)"));
    }

    #[test]
    fn test_render_empty_list() {
        let app = App::new(TaskList::open(TaskRepository::in_memory()), Duration::from_millis(2000));
        let text = screen(&app);
        assert!(text.contains("Todo App"));
        assert!(text.contains("Enter a new todo"));
    }
}
