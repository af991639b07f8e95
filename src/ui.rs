use std::io;
use std::time::{Duration, Instant};

use anyhow::Result;
use chrono::Local;
use crossterm::{
    event::{self, Event, KeyCode},
    terminal::{disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame, Terminal,
};

use crate::app::{App, FeedbackKind, TaskForm};
use crate::storage::KeyValueStore;
use crate::task::Task;
use crate::view::Projection;

const TICK: Duration = Duration::from_millis(250);

pub fn run_app<B: Backend, S: KeyValueStore>(
    terminal: &mut Terminal<B>,
    app: &mut App<S>,
) -> Result<()> {
    loop {
        app.tick(Instant::now());
        terminal.draw(|f| draw(f, app))?;

        if !event::poll(TICK)? {
            continue;
        }
        if let Event::Key(key) = event::read()? {
            match key.code {
                KeyCode::Char('q') => return Ok(()), // Quit
                KeyCode::Char('a') => {
                    if let Some(form) = prompt_new_task() {
                        app.submit_create(&form)?;
                    }
                }
                KeyCode::Char('e') => {
                    if let Some(id) = app.selected_task_id() {
                        if let Some(current) = app.store.get(id).cloned() {
                            if let Some(form) = prompt_edit_task(&current) {
                                app.submit_update(id, &form)?;
                            }
                        }
                    }
                }
                KeyCode::Char('d') => {
                    if let Some(id) = app.selected_task_id() {
                        if confirm("Delete this task? [y/N]") {
                            app.delete_task(id)?;
                        }
                    }
                }
                KeyCode::Char(' ') | KeyCode::Enter => app.toggle_selected()?,
                KeyCode::Char('s') => app.cycle_status_filter(),
                KeyCode::Char('p') => app.cycle_priority_filter(),
                KeyCode::Char('c') => app.cycle_category_filter(),
                KeyCode::Up => app.select_previous(),
                KeyCode::Down => app.select_next(),
                _ => {}
            }
        }
    }
}

fn draw<S: KeyValueStore>(f: &mut Frame, app: &App<S>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(3),
            Constraint::Length(3),
        ])
        .split(f.area());

    draw_stats(f, app, chunks[0]);
    draw_filters(f, app, chunks[1]);
    draw_tasks(f, app, chunks[2]);
    draw_footer(f, app, chunks[3]);
}

fn draw_stats<S: KeyValueStore>(f: &mut Frame, app: &App<S>, area: Rect) {
    let stats = app.stats();
    let line = Line::from(vec![
        Span::raw(format!("{} total", stats.total)),
        Span::raw("  |  "),
        Span::raw(format!("{} active", stats.active)),
        Span::raw("  |  "),
        Span::raw(format!("{} done", stats.completed)),
        Span::raw("  |  "),
        Span::styled(
            format!("{} high priority open", stats.high_priority),
            Style::default().fg(Color::Red),
        ),
    ]);
    f.render_widget(
        Paragraph::new(line).block(Block::default().title("taskdeck").borders(Borders::ALL)),
        area,
    );
}

fn draw_filters<S: KeyValueStore>(f: &mut Frame, app: &App<S>, area: Rect) {
    let line = Line::from(vec![
        Span::raw(format!("[s]tatus: {}", app.status_filter.label())),
        Span::raw("   "),
        Span::raw(format!("[p]riority: {}", app.priority_filter.label())),
        Span::raw("   "),
        Span::raw(format!("[c]ategory: {}", app.category_filter.label())),
    ]);
    f.render_widget(
        Paragraph::new(line).block(Block::default().title("Filters").borders(Borders::ALL)),
        area,
    );
}

fn draw_tasks<S: KeyValueStore>(f: &mut Frame, app: &App<S>, area: Rect) {
    let block = Block::default().title("Tasks").borders(Borders::ALL);
    match app.visible() {
        Projection::NoTasks => {
            f.render_widget(
                Paragraph::new("No tasks yet. Press 'a' to add one.").block(block),
                area,
            );
        }
        Projection::NoMatches => {
            f.render_widget(
                Paragraph::new("No tasks match the current filters.").block(block),
                area,
            );
        }
        Projection::Tasks(tasks) => {
            let today = Local::now().date_naive();
            let items: Vec<ListItem> = tasks
                .iter()
                .enumerate()
                .map(|(i, task)| {
                    let mut item = ListItem::new(task_line(task, today));
                    if i == app.selected {
                        item = item.style(Style::default().add_modifier(Modifier::REVERSED));
                    }
                    item
                })
                .collect();
            f.render_widget(List::new(items).block(block), area);
        }
    }
}

fn task_line(task: &Task, today: chrono::NaiveDate) -> Line<'_> {
    let title_style = if task.completed {
        Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::CROSSED_OUT)
    } else {
        Style::default().fg(Color::White)
    };
    let mut spans = vec![
        Span::raw(if task.completed { "[x] " } else { "[ ] " }),
        Span::raw(format!("[#{}] ", task.id)),
        Span::styled(task.title.as_str(), title_style),
        Span::raw(format!(
            "  ({} | {} | due {})",
            task.priority, task.category, task.deadline
        )),
    ];
    if task.is_overdue(today) {
        spans.push(Span::styled(
            "  OVERDUE",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ));
    }
    Line::from(spans)
}

fn draw_footer<S: KeyValueStore>(f: &mut Frame, app: &App<S>, area: Rect) {
    let paragraph = match &app.feedback {
        Some(feedback) => {
            let style = match feedback.kind {
                FeedbackKind::Success => Style::default().fg(Color::Green),
                FeedbackKind::Error => Style::default().fg(Color::Red),
            };
            Paragraph::new(Span::styled(feedback.text.as_str(), style))
        }
        None => Paragraph::new(
            "a add  e edit  d delete  space/enter toggle  s/p/c filters  up/down move  q quit",
        ),
    };
    f.render_widget(
        paragraph.block(Block::default().borders(Borders::ALL)),
        area,
    );
}

fn prompt_new_task() -> Option<TaskForm> {
    Some(TaskForm {
        title: prompt("Title")?,
        category: prompt("Category (personal/work/study/health/others)")?,
        description: prompt("Description (optional)")?,
        deadline: prompt("Deadline (YYYY-MM-DD)")?,
        priority: prompt("Priority (high/medium/low)")?,
    })
}

// Blank input keeps the current value; typing "cancel" abandons the edit.
fn prompt_edit_task(task: &Task) -> Option<TaskForm> {
    Some(TaskForm {
        title: prompt_or(&format!("Title [{}]", task.title), &task.title)?,
        category: prompt_or(
            &format!("Category [{}]", task.category),
            &task.category.to_string(),
        )?,
        description: prompt_or(
            &format!("Description [{}]", task.description),
            &task.description,
        )?,
        deadline: prompt_or(
            &format!("Deadline [{}]", task.deadline),
            &task.deadline.to_string(),
        )?,
        priority: prompt_or(
            &format!("Priority [{}]", task.priority),
            &task.priority.to_string(),
        )?,
    })
}

fn prompt_or(message: &str, current: &str) -> Option<String> {
    let input = prompt(message)?;
    if input.eq_ignore_ascii_case("cancel") {
        return None;
    }
    if input.is_empty() {
        Some(current.to_string())
    } else {
        Some(input)
    }
}

fn confirm(message: &str) -> bool {
    prompt(message).is_some_and(|answer| answer.eq_ignore_ascii_case("y"))
}

fn prompt(message: &str) -> Option<String> {
    disable_raw_mode().ok();
    println!("{}", message);
    let mut input = String::new();
    let read = io::stdin().read_line(&mut input).ok();
    enable_raw_mode().ok();
    read.map(|_| input.trim().to_string())
}
