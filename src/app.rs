use std::time::{Duration, Instant};

use chrono::NaiveDate;

use crate::storage::{KeyValueStore, StorageError};
use crate::store::{StoreError, TaskStore};
use crate::task::{Category, Priority};
use crate::view::{self, CategoryFilter, PriorityFilter, Projection, Stats, StatusFilter};

/// How long a feedback line stays visible before the tick clears it.
const FEEDBACK_TTL: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackKind {
    Success,
    Error,
}

/// Transient inline message with a fixed lifetime.
#[derive(Debug, Clone)]
pub struct Feedback {
    pub text: String,
    pub kind: FeedbackKind,
    expires_at: Instant,
}

/// Raw form input, exactly as typed. Parsed on submit.
#[derive(Debug, Clone, Default)]
pub struct TaskForm {
    pub title: String,
    pub category: String,
    pub description: String,
    pub deadline: String,
    pub priority: String,
}

struct ParsedForm {
    title: String,
    category: Category,
    description: String,
    deadline: NaiveDate,
    priority: Priority,
}

fn parse_form(form: &TaskForm) -> Result<ParsedForm, StoreError> {
    if form.title.trim().is_empty() {
        return Err(StoreError::Validation("title"));
    }
    let category = form
        .category
        .trim()
        .parse()
        .map_err(|_| StoreError::Validation("category"))?;
    let deadline = form
        .deadline
        .trim()
        .parse()
        .map_err(|_| StoreError::Validation("deadline"))?;
    let priority = form
        .priority
        .trim()
        .parse()
        .map_err(|_| StoreError::Validation("priority"))?;
    Ok(ParsedForm {
        title: form.title.trim().to_string(),
        category,
        description: form.description.trim().to_string(),
        deadline,
        priority,
    })
}

/// Everything the event loop needs between keypresses: the store, the
/// current filter selections, the list cursor and the feedback line.
pub struct App<S: KeyValueStore> {
    pub store: TaskStore<S>,
    pub status_filter: StatusFilter,
    pub priority_filter: PriorityFilter,
    pub category_filter: CategoryFilter,
    pub selected: usize,
    pub feedback: Option<Feedback>,
}

impl<S: KeyValueStore> App<S> {
    pub fn new(store: TaskStore<S>) -> Self {
        Self {
            store,
            status_filter: StatusFilter::default(),
            priority_filter: PriorityFilter::default(),
            category_filter: CategoryFilter::default(),
            selected: 0,
            feedback: None,
        }
    }

    /// The display-ordered slice of the collection under the current filters.
    pub fn visible(&self) -> Projection<'_> {
        view::project(
            self.store.tasks(),
            self.status_filter,
            self.priority_filter,
            self.category_filter,
        )
    }

    pub fn stats(&self) -> Stats {
        Stats::of(self.store.tasks())
    }

    pub fn selected_task_id(&self) -> Option<u32> {
        self.visible().tasks().get(self.selected).map(|t| t.id)
    }

    pub fn select_previous(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn select_next(&mut self) {
        let len = self.visible().tasks().len();
        if self.selected + 1 < len {
            self.selected += 1;
        }
    }

    fn clamp_selection(&mut self) {
        let len = self.visible().tasks().len();
        if self.selected >= len {
            self.selected = len.saturating_sub(1);
        }
    }

    /// Clears the feedback line once its lifetime has elapsed. Driven by the
    /// event-loop poll timeout, so no keypress is needed.
    pub fn tick(&mut self, now: Instant) {
        if self.feedback.as_ref().is_some_and(|f| now >= f.expires_at) {
            self.feedback = None;
        }
    }

    fn show_feedback(&mut self, text: impl Into<String>, kind: FeedbackKind) {
        self.feedback = Some(Feedback {
            text: text.into(),
            kind,
            expires_at: Instant::now() + FEEDBACK_TTL,
        });
    }

    /// Validation and not-found problems become inline feedback; only a
    /// storage failure propagates, since the session cannot recover from it.
    pub fn submit_create(&mut self, form: &TaskForm) -> Result<(), StorageError> {
        let parsed = match parse_form(form) {
            Ok(parsed) => parsed,
            Err(err) => {
                self.show_feedback(err.to_string(), FeedbackKind::Error);
                return Ok(());
            }
        };
        match self.store.create(
            &parsed.title,
            parsed.category,
            &parsed.description,
            parsed.deadline,
            parsed.priority,
        ) {
            Ok(task) => {
                self.show_feedback(format!("Task \"{}\" added", task.title), FeedbackKind::Success);
                Ok(())
            }
            Err(StoreError::Storage(err)) => Err(err),
            Err(err) => {
                self.show_feedback(err.to_string(), FeedbackKind::Error);
                Ok(())
            }
        }
    }

    pub fn submit_update(&mut self, id: u32, form: &TaskForm) -> Result<(), StorageError> {
        let parsed = match parse_form(form) {
            Ok(parsed) => parsed,
            Err(err) => {
                self.show_feedback(err.to_string(), FeedbackKind::Error);
                return Ok(());
            }
        };
        match self.store.update(
            id,
            &parsed.title,
            parsed.category,
            &parsed.description,
            parsed.deadline,
            parsed.priority,
        ) {
            Ok(task) => {
                self.show_feedback(
                    format!("Task \"{}\" updated", task.title),
                    FeedbackKind::Success,
                );
                Ok(())
            }
            Err(StoreError::Storage(err)) => Err(err),
            Err(err) => {
                self.show_feedback(err.to_string(), FeedbackKind::Error);
                Ok(())
            }
        }
    }

    pub fn delete_task(&mut self, id: u32) -> Result<(), StorageError> {
        self.store.delete(id)?;
        self.show_feedback("Task deleted", FeedbackKind::Success);
        self.clamp_selection();
        Ok(())
    }

    pub fn toggle_selected(&mut self) -> Result<(), StorageError> {
        if let Some(id) = self.selected_task_id() {
            self.store.toggle_complete(id)?;
            // Completing a task can move it out of the active filter.
            self.clamp_selection();
        }
        Ok(())
    }

    pub fn cycle_status_filter(&mut self) {
        self.status_filter = self.status_filter.cycle();
        self.selected = 0;
    }

    pub fn cycle_priority_filter(&mut self) {
        self.priority_filter = self.priority_filter.cycle();
        self.selected = 0;
    }

    pub fn cycle_category_filter(&mut self) {
        self.category_filter = self.category_filter.cycle();
        self.selected = 0;
    }
}
