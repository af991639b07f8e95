use chrono::{NaiveDate, Utc};
use thiserror::Error;

use crate::storage::{KeyValueStore, StorageError};
use crate::task::{Category, Priority, Task};

/// The two snapshot entries; these names are the on-disk compatibility
/// surface and must not change.
pub const TASKS_KEY: &str = "tasks";
pub const TASK_ID_KEY: &str = "taskId";

const FIRST_ID: u32 = 1;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("required field missing or invalid: {0}")]
    Validation(&'static str),
    #[error("no task with id {0}")]
    NotFound(u32),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Owns the task collection and the id counter; the single writer of the
/// persisted snapshot. Every mutation saves the full state before returning,
/// so a storage failure can leave memory ahead of disk but never corrupts
/// the snapshot halfway.
#[derive(Debug)]
pub struct TaskStore<S: KeyValueStore> {
    tasks: Vec<Task>,
    next_id: u32,
    storage: S,
}

impl<S: KeyValueStore> TaskStore<S> {
    pub fn new(storage: S) -> Self {
        Self {
            tasks: Vec::new(),
            next_id: FIRST_ID,
            storage,
        }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, id: u32) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Replaces the collection and counter from the persisted snapshot.
    /// A missing entry leaves the corresponding default in place.
    pub fn load_all(&mut self) -> Result<(), StorageError> {
        self.tasks = match self.storage.get(TASKS_KEY)? {
            Some(raw) => serde_json::from_str(&raw)?,
            None => Vec::new(),
        };
        self.next_id = match self.storage.get(TASK_ID_KEY)? {
            Some(raw) => serde_json::from_str(&raw)?,
            None => FIRST_ID,
        };
        Ok(())
    }

    pub fn create(
        &mut self,
        title: &str,
        category: Category,
        description: &str,
        deadline: NaiveDate,
        priority: Priority,
    ) -> Result<Task, StoreError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(StoreError::Validation("title"));
        }
        let task = Task {
            id: self.next_id,
            title: title.to_string(),
            category,
            description: description.trim().to_string(),
            deadline,
            priority,
            completed: false,
            created_at: Utc::now(),
        };
        self.next_id += 1;
        self.tasks.push(task.clone());
        self.persist()?;
        Ok(task)
    }

    /// Overwrites every field except `id` and `created_at`. An unknown id is
    /// reported, not swallowed.
    pub fn update(
        &mut self,
        id: u32,
        title: &str,
        category: Category,
        description: &str,
        deadline: NaiveDate,
        priority: Priority,
    ) -> Result<Task, StoreError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(StoreError::Validation("title"));
        }
        let Some(task) = self.tasks.iter_mut().find(|t| t.id == id) else {
            return Err(StoreError::NotFound(id));
        };
        task.title = title.to_string();
        task.category = category;
        task.description = description.trim().to_string();
        task.deadline = deadline;
        task.priority = priority;
        let updated = task.clone();
        self.persist()?;
        Ok(updated)
    }

    /// Removes the task if present. A missing id is not an error; the
    /// snapshot is rewritten either way.
    pub fn delete(&mut self, id: u32) -> Result<(), StorageError> {
        self.tasks.retain(|t| t.id != id);
        self.persist()
    }

    /// Flips `completed` on the matching task. Silent no-op on a missing id;
    /// persists only when something changed.
    pub fn toggle_complete(&mut self, id: u32) -> Result<(), StorageError> {
        let Some(task) = self.tasks.iter_mut().find(|t| t.id == id) else {
            return Ok(());
        };
        task.completed = !task.completed;
        self.persist()
    }

    fn persist(&mut self) -> Result<(), StorageError> {
        self.storage
            .set(TASKS_KEY, &serde_json::to_string(&self.tasks)?)?;
        self.storage.set(TASK_ID_KEY, &self.next_id.to_string())
    }
}
