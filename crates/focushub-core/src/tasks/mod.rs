//! Task list a focus session can be attributed to.
//!
//! Tasks are persisted as one JSON array. The active selection is only held
//! in memory for the lifetime of the process.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::TaskError;
use crate::storage::{keys, safe_get, safe_set, KeyValueStore};
use crate::time::Clock;
use crate::validation::{validate_estimated_sessions, validate_task_title};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub estimated_sessions: Option<u32>,
    #[serde(default)]
    pub is_completed: bool,
    /// Epoch milliseconds.
    pub created_at: i64,
    #[serde(default)]
    pub completed_at: Option<i64>,
}

/// Partial update. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskUpdate {
    pub title: Option<String>,
    /// `Some(None)` clears the estimate.
    pub estimated_sessions: Option<Option<u32>>,
    pub is_completed: Option<bool>,
}

/// Lets the presentation layer check a task id before starting a session.
pub trait TaskLookup: Send + Sync {
    fn exists(&self, id: &str) -> bool;
}

#[derive(Debug, Default)]
struct TaskBook {
    tasks: Vec<Task>,
    active: Option<String>,
}

pub struct TaskRegistry {
    store: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
    book: Mutex<TaskBook>,
}

impl TaskRegistry {
    /// Load stored tasks. A missing or malformed list loads as empty.
    pub fn load(store: Arc<dyn KeyValueStore>, clock: Arc<dyn Clock>) -> Self {
        let tasks: Vec<Task> = safe_get(store.as_ref(), keys::TASKS, Vec::new());
        Self {
            store,
            clock,
            book: Mutex::new(TaskBook {
                tasks,
                active: None,
            }),
        }
    }

    pub fn create(&self, title: &str, estimated_sessions: Option<u32>) -> Result<Task, TaskError> {
        let title = validate_task_title(title)?;
        let estimated_sessions = validate_estimated_sessions(estimated_sessions)?;

        let task = Task {
            id: Uuid::new_v4().to_string(),
            title,
            estimated_sessions,
            is_completed: false,
            created_at: self.clock.now().timestamp_millis(),
            completed_at: None,
        };

        let mut book = self.lock();
        book.tasks.push(task.clone());
        self.persist(&book);
        tracing::debug!(id = %task.id, "task created");
        Ok(task)
    }

    pub fn update(&self, id: &str, update: TaskUpdate) -> Result<Task, TaskError> {
        // Validate everything before touching the stored task.
        let title = update.title.as_deref().map(validate_task_title).transpose()?;
        let estimate = update
            .estimated_sessions
            .map(validate_estimated_sessions)
            .transpose()?;
        let now = self.clock.now().timestamp_millis();

        let mut book = self.lock();
        let task = find_mut(&mut book, id)?;
        if let Some(title) = title {
            task.title = title;
        }
        if let Some(estimate) = estimate {
            task.estimated_sessions = estimate;
        }
        if let Some(done) = update.is_completed {
            if done != task.is_completed {
                task.is_completed = done;
                task.completed_at = done.then_some(now);
            }
        }
        let updated = task.clone();
        self.persist(&book);
        Ok(updated)
    }

    pub fn complete(&self, id: &str) -> Result<Task, TaskError> {
        let now = self.clock.now().timestamp_millis();
        let mut book = self.lock();
        let task = find_mut(&mut book, id)?;
        if task.is_completed {
            return Err(TaskError::AlreadyCompleted(id.to_string()));
        }
        task.is_completed = true;
        task.completed_at = Some(now);
        let completed = task.clone();
        self.persist(&book);
        tracing::debug!(id, "task completed");
        Ok(completed)
    }

    /// Delete a task, dropping the active selection if it pointed here.
    pub fn remove(&self, id: &str) -> Result<Task, TaskError> {
        let mut book = self.lock();
        let pos = book
            .tasks
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| TaskError::NotFound(id.to_string()))?;
        let removed = book.tasks.remove(pos);
        if book.active.as_deref() == Some(id) {
            book.active = None;
        }
        self.persist(&book);
        tracing::debug!(id, "task removed");
        Ok(removed)
    }

    pub fn set_active(&self, id: Option<&str>) -> Result<(), TaskError> {
        let mut book = self.lock();
        if let Some(id) = id {
            if !book.tasks.iter().any(|t| t.id == id) {
                return Err(TaskError::NotFound(id.to_string()));
            }
        }
        book.active = id.map(str::to_string);
        Ok(())
    }

    pub fn active_task(&self) -> Option<Task> {
        let book = self.lock();
        let id = book.active.as_deref()?;
        book.tasks.iter().find(|t| t.id == id).cloned()
    }

    pub fn tasks(&self) -> Vec<Task> {
        self.lock().tasks.clone()
    }

    pub fn get(&self, id: &str) -> Option<Task> {
        self.lock().tasks.iter().find(|t| t.id == id).cloned()
    }

    pub fn exists(&self, id: &str) -> bool {
        self.lock().tasks.iter().any(|t| t.id == id)
    }

    fn lock(&self) -> MutexGuard<'_, TaskBook> {
        self.book.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn persist(&self, book: &TaskBook) {
        safe_set(self.store.as_ref(), keys::TASKS, &book.tasks);
    }
}

impl TaskLookup for TaskRegistry {
    fn exists(&self, id: &str) -> bool {
        TaskRegistry::exists(self, id)
    }
}

fn find_mut<'a>(book: &'a mut TaskBook, id: &str) -> Result<&'a mut Task, TaskError> {
    book.tasks
        .iter_mut()
        .find(|t| t.id == id)
        .ok_or_else(|| TaskError::NotFound(id.to_string()))
}
