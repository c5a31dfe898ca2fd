//! Core error types for focushub-core.
//!
//! Nothing in this hierarchy is fatal to the process. Timer precondition
//! violations leave the engine untouched, validation failures reject the
//! input before any mutation, and storage failures only cost durability.

use std::path::PathBuf;
use thiserror::Error;

use crate::timer::TimerStatus;

/// Core error type for focushub-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Timer precondition violations
    #[error("Timer error: {0}")]
    Timer(#[from] TimerError),

    /// Storage-related errors
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Task registry errors
    #[error("Task error: {0}")]
    Task(#[from] TaskError),
}

/// An engine action was invoked from a state that does not allow it.
///
/// The engine state is left exactly as it was.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimerError {
    #[error("cannot start: timer is {status}")]
    CannotStart { status: TimerStatus },

    #[error("cannot pause: timer is {status}")]
    CannotPause { status: TimerStatus },

    #[error("cannot resume: timer is {status}")]
    CannotResume { status: TimerStatus },

    #[error("cannot complete: timer is {status}")]
    CannotComplete { status: TimerStatus },

    #[error("cannot start a session with zero duration")]
    ZeroDuration,
}

/// Durable key-value storage errors.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Failed to open the backing database
    #[error("Failed to open store at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// A read or write against the backend failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// The backend is locked by another process
    #[error("Store is locked")]
    Locked,

    /// Could not determine or create the data directory
    #[error("Data directory unavailable: {0}")]
    DataDir(#[from] std::io::Error),

    /// Value could not be serialized or parsed
    #[error("JSON error for key '{key}': {source}")]
    Json {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Validation errors for settings and task fields.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Numeric value outside its allowed range
    #[error("{label} must be between {min} and {max}{unit}")]
    OutOfRange {
        label: String,
        min: u32,
        max: u32,
        unit: &'static str,
    },

    /// Task title empty after trimming
    #[error("Task title cannot be empty")]
    EmptyTitle,

    /// Task title over the length limit
    #[error("Task title cannot exceed {max} characters")]
    TitleTooLong { max: usize },

    /// Unknown settings key
    #[error("Unknown setting: {0}")]
    UnknownKey(String),

    /// Value could not be parsed for the key
    #[error("Invalid value for '{key}': {message}")]
    InvalidValue { key: String, message: String },
}

/// Task registry errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TaskError {
    #[error("Task not found: {0}")]
    NotFound(String),

    #[error("Task already completed: {0}")]
    AlreadyCompleted(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl From<rusqlite::Error> for StorageError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(e, _msg) => {
                if e.code == rusqlite::ErrorCode::DatabaseLocked
                    || e.code == rusqlite::ErrorCode::DatabaseBusy
                {
                    StorageError::Locked
                } else {
                    StorageError::QueryFailed(err.to_string())
                }
            }
            _ => StorageError::QueryFailed(err.to_string()),
        }
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timer_error_names_the_current_status() {
        let err = TimerError::CannotPause {
            status: TimerStatus::Idle,
        };
        assert_eq!(err.to_string(), "cannot pause: timer is idle");
    }

    #[test]
    fn out_of_range_message_includes_bounds() {
        let err = ValidationError::OutOfRange {
            label: "Work duration".into(),
            min: 1,
            max: 120,
            unit: " minutes",
        };
        assert_eq!(err.to_string(), "Work duration must be between 1 and 120 minutes");
    }

    fn start_then_rename(status: TimerStatus, title: &str) -> Result<String> {
        if status != TimerStatus::Idle {
            return Err(TimerError::CannotStart { status }.into());
        }
        Ok(crate::validation::validate_task_title(title)?)
    }

    #[test]
    fn question_mark_lifts_into_core_error() {
        assert_eq!(start_then_rename(TimerStatus::Idle, " ok ").unwrap(), "ok");
        assert!(matches!(
            start_then_rename(TimerStatus::Running, "ok"),
            Err(CoreError::Timer(TimerError::CannotStart { .. }))
        ));
        let err = start_then_rename(TimerStatus::Idle, "  ").unwrap_err();
        assert_eq!(err.to_string(), "Validation error: Task title cannot be empty");
    }

    #[test]
    fn validation_converts_into_core_error() {
        let core: CoreError = ValidationError::EmptyTitle.into();
        assert!(matches!(core, CoreError::Validation(ValidationError::EmptyTitle)));
    }
}
