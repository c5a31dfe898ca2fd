//! # Focus Hub Core Library
//!
//! Business logic for the Focus Hub focus timer. The `focushub` CLI is a thin
//! presentation layer over this crate; it owns the engine and drives `tick()`.
//!
//! ## Architecture
//!
//! - **Timer Engine**: A wall-clock-based state machine that requires the caller
//!   to periodically invoke `tick()` for progress updates
//! - **Stats**: Today's focused minutes and session count, rolled over at
//!   local midnight
//! - **Settings**: Validated durations and long-break threshold
//! - **Tasks**: Task list a session can be attributed to
//! - **Storage**: JSON blobs in a key-value store (SQLite on disk, memory in tests)
//!
//! ## Key Components
//!
//! - [`TimerEngine`]: Core timer state machine
//! - [`Stats`]: Daily focus aggregate
//! - [`Settings`]: User preferences
//! - [`TaskRegistry`]: Task CRUD and active selection
//! - [`KeyValueStore`]: Storage boundary

pub mod error;
pub mod events;
pub mod settings;
pub mod stats;
pub mod storage;
pub mod tasks;
pub mod time;
pub mod timer;
pub mod validation;

pub use error::{CoreError, StorageError, TaskError, TimerError, ValidationError};
pub use events::Event;
pub use settings::{Durations, Settings, SettingsReader, Theme, UserSettings};
pub use stats::{CompletedSession, DailyStats, Stats, StatsRecorder};
pub use storage::{KeyValueStore, MemoryStore, SqliteStore};
pub use tasks::{Task, TaskLookup, TaskRegistry, TaskUpdate};
pub use time::{Clock, ManualClock, SystemClock};
pub use timer::{
    RestoreOutcome, SessionSnapshot, SessionType, TimerEngine, TimerState, TimerStatus,
};
