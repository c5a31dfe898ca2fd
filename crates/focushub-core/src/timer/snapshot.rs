//! Crash-recovery snapshot of a paused session.
//!
//! Written on every pause so that an interrupted session can be offered back
//! after an unexpected exit. Snapshots older than 24 hours are treated as
//! abandoned.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::SessionType;
use crate::error::StorageError;
use crate::storage::{keys, load_json, save_json, KeyValueStore};

pub const MAX_SNAPSHOT_AGE_SECS: i64 = 24 * 60 * 60;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub session_type: SessionType,
    pub remaining_sec: u32,
    pub initial_duration_sec: u32,
    pub cycle_index: u32,
    #[serde(default)]
    pub active_task_id: Option<String>,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub snapshot_taken_at: DateTime<Utc>,
}

impl SessionSnapshot {
    /// Age at `now`. A snapshot from the future has age zero.
    pub fn age(&self, now: DateTime<Utc>) -> Duration {
        let age = now.signed_duration_since(self.snapshot_taken_at);
        if age < Duration::zero() {
            Duration::zero()
        } else {
            age
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.age(now) > Duration::seconds(MAX_SNAPSHOT_AGE_SECS)
    }

    /// Fields that could never come out of a real pause.
    pub fn is_consistent(&self) -> bool {
        self.cycle_index >= 1 && self.remaining_sec <= self.initial_duration_sec
    }
}

/// Result of trying to restore an interrupted session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RestoreOutcome {
    /// State restored as Paused. The caller must resume explicitly.
    Restored(SessionSnapshot),
    /// No snapshot stored.
    Empty,
    /// Snapshot older than the limit; it has been cleared.
    Expired { age_seconds: i64 },
    /// Snapshot unreadable or inconsistent; it has been cleared.
    Corrupt,
    /// The engine already holds a session; nothing was touched.
    Busy,
}

impl RestoreOutcome {
    pub fn is_restored(&self) -> bool {
        matches!(self, RestoreOutcome::Restored(_))
    }
}

pub fn save(store: &dyn KeyValueStore, snapshot: &SessionSnapshot) -> Result<(), StorageError> {
    save_json(store, keys::SESSION_SNAPSHOT, snapshot)
}

pub fn load(store: &dyn KeyValueStore) -> Result<Option<SessionSnapshot>, StorageError> {
    load_json(store, keys::SESSION_SNAPSHOT)
}

pub fn clear(store: &dyn KeyValueStore) -> Result<(), StorageError> {
    store.remove(keys::SESSION_SNAPSHOT)
}
