//! Today's focus aggregate.
//!
//! Only one day is ever kept. The record is rolled over to a zeroed one as
//! soon as the local calendar date moves past the stored date, and always
//! before an increment.

use std::sync::{Arc, Mutex, PoisonError};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::storage::{keys, safe_get, safe_set, KeyValueStore};
use crate::time::{has_date_changed, seconds_to_minutes, Clock};
use crate::timer::SessionType;

/// The persisted daily record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyStats {
    /// Local calendar date, serialized as `YYYY-MM-DD`.
    pub date: NaiveDate,
    #[serde(default)]
    pub total_focused_minutes: u32,
    #[serde(default)]
    pub sessions_count: u32,
}

impl DailyStats {
    pub fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            total_focused_minutes: 0,
            sessions_count: 0,
        }
    }
}

/// A finished session as reported by the timer engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletedSession {
    pub session_type: SessionType,
    pub duration_sec: u32,
    pub task_id: Option<String>,
    /// False when the session was ended early with time left.
    pub was_completed: bool,
}

/// What the timer engine needs from stats.
pub trait StatsRecorder: Send + Sync {
    fn record_completed_session(&self, session: &CompletedSession);
    fn rollover_if_date_changed(&self);
}

/// Daily stats backed by a key-value store.
pub struct Stats {
    store: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
    today: Mutex<DailyStats>,
}

impl Stats {
    /// Load the stored aggregate and roll it over if it belongs to another day.
    pub fn load(store: Arc<dyn KeyValueStore>, clock: Arc<dyn Clock>) -> Self {
        let fresh = DailyStats::empty(clock.today());
        let stored = safe_get(store.as_ref(), keys::TODAY, fresh);
        let stats = Self {
            store,
            clock,
            today: Mutex::new(stored),
        };
        stats.rollover_if_date_changed();
        stats
    }

    /// Copy of the current aggregate.
    pub fn today(&self) -> DailyStats {
        self.today
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn persist(&self, stats: &DailyStats) {
        safe_set(self.store.as_ref(), keys::TODAY, stats);
    }
}

impl StatsRecorder for Stats {
    fn rollover_if_date_changed(&self) {
        let rolled = {
            let mut current = self.today.lock().unwrap_or_else(PoisonError::into_inner);
            if !has_date_changed(current.date, self.clock.as_ref()) {
                return;
            }
            let today = self.clock.today();
            tracing::debug!(from = %current.date, to = %today, "rolling daily stats over");
            *current = DailyStats::empty(today);
            current.clone()
        };
        self.persist(&rolled);
    }

    fn record_completed_session(&self, session: &CompletedSession) {
        self.rollover_if_date_changed();
        let minutes = seconds_to_minutes(session.duration_sec);
        let updated = {
            let mut current = self.today.lock().unwrap_or_else(PoisonError::into_inner);
            current.total_focused_minutes = current.total_focused_minutes.saturating_add(minutes);
            current.sessions_count = current.sessions_count.saturating_add(1);
            current.clone()
        };
        tracing::debug!(
            session_type = %session.session_type,
            minutes,
            was_completed = session.was_completed,
            "recorded session"
        );
        self.persist(&updated);
    }
}
