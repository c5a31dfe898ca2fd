use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timer::{SessionType, TimerStatus};

/// Every engine action produces an Event.
/// The presentation layer renders them; nothing else is published.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    Started {
        session_type: SessionType,
        duration_sec: u32,
        task_id: Option<String>,
        at: DateTime<Utc>,
    },
    Paused {
        remaining_sec: u32,
        /// False when the recovery snapshot could not be written.
        snapshot_saved: bool,
        at: DateTime<Utc>,
    },
    Resumed {
        remaining_sec: u32,
        at: DateTime<Utc>,
    },
    Completed {
        session_type: SessionType,
        /// True when the countdown reached zero, false when ended early.
        was_completed_fully: bool,
        /// Break earned by a finished work session.
        recommended_next: Option<SessionType>,
        /// Offer to start `recommended_next` right away. Only set when the
        /// session ran its course.
        auto_start_next: bool,
        cycle_index: u32,
        at: DateTime<Utc>,
    },
    Reset {
        at: DateTime<Utc>,
    },
    StateSnapshot {
        status: TimerStatus,
        session_type: SessionType,
        remaining_sec: u32,
        initial_duration_sec: u32,
        cycle_index: u32,
        active_task_id: Option<String>,
        progress: f64,
        at: DateTime<Utc>,
    },
}

impl Event {
    pub fn at(&self) -> DateTime<Utc> {
        match self {
            Event::Started { at, .. }
            | Event::Paused { at, .. }
            | Event::Resumed { at, .. }
            | Event::Completed { at, .. }
            | Event::Reset { at }
            | Event::StateSnapshot { at, .. } => *at,
        }
    }
}
