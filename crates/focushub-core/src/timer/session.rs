use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SessionType {
    #[default]
    Work,
    ShortBreak,
    LongBreak,
}

impl SessionType {
    pub fn is_break(self) -> bool {
        !matches!(self, SessionType::Work)
    }
}

impl fmt::Display for SessionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SessionType::Work => "work",
            SessionType::ShortBreak => "short break",
            SessionType::LongBreak => "long break",
        })
    }
}

impl FromStr for SessionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace(&['-', '_', ' '][..], "").as_str() {
            "work" | "focus" => Ok(SessionType::Work),
            "shortbreak" | "short" => Ok(SessionType::ShortBreak),
            "longbreak" | "long" => Ok(SessionType::LongBreak),
            _ => Err(format!("unknown session type: {s}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerStatus {
    #[default]
    Idle,
    Running,
    Paused,
}

impl fmt::Display for TimerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TimerStatus::Idle => "idle",
            TimerStatus::Running => "running",
            TimerStatus::Paused => "paused",
        })
    }
}

/// Everything the engine knows about the current session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerState {
    pub status: TimerStatus,
    pub session_type: SessionType,
    /// Whole seconds left, refreshed from the wall clock on every tick.
    pub remaining_sec: u32,
    /// Length of the current running/paused segment. Re-based to the paused
    /// remainder on every resume.
    pub initial_duration_sec: u32,
    /// Work sessions completed in the current long-break cycle, from 1.
    pub cycle_index: u32,
    /// Set only while running.
    pub start_timestamp: Option<DateTime<Utc>>,
    pub active_task_id: Option<String>,
}

impl Default for TimerState {
    fn default() -> Self {
        Self {
            status: TimerStatus::Idle,
            session_type: SessionType::Work,
            remaining_sec: 0,
            initial_duration_sec: 0,
            cycle_index: 1,
            start_timestamp: None,
            active_task_id: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_type_wire_names() {
        assert_eq!(serde_json::to_string(&SessionType::ShortBreak).unwrap(), "\"shortBreak\"");
        assert_eq!(serde_json::to_string(&SessionType::LongBreak).unwrap(), "\"longBreak\"");
        assert_eq!(serde_json::to_string(&TimerStatus::Paused).unwrap(), "\"paused\"");
    }

    #[test]
    fn session_type_parses_loosely() {
        assert_eq!("work".parse::<SessionType>(), Ok(SessionType::Work));
        assert_eq!("short-break".parse::<SessionType>(), Ok(SessionType::ShortBreak));
        assert_eq!("LongBreak".parse::<SessionType>(), Ok(SessionType::LongBreak));
        assert!("nap".parse::<SessionType>().is_err());
    }

    #[test]
    fn default_state_is_idle_work_cycle_one() {
        let state = TimerState::default();
        assert_eq!(state.status, TimerStatus::Idle);
        assert_eq!(state.session_type, SessionType::Work);
        assert_eq!(state.cycle_index, 1);
        assert!(state.start_timestamp.is_none());
    }
}
