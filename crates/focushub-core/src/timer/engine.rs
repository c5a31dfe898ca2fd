//! Timer engine implementation.
//!
//! The timer engine is a wall-clock-based state machine. It does not use
//! internal threads - the caller is responsible for calling `tick()` roughly
//! once a second, and again whenever the app regains focus.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Running -> (Paused | Idle)
//! Paused -> (Running | Idle)
//! ```
//!
//! Remaining time is always `initial_duration - (now - start_timestamp)`.
//! A late or skipped tick therefore never loses time; it only delays the
//! refresh. Resuming re-bases the segment on the paused remainder so that
//! repeated pause/resume cycles cannot accumulate drift.
//!
//! ## Usage
//!
//! ```ignore
//! let mut engine = TimerEngine::new(settings, stats, store, clock);
//! engine.start(SessionType::Work, 1500, None)?;
//! // In a loop:
//! if let Some(event) = engine.tick() { /* Completed */ }
//! ```

use std::sync::Arc;

use chrono::{DateTime, Utc};

use super::cycle;
use super::snapshot::{self, RestoreOutcome, SessionSnapshot};
use super::{SessionType, TimerState, TimerStatus};
use crate::error::{StorageError, TimerError};
use crate::events::Event;
use crate::settings::SettingsReader;
use crate::stats::{CompletedSession, StatsRecorder};
use crate::storage::{keys, safe_get, safe_remove, safe_set, KeyValueStore};
use crate::time::{ceil_seconds, remaining_ms, Clock};

/// Core timer engine.
///
/// Owns the timer state outright. Settings, stats, storage and time are
/// collaborators handed in at construction.
pub struct TimerEngine {
    state: TimerState,
    settings: Arc<dyn SettingsReader>,
    stats: Arc<dyn StatsRecorder>,
    store: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
}

impl TimerEngine {
    /// Create an engine in the `Idle` state at cycle 1.
    pub fn new(
        settings: Arc<dyn SettingsReader>,
        stats: Arc<dyn StatsRecorder>,
        store: Arc<dyn KeyValueStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            state: TimerState::default(),
            settings,
            stats,
            store,
            clock,
        }
    }

    /// Create an idle engine that carries on the long-break cycle where the
    /// last process left it.
    pub fn load(
        settings: Arc<dyn SettingsReader>,
        stats: Arc<dyn StatsRecorder>,
        store: Arc<dyn KeyValueStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let cycle_index: u32 = safe_get(store.as_ref(), keys::CYCLE, 1).max(1);
        let mut engine = Self::new(settings, stats, store, clock);
        engine.state.cycle_index = cycle_index;
        engine
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> &TimerState {
        &self.state
    }

    pub fn status(&self) -> TimerStatus {
        self.state.status
    }

    pub fn session_type(&self) -> SessionType {
        self.state.session_type
    }

    pub fn remaining_sec(&self) -> u32 {
        self.state.remaining_sec
    }

    pub fn initial_duration_sec(&self) -> u32 {
        self.state.initial_duration_sec
    }

    pub fn cycle_index(&self) -> u32 {
        self.state.cycle_index
    }

    pub fn active_task_id(&self) -> Option<&str> {
        self.state.active_task_id.as_deref()
    }

    pub fn start_timestamp(&self) -> Option<DateTime<Utc>> {
        self.state.start_timestamp
    }

    /// 0.0 .. 1.0 progress within the current segment.
    pub fn progress(&self) -> f64 {
        let total = self.state.initial_duration_sec;
        if total == 0 {
            return 0.0;
        }
        (1.0 - f64::from(self.state.remaining_sec) / f64::from(total)).clamp(0.0, 1.0)
    }

    /// Build a full state snapshot event.
    pub fn snapshot_event(&self) -> Event {
        Event::StateSnapshot {
            status: self.state.status,
            session_type: self.state.session_type,
            remaining_sec: self.state.remaining_sec,
            initial_duration_sec: self.state.initial_duration_sec,
            cycle_index: self.state.cycle_index,
            active_task_id: self.state.active_task_id.clone(),
            progress: self.progress(),
            at: self.clock.now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Begin a new session. Only allowed from `Idle`.
    pub fn start(
        &mut self,
        session_type: SessionType,
        duration_sec: u32,
        task_id: Option<String>,
    ) -> Result<Event, TimerError> {
        if self.state.status != TimerStatus::Idle {
            return Err(self.reject(TimerError::CannotStart {
                status: self.state.status,
            }));
        }
        if duration_sec == 0 {
            return Err(self.reject(TimerError::ZeroDuration));
        }

        let now = self.clock.now();
        self.state.status = TimerStatus::Running;
        self.state.session_type = session_type;
        self.state.remaining_sec = duration_sec;
        self.state.initial_duration_sec = duration_sec;
        self.state.start_timestamp = Some(now);
        self.state.active_task_id = task_id.clone();
        tracing::debug!(%session_type, duration_sec, "timer started");

        Ok(Event::Started {
            session_type,
            duration_sec,
            task_id,
            at: now,
        })
    }

    /// Start a session with the configured duration for its type.
    pub fn start_configured(
        &mut self,
        session_type: SessionType,
        task_id: Option<String>,
    ) -> Result<Event, TimerError> {
        let duration_sec = self.settings.durations().for_session(session_type);
        self.start(session_type, duration_sec, task_id)
    }

    /// Freeze the countdown and write the recovery snapshot.
    pub fn pause(&mut self) -> Result<Event, TimerError> {
        if self.state.status != TimerStatus::Running {
            return Err(self.reject(TimerError::CannotPause {
                status: self.state.status,
            }));
        }

        let now = self.clock.now();
        let remaining = ceil_seconds(self.live_remaining_ms(now));
        self.state.status = TimerStatus::Paused;
        self.state.remaining_sec = remaining;
        self.state.start_timestamp = None;

        let snap = SessionSnapshot {
            session_type: self.state.session_type,
            remaining_sec: remaining,
            initial_duration_sec: self.state.initial_duration_sec,
            cycle_index: self.state.cycle_index,
            active_task_id: self.state.active_task_id.clone(),
            snapshot_taken_at: now,
        };
        let snapshot_saved = match snapshot::save(self.store.as_ref(), &snap) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(error = %e, "failed to save session snapshot");
                false
            }
        };
        tracing::debug!(remaining_sec = remaining, snapshot_saved, "timer paused");

        Ok(Event::Paused {
            remaining_sec: remaining,
            snapshot_saved,
            at: now,
        })
    }

    /// Continue a paused session, treating the paused remainder as a fresh
    /// segment.
    ///
    /// A session paused with nothing left completes instead, so a running
    /// segment never has zero length.
    pub fn resume(&mut self) -> Result<Event, TimerError> {
        if self.state.status != TimerStatus::Paused {
            return Err(self.reject(TimerError::CannotResume {
                status: self.state.status,
            }));
        }
        if self.state.remaining_sec == 0 {
            return self.complete();
        }

        let now = self.clock.now();
        self.state.initial_duration_sec = self.state.remaining_sec;
        self.state.start_timestamp = Some(now);
        self.state.status = TimerStatus::Running;
        tracing::debug!(remaining_sec = self.state.remaining_sec, "timer resumed");

        Ok(Event::Resumed {
            remaining_sec: self.state.remaining_sec,
            at: now,
        })
    }

    /// Refresh the remaining time from the wall clock.
    ///
    /// Does nothing unless running. Returns the `Completed` event when the
    /// countdown reaches zero.
    pub fn tick(&mut self) -> Option<Event> {
        if self.state.status != TimerStatus::Running {
            return None;
        }

        let remaining = self.live_remaining_ms(self.clock.now());
        if remaining == 0 {
            return self.complete().ok();
        }
        self.state.remaining_sec = ceil_seconds(remaining);
        None
    }

    /// Finish the current session, either at the natural end of the
    /// countdown or early at the user's request.
    pub fn complete(&mut self) -> Result<Event, TimerError> {
        if self.state.status == TimerStatus::Idle {
            return Err(self.reject(TimerError::CannotComplete {
                status: self.state.status,
            }));
        }

        let now = self.clock.now();
        let was_completed = self.live_remaining_ms(now) == 0;
        let session_type = self.state.session_type;

        self.stats.record_completed_session(&CompletedSession {
            session_type,
            duration_sec: self.state.initial_duration_sec,
            task_id: self.state.active_task_id.clone(),
            was_completed,
        });

        let advance = cycle::advance(
            session_type,
            self.state.cycle_index,
            self.settings.sessions_before_long_break(),
        );

        self.state.status = TimerStatus::Idle;
        self.state.remaining_sec = 0;
        self.state.start_timestamp = None;
        self.state.cycle_index = advance.next_cycle_index;
        safe_set(self.store.as_ref(), keys::CYCLE, &advance.next_cycle_index);
        self.clear_snapshot_logged();

        let auto_start_next = was_completed && advance.next_session.is_some();
        tracing::debug!(
            %session_type,
            was_completed,
            next = ?advance.next_session,
            cycle_index = advance.next_cycle_index,
            "timer completed"
        );

        Ok(Event::Completed {
            session_type,
            was_completed_fully: was_completed,
            recommended_next: advance.next_session,
            auto_start_next,
            cycle_index: advance.next_cycle_index,
            at: now,
        })
    }

    /// Return to a fresh idle state and drop any recovery snapshot.
    pub fn reset(&mut self) -> Event {
        self.state = TimerState::default();
        self.clear_snapshot_logged();
        safe_remove(self.store.as_ref(), keys::CYCLE);
        tracing::debug!("timer reset");
        Event::Reset {
            at: self.clock.now(),
        }
    }

    /// Bring back a session interrupted by an unexpected exit.
    ///
    /// Meant to run once at startup. A restored session is always `Paused`
    /// and needs an explicit `resume()`.
    pub fn restore_session(&mut self) -> RestoreOutcome {
        if self.state.status != TimerStatus::Idle {
            return RestoreOutcome::Busy;
        }

        let snap = match snapshot::load(self.store.as_ref()) {
            Ok(Some(snap)) => snap,
            Ok(None) => return RestoreOutcome::Empty,
            Err(e @ StorageError::Json { .. }) => {
                tracing::warn!(error = %e, "discarding unreadable session snapshot");
                self.clear_snapshot_logged();
                return RestoreOutcome::Corrupt;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to read session snapshot");
                return RestoreOutcome::Empty;
            }
        };

        if !snap.is_consistent() {
            tracing::warn!(?snap, "discarding inconsistent session snapshot");
            self.clear_snapshot_logged();
            return RestoreOutcome::Corrupt;
        }

        let now = self.clock.now();
        if snap.is_expired(now) {
            let age_seconds = snap.age(now).num_seconds();
            tracing::info!(age_seconds, "session snapshot expired");
            self.clear_snapshot_logged();
            return RestoreOutcome::Expired { age_seconds };
        }

        self.state = TimerState {
            status: TimerStatus::Paused,
            session_type: snap.session_type,
            remaining_sec: snap.remaining_sec,
            initial_duration_sec: snap.initial_duration_sec,
            cycle_index: snap.cycle_index,
            start_timestamp: None,
            active_task_id: snap.active_task_id.clone(),
        };
        tracing::info!(
            session_type = %snap.session_type,
            remaining_sec = snap.remaining_sec,
            "restored interrupted session"
        );
        RestoreOutcome::Restored(snap)
    }

    /// Remove the durable snapshot, e.g. when the user declines a restore.
    pub fn discard_snapshot(&self) -> Result<(), StorageError> {
        snapshot::clear(self.store.as_ref())
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn live_remaining_ms(&self, now: DateTime<Utc>) -> u64 {
        match (self.state.status, self.state.start_timestamp) {
            (TimerStatus::Running, Some(start)) => {
                remaining_ms(self.state.initial_duration_sec, start, now)
            }
            _ => u64::from(self.state.remaining_sec) * 1000,
        }
    }

    fn clear_snapshot_logged(&self) {
        safe_remove(self.store.as_ref(), keys::SESSION_SNAPSHOT);
    }

    fn reject(&self, err: TimerError) -> TimerError {
        tracing::warn!(error = %err, "timer action ignored");
        err
    }
}
