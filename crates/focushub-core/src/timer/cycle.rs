//! Long-break cycle policy.

use super::SessionType;

/// Outcome of finishing a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleAdvance {
    pub next_cycle_index: u32,
    /// Break to offer next. Always `None` after a break.
    pub next_session: Option<SessionType>,
}

/// Decide the next cycle index and break after `completed` finishes.
///
/// Work sessions count towards the long break; the session that reaches
/// `sessions_before_long_break` earns a long break and restarts the count.
/// Breaks leave the count alone.
pub fn advance(
    completed: SessionType,
    cycle_index: u32,
    sessions_before_long_break: u32,
) -> CycleAdvance {
    if completed.is_break() {
        return CycleAdvance {
            next_cycle_index: cycle_index,
            next_session: None,
        };
    }

    if cycle_index >= sessions_before_long_break {
        CycleAdvance {
            next_cycle_index: 1,
            next_session: Some(SessionType::LongBreak),
        }
    } else {
        CycleAdvance {
            next_cycle_index: cycle_index.saturating_add(1),
            next_session: Some(SessionType::ShortBreak),
        }
    }
}
