//! Wall-clock helpers.
//!
//! The timer never counts ticks. Remaining time is always derived from the
//! difference between "now" and the instant a segment started, so every
//! function here takes both instants explicitly and the current instant comes
//! from a [`Clock`].

use std::sync::{Mutex, PoisonError};

use chrono::{DateTime, Duration, Local, NaiveDate, Utc};

/// Source of wall-clock time.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;

    /// Calendar date in the local timezone.
    fn today(&self) -> NaiveDate {
        self.now().with_timezone(&Local).date_naive()
    }
}

/// The real system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock that only moves when told to.
///
/// Used by tests and simulations to play out elapsed time without sleeping.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::starting_at(Utc::now())
    }

    pub fn starting_at(at: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(at),
        }
    }

    pub fn set(&self, at: DateTime<Utc>) {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner) = at;
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap_or_else(PoisonError::into_inner);
        *now = *now + by;
    }

    pub fn advance_secs(&self, secs: i64) {
        self.advance(Duration::seconds(secs));
    }

    pub fn advance_ms(&self, ms: i64) {
        self.advance(Duration::milliseconds(ms));
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Milliseconds between `start` and `now`. A clock that went backwards
/// yields zero.
pub fn elapsed_ms(start: DateTime<Utc>, now: DateTime<Utc>) -> u64 {
    let ms = now.signed_duration_since(start).num_milliseconds();
    u64::try_from(ms).unwrap_or(0)
}

/// Fractional seconds between `start` and `now`, never negative.
pub fn elapsed_seconds(start: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    elapsed_ms(start, now) as f64 / 1000.0
}

/// Exact milliseconds left of a segment of `initial_sec` that began at `start`.
pub fn remaining_ms(initial_sec: u32, start: DateTime<Utc>, now: DateTime<Utc>) -> u64 {
    (u64::from(initial_sec) * 1000).saturating_sub(elapsed_ms(start, now))
}

/// Whole seconds left, rounded up so a partially elapsed second still shows.
pub fn remaining_seconds(initial_sec: u32, start: DateTime<Utc>, now: DateTime<Utc>) -> u32 {
    ceil_seconds(remaining_ms(initial_sec, start, now))
}

/// Milliseconds to whole seconds, rounding up.
pub fn ceil_seconds(ms: u64) -> u32 {
    u32::try_from(ms.div_ceil(1000)).unwrap_or(u32::MAX)
}

pub fn minutes_to_seconds(minutes: u32) -> u32 {
    minutes.saturating_mul(60)
}

/// Seconds to minutes, rounding up: any started minute counts as a full one.
pub fn seconds_to_minutes(seconds: u32) -> u32 {
    seconds.div_ceil(60)
}

/// Format seconds as `MM:SS`. Minutes are not wrapped into hours.
pub fn format_time(seconds: u32) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

/// Format minutes as hours and minutes, e.g. 75 -> `1h 15m`.
pub fn format_minutes(minutes: u32) -> String {
    if minutes < 60 {
        return format!("{minutes}m");
    }
    let hours = minutes / 60;
    let mins = minutes % 60;
    if mins == 0 {
        format!("{hours}h")
    } else {
        format!("{hours}h {mins}m")
    }
}

/// Today's local date as `YYYY-MM-DD`.
pub fn today_iso(clock: &dyn Clock) -> String {
    clock.today().format("%Y-%m-%d").to_string()
}

/// True once local midnight has passed since `stored`.
pub fn has_date_changed(stored: NaiveDate, clock: &dyn Clock) -> bool {
    stored != clock.today()
}
