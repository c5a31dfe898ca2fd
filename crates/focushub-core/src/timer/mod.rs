mod cycle;
mod engine;
mod session;
pub mod snapshot;

pub use cycle::{advance, CycleAdvance};
pub use engine::TimerEngine;
pub use session::{SessionType, TimerState, TimerStatus};
pub use snapshot::{RestoreOutcome, SessionSnapshot};
