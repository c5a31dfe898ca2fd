use std::error::Error;
use std::io::{self, IsTerminal, Write};
use std::time::Duration;

use clap::Subcommand;
use focushub_core::time::{format_time, minutes_to_seconds};
use focushub_core::validation::{
    validate_long_break_duration, validate_short_break_duration, validate_work_duration,
};
use focushub_core::{Event, RestoreOutcome, SessionType, TaskLookup, TimerEngine, TimerStatus};
use tokio::time::MissedTickBehavior;

use crate::app::{print_json, App};

#[derive(Subcommand)]
pub enum TimerAction {
    /// Run a session in the foreground until it completes or Ctrl-C pauses it
    Run {
        /// Session type: work, short-break or long-break
        #[arg(long = "type", default_value = "work")]
        session_type: SessionType,
        /// Override the configured duration
        #[arg(long)]
        minutes: Option<u32>,
        /// Task the session is attributed to
        #[arg(long)]
        task: Option<String>,
        /// Start the recommended break when a session runs to the end
        #[arg(long)]
        auto_break: bool,
    },
    /// Resume the session interrupted by the last Ctrl-C or crash
    Resume {
        #[arg(long)]
        auto_break: bool,
    },
    /// Drop the interrupted session
    Discard,
    /// Print the interrupted session, if any, as JSON
    Status,
}

pub fn run(action: TimerAction) -> Result<(), Box<dyn Error>> {
    let app = App::open()?;
    let mut engine = app.engine();

    match action {
        TimerAction::Run {
            session_type,
            minutes,
            task,
            auto_break,
        } => {
            if let Some(id) = task.as_deref() {
                ensure_task(app.tasks.as_ref(), id)?;
            }
            let started = match minutes {
                Some(m) => {
                    let m = match session_type {
                        SessionType::Work => validate_work_duration(m)?,
                        SessionType::ShortBreak => validate_short_break_duration(m)?,
                        SessionType::LongBreak => validate_long_break_duration(m)?,
                    };
                    engine.start(session_type, minutes_to_seconds(m), task)?
                }
                None => engine.start_configured(session_type, task)?,
            };
            emit(&started)?;
            block_on(drive(&mut engine, auto_break))
        }
        TimerAction::Resume { auto_break } => {
            match engine.restore_session() {
                RestoreOutcome::Restored(_) => {}
                RestoreOutcome::Empty => return Err("no interrupted session".into()),
                RestoreOutcome::Expired { age_seconds } => {
                    return Err(format!(
                        "interrupted session expired ({}h old) and was discarded",
                        age_seconds / 3600
                    )
                    .into())
                }
                RestoreOutcome::Corrupt => {
                    return Err("interrupted session was unreadable and was discarded".into())
                }
                RestoreOutcome::Busy => return Err("timer is already busy".into()),
            }
            let resumed = engine.resume()?;
            emit(&resumed)?;
            block_on(drive(&mut engine, auto_break))
        }
        TimerAction::Discard => {
            engine.discard_snapshot()?;
            println!("interrupted session discarded");
            Ok(())
        }
        TimerAction::Status => {
            if let RestoreOutcome::Expired { age_seconds } = engine.restore_session() {
                eprintln!("interrupted session expired ({}h old)", age_seconds / 3600);
            }
            print_json(&engine.snapshot_event())
        }
    }
}

fn ensure_task(tasks: &dyn TaskLookup, id: &str) -> Result<(), Box<dyn Error>> {
    if tasks.exists(id) {
        Ok(())
    } else {
        Err(format!("task not found: {id}").into())
    }
}

fn block_on<F>(future: F) -> Result<(), Box<dyn Error>>
where
    F: std::future::Future<Output = Result<(), Box<dyn Error>>>,
{
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?
        .block_on(future)
}

/// Tick the engine once a second while it runs.
///
/// The interval lives only as long as one running stretch. Ctrl-C pauses the
/// session, which writes the recovery snapshot, and returns.
async fn drive(engine: &mut TimerEngine, auto_break: bool) -> Result<(), Box<dyn Error>> {
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    while engine.status() == TimerStatus::Running {
        let mut interval = tokio::time::interval(Duration::from_secs(1));
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let completed = loop {
            tokio::select! {
                _ = interval.tick() => {
                    if let Some(event) = engine.tick() {
                        break event;
                    }
                    render_progress(engine);
                }
                _ = &mut ctrl_c => {
                    let paused = engine.pause()?;
                    clear_progress();
                    emit(&paused)?;
                    if let Event::Paused { snapshot_saved: false, .. } = paused {
                        eprintln!("warning: session could not be saved and cannot be resumed");
                    }
                    return Ok(());
                }
            }
        };

        clear_progress();
        emit(&completed)?;
        if let Event::Completed {
            recommended_next: Some(next),
            auto_start_next: true,
            ..
        } = completed
        {
            if auto_break {
                tracing::debug!(%next, "auto-starting break");
                let started = engine.start_configured(next, None)?;
                emit(&started)?;
            }
        }
    }
    Ok(())
}

fn emit(event: &Event) -> Result<(), Box<dyn Error>> {
    println!("{}", serde_json::to_string(event)?);
    Ok(())
}

fn render_progress(engine: &TimerEngine) {
    let mut stderr = io::stderr();
    if stderr.is_terminal() {
        let _ = write!(
            stderr,
            "\r{} {}   ",
            format_time(engine.remaining_sec()),
            engine.session_type()
        );
        let _ = stderr.flush();
    }
}

fn clear_progress() {
    let mut stderr = io::stderr();
    if stderr.is_terminal() {
        let _ = write!(stderr, "\r\x1b[2K");
        let _ = stderr.flush();
    }
}
