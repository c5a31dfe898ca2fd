//! Integration tests for a full focus cycle.
//!
//! These tests wire the engine to real settings and stats over one shared
//! store and drive it with a manual clock.

use std::sync::Arc;

use chrono::{Local, TimeZone, Utc};

use focushub_core::storage::keys;
use focushub_core::{
    Clock, Event, KeyValueStore, ManualClock, MemoryStore, SessionType, Settings, Stats,
    TimerEngine, TimerStatus,
};

struct App {
    engine: TimerEngine,
    clock: Arc<ManualClock>,
    store: Arc<MemoryStore>,
    stats: Arc<Stats>,
    settings: Arc<Settings>,
}

fn app() -> App {
    // Early morning, so a day's worth of sessions stays on one date.
    let morning = Local
        .with_ymd_and_hms(2026, 6, 10, 6, 0, 0)
        .unwrap()
        .with_timezone(&Utc);
    let clock = Arc::new(ManualClock::starting_at(morning));
    let store = Arc::new(MemoryStore::new());
    let settings = Arc::new(Settings::load(store.clone()));
    let stats = Arc::new(Stats::load(store.clone(), clock.clone()));
    let engine = TimerEngine::new(
        settings.clone(),
        stats.clone(),
        store.clone(),
        clock.clone(),
    );
    App {
        engine,
        clock,
        store,
        stats,
        settings,
    }
}

#[test]
fn test_work_session_runs_to_completion() {
    let mut app = app();
    app.engine.start(SessionType::Work, 1500, None).unwrap();

    // Ticks every second, like the CLI loop.
    let mut completed = None;
    for _ in 0..1500 {
        app.clock.advance_secs(1);
        if let Some(event) = app.engine.tick() {
            completed = Some(event);
        }
    }

    match completed {
        Some(Event::Completed {
            session_type,
            was_completed_fully,
            recommended_next,
            cycle_index,
            ..
        }) => {
            assert_eq!(session_type, SessionType::Work);
            assert!(was_completed_fully);
            assert_eq!(recommended_next, Some(SessionType::ShortBreak));
            assert_eq!(cycle_index, 2);
        }
        other => panic!("Expected Completed, got {other:?}"),
    }

    assert_eq!(app.engine.status(), TimerStatus::Idle);
    assert_eq!(app.engine.cycle_index(), 2);
    let today = app.stats.today();
    assert_eq!(today.sessions_count, 1);
    assert_eq!(today.total_focused_minutes, 25);
}

#[test]
fn test_four_work_sessions_earn_long_break() {
    let mut app = app();
    let mut offered = Vec::new();

    for _ in 0..4 {
        app.engine
            .start_configured(SessionType::Work, None)
            .unwrap();
        app.clock.advance_secs(25 * 60);
        if let Some(Event::Completed {
            recommended_next: Some(next),
            auto_start_next: true,
            ..
        }) = app.engine.tick()
        {
            offered.push(next);
            app.engine.start_configured(next, None).unwrap();
            app.clock.advance_secs(60 * 60);
            app.engine.tick();
        }
    }

    assert_eq!(
        offered,
        vec![
            SessionType::ShortBreak,
            SessionType::ShortBreak,
            SessionType::ShortBreak,
            SessionType::LongBreak
        ]
    );
    assert_eq!(app.engine.cycle_index(), 1);
    // Work and break sessions both count.
    assert_eq!(app.stats.today().sessions_count, 8);
    assert_eq!(app.stats.today().total_focused_minutes, 4 * 25 + 3 * 5 + 15);
}

#[test]
fn test_threshold_setting_applies_to_next_completion() {
    let mut app = app();
    app.engine.start(SessionType::Work, 60, None).unwrap();
    app.engine.complete().unwrap();
    assert_eq!(app.engine.cycle_index(), 2);

    app.settings.set_sessions_before_long_break(2).unwrap();
    app.engine.start(SessionType::Work, 60, None).unwrap();
    match app.engine.complete().unwrap() {
        Event::Completed {
            recommended_next, ..
        } => assert_eq!(recommended_next, Some(SessionType::LongBreak)),
        other => panic!("Expected Completed, got {other:?}"),
    }
}

#[test]
fn test_stats_roll_over_across_midnight() {
    let mut app = app();
    app.engine.start(SessionType::Work, 600, None).unwrap();
    app.clock.advance_secs(600);
    app.engine.tick();
    assert_eq!(app.stats.today().sessions_count, 1);

    app.clock.advance(chrono::Duration::days(1));
    app.engine.start(SessionType::Work, 300, None).unwrap();
    app.clock.advance_secs(300);
    app.engine.tick();

    let today = app.stats.today();
    assert_eq!(today.sessions_count, 1);
    assert_eq!(today.total_focused_minutes, 5);
    assert_eq!(today.date, app.clock.today());
}

#[test]
fn test_everything_lands_in_the_store() {
    let mut app = app();
    app.settings.set_work_minutes(50).unwrap();
    app.engine.start_configured(SessionType::Work, None).unwrap();
    app.clock.advance_secs(10);
    app.engine.pause().unwrap();

    for key in [keys::SETTINGS, keys::SESSION_SNAPSHOT] {
        assert!(app.store.get(key).unwrap().is_some(), "missing {key}");
    }

    app.engine.reset();
    assert!(app.store.get(keys::SESSION_SNAPSHOT).unwrap().is_none());
}
