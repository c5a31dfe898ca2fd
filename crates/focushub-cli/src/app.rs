//! Composition root: one store shared by every component.

use std::error::Error;
use std::sync::Arc;

use focushub_core::{
    Settings, SqliteStore, Stats, StorageError, SystemClock, TaskRegistry, TimerEngine,
};
use serde::Serialize;

pub struct App {
    pub store: Arc<SqliteStore>,
    pub clock: Arc<SystemClock>,
    pub settings: Arc<Settings>,
    pub stats: Arc<Stats>,
    pub tasks: Arc<TaskRegistry>,
}

impl App {
    /// Open the on-disk store and load every component from it.
    pub fn open() -> Result<Self, StorageError> {
        let store = Arc::new(SqliteStore::open()?);
        let clock = Arc::new(SystemClock);
        let settings = Arc::new(Settings::load(store.clone()));
        let stats = Arc::new(Stats::load(store.clone(), clock.clone()));
        let tasks = Arc::new(TaskRegistry::load(store.clone(), clock.clone()));
        Ok(Self {
            store,
            clock,
            settings,
            stats,
            tasks,
        })
    }

    pub fn engine(&self) -> TimerEngine {
        TimerEngine::load(
            self.settings.clone(),
            self.stats.clone(),
            self.store.clone(),
            self.clock.clone(),
        )
    }
}

pub fn print_json<T: Serialize>(value: &T) -> Result<(), Box<dyn Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
