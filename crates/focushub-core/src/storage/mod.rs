//! Durable small-blob storage.
//!
//! Everything the core persists is a JSON document under one of the
//! [`keys`]. Backends implement [`KeyValueStore`]; the helpers in this module
//! add typed, defensive reads on top so that a missing or malformed blob
//! falls back to a default instead of failing the caller.

mod database;
mod memory;

pub use database::SqliteStore;
pub use memory::MemoryStore;

use std::path::PathBuf;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::StorageError;

/// Storage key names, versioned for future migrations.
pub mod keys {
    pub const PREFIX: &str = "FT_";
    pub const SETTINGS: &str = "FT_SETTINGS_v1";
    pub const TASKS: &str = "FT_TASKS_v1";
    pub const TODAY: &str = "FT_TODAY_v1";
    pub const SESSION_SNAPSHOT: &str = "FT_SESSIONS_LATEST_v1";
    /// Position in the long-break cycle, kept between runs.
    pub const CYCLE: &str = "FT_CYCLE_v1";
}

/// get/set/remove over string blobs.
///
/// Implementations use interior mutability so one store can be shared by the
/// engine, stats, settings and task registry.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&self, key: &str) -> Result<(), StorageError>;
    fn keys(&self) -> Result<Vec<String>, StorageError>;
}

/// Read and parse a JSON value. `Ok(None)` when the key is absent.
pub fn load_json<T: DeserializeOwned>(
    store: &dyn KeyValueStore,
    key: &str,
) -> Result<Option<T>, StorageError> {
    match store.get(key)? {
        Some(raw) if !raw.is_empty() => serde_json::from_str(&raw)
            .map(Some)
            .map_err(|source| StorageError::Json {
                key: key.to_string(),
                source,
            }),
        _ => Ok(None),
    }
}

/// Serialize and write a JSON value.
pub fn save_json<T: Serialize>(
    store: &dyn KeyValueStore,
    key: &str,
    value: &T,
) -> Result<(), StorageError> {
    let raw = serde_json::to_string(value).map_err(|source| StorageError::Json {
        key: key.to_string(),
        source,
    })?;
    store.set(key, &raw)
}

/// Read a JSON value, falling back on absence or any error.
pub fn safe_get<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str, fallback: T) -> T {
    match load_json(store, key) {
        Ok(Some(value)) => value,
        Ok(None) => fallback,
        Err(e) => {
            tracing::error!(key, error = %e, "failed to read stored value, using default");
            fallback
        }
    }
}

/// Write a JSON value, logging instead of failing. Returns whether it landed.
pub fn safe_set<T: Serialize>(store: &dyn KeyValueStore, key: &str, value: &T) -> bool {
    match save_json(store, key, value) {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(key, error = %e, "failed to persist value");
            false
        }
    }
}

pub fn safe_remove(store: &dyn KeyValueStore, key: &str) -> bool {
    match store.remove(key) {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(key, error = %e, "failed to remove stored value");
            false
        }
    }
}

/// Remove every key owned by this application. Returns how many were removed.
pub fn clear_all(store: &dyn KeyValueStore) -> Result<usize, StorageError> {
    let owned: Vec<String> = store
        .keys()?
        .into_iter()
        .filter(|k| k.starts_with(keys::PREFIX))
        .collect();
    for key in &owned {
        store.remove(key)?;
    }
    Ok(owned.len())
}

/// Returns the data directory, creating it if needed.
///
/// `FOCUSHUB_DATA_DIR` wins when set. Otherwise `~/.config/focushub[-dev]/`
/// selected by `FOCUSHUB_ENV=dev`.
pub fn data_dir() -> Result<PathBuf, StorageError> {
    let dir = match std::env::var_os("FOCUSHUB_DATA_DIR") {
        Some(dir) => PathBuf::from(dir),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("FOCUSHUB_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("focushub-dev")
            } else {
                base_dir.join("focushub")
            }
        }
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
