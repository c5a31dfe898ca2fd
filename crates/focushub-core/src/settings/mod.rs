//! User preferences: session durations, long-break threshold and theme.
//!
//! Stored as one JSON record under [`keys::SETTINGS`]. A missing or
//! malformed record loads as defaults, and any single out-of-range field
//! falls back to its own default. Setters validate before touching anything.

use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, PoisonError, RwLock};

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::storage::{keys, safe_get, safe_set, KeyValueStore};
use crate::time::minutes_to_seconds;
use crate::timer::SessionType;
use crate::validation::{
    validate_long_break_duration, validate_sessions_before_long_break,
    validate_short_break_duration, validate_work_duration,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Auto,
    Light,
    Dark,
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Theme::Auto => "auto",
            Theme::Light => "light",
            Theme::Dark => "dark",
        })
    }
}

impl FromStr for Theme {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(Theme::Auto),
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(ValidationError::InvalidValue {
                key: "theme".into(),
                message: format!("expected auto, light or dark, got '{other}'"),
            }),
        }
    }
}

/// The persisted settings record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSettings {
    #[serde(default = "default_work_minutes")]
    pub work_minutes: u32,
    #[serde(default = "default_short_break_minutes")]
    pub short_break_minutes: u32,
    #[serde(default = "default_long_break_minutes")]
    pub long_break_minutes: u32,
    #[serde(default = "default_sessions_before_long_break")]
    pub sessions_before_long_break: u32,
    #[serde(default)]
    pub theme: Theme,
}

fn default_work_minutes() -> u32 {
    25
}
fn default_short_break_minutes() -> u32 {
    5
}
fn default_long_break_minutes() -> u32 {
    15
}
fn default_sessions_before_long_break() -> u32 {
    4
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            work_minutes: default_work_minutes(),
            short_break_minutes: default_short_break_minutes(),
            long_break_minutes: default_long_break_minutes(),
            sessions_before_long_break: default_sessions_before_long_break(),
            theme: Theme::default(),
        }
    }
}

impl UserSettings {
    /// Check every numeric field against its allowed range.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_work_duration(self.work_minutes)?;
        validate_short_break_duration(self.short_break_minutes)?;
        validate_long_break_duration(self.long_break_minutes)?;
        validate_sessions_before_long_break(self.sessions_before_long_break)?;
        Ok(())
    }

    /// Replace each out-of-range field with its default.
    pub fn sanitized(self) -> Self {
        let defaults = Self::default();
        Self {
            work_minutes: validate_work_duration(self.work_minutes)
                .unwrap_or(defaults.work_minutes),
            short_break_minutes: validate_short_break_duration(self.short_break_minutes)
                .unwrap_or(defaults.short_break_minutes),
            long_break_minutes: validate_long_break_duration(self.long_break_minutes)
                .unwrap_or(defaults.long_break_minutes),
            sessions_before_long_break: validate_sessions_before_long_break(
                self.sessions_before_long_break,
            )
            .unwrap_or(defaults.sessions_before_long_break),
            theme: self.theme,
        }
    }

    pub fn durations(&self) -> Durations {
        Durations {
            work_sec: minutes_to_seconds(self.work_minutes),
            short_break_sec: minutes_to_seconds(self.short_break_minutes),
            long_break_sec: minutes_to_seconds(self.long_break_minutes),
        }
    }
}

/// Configured session lengths in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Durations {
    pub work_sec: u32,
    pub short_break_sec: u32,
    pub long_break_sec: u32,
}

impl Durations {
    pub fn for_session(&self, session_type: SessionType) -> u32 {
        match session_type {
            SessionType::Work => self.work_sec,
            SessionType::ShortBreak => self.short_break_sec,
            SessionType::LongBreak => self.long_break_sec,
        }
    }
}

/// What the timer engine needs from settings.
pub trait SettingsReader: Send + Sync {
    fn durations(&self) -> Durations;
    fn sessions_before_long_break(&self) -> u32;
}

/// Settings backed by a key-value store.
pub struct Settings {
    store: Arc<dyn KeyValueStore>,
    current: RwLock<UserSettings>,
}

impl Settings {
    /// Load from the store, falling back to defaults field by field.
    pub fn load(store: Arc<dyn KeyValueStore>) -> Self {
        let stored = safe_get(store.as_ref(), keys::SETTINGS, UserSettings::default());
        if let Err(e) = stored.validate() {
            tracing::warn!(
                error = %e,
                "stored settings out of range, using defaults for bad fields"
            );
        }
        Self {
            store,
            current: RwLock::new(stored.sanitized()),
        }
    }

    /// Copy of the current settings.
    pub fn get(&self) -> UserSettings {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn set_work_minutes(&self, value: u32) -> Result<(), ValidationError> {
        let value = validate_work_duration(value)?;
        self.commit(|s| s.work_minutes = value);
        Ok(())
    }

    pub fn set_short_break_minutes(&self, value: u32) -> Result<(), ValidationError> {
        let value = validate_short_break_duration(value)?;
        self.commit(|s| s.short_break_minutes = value);
        Ok(())
    }

    pub fn set_long_break_minutes(&self, value: u32) -> Result<(), ValidationError> {
        let value = validate_long_break_duration(value)?;
        self.commit(|s| s.long_break_minutes = value);
        Ok(())
    }

    pub fn set_sessions_before_long_break(&self, value: u32) -> Result<(), ValidationError> {
        let value = validate_sessions_before_long_break(value)?;
        self.commit(|s| s.sessions_before_long_break = value);
        Ok(())
    }

    pub fn set_theme(&self, theme: Theme) {
        self.commit(|s| s.theme = theme);
    }

    pub fn reset_to_defaults(&self) {
        self.commit(|s| *s = UserSettings::default());
    }

    /// Read one field by its record name (`workMinutes`, `theme`, ...).
    pub fn get_value(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self.get()).ok()?;
        match json.get(key)? {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set one field by its record name, parsing `value` into the field's
    /// type. The whole record is validated before it is committed.
    pub fn set_value(&self, key: &str, value: &str) -> Result<(), ValidationError> {
        let mut json = serde_json::to_value(self.get()).map_err(|e| invalid(key, e))?;
        let obj = json
            .as_object_mut()
            .ok_or_else(|| ValidationError::UnknownKey(key.to_string()))?;
        let existing = obj
            .get(key)
            .ok_or_else(|| ValidationError::UnknownKey(key.to_string()))?;

        let new_value = match existing {
            serde_json::Value::Number(_) => {
                let n: u32 = value.trim().parse().map_err(|e| invalid(key, e))?;
                serde_json::Value::Number(n.into())
            }
            _ => serde_json::Value::String(value.parse::<Theme>()?.to_string()),
        };
        obj.insert(key.to_string(), new_value);

        let updated: UserSettings = serde_json::from_value(json).map_err(|e| invalid(key, e))?;
        updated.validate()?;
        self.commit(|s| *s = updated);
        Ok(())
    }

    fn commit(&self, apply: impl FnOnce(&mut UserSettings)) {
        let snapshot = {
            let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);
            apply(&mut current);
            current.clone()
        };
        safe_set(self.store.as_ref(), keys::SETTINGS, &snapshot);
    }
}

fn invalid(key: &str, err: impl fmt::Display) -> ValidationError {
    ValidationError::InvalidValue {
        key: key.to_string(),
        message: err.to_string(),
    }
}

impl SettingsReader for Settings {
    fn durations(&self) -> Durations {
        self.get().durations()
    }

    fn sessions_before_long_break(&self) -> u32 {
        self.get().sessions_before_long_break
    }
}
