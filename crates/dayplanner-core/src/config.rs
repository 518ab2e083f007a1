//! TOML-based application configuration.
//!
//! Stores:
//! - Notification polling, window sizes and per-kind reminder toggles
//! - Pomodoro tick rate
//! - Shift dialog defaults
//!
//! Configuration is stored at `~/.config/dayplanner/config.toml`
//! (`~/.config/dayplanner-dev/` when `DAYPLANNER_ENV=dev`).

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration as StdDuration;

use crate::error::{ConfigError, Result};
use crate::notify::ReminderToggles;
use crate::reschedule::{ShiftDirection, ShiftOptions};
use crate::timing::WindowThresholds;

/// Notification configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationsConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_true")]
    pub task_start_reminder: bool,
    #[serde(default = "default_true")]
    pub task_end_reminder: bool,
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,
    #[serde(default = "default_start_warning_minutes")]
    pub start_warning_minutes: u32,
    #[serde(default = "default_end_tolerance_secs")]
    pub end_tolerance_secs: u32,
}

/// Pomodoro countdown configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PomodoroConfig {
    #[serde(default = "default_tick_interval_secs")]
    pub tick_interval_secs: u64,
}

/// Shift dialog defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RescheduleConfig {
    #[serde(default = "default_shift_minutes")]
    pub default_shift_minutes: u32,
    #[serde(default = "default_true")]
    pub include_current_by_default: bool,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/dayplanner/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub notifications: NotificationsConfig,
    #[serde(default)]
    pub pomodoro: PomodoroConfig,
    #[serde(default)]
    pub reschedule: RescheduleConfig,
}

fn default_true() -> bool {
    true
}
fn default_poll_interval_secs() -> u64 {
    30
}
fn default_start_warning_minutes() -> u32 {
    5
}
fn default_end_tolerance_secs() -> u32 {
    60
}
fn default_tick_interval_secs() -> u64 {
    1
}
fn default_shift_minutes() -> u32 {
    15
}

impl Default for NotificationsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            task_start_reminder: true,
            task_end_reminder: true,
            poll_interval_secs: default_poll_interval_secs(),
            start_warning_minutes: default_start_warning_minutes(),
            end_tolerance_secs: default_end_tolerance_secs(),
        }
    }
}

impl Default for PomodoroConfig {
    fn default() -> Self {
        Self {
            tick_interval_secs: default_tick_interval_secs(),
        }
    }
}

impl Default for RescheduleConfig {
    fn default() -> Self {
        Self {
            default_shift_minutes: default_shift_minutes(),
            include_current_by_default: true,
        }
    }
}

impl NotificationsConfig {
    pub fn poll_interval(&self) -> StdDuration {
        StdDuration::from_secs(self.poll_interval_secs.max(1))
    }

    pub fn toggles(&self) -> ReminderToggles {
        ReminderToggles {
            start_warning: self.task_start_reminder,
            end_reached: self.task_end_reminder,
        }
    }

    pub fn thresholds(&self) -> WindowThresholds {
        WindowThresholds {
            start_warning: chrono::Duration::minutes(i64::from(self.start_warning_minutes)),
            end_tolerance: chrono::Duration::seconds(i64::from(self.end_tolerance_secs)),
        }
    }
}

impl PomodoroConfig {
    pub fn tick_interval(&self) -> StdDuration {
        StdDuration::from_secs(self.tick_interval_secs.max(1))
    }
}

impl RescheduleConfig {
    /// Pre-filled shift dialog for `direction`.
    pub fn shift_options(&self, direction: ShiftDirection) -> ShiftOptions {
        ShiftOptions {
            direction,
            magnitude_min: self.default_shift_minutes,
            include_current: self.include_current_by_default,
        }
    }
}

/// Returns `~/.config/dayplanner[-dev]/` based on DAYPLANNER_ENV, creating it.
pub fn data_dir() -> Result<PathBuf> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("DAYPLANNER_ENV").unwrap_or_else(|_| "production".to_string());
    let dir = if env == "dev" {
        base_dir.join("dayplanner-dev")
    } else {
        base_dir.join("dayplanner")
    };

    std::fs::create_dir_all(&dir).map_err(|e| ConfigError::DataDir(e.to_string()))?;
    Ok(dir)
}

impl Config {
    fn get_json_value_by_path<'a>(root: &'a serde_json::Value, key: &str) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }
        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn path() -> Result<PathBuf> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from the default location or write and return the default.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::path()?)
    }

    /// Load from `path`; a missing file yields the default, which is saved.
    pub fn load_from(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(|e| {
                ConfigError::LoadFailed {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                }
                .into()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Persist to the default location.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))?;
        Ok(())
    }

    /// Load from disk, returning default on error.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_else(|e| {
            tracing::warn!("using default configuration: {e}");
            Self::default()
        })
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        match Self::get_json_value_by_path(&json, key)? {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }
}
