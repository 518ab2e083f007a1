//! Task types as delivered by the scheduling service.
//!
//! Tasks are owned by the backend's [`Schedule`](crate::schedule::Schedule);
//! this crate only ever evaluates immutable snapshots of them.

mod input;

pub use input::{format_clock_time, parse_clock_time, FocusScore, PomodoroDuration, TaskInput};

use chrono::{DateTime, Duration, Local};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::pomodoro::PomodoroSession;

/// Task lifecycle status.
///
/// Transitions are executed by the backend; the core only reads them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskStatus {
    Pending,
    InProgress,
    Completed,
    Paused,
    Skipped,
}

impl Default for TaskStatus {
    fn default() -> Self {
        TaskStatus::Pending
    }
}

/// A single time-boxed task of a daily schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub title: String,
    pub start_time: DateTime<Local>,
    pub end_time: DateTime<Local>,
    pub estimated_duration_minutes: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual_duration_minutes: Option<i64>,
    #[serde(default)]
    pub status: TaskStatus,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual_start_time: Option<DateTime<Local>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual_end_time: Option<DateTime<Local>>,
    /// User-selected pomodoro length in minutes (backend default is 25).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_pomodoro_duration: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pomodoro: Option<PomodoroSession>,
}

impl Task {
    /// Create a pending task spanning `start_time..end_time`.
    pub fn new(title: impl Into<String>, start_time: DateTime<Local>, end_time: DateTime<Local>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            title: title.into(),
            start_time,
            end_time,
            estimated_duration_minutes: (end_time - start_time).num_minutes(),
            actual_duration_minutes: None,
            status: TaskStatus::Pending,
            tags: Vec::new(),
            notes: None,
            actual_start_time: None,
            actual_end_time: None,
            custom_pomodoro_duration: None,
            pomodoro: None,
        }
    }

    /// Identity used for notification de-dup and drag targeting.
    pub fn key(&self) -> TaskKey {
        TaskKey::new(&self.title, self.start_time)
    }

    /// Scheduled length (`end - start`), independent of the estimate field.
    pub fn duration(&self) -> Duration {
        self.end_time - self.start_time
    }

    pub fn is_current(&self) -> bool {
        self.status == TaskStatus::InProgress
    }

    /// `HH:MM-HH:MM` label, the format the backend uses in change history.
    pub fn time_range_label(&self) -> String {
        format!(
            "{}-{}",
            format_clock_time(&self.start_time),
            format_clock_time(&self.end_time)
        )
    }

    /// Pomodoro length that an update request must carry unchanged.
    ///
    /// Prefers the explicit custom length and falls back to the running
    /// session's length; values outside the supported set are dropped.
    pub fn pomodoro_duration(&self) -> Option<PomodoroDuration> {
        self.custom_pomodoro_duration
            .or_else(|| self.pomodoro.as_ref().map(|p| p.pomodoro_duration))
            .and_then(|m| PomodoroDuration::try_from(m).ok())
    }
}

/// Task identity as `(title, start_time)`.
///
/// The backend addresses tasks by index and the presentation layer never sees
/// stable ids, so two tasks sharing title and start time collide here.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TaskKey {
    pub title: String,
    pub start_time: DateTime<Local>,
}

impl TaskKey {
    pub fn new(title: &str, start_time: DateTime<Local>) -> Self {
        Self {
            title: title.to_string(),
            start_time,
        }
    }
}

impl fmt::Display for TaskKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.title, self.start_time.to_rfc3339())
    }
}
