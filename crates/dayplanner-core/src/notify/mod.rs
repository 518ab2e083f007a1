//! Task start / end reminders.
//!
//! [`NotificationTriggerEngine`] polls the displayed schedule, asks
//! [`evaluate_window`](crate::timing::evaluate_window) about every task, and
//! dispatches each reminder at most once per session.

mod engine;
mod memo;
mod sink;

pub use engine::{Dispatch, NotificationTriggerEngine, ReminderToggles, DEFAULT_POLL_INTERVAL};
pub use memo::NotificationMemo;
pub use sink::{ChannelSink, LogSink, NotificationSink};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    StartWarning,
    EndReached,
}

/// A user-facing notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub title: String,
    pub body: String,
}

impl Notification {
    pub fn message(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
        }
    }

    pub fn start_warning(task_title: &str, minutes: i64) -> Self {
        let unit = if minutes == 1 { "minute" } else { "minutes" };
        Self::message(
            "Task starting soon",
            format!("\"{task_title}\" starts in {minutes} {unit}"),
        )
    }

    pub fn end_reached(task_title: &str) -> Self {
        Self::message("Task ending", format!("\"{task_title}\" is ending now"))
    }

    pub fn pomodoro_complete(task_title: &str, break_min: u32) -> Self {
        Self::message(
            "Pomodoro complete",
            format!("Focus interval for \"{task_title}\" is done. Take a {break_min}-minute break"),
        )
    }
}
