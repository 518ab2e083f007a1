use chrono::{DateTime, Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::notify::NotificationKind;

/// Every observable outcome of the core produces an Event.
/// The presentation layer drains them from the session's channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    /// A full reload replaced the displayed snapshot.
    ScheduleLoaded {
        date: NaiveDate,
        task_count: usize,
        /// `false` when the service has no schedule for the date.
        found: bool,
        at: DateTime<Local>,
    },
    NotificationDispatched {
        kind: NotificationKind,
        task_title: String,
        delivered: bool,
        at: DateTime<Local>,
    },
    /// A focus interval ran out.
    PomodoroCompleted {
        task_title: String,
        interval_start: DateTime<Local>,
        duration_min: u32,
        next_break_min: u32,
        at: DateTime<Local>,
    },
    /// A drag gesture produced an update request.
    TaskMoved {
        index: usize,
        task_title: String,
        old_time: String,
        new_time: String,
        at: DateTime<Local>,
    },
    /// A drag gesture ended without a drop target.
    DragReverted {
        index: usize,
        task_title: String,
        at: DateTime<Local>,
    },
    ScheduleShiftRequested {
        date: NaiveDate,
        from_index: usize,
        delta_minutes: i64,
        at: DateTime<Local>,
    },
    MutationFailed {
        operation: String,
        message: String,
        at: DateTime<Local>,
    },
}
