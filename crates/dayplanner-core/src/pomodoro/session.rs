use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// Number of focus intervals before a long break.
pub const INTERVALS_PER_LONG_BREAK: u32 = 4;

/// Focus-interval bookkeeping attached to a task by the backend.
///
/// `current_start` is cleared while the task is paused; the clock does no
/// work for a session without it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PomodoroSession {
    pub total_pomodoros: u32,
    pub completed_pomodoros: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_start: Option<DateTime<Local>>,
    /// Interval length in minutes.
    #[serde(default = "default_pomodoro_duration")]
    pub pomodoro_duration: u32,
    #[serde(default = "default_short_break")]
    pub short_break: u32,
    #[serde(default = "default_long_break")]
    pub long_break: u32,
}

fn default_pomodoro_duration() -> u32 {
    25
}
fn default_short_break() -> u32 {
    5
}
fn default_long_break() -> u32 {
    15
}

impl Default for PomodoroSession {
    fn default() -> Self {
        Self {
            total_pomodoros: 0,
            completed_pomodoros: 0,
            current_start: None,
            pomodoro_duration: default_pomodoro_duration(),
            short_break: default_short_break(),
            long_break: default_long_break(),
        }
    }
}

impl PomodoroSession {
    /// Whether an interval is currently running.
    pub fn is_active(&self) -> bool {
        self.current_start.is_some()
    }

    pub fn is_complete(&self) -> bool {
        self.completed_pomodoros >= self.total_pomodoros
    }

    /// Interval length in seconds.
    pub fn duration_secs(&self) -> i64 {
        i64::from(self.pomodoro_duration) * 60
    }

    /// Break that follows the interval currently running.
    pub fn next_break_duration(&self) -> u32 {
        if (self.completed_pomodoros + 1) % INTERVALS_PER_LONG_BREAK == 0 {
            self.long_break
        } else {
            self.short_break
        }
    }
}
