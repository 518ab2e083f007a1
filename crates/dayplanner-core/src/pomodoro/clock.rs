//! Focus-interval countdown.
//!
//! The clock is a wall-clock computation, not a timer: remaining time is
//! always derived from the session's `current_start`, so a missed or late
//! tick never drifts. The caller (see [`PomodoroTicker`](super::PomodoroTicker))
//! re-evaluates it once per second while a session is active.
//!
//! ```text
//! remaining = duration*60 - floor((now - current_start) / 1s), floored at 0
//! ```

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use super::session::PomodoroSession;

/// Result of one clock evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClockReading {
    pub interval_start: DateTime<Local>,
    pub duration_min: u32,
    pub remaining_secs: i64,
    /// 0.0 .. 1.0, presentation only.
    pub progress: f64,
    /// True on the single evaluation where the interval is first seen finished.
    pub completed: bool,
}

impl ClockReading {
    /// `MM:SS` countdown label.
    pub fn remaining_label(&self) -> String {
        format!("{:02}:{:02}", self.remaining_secs / 60, self.remaining_secs % 60)
    }
}

/// One-shot completion detector for the running focus interval.
///
/// Completion is keyed by `(current_start, pomodoro_duration)`; a new start
/// or a changed length re-arms it.
#[derive(Debug, Clone, Default)]
pub struct PomodoroClock {
    interval: Option<(DateTime<Local>, u32)>,
    fired: bool,
}

impl PomodoroClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Evaluate the session at `now`.
    ///
    /// Returns `None` when the session is inactive (no `current_start`).
    pub fn evaluate(&mut self, session: &PomodoroSession, now: DateTime<Local>) -> Option<ClockReading> {
        let start = session.current_start?;
        let key = (start, session.pomodoro_duration);
        if self.interval != Some(key) {
            self.interval = Some(key);
            self.fired = false;
        }

        let remaining_secs = remaining_secs(session.duration_secs(), start, now);
        let completed = remaining_secs == 0 && !self.fired;
        if completed {
            self.fired = true;
        }

        Some(ClockReading {
            interval_start: start,
            duration_min: session.pomodoro_duration,
            remaining_secs,
            progress: progress(session.duration_secs(), remaining_secs),
            completed,
        })
    }

    /// Whether completion has already fired for the tracked interval.
    pub fn has_fired(&self) -> bool {
        self.fired
    }

    /// Forget the tracked interval.
    pub fn clear(&mut self) {
        self.interval = None;
        self.fired = false;
    }
}

fn remaining_secs(total_secs: i64, start: DateTime<Local>, now: DateTime<Local>) -> i64 {
    // div_euclid floors toward negative infinity; clamp covers a start in the future.
    let elapsed_secs = (now - start).num_milliseconds().div_euclid(1000).max(0);
    (total_secs - elapsed_secs).max(0)
}

fn progress(total_secs: i64, remaining_secs: i64) -> f64 {
    if total_secs <= 0 {
        return 0.0;
    }
    (total_secs - remaining_secs) as f64 / total_secs as f64
}
