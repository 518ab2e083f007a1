//! Start-warning / end-reached window detection.
//!
//! A pure function of `(now, start, end)`. Both windows may match at once for
//! very short tasks; callers fire each independently.

use chrono::{DateTime, Duration, Local};

/// Window sizes used by [`evaluate_window`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowThresholds {
    /// Warn when the start is at most this far ahead.
    pub start_warning: Duration,
    /// End counts as reached within this distance on either side.
    pub end_tolerance: Duration,
}

impl Default for WindowThresholds {
    fn default() -> Self {
        Self {
            start_warning: Duration::minutes(5),
            end_tolerance: Duration::minutes(1),
        }
    }
}

/// Which windows `now` falls into.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WindowMatch {
    /// Whole minutes until start, rounded up, when inside the warning window.
    pub start_warning: Option<i64>,
    pub end_reached: bool,
}

impl WindowMatch {
    pub fn is_empty(&self) -> bool {
        self.start_warning.is_none() && !self.end_reached
    }
}

/// Evaluate both windows with millisecond precision.
///
/// - start warning: `0 < start - now <= start_warning`
/// - end reached: `-end_tolerance <= end - now <= end_tolerance`
pub fn evaluate_window(
    now: DateTime<Local>,
    start: DateTime<Local>,
    end: DateTime<Local>,
    thresholds: &WindowThresholds,
) -> WindowMatch {
    let to_start = (start - now).num_milliseconds();
    let to_end = (end - now).num_milliseconds();
    let warn_ms = thresholds.start_warning.num_milliseconds();
    let tolerance_ms = thresholds.end_tolerance.num_milliseconds();

    let start_warning = (to_start > 0 && to_start <= warn_ms).then(|| minutes_ceil(to_start));
    let end_reached = to_end >= -tolerance_ms && to_end <= tolerance_ms;

    WindowMatch {
        start_warning,
        end_reached,
    }
}

fn minutes_ceil(ms: i64) -> i64 {
    (ms + 59_999) / 60_000
}
