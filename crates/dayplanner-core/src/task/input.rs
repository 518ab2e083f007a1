//! Request payloads sent to the scheduling service.

use chrono::{DateTime, Local, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

const CLOCK_FORMAT: &str = "%H:%M";

/// Task fields accepted by `add_task` / `update_task`.
///
/// Times are wall-clock `HH:MM` on the schedule's date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskInput {
    pub title: String,
    pub start_time: String,
    pub end_time: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pomodoro_duration: Option<PomodoroDuration>,
}

impl TaskInput {
    /// Check both clock times parse. The backend owns every other rule.
    pub fn validate(&self) -> Result<(), ValidationError> {
        parse_clock_time(&self.start_time)?;
        parse_clock_time(&self.end_time)?;
        if self.title.trim().is_empty() {
            return Err(ValidationError::InvalidValue {
                field: "title".to_string(),
                message: "must not be empty".to_string(),
            });
        }
        Ok(())
    }
}

/// Parse a `HH:MM` clock time.
pub fn parse_clock_time(s: &str) -> Result<NaiveTime, ValidationError> {
    NaiveTime::parse_from_str(s, CLOCK_FORMAT)
        .map_err(|_| ValidationError::InvalidClockTime(s.to_string()))
}

/// Format the wall-clock part of a timestamp as `HH:MM`.
pub fn format_clock_time(t: &DateTime<Local>) -> String {
    t.format(CLOCK_FORMAT).to_string()
}

/// Pomodoro interval length in minutes, restricted to the values the
/// task editor offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct PomodoroDuration(u32);

impl PomodoroDuration {
    pub const ALLOWED: [u32; 9] = [5, 10, 15, 20, 25, 30, 45, 60, 90];

    pub fn minutes(self) -> u32 {
        self.0
    }
}

impl Default for PomodoroDuration {
    fn default() -> Self {
        PomodoroDuration(25)
    }
}

impl TryFrom<u32> for PomodoroDuration {
    type Error = ValidationError;

    fn try_from(minutes: u32) -> Result<Self, Self::Error> {
        if Self::ALLOWED.contains(&minutes) {
            Ok(PomodoroDuration(minutes))
        } else {
            Err(ValidationError::PomodoroDuration(minutes))
        }
    }
}

impl From<PomodoroDuration> for u32 {
    fn from(d: PomodoroDuration) -> Self {
        d.0
    }
}

/// Self-reported focus quality recorded when completing a task (1-10).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct FocusScore(u8);

impl FocusScore {
    pub fn value(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for FocusScore {
    type Error = ValidationError;

    fn try_from(score: u8) -> Result<Self, Self::Error> {
        if (1..=10).contains(&score) {
            Ok(FocusScore(score))
        } else {
            Err(ValidationError::FocusScore(score))
        }
    }
}

impl From<FocusScore> for u8 {
    fn from(s: FocusScore) -> Self {
        s.0
    }
}
