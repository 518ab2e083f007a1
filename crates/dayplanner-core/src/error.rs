//! Core error types for dayplanner-core.
//!
//! Only failures of the external scheduling service reach the user. Expected
//! "no match" conditions (no window hit, no drop target, no schedule for a
//! date) are modelled as ordinary return values, never as errors.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for dayplanner-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// The scheduling service could not be reached or answered with an error
    #[error("Schedule service error: {0}")]
    Service(#[from] ServiceError),

    /// A mutation request was rejected; the last confirmed schedule stays on display
    #[error("Failed to {operation}: {source}")]
    Mutation {
        operation: String,
        #[source]
        source: ServiceError,
    },

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Drag / shift gesture errors
    #[error("Reschedule error: {0}")]
    Reschedule(#[from] RescheduleError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors reported by a [`ScheduleService`](crate::service::ScheduleService).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    /// No schedule exists for the requested date (mutations only; loads return `None`)
    #[error("Schedule not found for {0}")]
    ScheduleNotFound(chrono::NaiveDate),

    /// Index does not address a task of the schedule
    #[error("Task index {index} out of bounds (length: {len})")]
    IndexOutOfBounds { index: usize, len: usize },

    /// The backend refused the request
    #[error("Request rejected: {0}")]
    Rejected(String),

    /// Transport / IPC failure
    #[error("Service unavailable: {0}")]
    Unavailable(String),
}

/// Notification delivery failure. Logged and swallowed by the trigger engine.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Notification delivery failed: {0}")]
pub struct SinkError(pub String);

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Data directory could not be created
    #[error("Failed to access data directory: {0}")]
    DataDir(String),
}

/// Validation errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Clock time not in `HH:MM` form
    #[error("Invalid time '{0}': expected HH:MM")]
    InvalidClockTime(String),

    /// Pomodoro length outside the supported set
    #[error("Unsupported pomodoro duration {0} minutes (expected one of 5, 10, 15, 20, 25, 30, 45, 60, 90)")]
    PomodoroDuration(u32),

    /// Focus score outside 1..=10
    #[error("Focus score must be between 1 and 10, got {0}")]
    FocusScore(u8),

    /// Shift magnitude of zero minutes
    #[error("Shift magnitude must be greater than zero")]
    EmptyShift,

    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

/// Errors raised by the interactive rescheduling state machines.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RescheduleError {
    /// A drag gesture is already active
    #[error("A drag gesture is already in progress for '{0}'")]
    GestureInProgress(String),

    /// No task at the pressed index in the current snapshot
    #[error("No task at index {0}")]
    NoSuchTask(usize),

    /// No schedule is loaded
    #[error("No schedule loaded")]
    NoSchedule,
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
