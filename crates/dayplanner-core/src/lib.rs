//! # Dayplanner Core Library
//!
//! Time-based task lifecycle and interactive rescheduling for a daily
//! planner client. The authoritative schedule lives in an external
//! scheduling service; this crate decides *when* to remind, *how long* a
//! focus interval has left, and *which* request a drag or shift gesture
//! turns into.
//!
//! ## Architecture
//!
//! - **Timing**: pure window evaluation over an injectable [`Clock`]
//! - **Notifications**: a polling engine with at-most-once delivery per task
//! - **Pomodoro**: a once-per-second countdown with a one-shot completion signal
//! - **Rescheduling**: drag-to-hour and cascade shift, both expressed as
//!   service requests
//! - **Session**: owns the snapshot and drives all of the above
//!
//! ## Key Components
//!
//! - [`SessionController`]: one displayed day
//! - [`NotificationTriggerEngine`]: start-warning / end-reached reminders
//! - [`PomodoroTicker`]: focus interval countdown
//! - [`ScheduleService`]: trait for the external backend
//! - [`Config`]: application configuration management

pub mod config;
pub mod error;
pub mod events;
pub mod logging;
pub mod notify;
pub mod pomodoro;
pub mod reschedule;
pub mod schedule;
pub mod service;
pub mod session;
pub mod task;
pub mod timing;

pub use config::Config;
pub use error::{ConfigError, CoreError, RescheduleError, ServiceError, SinkError, ValidationError};
pub use events::Event;
pub use notify::{
    ChannelSink, LogSink, Notification, NotificationKind, NotificationMemo, NotificationSink,
    NotificationTriggerEngine, ReminderToggles,
};
pub use pomodoro::{ClockReading, PomodoroClock, PomodoroSession, PomodoroTicker};
pub use reschedule::{
    DragRescheduler, DropOutcome, HourLocator, HourRows, LayoutElement, LayoutProbe, ScheduleGeometryMapper,
    ShiftCascadeCoordinator, ShiftDirection, ShiftOptions, ShiftRequest,
};
pub use schedule::{ChangeType, Schedule, ScheduleChange};
pub use service::ScheduleService;
pub use session::SessionController;
pub use task::{FocusScore, PomodoroDuration, Task, TaskInput, TaskKey, TaskStatus};
pub use timing::{evaluate_window, Clock, ManualClock, SystemClock, WindowMatch, WindowThresholds};
