use chrono::NaiveDate;

use crate::error::ServiceError;
use crate::schedule::Schedule;
use crate::task::{FocusScore, TaskInput};

/// The remote scheduling service that owns the authoritative schedule.
///
/// Every call is a discrete request/response. Tasks are addressed by their
/// index in the schedule for `date`. Implementations append change-history
/// entries themselves; the core never writes them.
pub trait ScheduleService: Send + Sync {
    /// Load the schedule for `date`. `Ok(None)` means the day is empty.
    fn get_schedule(&self, date: NaiveDate) -> Result<Option<Schedule>, ServiceError>;

    fn add_task(&self, date: NaiveDate, task: &TaskInput) -> Result<(), ServiceError>;

    fn update_task(&self, date: NaiveDate, index: usize, task: &TaskInput) -> Result<(), ServiceError>;

    fn delete_task(&self, date: NaiveDate, index: usize) -> Result<(), ServiceError>;

    fn start_task(&self, date: NaiveDate, index: usize) -> Result<(), ServiceError>;

    fn pause_task(&self, date: NaiveDate, index: usize) -> Result<(), ServiceError>;

    fn resume_task(&self, date: NaiveDate, index: usize) -> Result<(), ServiceError>;

    fn complete_task(&self, date: NaiveDate, index: usize, focus_score: FocusScore) -> Result<(), ServiceError>;

    /// Shift every task from `from_index` onwards by `delta_minutes`
    /// (negative pulls forward). The service resolves all conflicts.
    fn shift_schedule(&self, date: NaiveDate, from_index: usize, delta_minutes: i64) -> Result<(), ServiceError>;
}
