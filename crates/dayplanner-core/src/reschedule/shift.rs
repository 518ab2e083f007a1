//! Bulk postpone / pull-forward of a run of tasks.
//!
//! The coordinator only decides *which* request to send. Recomputing each
//! downstream task, resolving overlaps and day-boundary conflicts, and
//! appending the change-log entry all happen in the scheduling service,
//! which stays the single source of truth for the whole suffix.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{ServiceError, ValidationError};
use crate::service::ScheduleService;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShiftDirection {
    /// Move later.
    Postpone,
    /// Move earlier.
    PullForward,
}

impl ShiftDirection {
    pub fn signed(self, magnitude_min: u32) -> i64 {
        match self {
            ShiftDirection::Postpone => i64::from(magnitude_min),
            ShiftDirection::PullForward => -i64::from(magnitude_min),
        }
    }
}

/// The single request a shift gesture produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftRequest {
    pub date: NaiveDate,
    pub from_index: usize,
    pub delta_minutes: i64,
}

/// Options chosen in the shift dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftOptions {
    pub direction: ShiftDirection,
    pub magnitude_min: u32,
    /// Shift the pivot task itself, not just the tasks after it.
    pub include_current: bool,
}

/// Builds and issues shift requests.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShiftCascadeCoordinator;

impl ShiftCascadeCoordinator {
    pub fn new() -> Self {
        Self
    }

    /// Turn a pivot and dialog options into a request.
    pub fn plan(&self, date: NaiveDate, pivot: usize, options: ShiftOptions) -> Result<ShiftRequest, ValidationError> {
        if options.magnitude_min == 0 {
            return Err(ValidationError::EmptyShift);
        }
        let from_index = if options.include_current { pivot } else { pivot + 1 };
        Ok(ShiftRequest {
            date,
            from_index,
            delta_minutes: options.direction.signed(options.magnitude_min),
        })
    }

    /// Issue exactly one `shift_schedule` call. The caller reloads afterwards.
    pub fn execute(&self, service: &dyn ScheduleService, request: &ShiftRequest) -> Result<(), ServiceError> {
        info!(
            date = %request.date,
            from_index = request.from_index,
            delta_minutes = request.delta_minutes,
            "requesting schedule shift"
        );
        service.shift_schedule(request.date, request.from_index, request.delta_minutes)
    }
}
