//! Drag-and-drop relocation of a single task.
//!
//! ```text
//! Idle --press--> Dragging --release--> Idle
//!                   |  ^
//!                   hover (highlight only)
//! ```
//!
//! Only the hour anchor moves: the task lands on `HH:00` of the selected
//! date and keeps its exact duration. Nothing is mutated until release, and a
//! release without a resolvable hour issues no request at all.

use chrono::{DateTime, Duration, Local, NaiveDate, TimeZone};
use tracing::debug;

use super::geometry::HourLocator;
use crate::error::RescheduleError;
use crate::task::{format_clock_time, PomodoroDuration, Task, TaskInput, TaskKey};

/// The task captured at press time.
#[derive(Debug, Clone, PartialEq)]
pub struct DragSession {
    pub key: TaskKey,
    pub index: usize,
    pub original_start: DateTime<Local>,
    pub original_end: DateTime<Local>,
    pub tags: Vec<String>,
    pub notes: Option<String>,
    pub pomodoro_duration: Option<PomodoroDuration>,
    /// Hour under the pointer at the last move, for highlighting.
    pub hovered_hour: Option<u8>,
}

impl DragSession {
    fn capture(task: &Task, index: usize) -> Self {
        Self {
            key: task.key(),
            index,
            original_start: task.start_time,
            original_end: task.end_time,
            tags: task.tags.clone(),
            notes: task.notes.clone(),
            pomodoro_duration: task.pomodoro_duration(),
            hovered_hour: None,
        }
    }

    pub fn duration(&self) -> Duration {
        self.original_end - self.original_start
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DragState {
    Idle,
    Dragging(DragSession),
}

/// What a release resolved to.
#[derive(Debug, Clone, PartialEq)]
pub enum DropOutcome {
    /// Issue `update_task(date, index, input)`.
    Move {
        index: usize,
        input: TaskInput,
        old_time: String,
        new_time: String,
    },
    /// No valid target; the task stays where it was.
    Revert { index: usize, key: TaskKey },
}

/// Drag gesture state machine over an injected [`HourLocator`].
#[derive(Debug)]
pub struct DragRescheduler<L> {
    locator: L,
    state: DragState,
}

impl<L: HourLocator> DragRescheduler<L> {
    pub fn new(locator: L) -> Self {
        Self {
            locator,
            state: DragState::Idle,
        }
    }

    pub fn state(&self) -> &DragState {
        &self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging(_))
    }

    pub fn session(&self) -> Option<&DragSession> {
        match &self.state {
            DragState::Dragging(session) => Some(session),
            DragState::Idle => None,
        }
    }

    /// Press on a task's drag handle.
    pub fn press(&mut self, task: &Task, index: usize) -> Result<(), RescheduleError> {
        if let DragState::Dragging(active) = &self.state {
            return Err(RescheduleError::GestureInProgress(active.key.title.clone()));
        }
        debug!(task = %task.title, index, "drag started");
        self.state = DragState::Dragging(DragSession::capture(task, index));
        Ok(())
    }

    /// Pointer moved: returns the hour to highlight.
    pub fn hover(&mut self, y: f64) -> Option<u8> {
        let hour = self.locator.hour_at(y);
        match &mut self.state {
            DragState::Dragging(session) => {
                session.hovered_hour = hour;
                hour
            }
            DragState::Idle => None,
        }
    }

    /// Pointer released at `y`. Returns `None` if no gesture was active.
    pub fn release(&mut self, y: f64, date: NaiveDate) -> Option<DropOutcome> {
        let DragState::Dragging(session) = std::mem::replace(&mut self.state, DragState::Idle) else {
            return None;
        };

        let target = self
            .locator
            .hour_at(y)
            .and_then(|hour| relocate(session.original_start, session.original_end, date, hour));

        let outcome = match target {
            Some((start, end)) => {
                let new_time = format_clock_time(&start);
                let input = TaskInput {
                    title: session.key.title.clone(),
                    start_time: new_time.clone(),
                    end_time: format_clock_time(&end),
                    tags: session.tags,
                    notes: session.notes,
                    pomodoro_duration: session.pomodoro_duration,
                };
                debug!(task = %input.title, start = %input.start_time, end = %input.end_time, "drag dropped");
                DropOutcome::Move {
                    index: session.index,
                    input,
                    old_time: format_clock_time(&session.original_start),
                    new_time,
                }
            }
            None => {
                debug!(task = %session.key.title, "drag released without target");
                DropOutcome::Revert {
                    index: session.index,
                    key: session.key,
                }
            }
        };
        Some(outcome)
    }

    /// Abandon the gesture (pointer capture lost).
    pub fn cancel(&mut self) -> Option<DragSession> {
        match std::mem::replace(&mut self.state, DragState::Idle) {
            DragState::Dragging(session) => Some(session),
            DragState::Idle => None,
        }
    }
}

/// New `(start, end)` for a task dropped on `hour` of `date`.
///
/// Start is `date hour:00`; end keeps the original duration. Returns `None`
/// for hours past 23, for a start that does not exist in local time, and
/// when the end would spill into the next day (the `HH:MM` request format
/// cannot express it).
pub fn relocate(
    original_start: DateTime<Local>,
    original_end: DateTime<Local>,
    date: NaiveDate,
    hour: u8,
) -> Option<(DateTime<Local>, DateTime<Local>)> {
    let naive = date.and_hms_opt(u32::from(hour), 0, 0)?;
    let start = Local.from_local_datetime(&naive).earliest()?;
    let end = start + (original_end - original_start);
    (end.date_naive() == date).then_some((start, end))
}
