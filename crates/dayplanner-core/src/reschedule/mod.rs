//! Interactive rescheduling: drag a task to a new hour, or shift a run of
//! tasks by a fixed number of minutes.

mod drag;
mod geometry;
mod shift;

pub use drag::{relocate, DragRescheduler, DragSession, DragState, DropOutcome};
pub use geometry::{HourLocator, HourRows, LayoutElement, LayoutProbe, ScheduleGeometryMapper, LAST_HOUR};
pub use shift::{ShiftCascadeCoordinator, ShiftDirection, ShiftOptions, ShiftRequest};
