//! Daily schedule snapshot and its change history.
//!
//! The authoritative schedule lives in the scheduling service. After every
//! mutation the session re-fetches it in full, so these types are read-only
//! views apart from the constructors used by service implementations.

use chrono::{DateTime, Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::task::{Task, TaskStatus};

/// Kind of entry in the schedule change log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChangeType {
    TaskCreated,
    /// Time or title edited through the task form
    TaskUpdated,
    TaskDeleted,
    /// Relocated by drag and drop
    TaskMoved,
    /// Bulk postpone / pull-forward of a run of tasks
    ScheduleShifted,
}

/// One append-only entry of a schedule's change history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleChange {
    pub timestamp: DateTime<Local>,
    pub change_type: ChangeType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_title: Option<String>,
    /// Time before the change (`HH:MM` or `HH:MM-HH:MM`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_time: Option<String>,
    /// Number of tasks touched by a shift
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub affected_tasks_count: Option<usize>,
    pub description: String,
}

impl ScheduleChange {
    fn base(change_type: ChangeType, task_title: Option<String>, description: String) -> Self {
        Self {
            timestamp: Local::now(),
            change_type,
            task_title,
            old_time: None,
            new_time: None,
            affected_tasks_count: None,
            description,
        }
    }

    pub fn task_created(task_title: String, time: String) -> Self {
        let description = format!("Added \"{task_title}\" at {time}");
        Self {
            new_time: Some(time),
            ..Self::base(ChangeType::TaskCreated, Some(task_title), description)
        }
    }

    pub fn task_updated(task_title: String, old_time: String, new_time: String) -> Self {
        let description = format!("\"{task_title}\" time changed: {old_time} -> {new_time}");
        Self {
            old_time: Some(old_time),
            new_time: Some(new_time),
            ..Self::base(ChangeType::TaskUpdated, Some(task_title), description)
        }
    }

    pub fn task_deleted(task_title: String, time: String) -> Self {
        let description = format!("Deleted \"{task_title}\" ({time})");
        Self {
            old_time: Some(time),
            ..Self::base(ChangeType::TaskDeleted, Some(task_title), description)
        }
    }

    pub fn task_moved(task_title: String, old_time: String, new_time: String) -> Self {
        let description = format!("Moved \"{task_title}\" from {old_time} to {new_time}");
        Self {
            old_time: Some(old_time),
            new_time: Some(new_time),
            ..Self::base(ChangeType::TaskMoved, Some(task_title), description)
        }
    }

    /// Positive `minutes` postpone, negative pull forward.
    pub fn schedule_shifted(from_task: String, minutes: i64, affected_count: usize) -> Self {
        let direction = if minutes > 0 { "postponed" } else { "pulled forward" };
        let description = format!(
            "{affected_count} task(s) from \"{from_task}\" {direction} by {} min",
            minutes.abs()
        );
        Self {
            affected_tasks_count: Some(affected_count),
            ..Self::base(ChangeType::ScheduleShifted, Some(from_task), description)
        }
    }
}

/// Ordered tasks for one calendar date plus the change log.
///
/// Tasks are expected in start-time order; nothing here enforces it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    pub date: DateTime<Local>,
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub changes: Vec<ScheduleChange>,
}

impl Schedule {
    pub fn new(date: DateTime<Local>) -> Self {
        Self {
            date,
            tasks: Vec::new(),
            changes: Vec::new(),
        }
    }

    /// Calendar date this schedule belongs to.
    pub fn day(&self) -> NaiveDate {
        self.date.date_naive()
    }

    pub fn task(&self, index: usize) -> Option<&Task> {
        self.tasks.get(index)
    }

    /// First task currently in progress.
    pub fn current_task(&self) -> Option<&Task> {
        self.tasks.iter().find(|t| t.is_current())
    }

    /// Pending task with the earliest start.
    pub fn next_task(&self) -> Option<&Task> {
        self.tasks
            .iter()
            .filter(|t| t.status == TaskStatus::Pending)
            .min_by_key(|t| t.start_time)
    }

    /// Percentage of completed tasks (0.0 for an empty day).
    pub fn completion_rate(&self) -> f64 {
        if self.tasks.is_empty() {
            return 0.0;
        }
        let completed = self
            .tasks
            .iter()
            .filter(|t| t.status == TaskStatus::Completed)
            .count();
        completed as f64 / self.tasks.len() as f64 * 100.0
    }

    pub fn latest_change(&self) -> Option<&ScheduleChange> {
        self.changes.last()
    }

    pub fn add_change(&mut self, change: ScheduleChange) {
        self.changes.push(change);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(h: u32, m: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(2026, 6, 15, h, m, 0).single().unwrap()
    }

    fn sample() -> Schedule {
        let mut schedule = Schedule::new(at(0, 0));
        schedule.tasks.push(Task::new("Email", at(8, 0), at(8, 30)));
        schedule.tasks.push(Task::new("Write Report", at(9, 0), at(10, 0)));
        schedule.tasks.push(Task::new("Review", at(10, 0), at(11, 0)));
        schedule
    }

    #[test]
    fn current_and_next_task() {
        let mut schedule = sample();
        assert!(schedule.current_task().is_none());
        assert_eq!(schedule.next_task().unwrap().title, "Email");

        schedule.tasks[0].status = TaskStatus::Completed;
        schedule.tasks[1].status = TaskStatus::InProgress;
        assert_eq!(schedule.current_task().unwrap().title, "Write Report");
        assert_eq!(schedule.next_task().unwrap().title, "Review");
    }

    #[test]
    fn completion_rate_counts_completed_only() {
        let mut schedule = sample();
        assert_eq!(Schedule::new(at(0, 0)).completion_rate(), 0.0);
        schedule.tasks[0].status = TaskStatus::Completed;
        schedule.tasks[1].status = TaskStatus::Skipped;
        assert!((schedule.completion_rate() - 100.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn shift_change_describes_direction() {
        let postponed = ScheduleChange::schedule_shifted("Review".into(), 15, 2);
        assert_eq!(postponed.change_type, ChangeType::ScheduleShifted);
        assert_eq!(postponed.affected_tasks_count, Some(2));
        assert!(postponed.description.contains("postponed by 15 min"));

        let pulled = ScheduleChange::schedule_shifted("Review".into(), -30, 1);
        assert!(pulled.description.contains("pulled forward by 30 min"));
    }

    #[test]
    fn change_log_is_append_only() {
        let mut schedule = sample();
        schedule.add_change(ScheduleChange::task_moved("Email".into(), "08:00".into(), "09:00".into()));
        schedule.add_change(ScheduleChange::task_deleted("Review".into(), "10:00-11:00".into()));
        assert_eq!(schedule.changes.len(), 2);
        assert_eq!(schedule.latest_change().unwrap().change_type, ChangeType::TaskDeleted);
    }

    #[test]
    fn day_is_local_calendar_date() {
        let schedule = sample();
        assert_eq!(schedule.day(), NaiveDate::from_ymd_opt(2026, 6, 15).unwrap());
    }
}
