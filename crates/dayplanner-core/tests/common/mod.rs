//! In-memory scheduling backend shared by the integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, Local, NaiveDate, TimeZone};
use dayplanner_core::task::{format_clock_time, parse_clock_time};
use dayplanner_core::{
    Clock, FocusScore, HourRows, ManualClock, PomodoroSession, Schedule, ScheduleChange, ScheduleGeometryMapper, ScheduleService, ServiceError, Task,
    TaskInput, TaskStatus,
};

pub const DAY: (i32, u32, u32) = (2026, 6, 15);

pub fn day() -> NaiveDate {
    NaiveDate::from_ymd_opt(DAY.0, DAY.1, DAY.2).unwrap()
}

pub fn at(h: u32, m: u32, s: u32) -> DateTime<Local> {
    Local.with_ymd_and_hms(DAY.0, DAY.1, DAY.2, h, m, s).single().unwrap()
}

/// Requests received, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Get(NaiveDate),
    Add(String),
    Update { index: usize, start: String, end: String },
    Delete(usize),
    Start(usize),
    Pause(usize),
    Resume(usize),
    Complete(usize, u8),
    Shift { from_index: usize, delta_minutes: i64 },
}

/// Applies every request to an in-memory map of schedules and appends the
/// same change-history entries a real backend would.
pub struct InMemoryService {
    schedules: Mutex<HashMap<NaiveDate, Schedule>>,
    calls: Mutex<Vec<Call>>,
    fail_next: Mutex<Option<ServiceError>>,
    clock: Arc<ManualClock>,
}

impl InMemoryService {
    pub fn new(clock: Arc<ManualClock>) -> Self {
        Self {
            schedules: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
            fail_next: Mutex::new(None),
            clock,
        }
    }

    pub fn with_schedule(self, schedule: Schedule) -> Self {
        self.schedules.lock().unwrap().insert(schedule.day(), schedule);
        self
    }

    /// The next request, load or mutation, fails with `error` and changes nothing.
    pub fn fail_next(&self, error: ServiceError) {
        *self.fail_next.lock().unwrap() = Some(error);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn mutations(&self) -> Vec<Call> {
        self.calls().into_iter().filter(|c| !matches!(c, Call::Get(_))).collect()
    }

    pub fn stored(&self, date: NaiveDate) -> Option<Schedule> {
        self.schedules.lock().unwrap().get(&date).cloned()
    }

    fn with_task<F>(&self, call: Call, date: NaiveDate, index: usize, apply: F) -> Result<(), ServiceError>
    where
        F: FnOnce(&mut Schedule, usize, DateTime<Local>) -> Result<(), ServiceError>,
    {
        self.calls.lock().unwrap().push(call);
        if let Some(error) = self.fail_next.lock().unwrap().take() {
            return Err(error);
        }
        let mut schedules = self.schedules.lock().unwrap();
        let schedule = schedules.get_mut(&date).ok_or(ServiceError::ScheduleNotFound(date))?;
        let len = schedule.tasks.len();
        if index >= len {
            return Err(ServiceError::IndexOutOfBounds { index, len });
        }
        apply(schedule, index, self.clock.now())
    }
}

fn on_date(date: NaiveDate, hhmm: &str) -> Result<DateTime<Local>, ServiceError> {
    let time = parse_clock_time(hhmm).map_err(|e| ServiceError::Rejected(e.to_string()))?;
    Local
        .from_local_datetime(&date.and_time(time))
        .single()
        .ok_or_else(|| ServiceError::Rejected(format!("{hhmm} does not exist on {date}")))
}

fn range_label(start: &DateTime<Local>, end: &DateTime<Local>) -> String {
    format!("{}-{}", format_clock_time(start), format_clock_time(end))
}

impl ScheduleService for InMemoryService {
    fn get_schedule(&self, date: NaiveDate) -> Result<Option<Schedule>, ServiceError> {
        self.calls.lock().unwrap().push(Call::Get(date));
        if let Some(error) = self.fail_next.lock().unwrap().take() {
            return Err(error);
        }
        Ok(self.schedules.lock().unwrap().get(&date).cloned())
    }

    fn add_task(&self, date: NaiveDate, input: &TaskInput) -> Result<(), ServiceError> {
        self.calls.lock().unwrap().push(Call::Add(input.title.clone()));
        if let Some(error) = self.fail_next.lock().unwrap().take() {
            return Err(error);
        }
        let start = on_date(date, &input.start_time)?;
        let end = on_date(date, &input.end_time)?;
        let mut task = Task::new(input.title.clone(), start, end);
        task.tags = input.tags.clone();
        task.notes = input.notes.clone();
        if let Some(d) = input.pomodoro_duration {
            task.custom_pomodoro_duration = Some(d.minutes());
        }

        let midnight = on_date(date, "00:00")?;
        let mut schedules = self.schedules.lock().unwrap();
        let schedule = schedules.entry(date).or_insert_with(|| Schedule::new(midnight));
        schedule.add_change(ScheduleChange::task_created(task.title.clone(), range_label(&start, &end)));
        schedule.tasks.push(task);
        Ok(())
    }

    fn update_task(&self, date: NaiveDate, index: usize, input: &TaskInput) -> Result<(), ServiceError> {
        let call = Call::Update {
            index,
            start: input.start_time.clone(),
            end: input.end_time.clone(),
        };
        self.with_task(call, date, index, |schedule, index, _| {
            let start = on_date(date, &input.start_time)?;
            let end = on_date(date, &input.end_time)?;
            let task = &mut schedule.tasks[index];
            let old_time = range_label(&task.start_time, &task.end_time);
            let title = task.title.clone();
            task.title = input.title.clone();
            task.start_time = start;
            task.end_time = end;
            task.tags = input.tags.clone();
            task.notes = input.notes.clone();

            let new_time = range_label(&start, &end);
            if old_time != new_time {
                schedule.add_change(ScheduleChange::task_updated(title, old_time, new_time));
            }
            Ok(())
        })
    }

    fn delete_task(&self, date: NaiveDate, index: usize) -> Result<(), ServiceError> {
        self.with_task(Call::Delete(index), date, index, |schedule, index, _| {
            let task = schedule.tasks.remove(index);
            schedule.add_change(ScheduleChange::task_deleted(task.title.clone(), range_label(&task.start_time, &task.end_time)));
            Ok(())
        })
    }

    fn start_task(&self, date: NaiveDate, index: usize) -> Result<(), ServiceError> {
        self.with_task(Call::Start(index), date, index, |schedule, index, now| {
            let task = &mut schedule.tasks[index];
            task.status = TaskStatus::InProgress;
            task.actual_start_time = Some(now);
            let minutes = task.custom_pomodoro_duration.unwrap_or(25);
            let total = ((task.duration().num_minutes() as u32) / minutes).max(1);
            task.pomodoro = Some(PomodoroSession {
                total_pomodoros: total,
                current_start: Some(now),
                pomodoro_duration: minutes,
                ..PomodoroSession::default()
            });
            Ok(())
        })
    }

    fn pause_task(&self, date: NaiveDate, index: usize) -> Result<(), ServiceError> {
        self.with_task(Call::Pause(index), date, index, |schedule, index, _| {
            let task = &mut schedule.tasks[index];
            task.status = TaskStatus::Paused;
            if let Some(session) = task.pomodoro.as_mut() {
                session.current_start = None;
            }
            Ok(())
        })
    }

    fn resume_task(&self, date: NaiveDate, index: usize) -> Result<(), ServiceError> {
        self.with_task(Call::Resume(index), date, index, |schedule, index, now| {
            let task = &mut schedule.tasks[index];
            task.status = TaskStatus::InProgress;
            if let Some(session) = task.pomodoro.as_mut() {
                session.current_start = Some(now);
            }
            Ok(())
        })
    }

    fn complete_task(&self, date: NaiveDate, index: usize, focus_score: FocusScore) -> Result<(), ServiceError> {
        self.with_task(Call::Complete(index, focus_score.value()), date, index, |schedule, index, now| {
            let task = &mut schedule.tasks[index];
            task.status = TaskStatus::Completed;
            task.actual_end_time = Some(now);
            task.actual_duration_minutes = task.actual_start_time.map(|s| (now - s).num_minutes());
            Ok(())
        })
    }

    fn shift_schedule(&self, date: NaiveDate, from_index: usize, delta_minutes: i64) -> Result<(), ServiceError> {
        let call = Call::Shift {
            from_index,
            delta_minutes,
        };
        self.with_task(call, date, from_index, |schedule, from_index, _| {
            let delta = Duration::minutes(delta_minutes);
            for task in &mut schedule.tasks[from_index..] {
                task.start_time += delta;
                task.end_time += delta;
            }
            let title = schedule.tasks[from_index].title.clone();
            let affected = schedule.tasks.len() - from_index;
            schedule.add_change(ScheduleChange::schedule_shifted(title, delta_minutes, affected));
            Ok(())
        })
    }
}

/// `Write Report` 09:00-10:00 followed by `Review` 10:00-10:30 and
/// `Lunch` 12:00-13:00.
pub fn workday() -> Schedule {
    let mut schedule = Schedule::new(at(0, 0, 0));
    schedule.tasks.push(Task::new("Write Report", at(9, 0, 0), at(10, 0, 0)));
    schedule.tasks.push(Task::new("Review", at(10, 0, 0), at(10, 30, 0)));
    schedule.tasks.push(Task::new("Lunch", at(12, 0, 0), at(13, 0, 0)));
    schedule
}

/// Hour rows 60px tall starting at y = 0.
pub fn hour_grid() -> ScheduleGeometryMapper<HourRows> {
    ScheduleGeometryMapper::new(HourRows::new(0.0, 60.0), 20.0)
}

/// Vertical centre of `hour`'s row in [`hour_grid`].
pub fn row_y(hour: u8) -> f64 {
    f64::from(hour) * 60.0 + 30.0
}
