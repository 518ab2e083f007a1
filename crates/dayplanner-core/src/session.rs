//! Session controller for one displayed day.
//!
//! Owns the latest confirmed schedule snapshot and drives the notification
//! cycle, the pomodoro ticker and the rescheduling gestures around it. Every
//! mutation is a request to the [`ScheduleService`] followed by a full reload;
//! the displayed snapshot never changes optimistically.

use std::sync::Arc;

use chrono::NaiveDate;
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::{CoreError, RescheduleError, Result, ServiceError};
use crate::events::Event;
use crate::notify::{NotificationSink, NotificationTriggerEngine};
use crate::pomodoro::{ClockReading, PomodoroTicker};
use crate::reschedule::{DragRescheduler, DragSession, DropOutcome, HourLocator, ShiftCascadeCoordinator, ShiftOptions};
use crate::schedule::Schedule;
use crate::service::ScheduleService;
use crate::task::{FocusScore, TaskInput};
use crate::timing::Clock;

pub struct SessionController<L> {
    service: Arc<dyn ScheduleService>,
    clock: Arc<dyn Clock>,
    snapshot: watch::Sender<Option<Schedule>>,
    date: NaiveDate,
    engine: NotificationTriggerEngine,
    ticker: PomodoroTicker,
    drag: DragRescheduler<L>,
    shifter: ShiftCascadeCoordinator,
    events: Option<mpsc::UnboundedSender<Event>>,
    last_error: Option<String>,
    notifications_enabled: bool,
}

impl<L: HourLocator> SessionController<L> {
    /// Build a controller for today. Nothing runs until [`open`](Self::open).
    pub fn new(
        service: Arc<dyn ScheduleService>,
        sink: Arc<dyn NotificationSink>,
        clock: Arc<dyn Clock>,
        locator: L,
        config: &Config,
    ) -> Self {
        Self::build(service, sink, clock, locator, config, None)
    }

    /// Same as [`new`](Self::new), with every outcome reported on `events`.
    pub fn with_events(
        service: Arc<dyn ScheduleService>,
        sink: Arc<dyn NotificationSink>,
        clock: Arc<dyn Clock>,
        locator: L,
        config: &Config,
        events: mpsc::UnboundedSender<Event>,
    ) -> Self {
        Self::build(service, sink, clock, locator, config, Some(events))
    }

    fn build(
        service: Arc<dyn ScheduleService>,
        sink: Arc<dyn NotificationSink>,
        clock: Arc<dyn Clock>,
        locator: L,
        config: &Config,
        events: Option<mpsc::UnboundedSender<Event>>,
    ) -> Self {
        let mut engine = NotificationTriggerEngine::new(Arc::clone(&sink), Arc::clone(&clock))
            .with_thresholds(config.notifications.thresholds())
            .with_poll_interval(config.notifications.poll_interval())
            .with_toggles(config.notifications.toggles());
        let mut ticker = PomodoroTicker::new(Arc::clone(&clock), sink).with_tick_interval(config.pomodoro.tick_interval());
        if let Some(tx) = &events {
            engine = engine.with_events(tx.clone());
            ticker = ticker.with_events(tx.clone());
        }
        let (snapshot, _) = watch::channel(None);

        Self {
            service,
            date: clock.today(),
            clock,
            snapshot,
            engine,
            ticker,
            drag: DragRescheduler::new(locator),
            shifter: ShiftCascadeCoordinator::new(),
            events,
            last_error: None,
            notifications_enabled: config.notifications.enabled,
        }
    }

    /// Switch to `date`: cancel any gesture, forget sent notifications,
    /// reload, and restart both periodic loops.
    ///
    /// Must be called from within a tokio runtime.
    pub fn open(&mut self, date: NaiveDate) -> Result<()> {
        self.engine.stop();
        self.ticker.stop();
        self.engine.reset();
        if let Some(session) = self.drag.cancel() {
            debug!(task = %session.key.title, "drag cancelled by date change");
        }
        let previous = std::mem::replace(&mut self.date, date);
        info!(%date, "opening schedule");

        let loaded = self.reload();
        if loaded.is_err() && previous != date {
            // The old day's tasks must not stay addressable under the new date.
            self.snapshot.send_replace(None);
        }

        if self.notifications_enabled {
            self.engine.start(self.snapshot.subscribe());
        }
        self.ticker.start(self.snapshot.subscribe());
        loaded
    }

    /// Manual refresh: same as reopening the current date.
    pub fn refresh(&mut self) -> Result<()> {
        self.open(self.date)
    }

    /// Fetch the schedule and replace the snapshot. On failure the previous
    /// snapshot stays on display; [`open`](Self::open) clears it instead when
    /// the date changed.
    pub fn reload(&mut self) -> Result<()> {
        match self.service.get_schedule(self.date) {
            Ok(schedule) => {
                let task_count = schedule.as_ref().map_or(0, |s| s.tasks.len());
                debug!(date = %self.date, task_count, found = schedule.is_some(), "schedule loaded");
                self.emit(Event::ScheduleLoaded {
                    date: self.date,
                    task_count,
                    found: schedule.is_some(),
                    at: self.clock.now(),
                });
                self.snapshot.send_replace(schedule);
                Ok(())
            }
            Err(e) => {
                warn!(date = %self.date, "failed to load schedule: {e}");
                self.last_error = Some(e.to_string());
                Err(e.into())
            }
        }
    }

    pub fn add_task(&mut self, input: &TaskInput) -> Result<()> {
        input.validate()?;
        self.mutate("add task", |service, date| service.add_task(date, input))
    }

    pub fn update_task(&mut self, index: usize, input: &TaskInput) -> Result<()> {
        input.validate()?;
        self.mutate("update task", |service, date| service.update_task(date, index, input))
    }

    pub fn delete_task(&mut self, index: usize) -> Result<()> {
        self.mutate("delete task", |service, date| service.delete_task(date, index))
    }

    pub fn start_task(&mut self, index: usize) -> Result<()> {
        self.mutate("start task", |service, date| service.start_task(date, index))
    }

    pub fn pause_task(&mut self, index: usize) -> Result<()> {
        self.mutate("pause task", |service, date| service.pause_task(date, index))
    }

    pub fn resume_task(&mut self, index: usize) -> Result<()> {
        self.mutate("resume task", |service, date| service.resume_task(date, index))
    }

    pub fn complete_task(&mut self, index: usize, focus_score: u8) -> Result<()> {
        let score = FocusScore::try_from(focus_score)?;
        self.mutate("complete task", |service, date| service.complete_task(date, index, score))
    }

    /// Press on the drag handle of the task at `index` in the snapshot.
    pub fn drag_press(&mut self, index: usize) -> Result<()> {
        let guard = self.snapshot.borrow();
        let schedule = guard.as_ref().ok_or(RescheduleError::NoSchedule)?;
        let task = schedule.task(index).ok_or(RescheduleError::NoSuchTask(index))?;
        self.drag.press(task, index)?;
        Ok(())
    }

    pub fn drag_hover(&mut self, y: f64) -> Option<u8> {
        self.drag.hover(y)
    }

    /// Release the active gesture at `y`. A resolved hour issues one
    /// `update_task`; anything else reverts without a request.
    pub fn drag_release(&mut self, y: f64) -> Result<Option<DropOutcome>> {
        let Some(outcome) = self.drag.release(y, self.date) else {
            return Ok(None);
        };

        match &outcome {
            DropOutcome::Move {
                index,
                input,
                old_time,
                new_time,
            } => {
                self.mutate("move task", |service, date| service.update_task(date, *index, input))?;
                info!(task = %input.title, %old_time, %new_time, "task moved");
                self.emit(Event::TaskMoved {
                    index: *index,
                    task_title: input.title.clone(),
                    old_time: old_time.clone(),
                    new_time: new_time.clone(),
                    at: self.clock.now(),
                });
            }
            DropOutcome::Revert { index, key } => {
                debug!(task = %key.title, "drag reverted");
                self.emit(Event::DragReverted {
                    index: *index,
                    task_title: key.title.clone(),
                    at: self.clock.now(),
                });
            }
        }
        Ok(Some(outcome))
    }

    pub fn drag_cancel(&mut self) -> Option<DragSession> {
        self.drag.cancel()
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_dragging()
    }

    /// Shift the tasks from `pivot` on (or after it) by the dialog's amount.
    pub fn shift(&mut self, pivot: usize, options: ShiftOptions) -> Result<()> {
        let request = self.shifter.plan(self.date, pivot, options)?;
        self.emit(Event::ScheduleShiftRequested {
            date: request.date,
            from_index: request.from_index,
            delta_minutes: request.delta_minutes,
            at: self.clock.now(),
        });
        let shifter = self.shifter;
        self.mutate("shift schedule", |service, _| shifter.execute(service, &request))
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn dismiss_error(&mut self) {
        self.last_error = None;
    }

    /// Clone of the last confirmed schedule.
    pub fn snapshot(&self) -> Option<Schedule> {
        self.snapshot.borrow().clone()
    }

    /// Receiver that sees every reload.
    pub fn subscribe(&self) -> watch::Receiver<Option<Schedule>> {
        self.snapshot.subscribe()
    }

    pub fn subscribe_pomodoro(&self) -> watch::Receiver<Option<ClockReading>> {
        self.ticker.subscribe()
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn is_running(&self) -> bool {
        self.engine.is_running() || self.ticker.is_running()
    }

    pub fn notifications_sent(&self) -> usize {
        self.engine.memo_len()
    }

    /// Stop both loops and drop any gesture. The snapshot stays readable.
    pub fn shutdown(&mut self) {
        self.engine.stop();
        self.ticker.stop();
        self.drag.cancel();
        info!(date = %self.date, now = %self.clock.now(), "session shut down");
    }

    fn mutate<F>(&mut self, operation: &str, request: F) -> Result<()>
    where
        F: FnOnce(&dyn ScheduleService, NaiveDate) -> std::result::Result<(), ServiceError>,
    {
        let service = Arc::clone(&self.service);
        match request(service.as_ref(), self.date) {
            Ok(()) => self.reload(),
            Err(source) => {
                let err = CoreError::Mutation {
                    operation: operation.to_string(),
                    source,
                };
                warn!(date = %self.date, "{err}");
                self.last_error = Some(err.to_string());
                self.emit(Event::MutationFailed {
                    operation: operation.to_string(),
                    message: err.to_string(),
                    at: self.clock.now(),
                });
                Err(err)
            }
        }
    }

    fn emit(&self, event: Event) {
        if let Some(tx) = &self.events {
            let _ = tx.send(event);
        }
    }
}
