//! Once-per-second driver for the [`PomodoroClock`].
//!
//! Reads the latest schedule snapshot, evaluates the clock for the task in
//! progress and publishes the reading for the countdown display. Nothing in
//! the schedule is mutated; the only state touched is the clock's fired
//! marker.

use std::sync::{Arc, Mutex};
use std::time::Duration as StdDuration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use super::clock::{ClockReading, PomodoroClock};
use crate::events::Event;
use crate::notify::{Notification, NotificationSink};
use crate::schedule::Schedule;
use crate::timing::Clock;

pub const DEFAULT_TICK_INTERVAL: StdDuration = StdDuration::from_secs(1);

struct TickState {
    clock: Mutex<PomodoroClock>,
    time: Arc<dyn Clock>,
    sink: Arc<dyn NotificationSink>,
    events: Option<mpsc::UnboundedSender<Event>>,
    readings: watch::Sender<Option<ClockReading>>,
}

impl TickState {
    fn tick(&self, schedule: Option<&Schedule>) -> Option<ClockReading> {
        let active = schedule
            .and_then(Schedule::current_task)
            .and_then(|task| task.pomodoro.as_ref().map(|session| (task, session)));

        let Some((task, session)) = active else {
            self.readings.send_replace(None);
            return None;
        };

        let now = self.time.now();
        let reading = self
            .clock
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .evaluate(session, now);
        self.readings.send_replace(reading);

        if let Some(r) = reading.filter(|r| r.completed) {
            let next_break_min = session.next_break_duration();
            info!(task = %task.title, duration_min = r.duration_min, "pomodoro interval completed");

            let notification = Notification::pomodoro_complete(&task.title, next_break_min);
            if let Err(e) = self.sink.send(&notification.title, &notification.body) {
                warn!(task = %task.title, "pomodoro notification not delivered: {e}");
            }
            if let Some(tx) = &self.events {
                let _ = tx.send(Event::PomodoroCompleted {
                    task_title: task.title.clone(),
                    interval_start: r.interval_start,
                    duration_min: r.duration_min,
                    next_break_min,
                    at: now,
                });
            }
        }

        reading
    }
}

/// Periodic pomodoro evaluation with a one-shot completion signal.
pub struct PomodoroTicker {
    state: Arc<TickState>,
    tick_interval: StdDuration,
    handle: Option<JoinHandle<()>>,
}

impl PomodoroTicker {
    pub fn new(time: Arc<dyn Clock>, sink: Arc<dyn NotificationSink>) -> Self {
        let (readings, _) = watch::channel(None);
        Self {
            state: Arc::new(TickState {
                clock: Mutex::new(PomodoroClock::new()),
                time,
                sink,
                events: None,
                readings,
            }),
            tick_interval: DEFAULT_TICK_INTERVAL,
            handle: None,
        }
    }

    pub fn with_tick_interval(mut self, tick_interval: StdDuration) -> Self {
        self.tick_interval = tick_interval.max(StdDuration::from_millis(1));
        self
    }

    /// Must be called before the first `start`.
    pub fn with_events(mut self, events: mpsc::UnboundedSender<Event>) -> Self {
        if let Some(state) = Arc::get_mut(&mut self.state) {
            state.events = Some(events);
        }
        self
    }

    /// Evaluate once against `schedule`.
    pub fn tick(&self, schedule: Option<&Schedule>) -> Option<ClockReading> {
        self.state.tick(schedule)
    }

    /// Latest reading, for the countdown display.
    pub fn subscribe(&self) -> watch::Receiver<Option<ClockReading>> {
        self.state.readings.subscribe()
    }

    /// Start ticking against the snapshot channel, replacing any running loop.
    pub fn start(&mut self, snapshot: watch::Receiver<Option<Schedule>>) {
        self.stop();

        let state = Arc::clone(&self.state);
        let period = self.tick_interval;
        debug!(period_ms = period.as_millis() as u64, "pomodoro ticker started");

        self.handle = Some(tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                interval.tick().await;
                {
                    let guard = snapshot.borrow();
                    state.tick(guard.as_ref());
                }
            }
        }));
    }

    pub fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
            debug!("pomodoro ticker stopped");
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Drop for PomodoroTicker {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::LogSink;
    use crate::pomodoro::PomodoroSession;
    use crate::task::{Task, TaskStatus};
    use crate::timing::ManualClock;
    use chrono::{DateTime, Duration, Local, TimeZone};

    fn at(h: u32, m: u32, s: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(2026, 6, 15, h, m, s).single().unwrap()
    }

    fn running_schedule() -> Schedule {
        let mut schedule = Schedule::new(at(0, 0, 0));
        let mut task = Task::new("Write Report", at(9, 0, 0), at(10, 0, 0));
        task.status = TaskStatus::InProgress;
        task.pomodoro = Some(PomodoroSession {
            total_pomodoros: 2,
            current_start: Some(at(9, 0, 0)),
            ..PomodoroSession::default()
        });
        schedule.tasks.push(task);
        schedule
    }

    #[test]
    fn no_reading_without_active_task() {
        let clock = Arc::new(ManualClock::new(at(9, 10, 0)));
        let ticker = PomodoroTicker::new(clock, Arc::new(LogSink));
        assert!(ticker.tick(None).is_none());

        let mut paused = running_schedule();
        paused.tasks[0].status = TaskStatus::Paused;
        assert!(ticker.tick(Some(&paused)).is_none());
        assert!(ticker.subscribe().borrow().is_none());
    }

    #[test]
    fn completion_emits_single_event() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let clock = Arc::new(ManualClock::new(at(9, 24, 59)));
        let ticker = PomodoroTicker::new(clock.clone(), Arc::new(LogSink)).with_events(tx);
        let schedule = running_schedule();

        let reading = ticker.tick(Some(&schedule)).unwrap();
        assert_eq!(reading.remaining_secs, 1);
        assert!(rx.try_recv().is_err());

        clock.advance(Duration::seconds(1));
        assert!(ticker.tick(Some(&schedule)).unwrap().completed);
        assert!(!ticker.tick(Some(&schedule)).unwrap().completed);

        match rx.try_recv().unwrap() {
            Event::PomodoroCompleted {
                task_title,
                duration_min,
                next_break_min,
                at: when,
                ..
            } => {
                assert_eq!(when, at(9, 25, 0));
                assert_eq!(task_title, "Write Report");
                assert_eq!(duration_min, 25);
                assert_eq!(next_break_min, 5);
            }
            other => panic!("unexpected event {other:?}"),
        }
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn ticker_publishes_readings() {
        let clock = Arc::new(ManualClock::new(at(9, 10, 0)));
        let mut ticker = PomodoroTicker::new(clock, Arc::new(LogSink));
        let readings = ticker.subscribe();
        let (_tx, rx) = watch::channel(Some(running_schedule()));

        ticker.start(rx);
        tokio::time::sleep(StdDuration::from_millis(1500)).await;

        let latest = (*readings.borrow()).unwrap();
        assert_eq!(latest.remaining_secs, 15 * 60);
        ticker.stop();
        assert!(!ticker.is_running());
    }
}
