//! Notification trigger engine.
//!
//! Owns a repeating evaluation cycle on the tokio runtime. Each pass reads
//! the latest schedule snapshot, so reloads are picked up without restarting
//! the cycle. The de-dup memo survives reloads and is only cleared by
//! [`NotificationTriggerEngine::reset`].
//!
//! ```text
//! stopped --start()--> running --stop()--> stopped
//!            (cancels any prior cycle, evaluates immediately, then every 30s)
//! ```

use std::sync::{Arc, Mutex};
use std::time::Duration as StdDuration;

use chrono::{DateTime, Local};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use super::memo::NotificationMemo;
use super::sink::NotificationSink;
use super::{Notification, NotificationKind};
use crate::events::Event;
use crate::schedule::Schedule;
use crate::task::TaskKey;
use crate::timing::{evaluate_window, Clock, WindowThresholds};

pub const DEFAULT_POLL_INTERVAL: StdDuration = StdDuration::from_secs(30);

/// One notification handed to the sink during a pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dispatch {
    pub kind: NotificationKind,
    pub key: TaskKey,
    pub notification: Notification,
    /// Whether the sink accepted it. Memoized either way.
    pub delivered: bool,
}

/// Which reminder kinds the engine dispatches. A disabled kind is neither
/// sent nor memoized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReminderToggles {
    pub start_warning: bool,
    pub end_reached: bool,
}

impl Default for ReminderToggles {
    fn default() -> Self {
        Self {
            start_warning: true,
            end_reached: true,
        }
    }
}

/// State shared between the engine handle and its running cycle.
struct Trigger {
    sink: Arc<dyn NotificationSink>,
    clock: Arc<dyn Clock>,
    thresholds: WindowThresholds,
    toggles: ReminderToggles,
    memo: Mutex<NotificationMemo>,
    events: Option<mpsc::UnboundedSender<Event>>,
}

impl Trigger {
    fn pass(&self, schedule: &Schedule) -> Vec<Dispatch> {
        let today = self.clock.today();
        if schedule.day() != today {
            debug!(schedule = %schedule.day(), %today, "skipping notification pass for non-today schedule");
            return Vec::new();
        }

        let now = self.clock.now();
        let mut memo = self.memo.lock().unwrap_or_else(|e| e.into_inner());
        let mut dispatched = Vec::new();

        for task in &schedule.tasks {
            let hit = evaluate_window(now, task.start_time, task.end_time, &self.thresholds);
            if hit.is_empty() {
                continue;
            }
            let key = task.key();

            if let Some(minutes) = hit.start_warning.filter(|_| self.toggles.start_warning) {
                if memo.insert(NotificationKind::StartWarning, key.clone()) {
                    let notification = Notification::start_warning(&task.title, minutes);
                    dispatched.push(self.dispatch(NotificationKind::StartWarning, key.clone(), notification, now));
                }
            }
            if hit.end_reached && self.toggles.end_reached && memo.insert(NotificationKind::EndReached, key.clone()) {
                let notification = Notification::end_reached(&task.title);
                dispatched.push(self.dispatch(NotificationKind::EndReached, key, notification, now));
            }
        }

        dispatched
    }

    fn dispatch(&self, kind: NotificationKind, key: TaskKey, notification: Notification, now: DateTime<Local>) -> Dispatch {
        let delivered = match self.sink.send(&notification.title, &notification.body) {
            Ok(()) => true,
            Err(e) => {
                warn!(task = %key.title, ?kind, "notification not delivered: {e}");
                false
            }
        };
        debug!(task = %key.title, ?kind, delivered, "notification dispatched");

        if let Some(tx) = &self.events {
            let _ = tx.send(Event::NotificationDispatched {
                kind,
                task_title: key.title.clone(),
                delivered,
                at: now,
            });
        }

        Dispatch {
            kind,
            key,
            notification,
            delivered,
        }
    }
}

/// Periodic reminder evaluator with at-most-once delivery per task and kind.
pub struct NotificationTriggerEngine {
    trigger: Arc<Trigger>,
    poll_interval: StdDuration,
    cycle: Option<JoinHandle<()>>,
}

impl NotificationTriggerEngine {
    pub fn new(sink: Arc<dyn NotificationSink>, clock: Arc<dyn Clock>) -> Self {
        Self {
            trigger: Arc::new(Trigger {
                sink,
                clock,
                thresholds: WindowThresholds::default(),
                toggles: ReminderToggles::default(),
                memo: Mutex::new(NotificationMemo::new()),
                events: None,
            }),
            poll_interval: DEFAULT_POLL_INTERVAL,
            cycle: None,
        }
    }

    /// Must be called before the first `start`.
    pub fn with_thresholds(mut self, thresholds: WindowThresholds) -> Self {
        if let Some(trigger) = Arc::get_mut(&mut self.trigger) {
            trigger.thresholds = thresholds;
        }
        self
    }

    /// Must be called before the first `start`.
    pub fn with_toggles(mut self, toggles: ReminderToggles) -> Self {
        if let Some(trigger) = Arc::get_mut(&mut self.trigger) {
            trigger.toggles = toggles;
        }
        self
    }

    pub fn with_poll_interval(mut self, poll_interval: StdDuration) -> Self {
        self.poll_interval = poll_interval.max(StdDuration::from_millis(1));
        self
    }

    pub fn with_events(mut self, events: mpsc::UnboundedSender<Event>) -> Self {
        if let Some(trigger) = Arc::get_mut(&mut self.trigger) {
            trigger.events = Some(events);
        }
        self
    }

    /// Run a single evaluation pass against `schedule`.
    pub fn evaluate(&self, schedule: &Schedule) -> Vec<Dispatch> {
        self.trigger.pass(schedule)
    }

    /// Start the repeating cycle, replacing any running one.
    ///
    /// The first pass runs immediately. Must be called from within a tokio
    /// runtime.
    pub fn start(&mut self, snapshot: watch::Receiver<Option<Schedule>>) {
        self.stop();

        let trigger = Arc::clone(&self.trigger);
        let period = self.poll_interval;
        info!(period_secs = period.as_secs_f64(), "notification cycle started");

        self.cycle = Some(tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                interval.tick().await;
                {
                    let guard = snapshot.borrow();
                    if let Some(schedule) = guard.as_ref() {
                        trigger.pass(schedule);
                    }
                }
            }
        }));
    }

    /// Cancel the cycle. Idempotent.
    pub fn stop(&mut self) {
        if let Some(cycle) = self.cycle.take() {
            cycle.abort();
            info!("notification cycle stopped");
        }
    }

    /// Forget every notification sent this session.
    pub fn reset(&self) {
        self.trigger
            .memo
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clear();
        debug!("notification memo cleared");
    }

    pub fn is_running(&self) -> bool {
        self.cycle.as_ref().is_some_and(|c| !c.is_finished())
    }

    /// Number of memoized (task, kind) pairs.
    pub fn memo_len(&self) -> usize {
        self.trigger
            .memo
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .len()
    }
}

impl Drop for NotificationTriggerEngine {
    fn drop(&mut self) {
        if let Some(cycle) = self.cycle.take() {
            cycle.abort();
        }
    }
}
