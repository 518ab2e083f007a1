//! End-to-end reminder delivery through a running session.

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{at, day, hour_grid, workday, InMemoryService};
use dayplanner_core::{ChannelSink, Config, Event, ManualClock, NotificationKind, Schedule, SessionController, Task};
use tokio::sync::mpsc;

#[tokio::test(start_paused = true)]
async fn write_report_reminders_fire_once_each() {
    let clock = Arc::new(ManualClock::new(at(8, 55, 0)));
    let service = Arc::new(InMemoryService::new(clock.clone()).with_schedule(workday()));
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut session = SessionController::new(service, Arc::new(ChannelSink::new(tx)), clock.clone(), hour_grid(), &Config::default());

    session.open(day()).unwrap();
    tokio::time::sleep(Duration::from_millis(10)).await;

    let warning = rx.try_recv().unwrap();
    assert_eq!(warning.title, "Task starting soon");
    assert_eq!(warning.body, "\"Write Report\" starts in 5 minutes");
    assert!(rx.try_recv().is_err());

    clock.set(at(8, 55, 30));
    tokio::time::sleep(Duration::from_secs(30)).await;
    assert!(rx.try_recv().is_err());

    clock.set(at(10, 0, 30));
    tokio::time::sleep(Duration::from_secs(30)).await;
    let end = rx.try_recv().unwrap();
    assert_eq!(end.body, "\"Write Report\" is ending now");
    assert!(rx.try_recv().is_err());

    session.shutdown();
}

#[tokio::test(start_paused = true)]
async fn refresh_allows_reminders_again() {
    let clock = Arc::new(ManualClock::new(at(8, 57, 0)));
    let service = Arc::new(InMemoryService::new(clock.clone()).with_schedule(workday()));
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut session = SessionController::new(service, Arc::new(ChannelSink::new(tx)), clock.clone(), hour_grid(), &Config::default());

    session.open(day()).unwrap();
    tokio::time::sleep(Duration::from_millis(10)).await;
    assert_eq!(rx.try_recv().unwrap().body, "\"Write Report\" starts in 3 minutes");
    assert_eq!(session.notifications_sent(), 1);

    session.refresh().unwrap();
    tokio::time::sleep(Duration::from_millis(10)).await;
    assert_eq!(rx.try_recv().unwrap().body, "\"Write Report\" starts in 3 minutes");

    session.shutdown();
}

#[tokio::test(start_paused = true)]
async fn other_days_never_notify() {
    // Two minutes before midnight, a task at 00:01 tomorrow is inside the
    // start-warning window but belongs to a schedule that is not today's.
    let clock = Arc::new(ManualClock::new(at(23, 58, 0)));
    let midnight = at(0, 0, 0) + chrono::Duration::days(1);
    let mut tomorrow = Schedule::new(midnight);
    tomorrow.tasks.push(Task::new(
        "Night Build",
        midnight + chrono::Duration::minutes(1),
        midnight + chrono::Duration::minutes(31),
    ));
    let next_day = tomorrow.day();
    let service = Arc::new(InMemoryService::new(clock.clone()).with_schedule(tomorrow));
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut session = SessionController::new(service, Arc::new(ChannelSink::new(tx)), clock.clone(), hour_grid(), &Config::default());

    session.open(next_day).unwrap();
    tokio::time::sleep(Duration::from_secs(31)).await;
    assert!(rx.try_recv().is_err());
    assert_eq!(session.notifications_sent(), 0);
    assert_eq!(session.snapshot().unwrap().tasks.len(), 1);

    session.shutdown();
}

#[tokio::test(start_paused = true)]
async fn disabled_notifications_keep_pomodoro_running() {
    let clock = Arc::new(ManualClock::new(at(8, 55, 0)));
    let service = Arc::new(InMemoryService::new(clock.clone()).with_schedule(workday()));
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut config = Config::default();
    config.notifications.enabled = false;
    let mut session = SessionController::new(service, Arc::new(ChannelSink::new(tx)), clock.clone(), hour_grid(), &config);

    session.open(day()).unwrap();
    tokio::time::sleep(Duration::from_secs(1)).await;
    assert!(rx.try_recv().is_err());
    assert!(session.is_running());

    session.shutdown();
}

#[tokio::test(start_paused = true)]
async fn start_reminders_can_be_switched_off() {
    let clock = Arc::new(ManualClock::new(at(8, 55, 0)));
    let service = Arc::new(InMemoryService::new(clock.clone()).with_schedule(workday()));
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut config = Config::default();
    config.notifications.task_start_reminder = false;
    let mut session = SessionController::new(service, Arc::new(ChannelSink::new(tx)), clock.clone(), hour_grid(), &config);

    session.open(day()).unwrap();
    tokio::time::sleep(Duration::from_millis(10)).await;
    assert!(rx.try_recv().is_err());

    clock.set(at(10, 0, 0));
    tokio::time::sleep(Duration::from_secs(30)).await;
    assert_eq!(rx.try_recv().unwrap().body, "\"Write Report\" is ending now");
    assert!(rx.try_recv().is_err());

    session.shutdown();
}

#[tokio::test(start_paused = true)]
async fn dispatches_are_reported_as_events() {
    let clock = Arc::new(ManualClock::new(at(8, 59, 0)));
    let service = Arc::new(InMemoryService::new(clock.clone()).with_schedule(workday()));
    let (tx, _rx) = mpsc::unbounded_channel();
    let (events_tx, mut events) = mpsc::unbounded_channel();
    let mut session = SessionController::with_events(
        service,
        Arc::new(ChannelSink::new(tx)),
        clock.clone(),
        hour_grid(),
        &Config::default(),
        events_tx,
    );

    session.open(day()).unwrap();
    tokio::time::sleep(Duration::from_millis(10)).await;

    assert!(matches!(
        events.try_recv().unwrap(),
        Event::ScheduleLoaded { task_count: 3, found: true, .. }
    ));
    match events.try_recv().unwrap() {
        Event::NotificationDispatched {
            kind,
            task_title,
            delivered,
            ..
        } => {
            assert_eq!(kind, NotificationKind::StartWarning);
            assert_eq!(task_title, "Write Report");
            assert!(delivered);
        }
        other => panic!("unexpected event {other:?}"),
    }

    session.shutdown();
}
