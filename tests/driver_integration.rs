use std::{sync::Arc, time::Duration};

use chrono::Utc;
use time_x::{
    services::NotifierConfig,
    state::{AppState, CountdownEvent, ManualClock, Snapshot, TimerState},
    tasks::completion_alert_task,
};
use tokio::{sync::broadcast, time::timeout};

fn app(clock: Option<ManualClock>, tick: Duration) -> AppState {
    let presets = vec![180, 300, 600, 900];
    match clock {
        Some(clock) => AppState::with_clock(Arc::new(clock), 0, "127.0.0.1".into(), presets, tick),
        None => AppState::new(0, "127.0.0.1".into(), presets, tick),
    }
}

async fn wait_for_finish(events: &mut broadcast::Receiver<CountdownEvent>) -> Snapshot {
    timeout(Duration::from_secs(3), async {
        loop {
            match events.recv().await {
                Ok(CountdownEvent::Finished(snapshot)) => return snapshot,
                Ok(CountdownEvent::Changed(_)) => continue,
                Err(e) => panic!("event channel failed: {e}"),
            }
        }
    })
    .await
    .expect("countdown did not finish in time")
}

#[tokio::test]
async fn one_second_countdown_finishes_in_real_time() {
    let state = app(None, Duration::from_millis(100));
    let mut events = state.subscribe_events();

    state.apply_preset(1).unwrap();
    let (previous, started) = state.toggle_start_stop().unwrap();
    assert_eq!(previous, TimerState::Idle);
    assert_eq!(started.state, TimerState::Running);
    assert_eq!(started.remaining_seconds, 1);

    let finished = wait_for_finish(&mut events).await;
    assert_eq!(finished.state, TimerState::Finished);
    assert_eq!(finished.remaining_seconds, 0);

    let now = state.snapshot().unwrap();
    assert_eq!(now.state, TimerState::Finished);
    assert_eq!(now.remaining_seconds, 0);
    assert_eq!(now.target_timestamp, None);

    // No second completion for the same run
    tokio::time::sleep(Duration::from_millis(300)).await;
    while let Ok(event) = events.try_recv() {
        assert!(!event.is_finished());
    }
}

#[tokio::test]
async fn ticker_follows_manual_clock() {
    let clock = ManualClock::new(Utc::now());
    let state = app(Some(clock.clone()), Duration::from_millis(20));
    let mut events = state.subscribe_events();

    state.apply_preset(300).unwrap();
    state.toggle_start_stop().unwrap();

    clock.advance(chrono::Duration::seconds(120));
    let mut watch = state.watch_snapshot();
    timeout(Duration::from_secs(2), watch.wait_for(|s| s.remaining_seconds == 180))
        .await
        .expect("ticker did not pick up the clock change")
        .unwrap();

    clock.advance(chrono::Duration::seconds(180));
    let finished = wait_for_finish(&mut events).await;
    assert_eq!(finished.state, TimerState::Finished);
    assert_eq!(finished.selected_preset_seconds, Some(300));
}

#[tokio::test]
async fn pause_cancels_ticker_and_keeps_remaining() {
    let clock = ManualClock::new(Utc::now());
    let state = app(Some(clock.clone()), Duration::from_millis(20));

    state.apply_preset(180).unwrap();
    state.toggle_start_stop().unwrap();
    assert!(state.has_pending_ticker());

    let (previous, paused) = state.toggle_start_stop().unwrap();
    assert_eq!(previous, TimerState::Running);
    assert_eq!(paused.state, TimerState::Paused);
    assert_eq!(paused.remaining_seconds, 180);
    assert!(!state.has_pending_ticker());

    // Time passing while paused must not count
    clock.advance(chrono::Duration::seconds(60));
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(state.snapshot().unwrap().remaining_seconds, 180);

    let (previous, resumed) = state.toggle_start_stop().unwrap();
    assert_eq!(previous, TimerState::Paused);
    assert_eq!(resumed.state, TimerState::Running);
    assert_eq!(resumed.remaining_seconds, 180);
    assert!(state.has_pending_ticker());
}

#[tokio::test]
async fn preset_and_reset_cancel_running_countdown() {
    let clock = ManualClock::new(Utc::now());
    let state = app(Some(clock.clone()), Duration::from_millis(20));
    let mut events = state.subscribe_events();

    state.apply_preset(5).unwrap();
    state.toggle_start_stop().unwrap();

    let reloaded = state.apply_preset(600).unwrap();
    assert_eq!(reloaded.state, TimerState::Idle);
    assert_eq!(reloaded.remaining_seconds, 600);
    assert!(!state.has_pending_ticker());

    // The superseded run would have finished by now
    clock.advance(chrono::Duration::seconds(10));
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(state.snapshot().unwrap().state, TimerState::Idle);

    state.toggle_start_stop().unwrap();
    let cleared = state.reset().unwrap();
    assert_eq!(cleared.state, TimerState::Idle);
    assert_eq!(cleared.remaining_seconds, 0);
    assert_eq!(cleared.selected_preset_seconds, None);
    assert!(!state.has_pending_ticker());

    while let Ok(event) = events.try_recv() {
        assert!(!event.is_finished());
    }
    assert_eq!(state.get_last_action().0.as_deref(), Some("reset"));
}

#[tokio::test]
async fn toggle_on_finished_reports_finished_as_previous() {
    let clock = ManualClock::new(Utc::now());
    let state = app(Some(clock.clone()), Duration::from_millis(20));
    let mut events = state.subscribe_events();

    state.apply_preset(1).unwrap();
    state.toggle_start_stop().unwrap();
    clock.advance(chrono::Duration::seconds(1));
    wait_for_finish(&mut events).await;

    let (previous, timer) = state.toggle_start_stop().unwrap();
    assert_eq!(previous, TimerState::Finished);
    assert_eq!(timer.state, TimerState::Finished);
}

/// Run one preset to completion on a manual clock
async fn run_to_finish(state: &AppState, clock: &ManualClock) {
    let mut events = state.subscribe_events();
    state.apply_preset(1).unwrap();
    state.toggle_start_stop().unwrap();
    clock.advance(chrono::Duration::seconds(1));
    wait_for_finish(&mut events).await;
}

async fn wait_until(condition: impl Fn() -> bool) {
    timeout(Duration::from_secs(3), async {
        while !condition() {
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
    })
    .await
    .expect("condition not met in time");
}

#[cfg(unix)]
#[tokio::test]
async fn completion_alert_posts_notification() {
    let dir = tempfile::tempdir().unwrap();
    let marker = dir.path().join("finished");
    let clock = ManualClock::new(Utc::now());
    let state = Arc::new(app(Some(clock.clone()), Duration::from_millis(20)));

    let notifier = NotifierConfig::new("touch", marker.to_string_lossy());
    let task = tokio::spawn(completion_alert_task(Arc::clone(&state), Some(notifier)));
    tokio::time::sleep(Duration::from_millis(50)).await;

    // Changes alone never notify
    state.apply_preset(300).unwrap();
    state.toggle_start_stop().unwrap();
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(!marker.exists());

    run_to_finish(&state, &clock).await;
    wait_until(|| marker.exists()).await;
    assert!(!task.is_finished());
    task.abort();
}

#[cfg(unix)]
#[tokio::test]
async fn completion_alert_survives_notifier_failure() {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("alert");
    let clock = ManualClock::new(Utc::now());
    let state = Arc::new(app(Some(clock.clone()), Duration::from_millis(20)));

    // rmdir fails while the directory is missing and succeeds once it exists
    let notifier = NotifierConfig::new("rmdir", target.to_string_lossy());
    let task = tokio::spawn(completion_alert_task(Arc::clone(&state), Some(notifier)));
    tokio::time::sleep(Duration::from_millis(50)).await;

    run_to_finish(&state, &clock).await;
    tokio::time::sleep(Duration::from_millis(300)).await;
    assert!(!task.is_finished());

    std::fs::create_dir(&target).unwrap();
    run_to_finish(&state, &clock).await;
    wait_until(|| !target.exists()).await;
    assert!(!task.is_finished());
    task.abort();
}
