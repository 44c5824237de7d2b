//! Main application state management

use std::{
    sync::{Arc, Mutex},
    time::{Duration, Instant},
};
use chrono::{DateTime, Utc};
use tokio::{
    sync::{broadcast, watch},
    task::JoinHandle,
};
use tracing::{debug, info};

use super::{Clock, CountdownEngine, CountdownEvent, Snapshot, SystemClock, TimerState};
use crate::{error::TimerError, tasks::run_ticker, utils::format_uptime};

/// Application state that owns the countdown engine and its ticker task
///
/// Commands must be issued from within a tokio runtime since starting the
/// countdown spawns the periodic evaluation task.
#[derive(Debug)]
pub struct AppState {
    engine: Arc<Mutex<CountdownEngine>>,
    /// The single pending periodic evaluation source, if any
    ticker: Mutex<Option<JoinHandle<()>>>,
    pub tick_period: Duration,
    pub presets: Vec<u64>,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Last action tracking
    last_action: Mutex<Option<String>>,
    last_action_time: Mutex<Option<DateTime<Utc>>>,
    /// Every engine event, including completion
    pub event_tx: broadcast::Sender<CountdownEvent>,
    /// Latest snapshot for watchers that only care about current state
    snapshot_tx: Arc<watch::Sender<Snapshot>>,
    /// Keep the receiver alive to prevent channel closure
    _snapshot_rx: watch::Receiver<Snapshot>,
}

impl AppState {
    /// Create a new AppState reading the system clock
    pub fn new(port: u16, host: String, presets: Vec<u64>, tick_period: Duration) -> Self {
        Self::with_clock(Arc::new(SystemClock), port, host, presets, tick_period)
    }

    pub fn with_clock(
        clock: Arc<dyn Clock>,
        port: u16,
        host: String,
        presets: Vec<u64>,
        tick_period: Duration,
    ) -> Self {
        let (event_tx, _) = broadcast::channel(100);
        let (snapshot_tx, snapshot_rx) = watch::channel(Snapshot::default());
        let snapshot_tx = Arc::new(snapshot_tx);

        let mut engine = CountdownEngine::with_clock(clock);
        let events = event_tx.clone();
        let snapshots = Arc::clone(&snapshot_tx);
        engine.subscribe(move |event: &CountdownEvent| {
            snapshots.send_replace(event.snapshot().clone());
            if events.send(event.clone()).is_err() {
                debug!("No event subscribers for countdown update");
            }
        });

        Self {
            engine: Arc::new(Mutex::new(engine)),
            ticker: Mutex::new(None),
            tick_period,
            presets,
            start_time: Instant::now(),
            port,
            host,
            last_action: Mutex::new(None),
            last_action_time: Mutex::new(None),
            event_tx,
            snapshot_tx,
            _snapshot_rx: snapshot_rx,
        }
    }

    /// Load a preset duration, cancelling any running countdown
    pub fn apply_preset(&self, seconds: i64) -> Result<Snapshot, TimerError> {
        info!("Applying preset: {}s", seconds);
        self.command("preset", |engine| engine.apply_preset(seconds))
            .map(|(_, snapshot)| snapshot)
    }

    /// Start, pause or resume the countdown
    ///
    /// Returns the state the engine was in right before the toggle, read
    /// under the same lock as the toggle itself.
    pub fn toggle_start_stop(&self) -> Result<(TimerState, Snapshot), TimerError> {
        let (previous, snapshot) = self.command("toggle", CountdownEngine::toggle_start_stop)?;
        info!("Toggled countdown: {} -> {} at {}", previous, snapshot.state, snapshot.display);
        Ok((previous, snapshot))
    }

    /// Return the countdown to its pristine idle state
    pub fn reset(&self) -> Result<Snapshot, TimerError> {
        info!("Resetting countdown");
        self.command("reset", CountdownEngine::reset)
            .map(|(_, snapshot)| snapshot)
    }

    /// Run a command against the engine, keeping at most one ticker alive
    ///
    /// The pending ticker is aborted before the engine is touched; a new one
    /// is spawned only if the engine came out of the command holding a live
    /// tick token.
    fn command<F>(&self, action: &str, apply: F) -> Result<(TimerState, Snapshot), TimerError>
    where
        F: FnOnce(&mut CountdownEngine),
    {
        let mut ticker = self.ticker.lock()
            .map_err(|_| TimerError::LockPoisoned("ticker"))?;
        if let Some(handle) = ticker.take() {
            handle.abort();
        }

        let mut engine = self.engine.lock()
            .map_err(|_| TimerError::LockPoisoned("countdown engine"))?;
        let previous = engine.state();
        apply(&mut *engine);
        let snapshot = engine.snapshot();
        let token = engine.tick_token();
        drop(engine);

        if let Some(token) = token {
            debug!("Spawning ticker every {:?}", self.tick_period);
            *ticker = Some(tokio::spawn(run_ticker(
                Arc::clone(&self.engine),
                token,
                self.tick_period,
            )));
        }
        drop(ticker);

        self.record_action(action);
        Ok((previous, snapshot))
    }

    fn record_action(&self, action: &str) {
        if let Ok(mut last_action) = self.last_action.lock() {
            *last_action = Some(action.to_string());
        }
        if let Ok(mut last_time) = self.last_action_time.lock() {
            *last_time = Some(Utc::now());
        }
    }

    /// Get current countdown snapshot
    pub fn snapshot(&self) -> Result<Snapshot, TimerError> {
        self.engine.lock()
            .map(|engine| engine.snapshot())
            .map_err(|_| TimerError::LockPoisoned("countdown engine"))
    }

    /// Whether the preset with the given duration should render as selected
    pub fn is_preset_selected(&self, seconds: u64) -> Result<bool, TimerError> {
        self.engine.lock()
            .map(|engine| engine.is_preset_selected(seconds))
            .map_err(|_| TimerError::LockPoisoned("countdown engine"))
    }

    /// Receive every engine event from now on
    pub fn subscribe_events(&self) -> broadcast::Receiver<CountdownEvent> {
        self.event_tx.subscribe()
    }

    /// Watch the latest snapshot
    pub fn watch_snapshot(&self) -> watch::Receiver<Snapshot> {
        self.snapshot_tx.subscribe()
    }

    /// Whether a ticker task is currently scheduled and still running
    pub fn has_pending_ticker(&self) -> bool {
        self.ticker.lock()
            .map(|ticker| ticker.as_ref().is_some_and(|handle| !handle.is_finished()))
            .unwrap_or(false)
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        format_uptime(self.start_time.elapsed())
    }

    /// Get last action information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        let last_action = self.last_action.lock().ok().and_then(|a| a.clone());
        let last_action_time = self.last_action_time.lock().ok().and_then(|t| *t);
        (last_action, last_action_time)
    }
}

impl Drop for AppState {
    fn drop(&mut self) {
        if let Ok(mut ticker) = self.ticker.lock() {
            if let Some(handle) = ticker.take() {
                handle.abort();
            }
        }
    }
}
