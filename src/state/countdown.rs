//! Countdown engine: state machine and drift-corrected tick computation
//!
//! While running, remaining time is always recomputed from an absolute
//! target timestamp rather than decremented per tick, so late or skipped
//! ticks (host suspension, a busy runtime) never accumulate drift.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{
    clock::{Clock, SystemClock},
    observer::{CountdownEvent, ObserverId, Observers},
    TimerState,
};
use crate::utils::format_clock;

/// Longest accepted preset, roughly a century
///
/// Keeps `now + preset` representable so starting never alters the
/// remaining time.
pub const MAX_PRESET_SECONDS: u64 = 100 * 365 * 24 * 60 * 60;

/// Owned view of the engine handed to observers and the API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub state: TimerState,
    pub remaining_seconds: u64,
    pub selected_preset_seconds: Option<u64>,
    pub target_timestamp: Option<DateTime<Utc>>,
    pub display: String,
}

impl Default for Snapshot {
    fn default() -> Self {
        Self {
            state: TimerState::Idle,
            remaining_seconds: 0,
            selected_preset_seconds: None,
            target_timestamp: None,
            display: format_clock(0),
        }
    }
}

/// Identifies one periodic evaluation source
///
/// A fresh token is issued every time the countdown starts. Ticks carrying
/// any other token are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TickToken(u64);

/// Result of one tick evaluation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Token superseded or the engine is not running; nothing happened
    Stale,
    /// Still running, displayed seconds unchanged
    Unchanged,
    /// Still running, remaining seconds changed
    Updated,
    /// Remaining time hit zero and the engine transitioned to Finished
    Finished,
}

pub struct CountdownEngine {
    clock: Arc<dyn Clock>,
    state: TimerState,
    remaining_seconds: u64,
    target: Option<DateTime<Utc>>,
    selected_preset_seconds: Option<u64>,
    tick_token: Option<TickToken>,
    next_token: u64,
    observers: Observers,
}

impl CountdownEngine {
    /// Create an idle engine reading the system clock
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            state: TimerState::Idle,
            remaining_seconds: 0,
            target: None,
            selected_preset_seconds: None,
            tick_token: None,
            next_token: 0,
            observers: Observers::new(),
        }
    }

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn remaining_seconds(&self) -> u64 {
        self.remaining_seconds
    }

    pub fn selected_preset_seconds(&self) -> Option<u64> {
        self.selected_preset_seconds
    }

    pub fn target_timestamp(&self) -> Option<DateTime<Utc>> {
        self.target
    }

    /// Token of the live periodic source, if the countdown is ticking
    pub fn tick_token(&self) -> Option<TickToken> {
        self.tick_token
    }

    pub fn formatted_time(&self) -> String {
        format_clock(self.remaining_seconds as i64)
    }

    /// Whether a preset button should render as selected
    pub fn is_preset_selected(&self, seconds: u64) -> bool {
        self.selected_preset_seconds == Some(seconds) && self.state != TimerState::Finished
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            state: self.state,
            remaining_seconds: self.remaining_seconds,
            selected_preset_seconds: self.selected_preset_seconds,
            target_timestamp: self.target,
            display: self.formatted_time(),
        }
    }

    pub fn subscribe<F>(&mut self, callback: F) -> ObserverId
    where
        F: Fn(&CountdownEvent) + Send + Sync + 'static,
    {
        self.observers.subscribe(callback)
    }

    pub fn unsubscribe(&mut self, id: ObserverId) -> bool {
        self.observers.unsubscribe(id)
    }

    /// Load a preset duration, cancelling any active countdown
    ///
    /// Non-positive durations clamp to zero and leave the timer inert;
    /// anything above [`MAX_PRESET_SECONDS`] clamps to that bound.
    pub fn apply_preset(&mut self, seconds: i64) {
        self.cancel_ticking();
        let seconds = (seconds.max(0) as u64).min(MAX_PRESET_SECONDS);
        self.remaining_seconds = seconds;
        self.state = TimerState::Idle;
        self.target = None;
        self.selected_preset_seconds = Some(seconds);
        debug!("Preset applied: {}s", seconds);
        self.notify_changed();
    }

    /// Start, pause or resume depending on the current state
    pub fn toggle_start_stop(&mut self) {
        match self.state {
            TimerState::Running => self.pause(),
            TimerState::Idle | TimerState::Paused => self.start_if_needed(),
            TimerState::Finished => debug!("Toggle ignored: countdown already finished"),
        }
    }

    /// Return to the pristine idle state
    pub fn reset(&mut self) {
        self.cancel_ticking();
        let pristine = self.state == TimerState::Idle
            && self.remaining_seconds == 0
            && self.selected_preset_seconds.is_none();
        self.remaining_seconds = 0;
        self.state = TimerState::Idle;
        self.target = None;
        self.selected_preset_seconds = None;
        if !pristine {
            debug!("Countdown reset");
            self.notify_changed();
        }
    }

    /// Periodic re-evaluation of remaining time
    ///
    /// A no-op unless `token` is the live token and the engine is running
    /// with a target, so a callback that fires after pause, reset or finish
    /// can never resurrect a superseded countdown.
    pub fn tick(&mut self, token: TickToken) -> TickOutcome {
        if self.tick_token != Some(token) {
            return TickOutcome::Stale;
        }
        self.evaluate()
    }

    fn evaluate(&mut self) -> TickOutcome {
        if self.state != TimerState::Running {
            return TickOutcome::Stale;
        }
        let Some(target) = self.target else {
            return TickOutcome::Stale;
        };

        let seconds_left = seconds_until(target, self.clock.now());
        let changed = seconds_left != self.remaining_seconds;
        if changed {
            self.remaining_seconds = seconds_left;
        }

        if seconds_left == 0 {
            self.finish();
            TickOutcome::Finished
        } else if changed {
            self.notify_changed();
            TickOutcome::Updated
        } else {
            TickOutcome::Unchanged
        }
    }

    fn start_if_needed(&mut self) {
        if self.remaining_seconds == 0 {
            debug!("Start ignored: no time remaining");
            return;
        }

        self.cancel_ticking();
        self.state = TimerState::Running;
        self.target = Some(target_after(self.clock.now(), self.remaining_seconds));
        self.tick_token = Some(TickToken(self.next_token));
        self.next_token += 1;
        debug!("Countdown started: {}s remaining", self.remaining_seconds);
        self.notify_changed();

        // Evaluate right away so a resume mid-second never shows a stale value
        self.evaluate();
    }

    fn pause(&mut self) {
        self.cancel_ticking();
        self.state = TimerState::Paused;
        self.target = None;
        debug!("Countdown paused: {}s remaining", self.remaining_seconds);
        self.notify_changed();
    }

    fn finish(&mut self) {
        self.cancel_ticking();
        self.target = None;
        self.state = TimerState::Finished;
        self.remaining_seconds = 0;
        debug!("Countdown finished");
        let snapshot = self.snapshot();
        self.observers.notify(&CountdownEvent::Changed(snapshot.clone()));
        self.observers.notify(&CountdownEvent::Finished(snapshot));
    }

    fn cancel_ticking(&mut self) {
        self.tick_token = None;
    }

    fn notify_changed(&self) {
        self.observers.notify(&CountdownEvent::Changed(self.snapshot()));
    }
}

impl Default for CountdownEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for CountdownEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CountdownEngine")
            .field("state", &self.state)
            .field("remaining_seconds", &self.remaining_seconds)
            .field("target", &self.target)
            .field("selected_preset_seconds", &self.selected_preset_seconds)
            .field("tick_token", &self.tick_token)
            .field("observers", &self.observers)
            .finish()
    }
}

/// Instant `seconds` after `now`, saturating at the latest representable time
fn target_after(now: DateTime<Utc>, seconds: u64) -> DateTime<Utc> {
    i64::try_from(seconds)
        .ok()
        .and_then(Duration::try_seconds)
        .and_then(|delta| now.checked_add_signed(delta))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

/// Whole seconds until `target`, rounded up and clamped at zero
fn seconds_until(target: DateTime<Utc>, now: DateTime<Utc>) -> u64 {
    let millis = target.signed_duration_since(now).num_milliseconds();
    if millis <= 0 {
        0
    } else {
        (millis as u64).div_ceil(1000)
    }
}
