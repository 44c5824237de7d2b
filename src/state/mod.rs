//! State management module
//! 
//! This module contains the countdown engine, its state types and the
//! tokio-side application state that drives it.

pub mod timer_state;
pub mod clock;
pub mod observer;
pub mod countdown;
pub mod app_state;

// Re-export main types
pub use timer_state::TimerState;
pub use clock::{Clock, ManualClock, SystemClock};
pub use observer::{CountdownEvent, ObserverId, Observers};
pub use countdown::{CountdownEngine, Snapshot, TickOutcome, TickToken, MAX_PRESET_SECONDS};
pub use app_state::AppState;
