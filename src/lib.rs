//! time-x - A drift-corrected countdown timer
//! 
//! This library provides the countdown engine (preset, start/pause/resume,
//! reset, completion notification), a tokio driver that ticks it, and an
//! HTTP control surface for a presentation layer.

pub mod config;
pub mod error;
pub mod state;
pub mod api;
pub mod services;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use error::TimerError;
pub use state::{AppState, CountdownEngine, CountdownEvent, Snapshot, TimerState};
pub use api::create_router;
pub use utils::{format_clock, signals::shutdown_signal};
