//! Error types for the timer service

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TimerError {
    #[error("failed to lock {0}: mutex poisoned")]
    LockPoisoned(&'static str),

    #[error("notification failed: {0}")]
    Notifier(String),
}
