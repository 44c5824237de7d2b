//! Timer state enumeration

use serde::{Deserialize, Serialize};

/// Lifecycle state of the countdown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerState {
    /// Initial or reset state, no countdown active
    #[default]
    Idle,
    /// Counting down towards the target timestamp
    Running,
    /// Suspended with remaining time preserved
    Paused,
    /// Terminal, reached only from Running when remaining time hits zero
    Finished,
}

impl TimerState {
    /// Check if the countdown is currently running
    pub fn is_active(&self) -> bool {
        matches!(self, TimerState::Running)
    }

    /// Title for the start/stop control in the current state
    pub fn toggle_label(&self) -> &'static str {
        if self.is_active() { "Stop" } else { "Start" }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TimerState::Idle => "idle",
            TimerState::Running => "running",
            TimerState::Paused => "paused",
            TimerState::Finished => "finished",
        }
    }
}

impl std::fmt::Display for TimerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
