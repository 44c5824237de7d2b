//! API response structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{state::Snapshot, utils::preset_label};

/// API response structure for command endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub timer: Snapshot,
}

impl CommandResponse {
    /// Create a command response whose status mirrors the timer state
    pub fn new(message: String, timer: Snapshot) -> Self {
        Self {
            status: timer.state.to_string(),
            message,
            timestamp: Utc::now(),
            timer,
        }
    }
}

/// One preset button as the presentation layer should render it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresetView {
    pub seconds: u64,
    pub label: String,
    pub selected: bool,
}

impl PresetView {
    pub fn new(seconds: u64, selected: bool) -> Self {
        Self {
            seconds,
            label: preset_label(seconds),
            selected,
        }
    }
}

/// Status response with the full countdown view
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub timer: Snapshot,
    pub toggle_label: String,
    pub presets: Vec<PresetView>,
    pub uptime: String,
    pub port: u16,
    pub host: String,
    pub last_action: Option<String>,
    pub last_action_time: Option<DateTime<Utc>>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    /// Create a new health response
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
