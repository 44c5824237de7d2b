//! Desktop notification for finished countdowns

use tokio::process::Command;
use tracing::{debug, info};

use crate::error::TimerError;

pub const DEFAULT_NOTIFY_COMMAND: &str = "notify-send";
pub const DEFAULT_ALERT_TITLE: &str = "Time's up";

/// Notifier configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotifierConfig {
    /// Executable invoked with the title as its only argument
    pub command: String,
    pub title: String,
}

impl NotifierConfig {
    pub fn new(command: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            title: title.into(),
        }
    }
}

impl Default for NotifierConfig {
    fn default() -> Self {
        Self::new(DEFAULT_NOTIFY_COMMAND, DEFAULT_ALERT_TITLE)
    }
}

/// Post the "timer finished" notification
pub async fn send_finished_notification(config: &NotifierConfig) -> Result<(), TimerError> {
    debug!("Posting finished notification via {}", config.command);

    let output = Command::new(&config.command)
        .arg(&config.title)
        .output()
        .await
        .map_err(|e| TimerError::Notifier(format!("failed to execute {}: {}", config.command, e)))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(TimerError::Notifier(format!(
            "{} exited with {}: {}",
            config.command,
            output.status,
            stderr.trim()
        )));
    }

    info!("Finished notification posted");
    Ok(())
}

/// Check if the notification command is available on the system
pub async fn check_notifier_available(config: &NotifierConfig) -> Result<(), TimerError> {
    Command::new(&config.command)
        .arg("--version")
        .output()
        .await
        .map_err(|_| TimerError::Notifier(format!("{} is not available", config.command)))?;

    info!("{} is available", config.command);
    Ok(())
}
