//! Configuration and CLI argument handling

use std::time::Duration;

use clap::Parser;

use crate::services::{NotifierConfig, DEFAULT_ALERT_TITLE, DEFAULT_NOTIFY_COMMAND};

/// Shortest tick period accepted
const MIN_TICK_MS: u64 = 50;

/// CLI argument parsing structure
#[derive(Parser, Debug)]
#[command(name = "time-x")]
#[command(about = "A drift-corrected countdown timer with an HTTP control surface")]
#[command(version)]
pub struct Config {
    /// Port to bind the server to
    #[arg(short, long, default_value = "20554")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Preset durations in seconds, comma separated
    #[arg(long, value_delimiter = ',', default_values_t = [180, 300, 600, 900])]
    pub presets: Vec<u64>,

    /// Interval between countdown evaluations in milliseconds
    #[arg(long, default_value = "1000")]
    pub tick_ms: u64,

    /// Command used to post the desktop notification
    #[arg(long, default_value = DEFAULT_NOTIFY_COMMAND)]
    pub notify_command: String,

    /// Title of the notification shown when the countdown finishes
    #[arg(long, default_value = DEFAULT_ALERT_TITLE)]
    pub alert_title: String,

    /// Disable desktop notifications
    #[arg(long)]
    pub no_notify: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }

    pub fn tick_period(&self) -> Duration {
        Duration::from_millis(self.tick_ms.max(MIN_TICK_MS))
    }

    /// Notifier settings, or None when notifications are disabled
    pub fn notifier(&self) -> Option<NotifierConfig> {
        if self.no_notify {
            None
        } else {
            Some(NotifierConfig::new(&self.notify_command, &self.alert_title))
        }
    }
}
