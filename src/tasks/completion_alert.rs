//! Completion alert background task

use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;
use tracing::{info, warn};

use crate::{
    services::{send_finished_notification, NotifierConfig},
    state::{AppState, CountdownEvent},
};

/// Background task that raises a user-visible alert whenever a countdown
/// finishes
///
/// Notification failures are logged and dropped; the engine never hears
/// about them.
pub async fn completion_alert_task(state: Arc<AppState>, notifier: Option<NotifierConfig>) {
    info!("Starting completion alert task");

    let mut events = state.subscribe_events();
    drop(state);

    loop {
        match events.recv().await {
            Ok(CountdownEvent::Finished(snapshot)) => {
                info!(
                    "Time's up (preset {})",
                    snapshot
                        .selected_preset_seconds
                        .map(|s| format!("{}s", s))
                        .unwrap_or_else(|| "none".to_string())
                );

                if let Some(config) = &notifier {
                    if let Err(e) = send_finished_notification(config).await {
                        warn!("{}", e);
                    }
                }
            }
            Ok(CountdownEvent::Changed(_)) => {}
            Err(RecvError::Lagged(skipped)) => {
                warn!("Completion alert task lagged, skipped {} events", skipped);
            }
            Err(RecvError::Closed) => {
                info!("Event channel closed, stopping completion alert task");
                break;
            }
        }
    }
}
