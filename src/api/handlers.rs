//! HTTP endpoint handlers

use std::sync::Arc;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use tracing::{error, info};

use crate::{
    error::TimerError,
    state::{AppState, TimerState},
};
use super::responses::{CommandResponse, HealthResponse, PresetView, StatusResponse};

fn internal_error(context: &str, e: TimerError) -> StatusCode {
    error!("{}: {}", context, e);
    StatusCode::INTERNAL_SERVER_ERROR
}

/// Handle POST /preset/:seconds - Load a preset duration
pub async fn preset_handler(
    State(state): State<Arc<AppState>>,
    Path(seconds): Path<i64>,
) -> Result<Json<CommandResponse>, StatusCode> {
    let timer = state.apply_preset(seconds)
        .map_err(|e| internal_error("Failed to apply preset", e))?;

    info!("Preset endpoint called - {} loaded", timer.display);
    Ok(Json(CommandResponse::new(
        format!("Preset {} loaded", timer.display),
        timer,
    )))
}

/// Handle POST /toggle - Start, pause or resume the countdown
pub async fn toggle_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<CommandResponse>, StatusCode> {
    let (previous, timer) = state.toggle_start_stop()
        .map_err(|e| internal_error("Failed to toggle countdown", e))?;

    let message = toggle_message(previous, timer.state);
    info!("Toggle endpoint called - {}", message);
    Ok(Json(CommandResponse::new(message.to_string(), timer)))
}

/// Describe a toggle by the transition it caused
fn toggle_message(previous: TimerState, current: TimerState) -> &'static str {
    match (previous, current) {
        (TimerState::Running, TimerState::Paused) => "Countdown paused",
        (TimerState::Paused, TimerState::Running) => "Countdown resumed",
        (_, TimerState::Running) => "Countdown started",
        (TimerState::Finished, _) => "Countdown already finished",
        _ => "Nothing to start",
    }
}

/// Handle POST /reset - Clear the countdown
pub async fn reset_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<CommandResponse>, StatusCode> {
    let timer = state.reset()
        .map_err(|e| internal_error("Failed to reset countdown", e))?;

    info!("Reset endpoint called - countdown cleared");
    Ok(Json(CommandResponse::new("Countdown reset".to_string(), timer)))
}

fn preset_views(state: &AppState) -> Result<Vec<PresetView>, TimerError> {
    state.presets
        .iter()
        .map(|&seconds| {
            state.is_preset_selected(seconds)
                .map(|selected| PresetView::new(seconds, selected))
        })
        .collect()
}

/// Handle GET /presets - List configured presets
pub async fn presets_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<PresetView>>, StatusCode> {
    preset_views(&state)
        .map(Json)
        .map_err(|e| internal_error("Failed to list presets", e))
}

/// Handle GET /status - Return current countdown status
pub async fn status_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<StatusResponse>, StatusCode> {
    let timer = state.snapshot()
        .map_err(|e| internal_error("Failed to read countdown", e))?;
    let presets = preset_views(&state)
        .map_err(|e| internal_error("Failed to list presets", e))?;
    let (last_action, last_action_time) = state.get_last_action();

    Ok(Json(StatusResponse {
        toggle_label: timer.state.toggle_label().to_string(),
        timer,
        presets,
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
        last_action,
        last_action_time,
    }))
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_messages_follow_transition() {
        assert_eq!(toggle_message(TimerState::Idle, TimerState::Running), "Countdown started");
        assert_eq!(toggle_message(TimerState::Running, TimerState::Paused), "Countdown paused");
        assert_eq!(toggle_message(TimerState::Paused, TimerState::Running), "Countdown resumed");
        assert_eq!(
            toggle_message(TimerState::Finished, TimerState::Finished),
            "Countdown already finished"
        );
        assert_eq!(toggle_message(TimerState::Idle, TimerState::Idle), "Nothing to start");
    }
}
