//! time-x - A drift-corrected countdown timer
//! 
//! This is the main entry point for the time-x server.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};

use time_x::{
    api::create_router,
    config::Config,
    services::check_notifier_available,
    state::AppState,
    tasks::completion_alert_task,
    utils::{preset_label, shutdown_signal},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("time_x={},tower_http=info", config.log_level()))
        .init();

    info!("Starting time-x server v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration: host={}, port={}, presets={:?}, tick={:?}",
          config.host, config.port, config.presets, config.tick_period());

    // Notifications are optional; fall back to log-only alerts
    let notifier = match config.notifier() {
        Some(notifier) => match check_notifier_available(&notifier).await {
            Ok(()) => Some(notifier),
            Err(e) => {
                warn!("{}, finished countdowns will only be logged", e);
                None
            }
        },
        None => None,
    };

    // Create application state
    let state = Arc::new(AppState::new(
        config.port,
        config.host.clone(),
        config.presets.clone(),
        config.tick_period(),
    ));

    // Start the completion alert background task
    tokio::spawn(completion_alert_task(Arc::clone(&state), notifier));

    // Create HTTP router with all endpoints
    let app = create_router(state);

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  POST /preset/:seconds - Load a preset ({})",
          config.presets.iter().map(|&s| preset_label(s)).collect::<Vec<_>>().join(", "));
    info!("  POST /toggle          - Start, pause or resume");
    info!("  POST /reset           - Clear the countdown");
    info!("  GET  /presets         - List presets");
    info!("  GET  /status          - Current countdown");
    info!("  GET  /health          - Health check");

    // Setup graceful shutdown
    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        _ = shutdown_signal() => {
            info!("Shutdown signal received");
        }
    }

    info!("Server shutdown complete");
    Ok(())
}
