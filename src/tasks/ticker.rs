//! Periodic evaluation task for a running countdown

use std::{
    sync::{Arc, Mutex},
    time::Duration,
};
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, error, info};

use crate::state::{CountdownEngine, TickOutcome, TickToken};

/// Drive `engine` with `token` every `period` until the token goes stale
/// or the countdown finishes
///
/// The first evaluation happens one period after spawning; the engine
/// already evaluated once when it started.
pub async fn run_ticker(engine: Arc<Mutex<CountdownEngine>>, token: TickToken, period: Duration) {
    debug!("Ticker started for {:?}", token);

    let mut interval = interval_at(Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        interval.tick().await;

        let outcome = match engine.lock() {
            Ok(mut engine) => engine.tick(token),
            Err(e) => {
                error!("Failed to lock countdown engine: {}", e);
                break;
            }
        };

        match outcome {
            TickOutcome::Unchanged | TickOutcome::Updated => {}
            TickOutcome::Finished => {
                info!("Countdown reached zero");
                break;
            }
            TickOutcome::Stale => {
                debug!("Ticker for {:?} superseded, stopping", token);
                break;
            }
        }
    }
}
