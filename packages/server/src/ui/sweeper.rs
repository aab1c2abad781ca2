//! Expiry Sweeper background task.

use std::{sync::Arc, time::Duration};

use tokio::{
    sync::watch,
    task::JoinHandle,
    time::{self, MissedTickBehavior},
};

use crate::ui::state::AppState;

/// Run the expiry sweep every `interval` until `shutdown` flips to `true`.
///
/// A failed sweep is logged and retried on the next tick; holds are only
/// removed by a successful sweep, so nothing is reported twice.
pub fn spawn_sweeper(
    state: Arc<AppState>,
    interval: Duration,
    mut shutdown: watch::Receiver<bool>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let sweep = state.sweep_expired_holds();
        let mut ticker = time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tracing::info!("Expiry sweeper started (interval: {:?})", interval);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    match sweep.execute().await {
                        Ok(expired) if !expired.is_empty() => {
                            tracing::debug!("Sweep reclaimed {} holds", expired.len());
                        }
                        Ok(_) => {}
                        Err(e) => tracing::error!("Expiry sweep failed, retrying next tick: {}", e),
                    }
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }
        tracing::info!("Expiry sweeper stopped");
    })
}
