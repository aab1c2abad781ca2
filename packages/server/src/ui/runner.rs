//! Server bootstrap: state wiring, routing and lifecycle.

use std::{future::Future, sync::Arc, time::Duration};

use axum::{
    Router,
    routing::{get, post},
};
use thiserror::Error;
use tokio::{net::TcpListener, sync::watch};
use tower_http::trace::TraceLayer;

use crate::{
    common::clock::{Clock, SystemClock},
    config::ServerConfig,
    domain::{RepositoryError, Seat},
    infrastructure::{
        dto::seed::{SeedError, load_seed_file},
        repository::{InMemoryHoldRepository, InMemoryRoomRepository, InMemorySeatRepository},
    },
    ui::{
        handler::{
            confirm_booking, get_live_holds, get_seat_map, health_check, websocket_handler,
        },
        signal::shutdown_signal,
        state::AppState,
        sweeper::spawn_sweeper,
    },
};

/// Errors that stop the server
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("failed to load seat inventory: {0}")]
    Seed(#[from] SeedError),

    #[error("invalid seat inventory: {0}")]
    Inventory(#[from] RepositoryError),

    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        source: std::io::Error,
    },

    #[error("server error: {0}")]
    Serve(#[source] std::io::Error),
}

/// Wire the in-memory repositories around the given seat inventory.
pub fn build_state(
    seats: Vec<Seat>,
    clock: Arc<dyn Clock>,
    hold_ttl: Duration,
) -> Result<Arc<AppState>, RepositoryError> {
    Ok(Arc::new(AppState::new(
        Arc::new(InMemoryHoldRepository::new()),
        Arc::new(InMemorySeatRepository::from_seats(seats)?),
        Arc::new(InMemoryRoomRepository::new()),
        clock,
        hold_ttl,
    )))
}

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/ws", get(websocket_handler))
        .route("/api/health", get(health_check))
        .route("/api/events/{event_id}/seats", get(get_seat_map))
        .route("/api/events/{event_id}/holds", get(get_live_holds))
        .route("/api/events/{event_id}/bookings", post(confirm_booking))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve on `listener` with the expiry sweeper running until `shutdown` resolves.
pub async fn serve<F>(
    listener: TcpListener,
    state: Arc<AppState>,
    sweep_interval: Duration,
    shutdown: F,
) -> Result<(), ServerError>
where
    F: Future<Output = ()> + Send + 'static,
{
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let sweeper = spawn_sweeper(state.clone(), sweep_interval, shutdown_rx);

    let result = axum::serve(listener, create_router(state))
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(ServerError::Serve);

    let _ = shutdown_tx.send(true);
    if let Err(e) = sweeper.await {
        tracing::error!("Expiry sweeper task failed: {}", e);
    }
    result
}

/// Run the coordinator until Ctrl-C or SIGTERM.
pub async fn run(config: ServerConfig) -> Result<(), ServerError> {
    let seats = match &config.seed_file {
        Some(path) => {
            let seats = load_seed_file(path)?;
            tracing::info!("Loaded {} seats from {}", seats.len(), path.display());
            seats
        }
        None => {
            tracing::warn!("No seed file given; starting with an empty seat inventory");
            Vec::new()
        }
    };
    let state = build_state(seats, Arc::new(SystemClock), config.hold_ttl)?;

    let address = config.bind_address();
    let listener = TcpListener::bind(&address)
        .await
        .map_err(|source| ServerError::Bind {
            address: address.clone(),
            source,
        })?;
    tracing::info!(
        "Seat coordinator listening on {} (hold TTL: {:?}, sweep interval: {:?})",
        address,
        config.hold_ttl,
        config.sweep_interval
    );

    serve(listener, state, config.sweep_interval, shutdown_signal()).await?;
    tracing::info!("Server stopped");
    Ok(())
}
