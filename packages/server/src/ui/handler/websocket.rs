//! WebSocket connection handlers.

use std::sync::Arc;

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{sink::SinkExt, stream::StreamExt};
use tokio::sync::mpsc;

use crate::{
    domain::Notification,
    infrastructure::dto::websocket::{ClientMessage, ServerMessage},
    ui::state::AppState,
    usecase::{Intent, ProtocolError, SessionGateway},
};

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let (mut sender, mut receiver) = socket.split();

    // Create a channel for this session to receive direct replies and room broadcasts
    let (tx, mut rx) = mpsc::unbounded_channel::<Notification>();

    let mut gateway = match state.open_session(tx).await {
        Ok(gateway) => gateway,
        Err(e) => {
            tracing::error!("Failed to register session: {}", e);
            let _ = sender.send(Message::Close(None)).await;
            return;
        }
    };
    let session_id = gateway.session_id().clone();

    // Spawn a task to forward queued messages to this client
    let mut send_task = tokio::spawn(async move {
        while let Some(notification) = rx.recv().await {
            let Some(payload) = encode(notification) else {
                continue;
            };
            if sender.send(Message::Text(payload.into())).await.is_err() {
                break;
            }
        }
    });

    // Intents are handled in order on this task; the gateway owns the connection state
    let recv_session_id = session_id.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::warn!("WebSocket error on session '{}': {}", recv_session_id, e);
                    break;
                }
            };

            match msg {
                Message::Text(text) => {
                    tracing::debug!("Received from '{}': {}", recv_session_id, text);
                    handle_text(&mut gateway, text.as_str()).await;
                }
                Message::Ping(_) => {
                    tracing::debug!("Received ping");
                    // Ping/pong is handled automatically by the WebSocket protocol
                }
                Message::Close(_) => {
                    tracing::info!("Session '{}' requested close", recv_session_id);
                    break;
                }
                _ => {}
            }
        }
        gateway
    });

    // If any one of the tasks completes, abort the other
    let gateway = tokio::select! {
        gateway = &mut recv_task => {
            send_task.abort();
            gateway.ok()
        }
        _ = &mut send_task => {
            recv_task.abort();
            recv_task.await.ok()
        }
    };

    match gateway {
        Some(mut gateway) => {
            gateway.disconnect().await;
        }
        None => {
            // the gateway was dropped with the aborted task; clean up by id
            state.disconnect_session().execute(&session_id).await;
        }
    }
    tracing::info!("Session '{}' closed", session_id);
}

/// Decode one text frame and hand it to the gateway.
async fn handle_text(gateway: &mut SessionGateway, text: &str) {
    match serde_json::from_str::<ClientMessage>(text) {
        Ok(message) => gateway.dispatch(into_intent(message)).await,
        Err(e) => gateway.reject(&ProtocolError::Malformed(e.to_string())).await,
    }
}

fn into_intent(message: ClientMessage) -> Intent {
    match message {
        ClientMessage::JoinEvent { event_id } => Intent::JoinEvent { event_id },
        ClientMessage::LeaveEvent { event_id } => Intent::LeaveEvent { event_id },
        ClientMessage::SelectSeat { event_id, seat_id } => Intent::SelectSeat { event_id, seat_id },
        ClientMessage::DeselectSeat { event_id, seat_id } => {
            Intent::DeselectSeat { event_id, seat_id }
        }
    }
}

fn encode(notification: Notification) -> Option<String> {
    match serde_json::to_string(&ServerMessage::from(notification)) {
        Ok(payload) => Some(payload),
        Err(e) => {
            tracing::error!("Failed to serialise server message: {}", e);
            None
        }
    }
}
