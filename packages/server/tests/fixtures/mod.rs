//! Test fixtures shared by the integration tests.
//!
//! Each test starts its own in-process server on an ephemeral port, seeded
//! with a small inventory:
//!
//! - event `E1`: seats `A-1`..`A-4` (`standard`), `A-5` already booked,
//!   `B-1` (`vip`)
//! - event `E2`: seat `A-1`

#![allow(dead_code)]

use std::{net::SocketAddr, sync::Arc, time::Duration};

use futures_util::{SinkExt, StreamExt};
use seatlock_server::{
    common::clock::SystemClock, infrastructure::dto::seed::parse_seed, ui,
};
use serde_json::{Value, json};
use tokio::{net::TcpListener, sync::oneshot, task::JoinHandle};
use tokio_tungstenite::{
    MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message,
};

const SEED: &str = r#"{
  "seats": [
    {"seat_id": "A-1", "event_id": "E1", "row_label": "A", "number": 1, "ticket_type_id": "standard"},
    {"seat_id": "A-2", "event_id": "E1", "row_label": "A", "number": 2, "ticket_type_id": "standard"},
    {"seat_id": "A-3", "event_id": "E1", "row_label": "A", "number": 3, "ticket_type_id": "standard"},
    {"seat_id": "A-4", "event_id": "E1", "row_label": "A", "number": 4, "ticket_type_id": "standard"},
    {"seat_id": "A-5", "event_id": "E1", "row_label": "A", "number": 5, "ticket_type_id": "standard", "status": "BOOKED"},
    {"seat_id": "B-1", "event_id": "E1", "row_label": "B", "number": 1, "ticket_type_id": "vip"},
    {"seat_id": "A-1", "event_id": "E2", "row_label": "A", "number": 1, "ticket_type_id": "standard"}
  ]
}"#;

/// How long a client waits for an expected message
const RECV_TIMEOUT: Duration = Duration::from_secs(3);

/// In-process coordinator bound to `127.0.0.1:0`
pub struct TestServer {
    addr: SocketAddr,
    shutdown: Option<oneshot::Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl TestServer {
    /// Server with the production TTL (30 minutes)
    pub async fn start() -> Self {
        Self::start_with(Duration::from_secs(1800), Duration::from_millis(1000)).await
    }

    pub async fn start_with(hold_ttl: Duration, sweep_interval: Duration) -> Self {
        let seats = parse_seed(SEED).expect("Failed to parse seed");
        let state = ui::build_state(seats, Arc::new(SystemClock), hold_ttl)
            .expect("Failed to build state");
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind");
        let addr = listener.local_addr().expect("Failed to get local address");

        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let handle = tokio::spawn(async move {
            ui::serve(listener, state, sweep_interval, async {
                let _ = shutdown_rx.await;
            })
            .await
            .expect("Server failed");
        });

        Self {
            addr,
            shutdown: Some(shutdown_tx),
            handle: Some(handle),
        }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn ws_url(&self) -> String {
        format!("ws://{}/ws", self.addr)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

/// WebSocket client speaking the JSON protocol
pub struct WsClient {
    stream: WebSocketStream<MaybeTlsStream<tokio::net::TcpStream>>,
    pub session_id: String,
}

impl WsClient {
    /// Connect and consume the `session_established` greeting.
    pub async fn connect(server: &TestServer) -> Self {
        let (stream, _) = connect_async(server.ws_url())
            .await
            .expect("Failed to connect");
        let mut client = Self {
            stream,
            session_id: String::new(),
        };
        let greeting = client.recv().await;
        assert_eq!(greeting["type"], "session_established");
        client.session_id = greeting["session_id"]
            .as_str()
            .expect("session_id should be a string")
            .to_string();
        client
    }

    /// Connect and join `event_id`, consuming the `seat_timers` snapshot.
    pub async fn connect_in(server: &TestServer, event_id: &str) -> (Self, Value) {
        let mut client = Self::connect(server).await;
        client
            .send(json!({"type": "join_event", "event_id": event_id}))
            .await;
        let snapshot = client.recv().await;
        assert_eq!(snapshot["type"], "seat_timers");
        (client, snapshot)
    }

    pub async fn send(&mut self, message: Value) {
        self.send_raw(message.to_string()).await;
    }

    pub async fn send_raw(&mut self, text: String) {
        self.stream
            .send(Message::Text(text.into()))
            .await
            .expect("Failed to send");
    }

    pub async fn select(&mut self, event_id: &str, seat_id: &str) {
        self.send(json!({"type": "select_seat", "event_id": event_id, "seat_id": seat_id}))
            .await;
    }

    pub async fn deselect(&mut self, event_id: &str, seat_id: &str) {
        self.send(json!({"type": "deselect_seat", "event_id": event_id, "seat_id": seat_id}))
            .await;
    }

    /// Next JSON message, panicking after [`RECV_TIMEOUT`].
    pub async fn recv(&mut self) -> Value {
        self.recv_within(RECV_TIMEOUT)
            .await
            .expect("Timed out waiting for a message")
    }

    /// Next JSON message, or `None` if nothing arrives within `timeout`.
    pub async fn recv_within(&mut self, timeout: Duration) -> Option<Value> {
        let deadline = tokio::time::Instant::now() + timeout;
        loop {
            let next = tokio::time::timeout_at(deadline, self.stream.next())
                .await
                .ok()?;
            match next {
                Some(Ok(Message::Text(text))) => {
                    return Some(serde_json::from_str(text.as_str()).expect("Invalid JSON"));
                }
                Some(Ok(Message::Close(_))) | None => return None,
                Some(Ok(_)) => continue,
                Some(Err(e)) => panic!("WebSocket error: {e}"),
            }
        }
    }

    pub async fn close(mut self) {
        let _ = self.stream.close(None).await;
    }
}
