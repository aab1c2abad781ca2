//! Handler modules for HTTP and WebSocket endpoints.

pub mod http;
pub mod websocket;

// Re-export HTTP handlers
pub use http::{confirm_booking, get_live_holds, get_seat_map, health_check};

// Re-export WebSocket handlers
pub use websocket::websocket_handler;
