//! Data transfer objects for the wire formats.

pub mod http;
pub mod seed;
pub mod websocket;
