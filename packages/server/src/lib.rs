//! Real-time seat reservation coordinator.
//!
//! Sessions connect over WebSocket, join an event room and place
//! time-bounded holds on seats. Holds are exclusive per seat, reclaimed by a
//! background sweeper once their TTL passes, and every change is broadcast
//! to the sessions viewing the same event.

pub mod common;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;

pub use config::{ConfigError, ServerArgs, ServerConfig};
pub use ui::{ServerError, run};
