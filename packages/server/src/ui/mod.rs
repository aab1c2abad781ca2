//! Axum server: routing, websocket and HTTP handlers, background tasks.

mod handler;
mod runner;
mod signal;
pub mod state;
mod sweeper;

pub use runner::{ServerError, build_state, create_router, run, serve};
pub use sweeper::spawn_sweeper;
