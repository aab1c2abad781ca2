//! Seat reservation coordinator server.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin seatlock-server -- --seed-file demos/seats.json
//! ```

use clap::Parser;
use seatlock_server::{ServerArgs, ServerConfig};
use seatlock_shared::logger::setup_logger;

#[tokio::main]
async fn main() {
    let args = ServerArgs::parse();

    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), &args.log_level);

    let config = match ServerConfig::try_from(args) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Invalid configuration: {}", e);
            std::process::exit(2);
        }
    };

    // Run the server
    if let Err(e) = seatlock_server::run(config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
