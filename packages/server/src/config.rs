//! Server configuration.
//!
//! Every option can be given as a command-line flag or through the
//! environment. [`ServerArgs`] is the raw clap surface; [`ServerConfig`] is
//! the validated form the rest of the server consumes.

use std::{path::PathBuf, time::Duration};

use clap::Parser;
use thiserror::Error;

/// Command-line arguments of `seatlock-server`
#[derive(Parser, Debug, Clone)]
#[command(
    name = "seatlock-server",
    about = "Real-time seat reservation coordinator",
    version
)]
pub struct ServerArgs {
    /// Bind address
    #[arg(long, env = "HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Bind port
    #[arg(long, env = "PORT", default_value_t = 8080)]
    pub port: u16,

    /// How long a selected seat stays held
    #[arg(long, env = "HOLD_TTL_SECONDS", default_value_t = 1800)]
    pub hold_ttl_seconds: u64,

    /// Period of the expiry sweeper
    #[arg(long, env = "SWEEP_INTERVAL_MS", default_value_t = 1000)]
    pub sweep_interval_ms: u64,

    /// JSON seat inventory loaded at startup
    #[arg(long, env = "SEAT_SEED_FILE")]
    pub seed_file: Option<PathBuf>,

    /// Default log level (RUST_LOG takes precedence)
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,
}

/// Configuration errors, reported before the server starts
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("hold TTL must be greater than zero")]
    ZeroHoldTtl,

    #[error("sweep interval must be greater than zero")]
    ZeroSweepInterval,

    #[error("sweep interval ({interval_ms} ms) must not exceed the hold TTL ({ttl_ms} ms)")]
    SweepIntervalTooLong { interval_ms: u64, ttl_ms: u64 },
}

/// Validated server configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub hold_ttl: Duration,
    pub sweep_interval: Duration,
    pub seed_file: Option<PathBuf>,
}

impl ServerConfig {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl TryFrom<ServerArgs> for ServerConfig {
    type Error = ConfigError;

    fn try_from(args: ServerArgs) -> Result<Self, Self::Error> {
        if args.hold_ttl_seconds == 0 {
            return Err(ConfigError::ZeroHoldTtl);
        }
        if args.sweep_interval_ms == 0 {
            return Err(ConfigError::ZeroSweepInterval);
        }
        let ttl_ms = args.hold_ttl_seconds.saturating_mul(1000);
        if args.sweep_interval_ms > ttl_ms {
            return Err(ConfigError::SweepIntervalTooLong {
                interval_ms: args.sweep_interval_ms,
                ttl_ms,
            });
        }

        Ok(Self {
            host: args.host,
            port: args.port,
            hold_ttl: Duration::from_secs(args.hold_ttl_seconds),
            sweep_interval: Duration::from_millis(args.sweep_interval_ms),
            seed_file: args.seed_file,
        })
    }
}
