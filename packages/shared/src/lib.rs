//! Shared utilities for Seatlock binaries and tests.

pub mod logger;
pub mod time;
