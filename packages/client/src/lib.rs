//! Interactive CLI client for the Hibiki hub.
//!
//! Sends each line typed at the prompt to the hub and prints every message the
//! hub broadcasts. Reconnects when the connection is lost.

pub mod error;
pub mod formatter;
mod runner;
mod session;
mod ui;

pub use runner::{MAX_RECONNECT_ATTEMPTS, RECONNECT_INTERVAL_SECS, run_client};
