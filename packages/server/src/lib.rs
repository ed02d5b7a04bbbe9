//! Real-time fan-out message hub over WebSocket.
//!
//! Every message received from a client is delivered to every connected
//! client. Each connection is served by exactly one reader task and one writer
//! task, and a single hub loop owns the membership of connected clients.

// layers
pub mod client;
pub mod domain;
pub mod hub;
pub mod infrastructure;
pub mod ui;

#[cfg(test)]
mod test_support;
