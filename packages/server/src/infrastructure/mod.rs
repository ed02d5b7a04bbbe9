//! Infrastructure layer
//!
//! Domain 層の `ConnectionReader` / `ConnectionWriter` の具体的な実装を提供します。
//!
//! - `websocket`: axum の WebSocket を使った実装

pub mod websocket;

pub use websocket::{WebSocketReader, WebSocketWriter, split_websocket};
