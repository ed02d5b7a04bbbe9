//! Error types for the CLI client.

use thiserror::Error;

/// Client-specific errors
#[derive(Debug, Error)]
pub enum ClientError {
    /// Connection could not be established or was lost
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// The hub closed the connection
    #[error("Server closed the connection")]
    ServerClosed,

    /// Every reconnection attempt failed
    #[error("Failed to reconnect after {0} attempts")]
    ReconnectFailed(u32),
}
