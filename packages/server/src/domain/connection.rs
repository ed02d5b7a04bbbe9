//! Connection trait 定義
//!
//! 1 つの接続は読み取り側 (`ConnectionReader`) と書き込み側
//! (`ConnectionWriter`) に分割され、それぞれ 1 つのタスクが所有します。
//! 読み取りは reader タスクだけ、書き込みは writer タスクだけが行います。
//!
//! 具体的な実装は Infrastructure 層が提供します（WebSocket など）。

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

/// A frame exchanged over a connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    /// Application data
    Message(Bytes),
    /// Keepalive probe
    Ping(Bytes),
    /// Keepalive acknowledgment
    Pong(Bytes),
    /// Close handshake
    Close,
}

/// Connection errors
///
/// Every variant is terminal for the affected client only.
#[derive(Debug, Error)]
pub enum ConnectionError {
    /// Underlying transport failure
    #[error("Transport error: {0}")]
    Transport(String),

    /// Inbound message larger than the configured limit
    #[error("Message of {size} bytes exceeds the limit of {limit} bytes")]
    MessageTooLarge { size: usize, limit: usize },

    /// No keepalive acknowledgment before the read deadline
    #[error("No pong received within {0:?}")]
    ReadTimeout(Duration),

    /// A write did not complete before the write deadline
    #[error("Write did not complete within {0:?}")]
    WriteTimeout(Duration),

    /// The connection is already closed
    #[error("Connection closed")]
    Closed,
}

/// Read half of a connection.
#[async_trait]
pub trait ConnectionReader: Send {
    /// Read the next frame.
    ///
    /// Returns `None` once the peer has gone away.
    async fn read_frame(&mut self) -> Option<Result<Frame, ConnectionError>>;
}

/// Write half of a connection.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ConnectionWriter: Send {
    /// Write a single frame and flush it.
    async fn write_frame(&mut self, frame: Frame) -> Result<(), ConnectionError>;

    /// Close the connection. Calling it again is a no-op.
    async fn close(&mut self) -> Result<(), ConnectionError>;
}
