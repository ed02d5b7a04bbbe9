//! Client: one connection bridged to the hub
//!
//! ## 責務
//!
//! - 接続を受け付けたら Hub に登録する
//! - reader タスク（接続 → Hub）と writer タスク（送信キュー → 接続）を 1 つずつ起動する
//!
//! ## 状態遷移
//!
//! `Connecting → Registered → Active → Closing → Closed`
//!
//! - `Client::register` で Registered
//! - `Client::serve` が 2 つのタスクを起動して Active
//! - どちらかのタスクが終了条件（読み取りエラー、書き込みエラー、キューのクローズ、
//!   遅いクライアントとしての追い出し）を検知して Closing
//! - 両方のタスクが終了し接続が閉じられたら Closed（`serve` が戻る）
//!
//! reader と writer はそれぞれ接続の片側を所有するため、
//! 読み取りは reader だけ、書き込みは writer だけが行います。

mod config;
mod reader;
mod writer;

use bytes::Bytes;
use thiserror::Error;
use tokio::sync::mpsc;

use crate::{
    domain::{ClientId, ConnectionError, ConnectionReader, ConnectionWriter},
    hub::{ClientEntry, HubError, HubHandle},
};

pub use config::{
    ClientConfig, MAX_MESSAGE_SIZE, MAX_WAIT_SECS, PONG_WAIT, SEND_BUFFER, WRITE_WAIT,
};

/// Reasons a reader or writer task stops early.
#[derive(Debug, Error)]
pub(crate) enum PumpError {
    #[error(transparent)]
    Connection(#[from] ConnectionError),

    #[error(transparent)]
    Hub(#[from] HubError),
}

/// A registered client that has not started its tasks yet.
pub struct Client<R, W> {
    id: ClientId,
    hub: HubHandle,
    reader: R,
    writer: W,
    queue: mpsc::Receiver<Bytes>,
    config: ClientConfig,
}

impl<R, W> Client<R, W>
where
    R: ConnectionReader + 'static,
    W: ConnectionWriter + 'static,
{
    /// Register a freshly accepted connection with the hub.
    ///
    /// If the hub is gone the connection is closed before the error is
    /// returned.
    pub async fn register(
        hub: HubHandle,
        reader: R,
        mut writer: W,
        config: ClientConfig,
    ) -> Result<Self, HubError> {
        let id = ClientId::generate();
        let (tx, queue) = mpsc::channel(config.send_buffer);

        if let Err(e) = hub.register(ClientEntry::new(id, tx)).await {
            let _ = writer.close().await;
            return Err(e);
        }

        Ok(Self {
            id,
            hub,
            reader,
            writer,
            queue,
            config,
        })
    }

    pub fn id(&self) -> ClientId {
        self.id
    }

    /// Start the reader and writer tasks and wait until both have exited.
    pub async fn serve(self) {
        let Self {
            id,
            hub,
            reader,
            writer,
            queue,
            config,
        } = self;

        let write_task = tokio::spawn(writer::write_pump(id, writer, queue, config));
        let read_task = tokio::spawn(reader::read_pump(id, reader, hub, config));

        let (read_result, write_result) = tokio::join!(read_task, write_task);
        if let Err(e) = read_result {
            tracing::error!("Reader task of '{}' failed: {}", id, e);
        }
        if let Err(e) = write_result {
            tracing::error!("Writer task of '{}' failed: {}", id, e);
        }

        tracing::debug!("Client '{}' closed", id);
    }
}
