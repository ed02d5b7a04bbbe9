//! Hub: client membership and broadcast fan-out
//!
//! ## 責務
//!
//! - 接続中クライアントの登録・登録解除
//! - 受信したメッセージを全クライアントの送信キューへ配信
//!
//! ## 設計ノート
//!
//! メンバーシップ (`clients`) を変更・参照するのはコーディネーションループ
//! (`Hub::run`) だけです。他のタスクは `HubHandle` 経由でコマンドを送るだけなので、
//! メンバーシップにロックは不要です。
//!
//! 送信キューが満杯のクライアント（遅いクライアント）はブロードキャスト時に
//! メンバーシップから外され、キューが閉じられます。1 つの遅いクライアントが
//! 他のクライアントへの配信を止めることはありません。

use std::collections::HashMap;

use bytes::Bytes;
use thiserror::Error;
use tokio::{
    sync::{
        mpsc::{self, error::TrySendError},
        oneshot,
    },
    task::JoinHandle,
};

use crate::domain::ClientId;

/// Capacity of the hub's command channel.
pub const COMMAND_BUFFER: usize = 256;

/// Hub errors
#[derive(Debug, Error)]
pub enum HubError {
    /// The coordination loop is no longer running
    #[error("Hub is closed")]
    Closed,
}

/// A client as seen by the hub: its id and the producer side of its outbound queue.
#[derive(Debug)]
pub struct ClientEntry {
    id: ClientId,
    queue: mpsc::Sender<Bytes>,
}

impl ClientEntry {
    pub fn new(id: ClientId, queue: mpsc::Sender<Bytes>) -> Self {
        Self { id, queue }
    }

    pub fn id(&self) -> ClientId {
        self.id
    }
}

/// Commands processed by the coordination loop, one at a time.
#[derive(Debug)]
pub(crate) enum HubCommand {
    Register(ClientEntry),
    Unregister(ClientId),
    Broadcast(Bytes),
    Count(oneshot::Sender<usize>),
}

/// Handle used by everything outside the hub.
///
/// `register`, `unregister` and `broadcast` are the whole boundary the rest of
/// the server is allowed to use. `client_count` only reads membership, and the
/// read happens inside the loop as well.
#[derive(Debug, Clone)]
pub struct HubHandle {
    commands: mpsc::Sender<HubCommand>,
}

impl HubHandle {
    /// Add a client to the membership.
    ///
    /// Registering an id twice replaces the previous entry.
    pub async fn register(&self, entry: ClientEntry) -> Result<(), HubError> {
        self.send(HubCommand::Register(entry)).await
    }

    /// Remove a client and close its outbound queue. No-op for unknown ids.
    pub async fn unregister(&self, id: ClientId) -> Result<(), HubError> {
        self.send(HubCommand::Unregister(id)).await
    }

    /// Queue a message for delivery to every registered client.
    pub async fn broadcast(&self, message: Bytes) -> Result<(), HubError> {
        self.send(HubCommand::Broadcast(message)).await
    }

    /// Number of registered clients, as seen by the loop after every command
    /// queued before this one.
    pub async fn client_count(&self) -> Result<usize, HubError> {
        let (reply, count) = oneshot::channel();
        self.send(HubCommand::Count(reply)).await?;
        count.await.map_err(|_| HubError::Closed)
    }

    async fn send(&self, command: HubCommand) -> Result<(), HubError> {
        self.commands
            .send(command)
            .await
            .map_err(|_| HubError::Closed)
    }
}

/// The coordination loop and the membership it owns.
#[derive(Debug)]
pub struct Hub {
    clients: HashMap<ClientId, mpsc::Sender<Bytes>>,
    commands: mpsc::Receiver<HubCommand>,
}

impl Hub {
    /// Create a hub and the handle that talks to it.
    pub fn new() -> (Self, HubHandle) {
        let (tx, rx) = mpsc::channel(COMMAND_BUFFER);
        let hub = Self {
            clients: HashMap::new(),
            commands: rx,
        };
        (hub, HubHandle { commands: tx })
    }

    /// Create a hub and run its loop on a new task.
    pub fn spawn() -> (HubHandle, JoinHandle<()>) {
        let (hub, handle) = Self::new();
        (handle, tokio::spawn(hub.run()))
    }

    /// Run the coordination loop.
    ///
    /// Returns only after every `HubHandle` has been dropped.
    pub async fn run(mut self) {
        tracing::debug!("Hub coordination loop started");
        while let Some(command) = self.commands.recv().await {
            self.handle(command);
        }
        tracing::debug!("Hub coordination loop stopped");
    }

    fn handle(&mut self, command: HubCommand) {
        match command {
            HubCommand::Register(entry) => self.register(entry),
            HubCommand::Unregister(id) => self.unregister(id),
            HubCommand::Broadcast(message) => self.broadcast(message),
            HubCommand::Count(reply) => {
                // The requester may have given up waiting.
                let _ = reply.send(self.clients.len());
            }
        }
    }

    fn register(&mut self, entry: ClientEntry) {
        if self.clients.insert(entry.id, entry.queue).is_some() {
            tracing::debug!("Client '{}' registered again, entry replaced", entry.id);
        }
        tracing::info!(
            "Client '{}' registered ({} connected)",
            entry.id,
            self.clients.len()
        );
    }

    fn unregister(&mut self, id: ClientId) {
        // Dropping the sender closes the queue, which stops the writer.
        if self.clients.remove(&id).is_some() {
            tracing::info!(
                "Client '{}' unregistered ({} connected)",
                id,
                self.clients.len()
            );
        }
    }

    fn broadcast(&mut self, message: Bytes) {
        let mut evicted = Vec::new();

        for (id, queue) in &self.clients {
            match queue.try_send(message.clone()) {
                Ok(()) => {}
                Err(TrySendError::Full(_)) => {
                    tracing::warn!("Client '{}' outbound queue is full, evicting", id);
                    evicted.push(*id);
                }
                Err(TrySendError::Closed(_)) => {
                    tracing::debug!("Client '{}' outbound queue is closed, evicting", id);
                    evicted.push(*id);
                }
            }
        }

        for id in evicted {
            self.unregister(id);
        }

        tracing::debug!(
            "Broadcasted {} bytes to {} clients",
            message.len(),
            self.clients.len()
        );
    }
}
