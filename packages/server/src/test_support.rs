//! In-memory connection used by the unit tests.

use std::sync::{
    Arc,
    atomic::{AtomicBool, AtomicUsize, Ordering},
};

use async_trait::async_trait;
use bytes::Bytes;
use tokio::sync::mpsc;

use crate::domain::{ConnectionError, ConnectionReader, ConnectionWriter, Frame};

type Inbound = Result<Frame, ConnectionError>;

/// Read half fed by the `Peer`. Ends when the peer is dropped.
pub struct FakeReader {
    inbound: mpsc::UnboundedReceiver<Inbound>,
}

/// Write half that forwards every frame to the `Peer`.
pub struct FakeWriter {
    outbound: Option<mpsc::UnboundedSender<Frame>>,
    closes: Arc<AtomicUsize>,
    stalled: Arc<AtomicBool>,
}

/// The remote side of a fake connection.
pub struct Peer {
    inbound: mpsc::UnboundedSender<Inbound>,
    outbound: mpsc::UnboundedReceiver<Frame>,
    closes: Arc<AtomicUsize>,
    stalled: Arc<AtomicBool>,
}

pub fn fake_connection() -> (FakeReader, FakeWriter, Peer) {
    let (inbound_tx, inbound_rx) = mpsc::unbounded_channel();
    let (outbound_tx, outbound_rx) = mpsc::unbounded_channel();
    let closes = Arc::new(AtomicUsize::new(0));
    let stalled = Arc::new(AtomicBool::new(false));

    (
        FakeReader {
            inbound: inbound_rx,
        },
        FakeWriter {
            outbound: Some(outbound_tx),
            closes: closes.clone(),
            stalled: stalled.clone(),
        },
        Peer {
            inbound: inbound_tx,
            outbound: outbound_rx,
            closes,
            stalled,
        },
    )
}

impl Peer {
    pub fn send_frame(&self, frame: Frame) {
        let _ = self.inbound.send(Ok(frame));
    }

    pub fn send_message(&self, text: &str) {
        self.send_frame(Frame::Message(Bytes::copy_from_slice(text.as_bytes())));
    }

    pub fn send_error(&self, error: ConnectionError) {
        let _ = self.inbound.send(Err(error));
    }

    /// Next frame written by the writer, `None` once the writer is gone.
    pub async fn next_frame(&mut self) -> Option<Frame> {
        self.outbound.recv().await
    }

    /// Make every following write hang forever.
    pub fn stall_writes(&self) {
        self.stalled.store(true, Ordering::SeqCst);
    }

    pub fn close_count(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ConnectionReader for FakeReader {
    async fn read_frame(&mut self) -> Option<Result<Frame, ConnectionError>> {
        self.inbound.recv().await
    }
}

#[async_trait]
impl ConnectionWriter for FakeWriter {
    async fn write_frame(&mut self, frame: Frame) -> Result<(), ConnectionError> {
        if self.stalled.load(Ordering::SeqCst) {
            std::future::pending::<()>().await;
        }
        match &self.outbound {
            Some(outbound) => outbound.send(frame).map_err(|_| ConnectionError::Closed),
            None => Err(ConnectionError::Closed),
        }
    }

    async fn close(&mut self) -> Result<(), ConnectionError> {
        self.closes.fetch_add(1, Ordering::SeqCst);
        self.outbound = None;
        Ok(())
    }
}
