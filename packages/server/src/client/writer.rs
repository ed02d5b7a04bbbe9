//! Writer task: outbound queue → connection, plus keepalive probes.

use std::time::Duration;

use bytes::{BufMut, Bytes, BytesMut};
use tokio::{
    sync::mpsc,
    time::{Instant, Interval, MissedTickBehavior, interval_at, timeout},
};

use crate::domain::{ClientId, ConnectionError, ConnectionWriter, Frame};

use super::ClientConfig;

/// Separator placed between messages coalesced into one frame.
const NEWLINE: u8 = b'\n';

/// Pump outbound messages from the queue to the connection.
///
/// Sends a ping every `ping_period`. Exits when the hub closes the queue
/// (after sending a close frame) or when any write fails or misses its
/// deadline. The connection is closed exactly once on the way out.
pub(crate) async fn write_pump<W: ConnectionWriter>(
    client_id: ClientId,
    mut writer: W,
    mut queue: mpsc::Receiver<Bytes>,
    config: ClientConfig,
) {
    let ping_period = config.ping_period();
    let mut ticker = interval_at(Instant::now() + ping_period, ping_period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    match write_messages(client_id, &mut writer, &mut queue, &mut ticker, &config).await {
        Ok(()) => tracing::debug!("Outbound queue of '{}' closed by hub", client_id),
        Err(e) => tracing::warn!("Client '{}' write error: {}", client_id, e),
    }

    drop(ticker);
    if let Err(e) = writer.close().await {
        tracing::debug!("Failed to close connection of '{}': {}", client_id, e);
    }

    tracing::debug!("Client '{}' writer stopped", client_id);
}

async fn write_messages<W: ConnectionWriter>(
    client_id: ClientId,
    writer: &mut W,
    queue: &mut mpsc::Receiver<Bytes>,
    ticker: &mut Interval,
    config: &ClientConfig,
) -> Result<(), ConnectionError> {
    loop {
        tokio::select! {
            message = queue.recv() => {
                let Some(message) = message else {
                    // The peer may already be gone; the close frame is best effort.
                    let _ = write_with_deadline(writer, Frame::Close, config.write_wait).await;
                    return Ok(());
                };

                let payload = coalesce(message, queue);
                write_with_deadline(writer, Frame::Message(payload), config.write_wait).await?;
            }
            _ = ticker.tick() => {
                tracing::trace!("Sending ping to '{}'", client_id);
                write_with_deadline(writer, Frame::Ping(Bytes::new()), config.write_wait).await?;
            }
        }
    }
}

/// Append every message already waiting in the queue to `first`, one per line.
///
/// Only messages present at this instant are taken, so a busy hub cannot keep
/// the writer here forever.
fn coalesce(first: Bytes, queue: &mut mpsc::Receiver<Bytes>) -> Bytes {
    let pending = queue.len();
    if pending == 0 {
        return first;
    }

    let mut payload = BytesMut::from(&first[..]);
    for _ in 0..pending {
        let Ok(next) = queue.try_recv() else {
            break;
        };
        payload.put_u8(NEWLINE);
        payload.extend_from_slice(&next);
    }
    payload.freeze()
}

async fn write_with_deadline<W: ConnectionWriter>(
    writer: &mut W,
    frame: Frame,
    write_wait: Duration,
) -> Result<(), ConnectionError> {
    timeout(write_wait, writer.write_frame(frame))
        .await
        .map_err(|_| ConnectionError::WriteTimeout(write_wait))?
}
