//! Reader task: connection → hub.

use tokio::time::{Instant, timeout_at};

use crate::{
    domain::{ClientId, ConnectionError, ConnectionReader, Frame, normalize_message},
    hub::HubHandle,
};

use super::{ClientConfig, PumpError};

/// Pump inbound messages from the connection to the hub.
///
/// Runs until the read fails, the peer goes away or the read deadline
/// expires. Whatever the reason, the client is then unregistered and the read
/// half is released.
///
/// Releasing the read half does not close the connection. Unregistering
/// closes the client's queue, and the writer task closes the connection when
/// it sees that, so the reader must not close it a second time.
pub(crate) async fn read_pump<R: ConnectionReader>(
    client_id: ClientId,
    mut reader: R,
    hub: HubHandle,
    config: ClientConfig,
) {
    match read_messages(client_id, &mut reader, &hub, &config).await {
        Ok(()) => tracing::debug!("Client '{}' closed the connection", client_id),
        Err(PumpError::Connection(ConnectionError::ReadTimeout(wait))) => {
            tracing::info!("Client '{}' sent no pong within {:?}", client_id, wait);
        }
        Err(e) => tracing::warn!("Client '{}' read error: {}", client_id, e),
    }

    if let Err(e) = hub.unregister(client_id).await {
        tracing::error!("Failed to unregister client '{}': {}", client_id, e);
    }
    drop(reader);

    tracing::debug!("Client '{}' reader stopped", client_id);
}

async fn read_messages<R: ConnectionReader>(
    client_id: ClientId,
    reader: &mut R,
    hub: &HubHandle,
    config: &ClientConfig,
) -> Result<(), PumpError> {
    // Only keepalive acknowledgments push the deadline forward.
    let mut deadline = Instant::now() + config.pong_wait;

    loop {
        let frame = match timeout_at(deadline, reader.read_frame()).await {
            Err(_) => return Err(ConnectionError::ReadTimeout(config.pong_wait).into()),
            Ok(None) => return Ok(()),
            Ok(Some(frame)) => frame?,
        };

        match frame {
            Frame::Message(payload) => {
                if payload.len() > config.max_message_size {
                    return Err(ConnectionError::MessageTooLarge {
                        size: payload.len(),
                        limit: config.max_message_size,
                    }
                    .into());
                }

                let message = normalize_message(&payload);
                tracing::debug!("Received {} bytes from '{}'", message.len(), client_id);
                hub.broadcast(message).await?;
            }
            Frame::Pong(_) => {
                deadline = Instant::now() + config.pong_wait;
                tracing::trace!("Received pong from '{}'", client_id);
            }
            Frame::Ping(_) => {
                // The transport answers pings on its own.
                tracing::trace!("Received ping from '{}'", client_id);
            }
            Frame::Close => return Ok(()),
        }
    }
}
