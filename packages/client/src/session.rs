//! WebSocket client session management.

use futures_util::{SinkExt, StreamExt};
use hibiki_shared::time::current_timestamp_millis;
use tokio::sync::mpsc;
use tokio_tungstenite::{connect_async, tungstenite::protocol::Message};

use crate::{error::ClientError, formatter::MessageFormatter, ui::redisplay_prompt};

/// Run one WebSocket session until the user quits or the connection is lost.
///
/// Returns `Ok(())` when the input channel closes (user exit) and an error
/// when the connection fails, so the caller can decide to reconnect.
pub async fn run_client_session(
    url: &str,
    name: &str,
    input: &mut mpsc::UnboundedReceiver<String>,
) -> Result<(), ClientError> {
    let (ws_stream, _response) = connect_async(url)
        .await
        .map_err(|e| ClientError::ConnectionError(e.to_string()))?;

    tracing::info!("Connected to hub server!");
    println!(
        "\nYou are '{}'. Type messages and press Enter to send. Press Ctrl+C to exit.\n",
        name
    );
    redisplay_prompt(name);

    let (mut write, mut read) = ws_stream.split();

    // Spawn a task to display incoming messages
    let name_for_read = name.to_string();
    let mut read_task = tokio::spawn(async move {
        while let Some(message) = read.next().await {
            match message {
                Ok(Message::Text(text)) => {
                    let formatted =
                        MessageFormatter::format_received(text.as_str(), current_timestamp_millis());
                    print!("{}", formatted);
                    redisplay_prompt(&name_for_read);
                }
                Ok(Message::Binary(data)) => {
                    print!("{}", MessageFormatter::format_binary(data.len()));
                    redisplay_prompt(&name_for_read);
                }
                Ok(Message::Close(_)) => {
                    tracing::info!("Server closed the connection");
                    return ClientError::ServerClosed;
                }
                // Pings are answered by tungstenite itself.
                Ok(_) => {}
                Err(e) => {
                    tracing::warn!("WebSocket read error: {}", e);
                    return ClientError::ConnectionError(e.to_string());
                }
            }
        }
        ClientError::ServerClosed
    });

    loop {
        tokio::select! {
            result = &mut read_task => {
                return Err(result.unwrap_or_else(|e| ClientError::ConnectionError(e.to_string())));
            }
            line = input.recv() => {
                let Some(line) = line else {
                    read_task.abort();
                    let _ = write.send(Message::Close(None)).await;
                    return Ok(());
                };

                let outgoing = MessageFormatter::format_outgoing(name, &line);
                if let Err(e) = write.send(Message::Text(outgoing.into())).await {
                    tracing::warn!("Failed to send message: {}", e);
                    read_task.abort();
                    return Err(ClientError::ConnectionError(e.to_string()));
                }
            }
        }
    }
}
