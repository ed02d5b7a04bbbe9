//! WebSocket connection handlers.

use std::sync::Arc;

use axum::{
    extract::{
        State,
        ws::{WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};

use crate::{client::Client, infrastructure::split_websocket, ui::state::AppState};

/// Upgrade the request and hand the connection to a new client.
pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    // The transport enforces the limit too, before the reader ever sees the message.
    let max_message_size = state.client_config.max_message_size;
    ws.max_message_size(max_message_size)
        .max_frame_size(max_message_size)
        .on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let (reader, writer) = split_websocket(socket);

    let client = match Client::register(
        state.hub.clone(),
        reader,
        writer,
        state.client_config,
    )
    .await
    {
        Ok(client) => client,
        Err(e) => {
            tracing::error!("Failed to register client: {}", e);
            return;
        }
    };

    let client_id = client.id();
    tracing::info!("Client '{}' connected", client_id);

    client.serve().await;

    tracing::info!("Client '{}' disconnected", client_id);
}
