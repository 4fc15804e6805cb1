//! Device WebSocket connections.
//!
//! Every text message a device sends is one protocol frame. The socket reader
//! only forwards frames into the console queue; the writer drains the peer's
//! outbound queues. A device evicted by the transport is closed.

use crate::state::AppState;
use anyhow::Result;
use axum::extract::ws::{Message, WebSocket};
use futures::{SinkExt, StreamExt};
use std::sync::Arc;
use tracing::{debug, info, warn};
use trainerd_core::TransportEvent;

pub async fn handle_device_websocket(socket: WebSocket, state: Arc<AppState>) -> Result<()> {
    let (mut ws_tx, mut ws_rx) = socket.split();
    let (connection, mut queues) = state.transport.register();

    if let Err(e) = state
        .console
        .transport_event(TransportEvent::Connected(connection))
        .await
    {
        state.transport.unregister(connection);
        return Err(e.into());
    }
    info!(target: "trainerd::ws", "Device {} connected", connection);
    let evicted = queues.eviction();

    let mut send_task = tokio::spawn(async move {
        while let Some(frame) = queues.next().await {
            if let Err(e) = ws_tx.send(Message::Text(frame.into())).await {
                debug!(target: "trainerd::ws", "Send to {} failed: {}", connection, e);
                break;
            }
        }
    });

    let console = state.console.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(Ok(msg)) = ws_rx.next().await {
            match msg {
                Message::Text(text) => {
                    let event = TransportEvent::Frame {
                        connection,
                        data: text.to_string(),
                    };
                    if console.transport_event(event).await.is_err() {
                        warn!(target: "trainerd::ws", "Console gone, closing {}", connection);
                        break;
                    }
                }
                Message::Binary(data) => {
                    debug!(target: "trainerd::ws", "Ignoring {} byte binary message from {}", data.len(), connection);
                }
                Message::Close(_) => {
                    debug!(target: "trainerd::ws", "Device {} closed connection", connection);
                    break;
                }
                _ => {}
            }
        }
    });

    // Wait for either task to finish, or for the transport to give up on the device
    tokio::select! {
        _ = &mut send_task => {
            recv_task.abort();
        }
        _ = &mut recv_task => {
            send_task.abort();
        }
        _ = evicted.notified() => {
            warn!(target: "trainerd::ws", "Closing {}: outbound queue overflowed", connection);
            send_task.abort();
            recv_task.abort();
        }
    }

    state.transport.unregister(connection);
    state
        .console
        .transport_event(TransportEvent::Disconnected(connection))
        .await?;

    info!(target: "trainerd::ws", "Device {} disconnected", connection);
    Ok(())
}
