//! Read and write paths of one WebSocket connection.
//!
//! Each accepted socket gets two tasks. The write path drains the outbound
//! buffer into the socket; the read path watches the socket for the peer
//! going away. Whichever stops first unregisters the connection, and the
//! other task is aborted.

use std::{fmt, sync::Arc, time::Duration};

use axum::extract::ws::{Message, WebSocket};
use futures_util::{Sink, SinkExt, Stream, StreamExt};
use rest_websockets_shared::time::now_millis;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use super::{
    connection::{ConnectionHandle, ConnectionId, Outbound, Payload},
    handle::HubHandle,
};

/// How long a released connection gets to accept its close frame
const CLOSE_TIMEOUT: Duration = Duration::from_secs(1);

/// Receives text frames sent by clients.
#[cfg_attr(test, mockall::automock)]
pub trait InboundHandler: Send + Sync {
    fn on_text(&self, id: ConnectionId, text: &str);
}

/// Default handler: inbound traffic is only logged.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogInbound;

impl InboundHandler for LogInbound {
    fn on_text(&self, id: ConnectionId, text: &str) {
        tracing::debug!(conn_id = %id, len = text.len(), "Ignoring inbound text frame");
    }
}

/// Bridge an upgraded socket to the hub until either side gives up.
///
/// The connection is registered before any frame is exchanged.
pub async fn serve(
    socket: WebSocket,
    hub: HubHandle,
    outbound_buffer: usize,
    inbound: Arc<dyn InboundHandler>,
) {
    let (conn, outbound) = ConnectionHandle::channel(outbound_buffer);
    let id = conn.id();
    let connected_at = conn.connected_at();
    let released = conn.released();
    hub.register(conn);

    let (sink, stream) = socket.split();

    let mut write_task = tokio::spawn(write_path(id, outbound, released, sink, hub.clone()));
    let mut read_task = tokio::spawn(read_path(id, stream, hub, inbound));

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut read_task => write_task.abort(),
        _ = &mut write_task => read_task.abort(),
    };

    tracing::info!(
        conn_id = %id,
        duration_ms = now_millis() - connected_at,
        "Session ended"
    );
}

/// Drain the outbound buffer into `sink` in enqueue order.
///
/// Stops on the first write error, or as soon as the hub releases the
/// connection. A released connection gets nothing more than a close frame:
/// payloads still sitting in the buffer are discarded, and a write blocked
/// on a stalled peer is abandoned.
pub async fn write_path<S>(
    id: ConnectionId,
    mut outbound: mpsc::Receiver<Payload>,
    released: CancellationToken,
    mut sink: S,
    hub: HubHandle,
) where
    S: Sink<Message> + Unpin,
    S::Error: fmt::Display,
{
    loop {
        let next = tokio::select! {
            biased;
            _ = released.cancelled() => None,
            payload = outbound.recv() => payload,
        };
        let Some(payload) = next else {
            tracing::debug!(conn_id = %id, "Connection released, closing socket");
            close_sink(id, &mut sink).await;
            break;
        };

        let sent = tokio::select! {
            biased;
            _ = released.cancelled() => None,
            result = sink.send(Message::Text(payload)) => Some(result),
        };
        match sent {
            Some(Ok(())) => {}
            Some(Err(e)) => {
                tracing::warn!(conn_id = %id, error = %e, "Write failed");
                break;
            }
            None => {
                tracing::debug!(conn_id = %id, "Connection released during write");
                close_sink(id, &mut sink).await;
                break;
            }
        }
    }

    hub.unregister(id);
}

async fn close_sink<S>(id: ConnectionId, sink: &mut S)
where
    S: Sink<Message> + Unpin,
    S::Error: fmt::Display,
{
    match tokio::time::timeout(CLOSE_TIMEOUT, sink.close()).await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => tracing::debug!(conn_id = %id, error = %e, "Close frame not delivered"),
        Err(_) => tracing::debug!(conn_id = %id, "Peer did not take the close frame in time"),
    }
}

/// Consume frames from the peer until it closes or errors.
pub async fn read_path<S, E>(
    id: ConnectionId,
    mut stream: S,
    hub: HubHandle,
    inbound: Arc<dyn InboundHandler>,
) where
    S: Stream<Item = Result<Message, E>> + Unpin,
    E: fmt::Display,
{
    while let Some(frame) = stream.next().await {
        match frame {
            Ok(Message::Text(text)) => inbound.on_text(id, text.as_str()),
            Ok(Message::Close(_)) => {
                tracing::info!(conn_id = %id, "Client requested close");
                break;
            }
            // Ping/pong is answered by the protocol layer
            Ok(_) => {}
            Err(e) => {
                tracing::warn!(conn_id = %id, error = %e, "Read failed");
                break;
            }
        }
    }

    hub.unregister(id);
}
