//! Connection identity and the outbound capability the hub talks to.
//!
//! The hub never sees a socket. It only knows the [`Outbound`] capability:
//! enqueue a payload without blocking, and release the connection. The
//! WebSocket-backed implementation is [`ConnectionHandle`]; tests plug in
//! their own doubles to simulate slow or dead peers.

use std::fmt;

use axum::extract::ws::Utf8Bytes;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use rest_websockets_shared::time::now_millis;

/// Opaque message payload fanned out by the hub.
pub type Payload = Utf8Bytes;

/// Identity of one physical link, unique for its lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    /// Generate a fresh identity
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Why a payload could not be queued for a connection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EnqueueError {
    /// The outbound buffer is full (slow or stalled consumer)
    #[error("outbound buffer is full")]
    Full,

    /// The connection is closed or its write path is gone
    #[error("connection is closed")]
    Closed,
}

/// Outbound side of a connection as seen by the hub.
#[cfg_attr(test, mockall::automock)]
pub trait Outbound: Send + Sync {
    /// Identity of the connection
    fn id(&self) -> ConnectionId;

    /// Queue a payload without waiting.
    fn try_enqueue(&self, payload: Payload) -> Result<(), EnqueueError>;

    /// Mark the connection as released. Closed is terminal.
    fn close(&self);

    fn is_closed(&self) -> bool;
}

/// WebSocket connection registered in the hub.
///
/// Owns the sending half of the bounded outbound buffer. The write path of
/// the session holds the receiving half together with the [`released`]
/// token; once the hub closes this handle the write path discards whatever
/// is still buffered and shuts the socket down.
///
/// [`released`]: ConnectionHandle::released
#[derive(Debug)]
pub struct ConnectionHandle {
    id: ConnectionId,
    sender: mpsc::Sender<Payload>,
    /// Unix timestamp when connected (UTC, milliseconds)
    connected_at: i64,
    released: CancellationToken,
}

impl ConnectionHandle {
    /// Create a handle with a fresh identity around the given buffer
    pub fn new(sender: mpsc::Sender<Payload>) -> Self {
        Self {
            id: ConnectionId::generate(),
            sender,
            connected_at: now_millis(),
            released: CancellationToken::new(),
        }
    }

    /// Create a handle together with its outbound buffer of `capacity` slots.
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<Payload>) {
        let (tx, rx) = mpsc::channel(capacity);
        (Self::new(tx), rx)
    }

    pub fn connected_at(&self) -> i64 {
        self.connected_at
    }

    /// Token cancelled when the connection is closed, shared with the write path.
    pub fn released(&self) -> CancellationToken {
        self.released.clone()
    }
}

impl Outbound for ConnectionHandle {
    fn id(&self) -> ConnectionId {
        self.id
    }

    fn try_enqueue(&self, payload: Payload) -> Result<(), EnqueueError> {
        if self.is_closed() {
            return Err(EnqueueError::Closed);
        }
        match self.sender.try_send(payload) {
            Ok(()) => Ok(()),
            Err(mpsc::error::TrySendError::Full(_)) => Err(EnqueueError::Full),
            Err(mpsc::error::TrySendError::Closed(_)) => {
                self.close();
                Err(EnqueueError::Closed)
            }
        }
    }

    fn close(&self) {
        self.released.cancel();
    }

    fn is_closed(&self) -> bool {
        self.released.is_cancelled()
    }
}
