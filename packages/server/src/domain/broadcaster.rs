//! Port through which application code pushes messages to clients.

use async_trait::async_trait;

use crate::hub::{HubHandle, Payload};

/// Fan-out to every connected client.
///
/// Use cases depend on this trait rather than on the hub itself, so they can
/// be tested without sockets.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Broadcaster: Send + Sync {
    /// Queue `payload` for every connected client. Never fails.
    fn broadcast(&self, payload: Payload);

    /// Number of clients currently connected
    async fn connection_count(&self) -> usize;
}

#[async_trait]
impl Broadcaster for HubHandle {
    fn broadcast(&self, payload: Payload) {
        HubHandle::broadcast(self, payload);
    }

    async fn connection_count(&self) -> usize {
        HubHandle::connection_count(self).await
    }
}
