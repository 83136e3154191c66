//! Cloneable front door to the hub.

use tokio::sync::{mpsc, oneshot};

use super::{
    command::HubCommand,
    connection::{ConnectionId, Outbound, Payload},
};

/// Handle passed to HTTP handlers, sessions and use cases.
///
/// Every operation only queues a request for the coordination loop, so none
/// of them block and none of them fail from the caller's point of view.
#[derive(Debug, Clone)]
pub struct HubHandle {
    intake: mpsc::UnboundedSender<HubCommand>,
}

impl HubHandle {
    pub(super) fn new(intake: mpsc::UnboundedSender<HubCommand>) -> Self {
        Self { intake }
    }

    /// Add a connection to the membership set
    pub fn register(&self, conn: impl Outbound + 'static) {
        self.submit(HubCommand::Register(Box::new(conn)));
    }

    /// Remove a connection; unknown ids are ignored
    pub fn unregister(&self, id: ConnectionId) {
        self.submit(HubCommand::Unregister(id));
    }

    /// Deliver a payload to every connection registered when the loop handles it
    pub fn broadcast(&self, payload: impl Into<Payload>) {
        self.submit(HubCommand::Broadcast(payload.into()));
    }

    /// Ids currently registered. Empty if the hub has stopped.
    pub async fn members(&self) -> Vec<ConnectionId> {
        let (tx, rx) = oneshot::channel();
        self.submit(HubCommand::Members(tx));
        rx.await.unwrap_or_default()
    }

    pub async fn connection_count(&self) -> usize {
        self.members().await.len()
    }

    fn submit(&self, command: HubCommand) {
        if let Err(mpsc::error::SendError(command)) = self.intake.send(command) {
            tracing::debug!(?command, "Hub is not running, request dropped");
        }
    }
}
