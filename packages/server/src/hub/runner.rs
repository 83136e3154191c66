//! The hub's coordination loop.

use tokio::sync::mpsc;

use super::{command::HubCommand, handle::HubHandle, registry::Registry};

/// Owner of the membership set.
///
/// All registrations, unregistrations and broadcasts are consumed here one at
/// a time, so the registry is never observed half-updated and a broadcast
/// never races with a membership change.
pub struct Hub {
    intake: mpsc::UnboundedReceiver<HubCommand>,
    registry: Registry,
}

impl Hub {
    /// Create the hub and the handle used to talk to it.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let (hub, handle) = Hub::new();
    /// tokio::spawn(hub.run());
    /// handle.broadcast("{\"type\":\"post_created\"}");
    /// ```
    pub fn new() -> (Self, HubHandle) {
        let (tx, rx) = mpsc::unbounded_channel();
        let hub = Self {
            intake: rx,
            registry: Registry::new(),
        };
        (hub, HubHandle::new(tx))
    }

    /// Run the coordination loop.
    ///
    /// Returns once every [`HubHandle`] has been dropped. The registry is
    /// dropped with it, which releases every outbound buffer.
    pub async fn run(mut self) {
        tracing::info!("Hub started");

        while let Some(command) = self.intake.recv().await {
            self.handle(command);
        }

        tracing::info!(
            connections = self.registry.len(),
            "Hub stopped, releasing remaining connections"
        );
    }

    fn handle(&mut self, command: HubCommand) {
        match command {
            HubCommand::Register(conn) => {
                let id = conn.id();
                if self.registry.register(conn) {
                    tracing::info!(conn_id = %id, total = self.registry.len(), "Connection registered");
                } else {
                    tracing::warn!(conn_id = %id, "Rejected registration of duplicate or closed connection");
                }
            }
            HubCommand::Unregister(id) => {
                if self.registry.unregister(&id) {
                    tracing::info!(conn_id = %id, total = self.registry.len(), "Connection unregistered");
                } else {
                    tracing::debug!(conn_id = %id, "Unregister for unknown connection ignored");
                }
            }
            HubCommand::Broadcast(payload) => {
                let report = self.registry.broadcast(&payload);
                for (id, reason) in &report.evicted {
                    tracing::warn!(conn_id = %id, %reason, "Dropped connection during broadcast");
                }
                tracing::debug!(
                    delivered = report.delivered,
                    evicted = report.evicted.len(),
                    "Broadcast fanned out"
                );
            }
            HubCommand::Members(reply) => {
                // The asker may have given up; nothing to do then.
                let _ = reply.send(self.registry.ids());
            }
        }
    }
}
