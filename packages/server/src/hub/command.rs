//! Requests accepted by the hub's coordination loop.

use std::fmt;

use tokio::sync::oneshot;

use super::connection::{ConnectionId, Outbound, Payload};

/// Everything that touches membership goes through one of these.
pub enum HubCommand {
    Register(Box<dyn Outbound>),
    Unregister(ConnectionId),
    Broadcast(Payload),
    /// Snapshot of the current membership
    Members(oneshot::Sender<Vec<ConnectionId>>),
}

impl fmt::Debug for HubCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HubCommand::Register(conn) => f.debug_tuple("Register").field(&conn.id()).finish(),
            HubCommand::Unregister(id) => f.debug_tuple("Unregister").field(id).finish(),
            HubCommand::Broadcast(payload) => f
                .debug_tuple("Broadcast")
                .field(&payload.as_str().len())
                .finish(),
            HubCommand::Members(_) => f.write_str("Members"),
        }
    }
}
