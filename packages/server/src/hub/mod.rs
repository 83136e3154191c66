//! Connection hub: membership of live WebSocket clients and fan-out of
//! messages to all of them.
//!
//! - [`Hub`] runs the single coordination loop that owns the membership set.
//! - [`HubHandle`] is the cloneable handle everything else talks to.
//! - [`ConnectionHandle`] is the hub's view of one client: a bounded outbound
//!   buffer and a liveness flag.
//! - [`session`] runs the read and write paths of an upgraded socket.

mod command;
pub mod connection;
mod handle;
pub mod registry;
mod runner;
pub mod session;

pub use connection::{ConnectionHandle, ConnectionId, EnqueueError, Outbound, Payload};
pub use handle::HubHandle;
pub use registry::{BroadcastReport, Registry};
pub use runner::Hub;
pub use session::{InboundHandler, LogInbound};
