//! Domain layer: the events pushed to clients and the port used to push them.

pub mod broadcaster;
pub mod error;
pub mod event;

pub use broadcaster::Broadcaster;
pub use error::DomainError;
pub use event::{Event, EventType};
