//! Application use cases.

mod error;
mod publish_event;

pub use error::PublishError;
pub use publish_event::{PublishEventUseCase, PublishReceipt};
