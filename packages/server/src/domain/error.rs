//! Domain errors.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// Event type is empty or too long
    #[error("invalid event type: {0}")]
    InvalidEventType(String),
}
