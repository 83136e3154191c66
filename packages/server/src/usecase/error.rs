//! Use case errors.

use thiserror::Error;

use crate::domain::DomainError;

/// Errors from publishing an event
#[derive(Debug, Error)]
pub enum PublishError {
    #[error(transparent)]
    InvalidEventType(#[from] DomainError),

    #[error("failed to encode event: {0}")]
    Serialization(#[from] serde_json::Error),
}
