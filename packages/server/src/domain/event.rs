//! Events pushed to every connected client.

use serde::Serialize;

use super::DomainError;

/// Name of an event, e.g. `post_created`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct EventType(String);

impl EventType {
    pub const MAX_LEN: usize = 64;

    /// Build an event type; surrounding whitespace is trimmed.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidEventType` when the trimmed name is empty
    /// or longer than [`EventType::MAX_LEN`] characters.
    pub fn new(value: impl Into<String>) -> Result<Self, DomainError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(DomainError::InvalidEventType("must not be empty".to_string()));
        }
        if trimmed.chars().count() > Self::MAX_LEN {
            return Err(DomainError::InvalidEventType(format!(
                "must be at most {} characters",
                Self::MAX_LEN
            )));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for EventType {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Envelope written to the socket of every client.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Event {
    #[serde(rename = "type")]
    pub event_type: EventType,
    pub payload: serde_json::Value,
    /// Unix timestamp of publication (UTC, milliseconds)
    pub published_at: i64,
}

impl Event {
    pub fn new(event_type: EventType, payload: serde_json::Value, published_at: i64) -> Self {
        Self {
            event_type,
            payload,
            published_at,
        }
    }
}
