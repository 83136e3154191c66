//! Request and response bodies of the HTTP API.

use serde::{Deserialize, Serialize};

/// Body of `GET /`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HomeResponse {
    pub message: String,
    pub status: bool,
}

/// Body of `GET /api/hub`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HubStatsResponse {
    pub connections: usize,
}

/// Body of `POST /api/events`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublishEventRequest {
    #[serde(rename = "type")]
    pub event_type: String,
    #[serde(default)]
    pub payload: serde_json::Value,
}

/// Successful response of `POST /api/events`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishEventResponse {
    pub listeners: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
