//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};

use crate::{
    ui::{
        dto::{
            ErrorResponse, HomeResponse, HubStatsResponse, PublishEventRequest,
            PublishEventResponse,
        },
        state::AppState,
    },
    usecase::PublishError,
};

/// Welcome endpoint
pub async fn home() -> Json<HomeResponse> {
    Json(HomeResponse {
        message: "Welcome to the rest-websockets API".to_string(),
        status: true,
    })
}

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Number of clients currently connected to the hub
pub async fn hub_stats(State(state): State<Arc<AppState>>) -> Json<HubStatsResponse> {
    Json(HubStatsResponse {
        connections: state.hub.connection_count().await,
    })
}

/// Push an event to every connected client
///
/// Bodies the JSON extractor refuses get the same `400 {"error": ...}`
/// shape as an invalid event type.
pub async fn publish_event(
    State(state): State<Arc<AppState>>,
    body: Result<Json<PublishEventRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<PublishEventResponse>), (StatusCode, Json<ErrorResponse>)> {
    let Json(request) = body.map_err(|rejection| {
        tracing::warn!("Rejected event body: {}", rejection.body_text());
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: rejection.body_text(),
            }),
        )
    })?;

    match state
        .publish_event_usecase
        .execute(request.event_type, request.payload)
        .await
    {
        Ok(receipt) => Ok((
            StatusCode::ACCEPTED,
            Json(PublishEventResponse {
                listeners: receipt.listeners,
            }),
        )),
        Err(e @ PublishError::InvalidEventType(_)) => {
            tracing::warn!("Rejected event: {}", e);
            Err((
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: e.to_string(),
                }),
            ))
        }
        Err(e @ PublishError::Serialization(_)) => {
            tracing::error!("Failed to publish event: {}", e);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: e.to_string(),
                }),
            ))
        }
    }
}
