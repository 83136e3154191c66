//! Server bootstrap.

use std::{future::Future, sync::Arc};

use axum::{
    Router,
    http::Method,
    routing::{get, post},
};
use rest_websockets_shared::time::SystemClock;
use thiserror::Error;
use tokio::net::TcpListener;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    config::{ConfigError, ServerConfig},
    hub::{Hub, HubHandle, InboundHandler, LogInbound},
    usecase::PublishEventUseCase,
};

use super::{
    handler::{health_check, home, hub_stats, publish_event, websocket_handler},
    signal::shutdown_signal,
    state::AppState,
};

/// Errors that stop the server
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("server I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// REST + WebSocket server
///
/// Owns the hub for the lifetime of the process. The hub loop is started
/// together with the HTTP listener.
///
/// # Example
///
/// ```ignore
/// let server = Server::new(config)?;
/// let hub = server.hub();
/// server.run().await?;
/// ```
pub struct Server {
    config: ServerConfig,
    hub: Hub,
    hub_handle: HubHandle,
    inbound: Arc<dyn InboundHandler>,
}

impl Server {
    /// Validate the configuration and create the hub.
    ///
    /// # Errors
    ///
    /// Returns `ServerError::Config` when a required setting is missing.
    pub fn new(config: ServerConfig) -> Result<Self, ServerError> {
        config.validate()?;
        let (hub, hub_handle) = Hub::new();

        Ok(Self {
            config,
            hub,
            hub_handle,
            inbound: Arc::new(LogInbound),
        })
    }

    /// Replace the handler receiving text frames from clients
    pub fn with_inbound_handler(mut self, inbound: Arc<dyn InboundHandler>) -> Self {
        self.inbound = inbound;
        self
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Handle for application code that needs to broadcast
    pub fn hub(&self) -> HubHandle {
        self.hub_handle.clone()
    }

    /// Bind to the configured address and serve until Ctrl+C / SIGTERM.
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to bind to the configured address
    /// or if there's an error during server execution.
    pub async fn run(self) -> Result<(), ServerError> {
        let bind_addr = self.config.bind_addr();
        let listener = TcpListener::bind(&bind_addr).await?;
        tracing::info!("Connect to: ws://{}/ws", bind_addr);
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        self.serve(listener, shutdown_signal()).await
    }

    /// Serve on an already bound listener until `shutdown` resolves.
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> Result<(), ServerError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let Self {
            config,
            hub,
            hub_handle,
            inbound,
        } = self;

        tokio::spawn(hub.run());

        let publish_event_usecase = Arc::new(PublishEventUseCase::new(
            Arc::new(hub_handle.clone()),
            Arc::new(SystemClock),
        ));
        let app_state = Arc::new(AppState {
            hub: hub_handle,
            outbound_buffer: config.outbound_buffer,
            inbound,
            publish_event_usecase,
        });

        let app = router(app_state);

        tracing::info!("Server listening on {}", listener.local_addr()?);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await?;

        tracing::info!("Server shutdown complete");

        Ok(())
    }
}

fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::HEAD])
        .allow_headers(Any);

    Router::new()
        // WebSocket エンドポイント
        .route("/ws", get(websocket_handler))
        // HTTP エンドポイント
        .route("/", get(home))
        .route("/api/health", get(health_check))
        .route("/api/hub", get(hub_stats))
        .route("/api/events", post(publish_event))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
