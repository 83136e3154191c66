//! Shared application state.

use std::sync::Arc;

use crate::{
    hub::{HubHandle, InboundHandler},
    usecase::PublishEventUseCase,
};

/// State handed to every handler
pub struct AppState {
    /// Handle to the connection hub
    pub hub: HubHandle,
    /// Capacity of the outbound buffer given to each new connection
    pub outbound_buffer: usize,
    /// Receiver of text frames sent by clients
    pub inbound: Arc<dyn InboundHandler>,
    /// PublishEventUseCase（イベント配信のユースケース）
    pub publish_event_usecase: Arc<PublishEventUseCase>,
}
