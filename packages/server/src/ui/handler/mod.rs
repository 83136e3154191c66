//! Route handlers.

mod http;
mod websocket;

pub use http::{health_check, home, hub_stats, publish_event};
pub use websocket::websocket_handler;
