//! REST API server with a WebSocket hub that pushes events to every
//! connected client.
//!
//! The interesting part is [`hub`]: a single coordination loop owning the
//! set of live connections, fed by any number of sessions and handlers.

// layers
pub mod domain;
pub mod hub;
pub mod ui;
pub mod usecase;

pub mod config;
