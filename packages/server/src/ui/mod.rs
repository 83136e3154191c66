//! HTTP and WebSocket surface of the server.

pub mod dto;
mod handler;
mod server;
mod signal;
pub mod state;

pub use server::{Server, ServerError};
