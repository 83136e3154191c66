//! Utilities shared by the rest-websockets packages.

pub mod logger;
pub mod time;
