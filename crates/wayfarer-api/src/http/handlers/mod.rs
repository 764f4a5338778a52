//! HTTP and WebSocket request handlers.

pub mod conversation;
pub mod ws;
