//! Shared domain types for Wayfarer.
//!
//! This crate contains the core domain types used across the Wayfarer
//! backend: chat messages and fragments, session status, push-channel
//! envelopes, LLM request/response shapes, travel records, and their
//! associated error types.
//!
//! Zero infrastructure dependencies -- only serde, chrono, thiserror, and
//! secrecy for the key-holding config types.

pub mod chat;
pub mod config;
pub mod envelope;
pub mod error;
pub mod llm;
pub mod travel;
