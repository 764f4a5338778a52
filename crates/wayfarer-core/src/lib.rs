//! Business logic for the Wayfarer travel assistant backend.
//!
//! This crate defines the "ports" (provider traits) that the infrastructure
//! layer implements, plus the conversation registry, the tool layer, and the
//! agent orchestrator. It depends only on `wayfarer-types` -- never on
//! `wayfarer-infra` or any HTTP/IO crate.

pub mod agent;
pub mod llm;
pub mod session;
pub mod tool;
pub mod travel;
