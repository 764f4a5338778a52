//! Infrastructure layer for Wayfarer.
//!
//! Contains implementations of the provider traits defined in
//! `wayfarer-core`: the OpenAI-compatible LLM client, the Amadeus travel
//! data client, and the configuration loader.

pub mod config;
pub mod llm;
pub mod travel;
