//! OpenAI-compatible chat-completions provider.
//!
//! Works against any endpoint speaking the OpenAI chat-completions wire
//! protocol with function calling (Together AI by default).

mod client;
mod types;

pub use client::OpenAiCompatProvider;
