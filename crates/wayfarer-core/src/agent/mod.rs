//! The agent orchestrator: drives one conversational turn from raw
//! utterance to finalized message.

pub mod orchestrator;
pub mod prompt;

pub use orchestrator::{AgentOrchestrator, TurnError};
