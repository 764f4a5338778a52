//! The tool layer: the catalog of callable functions exposed to the LLM
//! and the dispatcher that executes them against a session.

pub mod catalog;
pub mod dispatcher;

pub use catalog::ToolCatalog;
pub use dispatcher::{DispatchOutcome, ToolDispatcher, TurnLedger};
