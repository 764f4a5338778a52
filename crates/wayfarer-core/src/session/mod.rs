//! Conversation sessions and the registry that owns them.

mod registry;
#[allow(clippy::module_inception)]
mod session;

pub use registry::ConversationRegistry;
pub use session::Session;
