use thiserror::Error;

/// Errors from session registry and session log operations.
///
/// These are the system's own internal errors, surfaced as structured
/// HTTP responses. Tool-layer failures never use this type -- tools speak
/// to the LLM in natural-language strings.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("no such conversation exists")]
    NotFound,

    #[error("conversation '{0}' already exists")]
    DuplicateId(String),

    #[error("the conversation has no messages yet")]
    NoMessages,
}

/// Errors from travel data provider operations.
#[derive(Debug, Error)]
pub enum TravelError {
    #[error("provider authentication failed: {0}")]
    Auth(String),

    #[error("provider returned {status}: {message}")]
    Provider { status: u16, message: String },

    #[error("failed to decode provider response: {0}")]
    Decode(String),

    #[error("http error: {0}")]
    Http(String),
}
