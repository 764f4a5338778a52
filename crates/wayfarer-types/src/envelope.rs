//! Push-channel envelope types.
//!
//! Every event delivered over a conversation's WebSocket is one of a small
//! set of envelope kinds, serialized as `{"type": ..., "response": ...}`.
//! This is the push-notification wire format only; the request/response
//! API does not use it.

use serde::{Deserialize, Serialize};

use crate::chat::ChatMessage;

/// Kind of push-channel event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnvelopeKind {
    OnConnected,
    OnLoading,
    OnResponse,
    OnError,
}

/// One event sent to a conversation's attached push channel.
///
/// The payload is either a plain status string or the serialized latest
/// message, depending on the kind.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationEnvelope {
    #[serde(rename = "type")]
    pub kind: EnvelopeKind,
    pub response: serde_json::Value,
}

impl ConversationEnvelope {
    /// Envelope sent when a client attaches to the conversation channel.
    pub fn connected() -> Self {
        Self {
            kind: EnvelopeKind::OnConnected,
            response: serde_json::Value::String("Connected to the server".to_string()),
        }
    }

    /// Envelope sent when the server starts processing a query.
    pub fn loading(text: impl Into<String>) -> Self {
        Self {
            kind: EnvelopeKind::OnLoading,
            response: serde_json::Value::String(text.into()),
        }
    }

    /// Envelope carrying the completed message for the finished turn.
    pub fn response(message: &ChatMessage) -> Self {
        Self {
            kind: EnvelopeKind::OnResponse,
            response: serde_json::to_value(message).unwrap_or(serde_json::Value::Null),
        }
    }

    /// Envelope sent when a turn fails or is cancelled.
    pub fn error(text: impl Into<String>) -> Self {
        Self {
            kind: EnvelopeKind::OnError,
            response: serde_json::Value::String(text.into()),
        }
    }
}
