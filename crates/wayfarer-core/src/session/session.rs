//! Per-conversation state: message log, status, context, push channel.
//!
//! A [`Session`] is shared between HTTP handlers, the WebSocket task, and
//! the orchestrator via `Arc`, so all mutable state sits behind a
//! `tokio::sync::Mutex`. A separate `turn_gate` mutex serializes turns:
//! one in-flight turn per conversation, later queries wait for it.

use tokio::sync::{Mutex, MutexGuard, mpsc};
use tokio_util::sync::CancellationToken;

use wayfarer_types::chat::{ChatMessage, Fragment, MessageRole, SessionStatus};
use wayfarer_types::envelope::ConversationEnvelope;
use wayfarer_types::error::SessionError;

/// Mutable session state guarded by the state mutex.
#[derive(Debug)]
struct SessionState {
    messages: Vec<ChatMessage>,
    status: SessionStatus,
    /// Free-form string of key facts extracted so far (origin city, dates).
    /// Overwritten wholesale by the `update_context` tool, never merged.
    context: String,
    /// Attached push-notification sink, if a client is connected. The
    /// session never owns the receiving side; the sink disappearing is
    /// not an error.
    channel: Option<mpsc::UnboundedSender<ConversationEnvelope>>,
}

/// One ongoing conversation between a user and the assistant.
#[derive(Debug)]
pub struct Session {
    id: String,
    state: Mutex<SessionState>,
    /// Serializes turns: the orchestrator holds this for a whole turn.
    turn_gate: Mutex<()>,
    /// Cancelled when the conversation is deleted from the registry.
    cancel: CancellationToken,
}

impl Session {
    pub(crate) fn new(id: String) -> Self {
        Self {
            id,
            state: Mutex::new(SessionState {
                messages: Vec::new(),
                status: SessionStatus::Idle,
                context: String::new(),
                channel: None,
            }),
            turn_gate: Mutex::new(()),
            cancel: CancellationToken::new(),
        }
    }

    /// Opaque conversation identifier, assigned at creation, immutable.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Acquire the turn gate, waiting for any in-flight turn to finish.
    pub async fn begin_turn(&self) -> MutexGuard<'_, ()> {
        self.turn_gate.lock().await
    }

    /// Token cancelled when this conversation is deleted.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub(crate) fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Attach a push channel, replacing any existing one (last writer wins).
    pub async fn attach_channel(&self, tx: mpsc::UnboundedSender<ConversationEnvelope>) {
        self.state.lock().await.channel = Some(tx);
    }

    /// Deliver an envelope to the attached channel, if any.
    ///
    /// This is a push notification, not a guaranteed-delivery queue: the
    /// envelope is silently dropped when no channel is attached or the
    /// client has disconnected.
    pub async fn emit(&self, envelope: ConversationEnvelope) {
        let mut state = self.state.lock().await;
        if let Some(tx) = &state.channel {
            if tx.send(envelope).is_err() {
                tracing::debug!(conversation_id = %self.id, "push channel receiver gone, detaching");
                state.channel = None;
            }
        }
    }

    pub async fn append_user_message(&self, text: impl Into<String>) {
        let mut state = self.state.lock().await;
        state
            .messages
            .push(ChatMessage::new(MessageRole::User, text));
    }

    /// Append an empty agent message for the in-flight turn to compose into.
    pub async fn append_agent_placeholder(&self) {
        let mut state = self.state.lock().await;
        state.messages.push(ChatMessage::new(MessageRole::Agent, ""));
    }

    /// Append text to the latest message's content.
    pub async fn append_to_latest(&self, text: &str) -> Result<(), SessionError> {
        let mut state = self.state.lock().await;
        let message = state.messages.last_mut().ok_or(SessionError::NoMessages)?;
        message.content.push_str(text);
        Ok(())
    }

    /// Attach a fully-built fragment to the latest message.
    ///
    /// The fragment is constructed before the state lock is taken, so it is
    /// either fully attached or not at all.
    pub async fn attach_fragment(&self, fragment: Fragment) -> Result<(), SessionError> {
        let mut state = self.state.lock().await;
        let message = state.messages.last_mut().ok_or(SessionError::NoMessages)?;
        message.fragments.push(fragment);
        Ok(())
    }

    /// Clone of the most recent message, or `None` when the log is empty.
    pub async fn latest_message(&self) -> Option<ChatMessage> {
        self.state.lock().await.messages.last().cloned()
    }

    pub async fn message_count(&self) -> usize {
        self.state.lock().await.messages.len()
    }

    /// Render the chat history as `[role]: content` lines, excluding the
    /// most recent entry -- that is the message the in-flight turn is still
    /// composing, and prompts must not see it.
    pub async fn history(&self) -> String {
        let state = self.state.lock().await;
        let mut history = String::new();
        for message in state.messages.iter().rev().skip(1).rev() {
            history.push_str(&message.history_line());
            history.push('\n');
        }
        history
    }

    pub async fn status(&self) -> SessionStatus {
        self.state.lock().await.status
    }

    pub async fn set_status(&self, status: SessionStatus) {
        self.state.lock().await.status = status;
    }

    pub async fn context(&self) -> String {
        self.state.lock().await.context.clone()
    }

    /// Overwrite the session context wholesale.
    pub async fn set_context(&self, context: impl Into<String>) {
        self.state.lock().await.context = context.into();
    }
}
