//! Chat message, fragment, and session status types for Wayfarer.
//!
//! These types model one conversation between a user and the travel agent:
//! the chronological message log, the typed response fragments tools attach
//! to a message, and the session lifecycle status.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use std::fmt;
use std::str::FromStr;

use crate::travel::{FlightOffer, LodgingOption, PointOfInterest};

/// Role of a message in the conversation log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Agent,
}

impl fmt::Display for MessageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageRole::User => write!(f, "user"),
            MessageRole::Agent => write!(f, "agent"),
        }
    }
}

impl FromStr for MessageRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "user" => Ok(MessageRole::User),
            "agent" => Ok(MessageRole::Agent),
            other => Err(format!("invalid message role: '{other}'")),
        }
    }
}

/// A typed structured payload attached to a chat message for the client
/// to render.
///
/// Wire shape is `{"type": "...", "content": ...}` via the serde tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "content", rename_all = "snake_case")]
pub enum Fragment {
    /// Running natural-language summary text.
    Summary(String),
    /// Candidate flights from the travel provider.
    PossibleFlights(Vec<FlightOffer>),
    /// Candidate activities/points of interest at a destination.
    PossiblePlaces(Vec<PointOfInterest>),
    /// Candidate lodging suggestions.
    PossiblePlacesToStay(Vec<LodgingOption>),
}

impl Fragment {
    /// Wire name of this fragment kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Fragment::Summary(_) => "summary",
            Fragment::PossibleFlights(_) => "possible_flights",
            Fragment::PossiblePlaces(_) => "possible_places",
            Fragment::PossiblePlacesToStay(_) => "possible_places_to_stay",
        }
    }
}

/// A single message within a conversation.
///
/// Created empty by the orchestrator before invoking the LLM, appended to
/// by tool calls during that turn, and treated as immutable once the turn
/// completes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: MessageRole,
    pub content: String,
    /// Response fragments appended by tools during a single agent turn.
    pub fragments: Vec<Fragment>,
    pub created_at: DateTime<Utc>,
}

impl ChatMessage {
    /// Create a message with the given role and content, no fragments.
    pub fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            fragments: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// Render this message as one chat-history line: `[role]: content`.
    pub fn history_line(&self) -> String {
        format!("[{}]: {}", self.role, self.content)
    }
}

/// Lifecycle status of a conversation session.
///
/// `Idle` is the implicit initial state before the first query. Within one
/// turn the only valid transitions are `Loading -> Completed` and
/// `Loading -> Failed`; both are terminal for that turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Idle,
    Loading,
    Completed,
    Failed,
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionStatus::Idle => write!(f, "idle"),
            SessionStatus::Loading => write!(f, "loading"),
            SessionStatus::Completed => write!(f, "completed"),
            SessionStatus::Failed => write!(f, "failed"),
        }
    }
}

impl FromStr for SessionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "idle" => Ok(SessionStatus::Idle),
            "loading" => Ok(SessionStatus::Loading),
            "completed" => Ok(SessionStatus::Completed),
            "failed" => Ok(SessionStatus::Failed),
            other => Err(format!("invalid session status: '{other}'")),
        }
    }
}

impl Default for SessionStatus {
    fn default() -> Self {
        SessionStatus::Idle
    }
}
