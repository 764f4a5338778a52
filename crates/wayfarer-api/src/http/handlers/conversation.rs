//! Conversation lifecycle and query handlers.
//!
//! `/query` has acceptance semantics: the turn runs on a background task
//! and the handler returns immediately with the accepted utterance. Results
//! arrive over the conversation's WebSocket channel, or can be polled via
//! `/message` once the turn finalizes.

use axum::Json;
use axum::extract::{Path, Query, State};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{debug, info};

use crate::http::error::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct QueryParams {
    pub user_query: String,
    pub conversation_id: String,
}

#[derive(Debug, Deserialize)]
pub struct MessageParams {
    pub conversation_id: String,
}

/// GET /create_conversation - Register a new conversation.
pub async fn create_conversation(State(state): State<AppState>) -> Json<Value> {
    let (id, _session) = state.registry.create_with_generated_id();
    info!(conversation_id = %id, "conversation created");
    Json(json!({ "conversation_id": id }))
}

/// GET /query - Accept a user utterance and start a turn in the background.
pub async fn query(
    State(state): State<AppState>,
    Query(params): Query<QueryParams>,
) -> Result<Json<Value>, AppError> {
    if params.user_query.trim().is_empty() {
        return Err(AppError::Validation("user_query must not be empty".into()));
    }

    let session = state.registry.get(&params.conversation_id)?;

    let orchestrator = state.orchestrator.clone();
    let user_query = params.user_query.clone();
    tokio::spawn(async move {
        // Failures already move the session to Failed and emit on_error;
        // nothing to do here beyond letting the task finish.
        let _ = orchestrator.handle_query(&session, &user_query).await;
    });

    Ok(Json(json!({ "query": params.user_query })))
}

/// GET /message - Return the latest message's fragments.
pub async fn latest_message(
    State(state): State<AppState>,
    Query(params): Query<MessageParams>,
) -> Result<Json<Value>, AppError> {
    let session = state.registry.get(&params.conversation_id)?;
    let fragments = match session.latest_message().await {
        Some(message) => serde_json::to_value(&message.fragments).unwrap_or_else(|_| json!([])),
        None => json!([]),
    };
    Ok(Json(json!({ "message": fragments })))
}

/// DELETE /conversation/{id} - Remove a conversation.
///
/// Deletion also cancels any in-flight turn; the orchestrator observes the
/// cancellation token and finalizes the session as failed.
pub async fn delete_conversation(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Json<Value> {
    state.registry.delete(&id);
    debug!(conversation_id = %id, "conversation deleted");
    Json(json!({ "deleted": id }))
}
