//! Agent orchestrator for Wayfarer.
//!
//! `AgentOrchestrator` drives one conversational turn end to end: it marks
//! the session loading, runs the tool-less summarizer pass, runs the
//! bounded tool-dispatch loop, and finalizes the session as completed or
//! failed. A turn can never leave the session stuck in `Loading`: LLM
//! failures, the turn deadline, and registry deletion all transition it to
//! `Failed` and emit an error envelope.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use wayfarer_types::chat::SessionStatus;
use wayfarer_types::config::LlmConfig;
use wayfarer_types::envelope::ConversationEnvelope;
use wayfarer_types::llm::{LlmError, LlmMessage, StopReason};

use crate::llm::LlmProvider;
use crate::session::Session;
use crate::tool::{ToolDispatcher, TurnLedger};
use crate::travel::TravelProvider;

use super::prompt;

/// Why a turn failed.
#[derive(Debug, thiserror::Error)]
pub enum TurnError {
    #[error(transparent)]
    Llm(#[from] LlmError),

    #[error("turn exceeded the {0}s deadline")]
    TimedOut(u64),

    #[error("the conversation was deleted while the turn was in flight")]
    Cancelled,
}

/// Drives one conversational turn from raw utterance to finalized message.
pub struct AgentOrchestrator<P: LlmProvider, T: TravelProvider> {
    llm: Arc<P>,
    dispatcher: ToolDispatcher<T>,
    config: LlmConfig,
}

impl<P: LlmProvider, T: TravelProvider> AgentOrchestrator<P, T> {
    pub fn new(llm: Arc<P>, travel: Arc<T>, config: LlmConfig) -> Self {
        Self {
            llm,
            dispatcher: ToolDispatcher::new(travel),
            config,
        }
    }

    /// Handle one user query against a session.
    ///
    /// Turns on the same session are strictly sequential: this waits on the
    /// session's turn gate, so a second query queues behind the first.
    pub async fn handle_query(&self, session: &Session, user_query: &str) -> Result<(), TurnError> {
        let _turn = session.begin_turn().await;
        let cancel = session.cancellation_token();

        if cancel.is_cancelled() {
            let err = TurnError::Cancelled;
            session.set_status(SessionStatus::Failed).await;
            session
                .emit(ConversationEnvelope::error(err.to_string()))
                .await;
            return Err(err);
        }

        session.set_status(SessionStatus::Loading).await;
        session
            .emit(ConversationEnvelope::loading("Server is processing the data"))
            .await;
        session.append_user_message(user_query).await;
        session.append_agent_placeholder().await;

        info!(conversation_id = %session.id(), provider = self.llm.name(), "turn started");

        let deadline = Duration::from_secs(self.config.turn_timeout_secs);
        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(TurnError::Cancelled),
            run = tokio::time::timeout(deadline, self.run_turn(session, user_query)) => {
                match run {
                    Ok(inner) => inner,
                    Err(_) => Err(TurnError::TimedOut(self.config.turn_timeout_secs)),
                }
            }
        };

        match result {
            Ok(()) => {
                session.set_status(SessionStatus::Completed).await;
                if let Some(latest) = session.latest_message().await {
                    session.emit(ConversationEnvelope::response(&latest)).await;
                }
                info!(conversation_id = %session.id(), "turn completed");
                Ok(())
            }
            Err(err) => {
                warn!(conversation_id = %session.id(), error = %err, "turn failed");
                session.set_status(SessionStatus::Failed).await;
                session
                    .emit(ConversationEnvelope::error(err.to_string()))
                    .await;
                Err(err)
            }
        }
    }

    /// The SUMMARIZING and TOOL_DISPATCH phases of a turn.
    async fn run_turn(&self, session: &Session, user_query: &str) -> Result<(), TurnError> {
        // Summarizer pass: no tools, slot elicitation over the history.
        // history() already includes the user's new utterance and excludes
        // the agent placeholder appended above.
        let history = session.history().await;
        let context = session.context().await;
        let summary_request = prompt::build_summary_request(&self.config, &history, &context);
        let summary = self.llm.complete(&summary_request).await?.content;
        debug!(
            conversation_id = %session.id(),
            slots_filled = prompt::summary_is_done(&summary),
            "summarizer pass finished"
        );

        // Tool-dispatch loop, bounded by max_tool_rounds.
        let mut messages = prompt::dispatch_messages(&summary, &context, user_query);
        let mut ledger = TurnLedger::new();
        let mut final_text = summary.replace(prompt::DONE_MARKER, "").trim().to_string();

        for round in 0..self.config.max_tool_rounds {
            let request = prompt::build_dispatch_request(&self.config, messages.clone());
            let response = self.llm.complete(&request).await?;

            if response.stop_reason == StopReason::MaxTokens {
                warn!(conversation_id = %session.id(), "completion truncated at max_tokens");
            }

            if response.tool_calls.is_empty() {
                if !response.content.trim().is_empty() {
                    final_text = response.content.trim().to_string();
                }
                break;
            }

            debug!(
                conversation_id = %session.id(),
                round,
                calls = response.tool_calls.len(),
                "dispatching tool round"
            );
            messages.push(LlmMessage::assistant_with_tools(
                response.content.clone(),
                response.tool_calls.clone(),
            ));

            let mut ended = false;
            for call in &response.tool_calls {
                let outcome = self.dispatcher.dispatch(call, session, &mut ledger).await;
                messages.push(LlmMessage::tool(call.id.clone(), outcome.reply));
                ended |= outcome.ended;
            }
            if ended {
                break;
            }
        }

        // Make sure the finalized message carries text even when no tool
        // wrote any (e.g. the end_conversation path).
        let content_is_empty = session
            .latest_message()
            .await
            .map(|m| m.content.is_empty())
            .unwrap_or(true);
        if content_is_empty && !final_text.is_empty() {
            let _ = session.append_to_latest(&final_text).await;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::VecDeque;
    use std::sync::Mutex;

    use serde_json::json;

    use wayfarer_types::llm::{CompletionRequest, CompletionResponse, StopReason, ToolCall};
    use wayfarer_types::error::TravelError;
    use wayfarer_types::travel::{FlightOffer, FlightQuery, PointOfInterest};

    use crate::session::ConversationRegistry;
    use crate::tool::catalog;

    /// LLM double that replays a fixed script of responses.
    struct ScriptedLlm {
        script: Mutex<VecDeque<Result<CompletionResponse, LlmError>>>,
    }

    impl ScriptedLlm {
        fn new(script: Vec<Result<CompletionResponse, LlmError>>) -> Arc<Self> {
            Arc::new(Self {
                script: Mutex::new(script.into()),
            })
        }
    }

    impl LlmProvider for ScriptedLlm {
        fn name(&self) -> &str {
            "scripted"
        }

        async fn complete(
            &self,
            _request: &CompletionRequest,
        ) -> Result<CompletionResponse, LlmError> {
            self.script
                .lock()
                .unwrap()
                .pop_front()
                .expect("LLM script exhausted")
        }
    }

    /// LLM double that never responds, for deadline tests.
    struct StalledLlm;

    impl LlmProvider for StalledLlm {
        fn name(&self) -> &str {
            "stalled"
        }

        async fn complete(
            &self,
            _request: &CompletionRequest,
        ) -> Result<CompletionResponse, LlmError> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            unreachable!("stalled provider never completes")
        }
    }

    struct FakeTravel;

    impl TravelProvider for FakeTravel {
        async fn search_flights(
            &self,
            query: &FlightQuery,
        ) -> Result<Vec<FlightOffer>, TravelError> {
            Ok(vec![FlightOffer {
                airline: "AF".to_string(),
                aircraft: "77W".to_string(),
                departure_time: format!("{}T10:15:00", query.departure_date),
                arrival_time: "2025-03-02T07:40:00".to_string(),
                price: "842.50 USD".to_string(),
            }])
        }

        async fn search_activities(
            &self,
            _latitude: f64,
            _longitude: f64,
        ) -> Result<Vec<PointOfInterest>, TravelError> {
            Ok(vec![])
        }
    }

    fn text(content: &str) -> Result<CompletionResponse, LlmError> {
        Ok(CompletionResponse {
            content: content.to_string(),
            tool_calls: vec![],
            stop_reason: StopReason::EndTurn,
        })
    }

    fn tool_round(calls: Vec<ToolCall>) -> Result<CompletionResponse, LlmError> {
        Ok(CompletionResponse {
            content: String::new(),
            tool_calls: calls,
            stop_reason: StopReason::ToolUse,
        })
    }

    fn flight_call(id: &str) -> ToolCall {
        ToolCall {
            id: id.to_string(),
            name: catalog::SEARCH_FLIGHTS.to_string(),
            arguments: json!({
                "origin_code": "CDG",
                "destination_code": "HND",
                "departure_date": "2025-03-01",
                "adults": 2
            }),
        }
    }

    fn orchestrator(
        llm: Arc<ScriptedLlm>,
    ) -> AgentOrchestrator<ScriptedLlm, FakeTravel> {
        AgentOrchestrator::new(llm, Arc::new(FakeTravel), LlmConfig::default())
    }

    #[tokio::test]
    async fn test_flight_booking_turn_end_to_end() {
        let llm = ScriptedLlm::new(vec![
            text("Booking flights: Paris to Tokyo, 2025-03-01, 2 adults. <DONE>"),
            tool_round(vec![flight_call("call_1")]),
            text("I found some flights for you!"),
        ]);
        let registry = ConversationRegistry::new();
        let session = registry.create("conv-1").unwrap();
        let orchestrator = orchestrator(llm);

        orchestrator
            .handle_query(&session, "I want to fly from Paris to Tokyo on 2025-03-01 for 2 adults")
            .await
            .unwrap();

        assert_eq!(session.status().await, SessionStatus::Completed);
        let latest = session.latest_message().await.unwrap();
        assert_eq!(latest.content, "I found some flights for you!");
        assert_eq!(latest.fragments.len(), 1);
        assert_eq!(latest.fragments[0].kind(), "possible_flights");
        match &latest.fragments[0] {
            wayfarer_types::chat::Fragment::PossibleFlights(offers) => {
                assert!(!offers.is_empty() && offers.len() <= 3);
                assert_eq!(offers[0].airline, "AF");
                assert!(!offers[0].price.is_empty());
                assert!(!offers[0].departure_time.is_empty());
            }
            other => panic!("unexpected fragment: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_non_travel_query_ends_without_fragments() {
        let llm = ScriptedLlm::new(vec![
            text("I can only help with travel bookings, not the weather."),
            tool_round(vec![ToolCall {
                id: "call_1".to_string(),
                name: catalog::END_CONVERSATION.to_string(),
                arguments: json!({}),
            }]),
        ]);
        let registry = ConversationRegistry::new();
        let session = registry.create("conv-1").unwrap();
        let orchestrator = orchestrator(llm);

        orchestrator
            .handle_query(&session, "What's the weather?")
            .await
            .unwrap();

        assert_eq!(session.status().await, SessionStatus::Completed);
        let latest = session.latest_message().await.unwrap();
        assert!(latest.fragments.is_empty());
        assert_eq!(
            latest.content,
            "I can only help with travel bookings, not the weather."
        );
    }

    #[tokio::test]
    async fn test_repeated_tool_call_fires_once() {
        let llm = ScriptedLlm::new(vec![
            text("Booking flights. <DONE>"),
            tool_round(vec![flight_call("call_1"), flight_call("call_2")]),
            text("Done."),
        ]);
        let registry = ConversationRegistry::new();
        let session = registry.create("conv-1").unwrap();
        let orchestrator = orchestrator(llm);

        orchestrator.handle_query(&session, "flights please").await.unwrap();

        // The second identical invocation was rejected by the turn ledger.
        let latest = session.latest_message().await.unwrap();
        assert_eq!(latest.fragments.len(), 1);
    }

    #[tokio::test]
    async fn test_llm_failure_never_leaves_loading() {
        let llm = ScriptedLlm::new(vec![Err(LlmError::Provider {
            message: "upstream 503".to_string(),
        })]);
        let registry = ConversationRegistry::new();
        let session = registry.create("conv-1").unwrap();

        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        session.attach_channel(tx).await;

        let orchestrator = orchestrator(llm);
        let err = orchestrator
            .handle_query(&session, "flights please")
            .await
            .unwrap_err();
        assert!(matches!(err, TurnError::Llm(_)));
        assert_eq!(session.status().await, SessionStatus::Failed);

        // on_loading, then on_error.
        let first = rx.recv().await.unwrap();
        assert_eq!(first.kind, wayfarer_types::envelope::EnvelopeKind::OnLoading);
        let second = rx.recv().await.unwrap();
        assert_eq!(second.kind, wayfarer_types::envelope::EnvelopeKind::OnError);
    }

    #[tokio::test]
    async fn test_turn_deadline_fails_the_session() {
        let mut config = LlmConfig::default();
        config.turn_timeout_secs = 0;
        let orchestrator =
            AgentOrchestrator::new(Arc::new(StalledLlm), Arc::new(FakeTravel), config);
        let registry = ConversationRegistry::new();
        let session = registry.create("conv-1").unwrap();

        let err = orchestrator
            .handle_query(&session, "flights please")
            .await
            .unwrap_err();
        assert!(matches!(err, TurnError::TimedOut(0)));
        assert_eq!(session.status().await, SessionStatus::Failed);
    }

    #[tokio::test]
    async fn test_deleted_conversation_cancels_turn() {
        let llm = ScriptedLlm::new(vec![]);
        let registry = ConversationRegistry::new();
        let session = registry.create("conv-1").unwrap();
        registry.delete("conv-1");

        let orchestrator = orchestrator(llm);
        let err = orchestrator
            .handle_query(&session, "flights please")
            .await
            .unwrap_err();
        assert!(matches!(err, TurnError::Cancelled));
        assert_eq!(session.status().await, SessionStatus::Failed);
    }

    #[tokio::test]
    async fn test_tool_rounds_are_bounded() {
        let mut config = LlmConfig::default();
        config.max_tool_rounds = 1;
        // One summary + exactly one dispatch round; the loop must stop on
        // its own even though the model keeps asking for tools.
        let llm = ScriptedLlm::new(vec![
            text("Booking flights. <DONE>"),
            tool_round(vec![ToolCall {
                id: "call_1".to_string(),
                name: catalog::CURRENT_DATE.to_string(),
                arguments: json!({}),
            }]),
        ]);
        let orchestrator = AgentOrchestrator::new(llm, Arc::new(FakeTravel), config);
        let registry = ConversationRegistry::new();
        let session = registry.create("conv-1").unwrap();

        orchestrator.handle_query(&session, "flights please").await.unwrap();
        assert_eq!(session.status().await, SessionStatus::Completed);
        // Falls back to the summary text, stripped of the terminal marker.
        assert_eq!(
            session.latest_message().await.unwrap().content,
            "Booking flights."
        );
    }

    #[tokio::test]
    async fn test_turns_on_one_session_are_serialized() {
        let llm = ScriptedLlm::new(vec![
            // Turn 1
            text("Summary one. <DONE>"),
            text("Answer one."),
            // Turn 2
            text("Summary two. <DONE>"),
            text("Answer two."),
        ]);
        let registry = ConversationRegistry::new();
        let session = registry.create("conv-1").unwrap();
        let orchestrator = orchestrator(llm);

        orchestrator.handle_query(&session, "first").await.unwrap();
        orchestrator.handle_query(&session, "second").await.unwrap();

        assert_eq!(session.message_count().await, 4);
        let latest = session.latest_message().await.unwrap();
        assert_eq!(latest.content, "Answer two.");
        // The second turn's history saw the completed first turn.
        let history = session.history().await;
        assert!(history.contains("[agent]: Answer one."));
    }
}
