//! Tool dispatch for a single agent turn.
//!
//! Every tool invocation, success or failure, produces a natural-language
//! reply string for the LLM -- the agent reads tool output as conversational
//! text, not as a typed error channel. Nothing in this module raises an
//! error back through the agent loop.
//!
//! The [`TurnLedger`] enforces the "never execute a tool more than once per
//! turn" rule programmatically: repeats are rejected at this boundary before
//! any side effect, instead of trusting the prompt instruction.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, warn};

use wayfarer_types::chat::Fragment;
use wayfarer_types::llm::ToolCall;
use wayfarer_types::travel::{FlightQuery, LodgingOption};

use crate::session::Session;
use crate::tool::catalog;
use crate::travel::TravelProvider;

/// Result of dispatching one tool call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchOutcome {
    /// Text handed back to the LLM as the tool's output.
    pub reply: String,
    /// Set when the tool signalled the end of the turn.
    pub ended: bool,
}

impl DispatchOutcome {
    fn reply(text: impl Into<String>) -> Self {
        Self {
            reply: text.into(),
            ended: false,
        }
    }
}

/// Per-turn record of which tools have already fired.
#[derive(Debug, Default)]
pub struct TurnLedger {
    invoked: HashSet<String>,
}

impl TurnLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an invocation. Returns false when the tool already fired
    /// this turn.
    fn register(&mut self, name: &str) -> bool {
        self.invoked.insert(name.to_string())
    }
}

/// Executes tool calls against a session and the travel provider.
pub struct ToolDispatcher<T: TravelProvider> {
    travel: Arc<T>,
}

impl<T: TravelProvider> ToolDispatcher<T> {
    pub fn new(travel: Arc<T>) -> Self {
        Self { travel }
    }

    /// Execute one tool call for the in-flight turn.
    ///
    /// Side-effecting tools mutate the session's latest message; a fragment
    /// is attached only after the tool fully succeeded, so a failed call
    /// leaves no partial effect behind.
    pub async fn dispatch(
        &self,
        call: &ToolCall,
        session: &Session,
        ledger: &mut TurnLedger,
    ) -> DispatchOutcome {
        debug!(conversation_id = %session.id(), tool = %call.name, "dispatching tool call");

        if !ledger.register(&call.name) {
            warn!(conversation_id = %session.id(), tool = %call.name, "repeated tool call rejected");
            return DispatchOutcome::reply(format!(
                "The tool '{}' has already been executed for this request. \
                 Do not call it again; use its earlier output.",
                call.name
            ));
        }

        let args = &call.arguments;
        match call.name.as_str() {
            catalog::CURRENT_DATE => {
                DispatchOutcome::reply(Utc::now().format("%Y-%m-%d").to_string())
            }

            catalog::UPDATE_CONTEXT => match require_str(args, "context") {
                Ok(context) => {
                    session.set_context(context).await;
                    DispatchOutcome::reply(
                        "The context has been updated. You can move on to the other \
                         parts of the request using it.",
                    )
                }
                Err(reply) => DispatchOutcome::reply(reply),
            },

            catalog::APPEND_SUMMARY => match require_str(args, "text") {
                Ok(text) => {
                    if session.append_to_latest(&text).await.is_err() {
                        return DispatchOutcome::reply(
                            "There are no messages in this conversation yet, so there \
                             is nothing to summarize onto.",
                        );
                    }
                    // append_to_latest succeeded, so a latest message exists.
                    let _ = session.attach_fragment(Fragment::Summary(text)).await;
                    DispatchOutcome::reply(
                        "The summary has been added to the latest message.",
                    )
                }
                Err(reply) => DispatchOutcome::reply(reply),
            },

            catalog::SEARCH_FLIGHTS => self.search_flights(args, session).await,

            catalog::SEARCH_POINTS_OF_INTEREST => {
                self.search_points_of_interest(args, session).await
            }

            catalog::SUGGEST_PLACES_TO_STAY => {
                let places: Vec<LodgingOption> = args
                    .get("places")
                    .and_then(|v| v.as_array())
                    .map(|arr| {
                        arr.iter()
                            .filter_map(|v| v.as_str())
                            .map(|name| LodgingOption {
                                name: name.to_string(),
                            })
                            .collect()
                    })
                    .unwrap_or_default();
                if places.is_empty() {
                    return DispatchOutcome::reply(
                        "No place names were provided. Pass a non-empty list of \
                         suggested places to stay.",
                    );
                }
                match session
                    .attach_fragment(Fragment::PossiblePlacesToStay(places))
                    .await
                {
                    Ok(()) => DispatchOutcome::reply(
                        "The suggested places to stay have been added to the latest message.",
                    ),
                    Err(_) => DispatchOutcome::reply(
                        "There are no messages in this conversation yet.",
                    ),
                }
            }

            catalog::END_CONVERSATION => DispatchOutcome {
                reply: "Understood, wrapping up this request.".to_string(),
                ended: true,
            },

            other => DispatchOutcome::reply(format!(
                "There is no tool named '{other}'. Choose one of the tools you were given."
            )),
        }
    }

    async fn search_flights(
        &self,
        args: &serde_json::Value,
        session: &Session,
    ) -> DispatchOutcome {
        let origin = match require_str(args, "origin_code") {
            Ok(v) => v,
            Err(reply) => return DispatchOutcome::reply(reply),
        };
        let destination = match require_str(args, "destination_code") {
            Ok(v) => v,
            Err(reply) => return DispatchOutcome::reply(reply),
        };
        let departure_date = match require_str(args, "departure_date") {
            Ok(v) => v,
            Err(reply) => return DispatchOutcome::reply(reply),
        };
        let adults = args.get("adults").and_then(|v| v.as_u64()).unwrap_or(1);
        if adults == 0 {
            return DispatchOutcome::reply(
                "The number of adult travelers must be at least 1. Ask the user how \
                 many adults are traveling.",
            );
        }

        let query = FlightQuery {
            origin,
            destination,
            departure_date,
            adults: adults as u32,
        };

        match self.travel.search_flights(&query).await {
            Ok(offers) if offers.is_empty() => DispatchOutcome::reply(
                "No flights were found for that route and date. Ask the user whether \
                 another date or nearby airport would work.",
            ),
            Ok(offers) => {
                match session
                    .attach_fragment(Fragment::PossibleFlights(offers))
                    .await
                {
                    Ok(()) => DispatchOutcome::reply(
                        "The possible flights have been added to the latest message.",
                    ),
                    Err(_) => DispatchOutcome::reply(
                        "There are no messages in this conversation yet.",
                    ),
                }
            }
            Err(err) => {
                warn!(conversation_id = %session.id(), error = %err, "flight search failed");
                DispatchOutcome::reply(format!(
                    "The flight search failed ({err}). Check the airport codes and the \
                     date format, or tell the user the search is unavailable right now."
                ))
            }
        }
    }

    async fn search_points_of_interest(
        &self,
        args: &serde_json::Value,
        session: &Session,
    ) -> DispatchOutcome {
        let latitude = match require_f64(args, "latitude") {
            Ok(v) => v,
            Err(reply) => return DispatchOutcome::reply(reply),
        };
        let longitude = match require_f64(args, "longitude") {
            Ok(v) => v,
            Err(reply) => return DispatchOutcome::reply(reply),
        };

        match self.travel.search_activities(latitude, longitude).await {
            Ok(places) if places.is_empty() => DispatchOutcome::reply(
                "No activities were found around that coordinate.",
            ),
            Ok(places) => {
                match session
                    .attach_fragment(Fragment::PossiblePlaces(places))
                    .await
                {
                    Ok(()) => DispatchOutcome::reply(
                        "Possible activities around that place have been added to the \
                         latest message.",
                    ),
                    Err(_) => DispatchOutcome::reply(
                        "There are no messages in this conversation yet.",
                    ),
                }
            }
            Err(err) => {
                warn!(conversation_id = %session.id(), error = %err, "activity search failed");
                DispatchOutcome::reply(format!(
                    "The activity search failed ({err}). Tell the user the search is \
                     unavailable right now."
                ))
            }
        }
    }
}

/// Extract a required, non-empty string argument, or produce the reply the
/// LLM should read.
fn require_str(args: &serde_json::Value, key: &str) -> Result<String, String> {
    match args.get(key).and_then(|v| v.as_str()) {
        Some(s) if !s.trim().is_empty() => Ok(s.trim().to_string()),
        _ => Err(format!(
            "The required parameter '{key}' is missing or empty. Gather it from the \
             user or another tool before calling this one."
        )),
    }
}

/// Extract a required numeric argument, or produce the reply the LLM
/// should read.
fn require_f64(args: &serde_json::Value, key: &str) -> Result<f64, String> {
    args.get(key).and_then(|v| v.as_f64()).ok_or_else(|| {
        format!(
            "The required parameter '{key}' is missing or not a number. Gather it \
             before calling this tool."
        )
    })
}
