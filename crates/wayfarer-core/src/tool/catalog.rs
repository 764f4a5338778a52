//! Schema-described catalog of the tools the agent may invoke.
//!
//! Every tool is a named function with a JSON-schema parameter object and a
//! description written for the LLM, not for humans. The descriptions tell
//! the model when to reach for each tool and what to do when a value is
//! missing, because tool failures come back to it as conversational text.

use serde_json::json;

use wayfarer_types::llm::ToolDefinition;

pub const CURRENT_DATE: &str = "current_date";
pub const UPDATE_CONTEXT: &str = "update_context";
pub const APPEND_SUMMARY: &str = "append_summary";
pub const SEARCH_FLIGHTS: &str = "search_flights";
pub const SEARCH_POINTS_OF_INTEREST: &str = "search_points_of_interest";
pub const SUGGEST_PLACES_TO_STAY: &str = "suggest_places_to_stay";
pub const END_CONVERSATION: &str = "end_conversation";

/// The callable-tool catalog attached to every tool-dispatch LLM call.
pub struct ToolCatalog;

impl ToolCatalog {
    pub fn definitions() -> Vec<ToolDefinition> {
        vec![
            ToolDefinition {
                name: CURRENT_DATE.to_string(),
                description: "Returns today's date in the format YYYY-MM-DD. \
                    Use this to resolve relative dates like 'tomorrow' or 'next week'."
                    .to_string(),
                parameters: json!({
                    "type": "object",
                    "properties": {},
                    "required": []
                }),
            },
            ToolDefinition {
                name: UPDATE_CONTEXT.to_string(),
                description: "Overwrites the conversation context with the KEY facts \
                    gathered so far (origin city, destination, dates, travelers, class). \
                    Do not include the whole chat, only the key travel-booking facts."
                    .to_string(),
                parameters: json!({
                    "type": "object",
                    "properties": {
                        "context": {
                            "type": "string",
                            "description": "The full replacement context string."
                        }
                    },
                    "required": ["context"]
                }),
            },
            ToolDefinition {
                name: APPEND_SUMMARY.to_string(),
                description: "Appends summary text to the message that will be shown \
                    to the user, and records it as a summary card."
                    .to_string(),
                parameters: json!({
                    "type": "object",
                    "properties": {
                        "text": {
                            "type": "string",
                            "description": "The summary text to display."
                        }
                    },
                    "required": ["text"]
                }),
            },
            ToolDefinition {
                name: SEARCH_FLIGHTS.to_string(),
                description: "Searches available flights and attaches up to three \
                    offers to the message shown to the user. Convert city names to \
                    their international airport IATA codes first. Use current_date \
                    to resolve relative departure dates."
                    .to_string(),
                parameters: json!({
                    "type": "object",
                    "properties": {
                        "origin_code": {
                            "type": "string",
                            "description": "IATA code of the origin airport, e.g. CDG."
                        },
                        "destination_code": {
                            "type": "string",
                            "description": "IATA code of the destination airport, e.g. HND."
                        },
                        "departure_date": {
                            "type": "string",
                            "description": "Departure date in the format YYYY-MM-DD."
                        },
                        "adults": {
                            "type": "integer",
                            "description": "Number of adult travelers (age 12 or older).",
                            "minimum": 1
                        }
                    },
                    "required": ["origin_code", "destination_code", "departure_date"]
                }),
            },
            ToolDefinition {
                name: SEARCH_POINTS_OF_INTEREST.to_string(),
                description: "Finds activities and places to visit around a coordinate \
                    and attaches them to the message shown to the user. If you only \
                    know the city, use the coordinates of its center."
                    .to_string(),
                parameters: json!({
                    "type": "object",
                    "properties": {
                        "latitude": { "type": "number" },
                        "longitude": { "type": "number" }
                    },
                    "required": ["latitude", "longitude"]
                }),
            },
            ToolDefinition {
                name: SUGGEST_PLACES_TO_STAY.to_string(),
                description: "Attaches a list of suggested places to stay to the \
                    message shown to the user."
                    .to_string(),
                parameters: json!({
                    "type": "object",
                    "properties": {
                        "places": {
                            "type": "array",
                            "items": { "type": "string" },
                            "description": "Names of suggested places to stay."
                        }
                    },
                    "required": ["places"]
                }),
            },
            ToolDefinition {
                name: END_CONVERSATION.to_string(),
                description: "Call this when none of the other tools are relevant to \
                    the request or there is not enough detail to use them. Ends the \
                    current turn."
                    .to_string(),
                parameters: json!({
                    "type": "object",
                    "properties": {},
                    "required": []
                }),
            },
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_names_are_unique() {
        let defs = ToolCatalog::definitions();
        let mut names: Vec<&str> = defs.iter().map(|d| d.name.as_str()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), defs.len());
    }

    #[test]
    fn test_search_flights_schema_requires_codes() {
        let defs = ToolCatalog::definitions();
        let flights = defs.iter().find(|d| d.name == SEARCH_FLIGHTS).unwrap();
        let required = flights.parameters["required"].as_array().unwrap();
        assert!(required.contains(&serde_json::json!("origin_code")));
        assert!(required.contains(&serde_json::json!("destination_code")));
        assert!(required.contains(&serde_json::json!("departure_date")));
    }

    #[test]
    fn test_every_definition_has_object_schema() {
        for def in ToolCatalog::definitions() {
            assert_eq!(def.parameters["type"], "object", "tool {}", def.name);
        }
    }
}
