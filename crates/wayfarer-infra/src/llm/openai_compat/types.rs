//! Wire types for the OpenAI chat-completions protocol.
//!
//! Conversions between the generic `wayfarer_types::llm` shapes and the
//! provider's JSON. Function-call arguments travel as a JSON *string* on
//! the wire and are parsed into a `serde_json::Value` on the way in.

use serde::{Deserialize, Serialize};

use wayfarer_types::llm::{
    CompletionRequest, CompletionResponse, LlmError, LlmMessage, StopReason, ToolCall,
};

#[derive(Debug, Serialize)]
pub struct WireRequest {
    pub model: String,
    pub messages: Vec<WireMessage>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<WireTool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    pub max_tokens: u32,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct WireMessage {
    pub role: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tool_calls: Vec<WireToolCall>,
}

#[derive(Debug, Serialize)]
pub struct WireTool {
    #[serde(rename = "type")]
    pub kind: String,
    pub function: WireFunctionDef,
}

#[derive(Debug, Serialize)]
pub struct WireFunctionDef {
    pub name: String,
    pub description: String,
    pub parameters: serde_json::Value,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct WireToolCall {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub function: WireFunctionCall,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct WireFunctionCall {
    pub name: String,
    /// JSON-encoded arguments object, per the wire protocol.
    pub arguments: String,
}

#[derive(Debug, Deserialize)]
pub struct WireResponse {
    pub choices: Vec<WireChoice>,
}

#[derive(Debug, Deserialize)]
pub struct WireChoice {
    pub message: WireMessage,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

pub fn to_wire_request(request: &CompletionRequest) -> WireRequest {
    WireRequest {
        model: request.model.clone(),
        messages: request.messages.iter().map(to_wire_message).collect(),
        tools: request
            .tools
            .iter()
            .map(|tool| WireTool {
                kind: "function".to_string(),
                function: WireFunctionDef {
                    name: tool.name.clone(),
                    description: tool.description.clone(),
                    parameters: tool.parameters.clone(),
                },
            })
            .collect(),
        temperature: request.temperature,
        max_tokens: request.max_tokens,
    }
}

fn to_wire_message(message: &LlmMessage) -> WireMessage {
    WireMessage {
        role: message.role.to_string(),
        content: Some(message.content.clone()),
        tool_call_id: message.tool_call_id.clone(),
        tool_calls: message
            .tool_calls
            .iter()
            .map(|call| WireToolCall {
                id: call.id.clone(),
                kind: "function".to_string(),
                function: WireFunctionCall {
                    name: call.name.clone(),
                    arguments: call.arguments.to_string(),
                },
            })
            .collect(),
    }
}

/// Convert a wire response into the generic completion shape.
pub fn from_wire_response(response: WireResponse) -> Result<CompletionResponse, LlmError> {
    let choice = response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| LlmError::Deserialization("response has no choices".to_string()))?;

    let tool_calls = choice
        .message
        .tool_calls
        .into_iter()
        .map(|call| {
            let arguments = serde_json::from_str(&call.function.arguments).map_err(|err| {
                LlmError::Deserialization(format!(
                    "tool call '{}' has unparsable arguments: {err}",
                    call.function.name
                ))
            })?;
            Ok(ToolCall {
                id: call.id,
                name: call.function.name,
                arguments,
            })
        })
        .collect::<Result<Vec<_>, LlmError>>()?;

    let stop_reason = match choice.finish_reason.as_deref() {
        Some("tool_calls") => StopReason::ToolUse,
        Some("length") => StopReason::MaxTokens,
        // "stop" and anything unrecognized both mean the model is done.
        _ => {
            if tool_calls.is_empty() {
                StopReason::EndTurn
            } else {
                StopReason::ToolUse
            }
        }
    };

    Ok(CompletionResponse {
        content: choice.message.content.unwrap_or_default(),
        tool_calls,
        stop_reason,
    })
}
