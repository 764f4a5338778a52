//! System prompts and request builders for the two LLM passes of a turn.
//!
//! The summarizer pass runs without tools and walks the user through the
//! slot-filling script, emitting `<DONE>` once every requested service has
//! its slots filled. The dispatch pass runs with the tool catalog attached
//! and acts on the summary.

use wayfarer_types::config::LlmConfig;
use wayfarer_types::llm::{CompletionRequest, LlmMessage};

use crate::tool::ToolCatalog;

/// Terminal marker the summarizer emits when all required slots across all
/// requested services are filled.
pub const DONE_MARKER: &str = "<DONE>";

const SUMMARIZER_SYSTEM_PROMPT: &str = "\
You are a friendly travel agent. You specialize in booking flights and hotels. \
Interact in a conversational and casual tone.

The very first step is to determine what services the user would like to use. \
After determining the services, write that information out as a list. Then go \
through your list of services and ask questions, strictly following the steps \
below.

For booking flights, strictly follow these steps:
Step 1. Ask for the city of departure (city only). Skip this step if the user has already mentioned it.
Step 2. Ask for the city of arrival (city only). Skip this step if the user has already mentioned it.
Step 3. Ask for the departure date (YYYY-MM-DD). Skip this step if the user has already mentioned it.
Step 4. Ask for the number of adult travelers (age 12 or older on the date of departure). Skip this step if the user has already mentioned it.
Step 5. Ask for the travel class (economy, premium economy, business, first). Skip this step if the user has already mentioned it.
Step 6. Ask the user for confirmation.
Step 7. Go to the next service on your initial list. If there are none left, summarize everything and output a singular <DONE>.

For booking hotels, strictly follow these steps:
Step 1. If the user used the flight booking service, infer the city they would want to stay in. Otherwise ask for the city. If they already specified it, do not ask.
Step 2. Ask the user for confirmation.
Step 3. Go to the next service on your initial list. If there are none left, summarize everything and output a singular <DONE>.

Give the final summary as a list of information for each service the user used.
Booking flights:
1. City of departure
2. City of arrival
3. Departure date
4. Number of adult travelers
5. Travel class

Booking hotels:
1. City of stay";

const DISPATCH_SYSTEM_PROMPT: &str = "\
You are a travel agent backend. Given a summary of the user's travel \
requirements, decide which of your tools apply and execute them to build the \
response shown to the user.

Rules:
- Never execute any tool more than once per request.
- Convert city names to their international airport IATA codes before \
searching flights, and use current_date to resolve relative dates.
- After fetching data, use append_summary to write the text the user will \
read, and update_context to record the key facts gathered so far.
- If none of the tools are relevant or there is not enough detail to use \
them, call end_conversation.";

/// Build the tool-less summarizer request from the running history and the
/// session context.
pub fn build_summary_request(config: &LlmConfig, history: &str, context: &str) -> CompletionRequest {
    let mut system = String::from(SUMMARIZER_SYSTEM_PROMPT);
    if !context.is_empty() {
        system.push_str("\n\nKey facts gathered so far:\n");
        system.push_str(context);
    }
    system.push_str("\n\nHere is the chat history to help you:\n");
    system.push_str(history);

    CompletionRequest {
        model: config.model.clone(),
        messages: vec![
            LlmMessage::system(system),
            LlmMessage::user("Continue the conversation from the history above."),
        ],
        tools: vec![],
        temperature: Some(config.temperature),
        max_tokens: config.max_tokens,
    }
}

/// Build the opening messages of the tool-dispatch pass. The orchestrator
/// extends this list with assistant/tool messages as the loop progresses.
pub fn dispatch_messages(summary: &str, context: &str, user_query: &str) -> Vec<LlmMessage> {
    let mut user = format!("User query:\n{user_query}\n\nRequirements summary:\n{summary}");
    if !context.is_empty() {
        user.push_str("\n\nKey facts gathered so far:\n");
        user.push_str(context);
    }
    vec![LlmMessage::system(DISPATCH_SYSTEM_PROMPT), LlmMessage::user(user)]
}

/// Build one round of the tool-dispatch request over the accumulated
/// message list.
pub fn build_dispatch_request(config: &LlmConfig, messages: Vec<LlmMessage>) -> CompletionRequest {
    CompletionRequest {
        model: config.model.clone(),
        messages,
        tools: ToolCatalog::definitions(),
        temperature: Some(config.temperature),
        max_tokens: config.max_tokens,
    }
}

/// Whether the summarizer declared all slots filled.
pub fn summary_is_done(summary: &str) -> bool {
    summary.contains(DONE_MARKER)
}
