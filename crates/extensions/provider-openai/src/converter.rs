//! Conversion between AgentForge types and the OpenAI wire format.

use agentforge_protocols::{ChatMessage, ChatRequest, ChatResponse, ProviderError, TokenUsage};
use tracing::warn;

use crate::api::{ApiMessage, ApiResponse, StreamChunk};

/// Stream terminator sent as the last `data` payload.
pub const DONE_SENTINEL: &str = "[DONE]";

/// Convert the request's turns, prepending the system prompt as a system message.
pub fn convert_messages(request: &ChatRequest) -> Vec<ApiMessage> {
    let system = request.system().map(|system| ApiMessage {
        role: "system".to_string(),
        content: system.to_string(),
    });

    system
        .into_iter()
        .chain(request.messages().iter().map(convert_message))
        .collect()
}

fn convert_message(msg: &ChatMessage) -> ApiMessage {
    ApiMessage {
        role: msg.role.as_str().to_string(),
        content: msg.content.clone(),
    }
}

/// Parse a complete Chat Completions response body.
///
/// Only the first choice is read; a missing or null content yields `""`.
pub fn convert_response(body: &[u8]) -> Result<ChatResponse, ProviderError> {
    let raw: serde_json::Value = serde_json::from_slice(body)?;
    let api: ApiResponse = serde_json::from_value(raw.clone())?;

    let first = api.choices.into_iter().next();
    let stop_reason = first.as_ref().and_then(|c| c.finish_reason.clone());
    let content = first
        .and_then(|c| c.message)
        .and_then(|m| m.content)
        .unwrap_or_default();

    Ok(ChatResponse {
        id: api.id,
        content,
        model: api.model,
        stop_reason,
        usage: api
            .usage
            .map(|u| TokenUsage::of(u.prompt_tokens, u.completion_tokens)),
        raw,
    })
}

/// Whether a frame's payload ends the stream.
pub fn is_done(data: &str) -> bool {
    data.trim() == DONE_SENTINEL
}

/// Extract `choices[0].delta.content` from a stream payload.
pub fn parse_stream_chunk(data: &str) -> Option<String> {
    match serde_json::from_str::<StreamChunk>(data) {
        Ok(chunk) => chunk
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.delta)
            .and_then(|d| d.content),
        Err(e) => {
            warn!("Skipping malformed stream chunk: {}", e);
            None
        }
    }
}
