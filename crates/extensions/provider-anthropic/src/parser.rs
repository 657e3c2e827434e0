//! Anthropic response and stream-frame parsing.

use agentforge_protocols::{ChatResponse, ProviderError, TokenUsage};
use agentforge_transport::SseFrame;
use tracing::warn;

use crate::api::{ApiResponse, ContentBlock, ContentBlockDelta};

/// The only event type that carries answer text.
pub const CONTENT_BLOCK_DELTA: &str = "content_block_delta";

/// Parse a complete Messages API response body.
pub fn parse_response(body: &[u8]) -> Result<ChatResponse, ProviderError> {
    let raw: serde_json::Value = serde_json::from_slice(body)?;
    let api: ApiResponse = serde_json::from_value(raw.clone())?;

    let content: String = api
        .content
        .iter()
        .filter_map(|block| match block {
            ContentBlock::Text { text } => Some(text.as_str()),
            ContentBlock::Other => None,
        })
        .collect();

    Ok(ChatResponse {
        id: api.id,
        content,
        model: api.model,
        stop_reason: api.stop_reason,
        usage: api
            .usage
            .map(|u| TokenUsage::of(u.input_tokens, u.output_tokens)),
        raw,
    })
}

/// Extract the text fragment carried by a stream frame.
///
/// Frames of other event types, deltas without text and malformed payloads
/// yield `None`; malformed payloads are logged.
pub fn parse_stream_frame(frame: &SseFrame) -> Option<String> {
    if frame.event.as_deref() != Some(CONTENT_BLOCK_DELTA) {
        return None;
    }

    match serde_json::from_str::<ContentBlockDelta>(&frame.data) {
        Ok(event) => event.delta.text,
        Err(e) => {
            warn!("Skipping malformed {} frame: {}", CONTENT_BLOCK_DELTA, e);
            None
        }
    }
}

#[cfg(test)]
#[path = "parser_tests.rs"]
mod tests;
