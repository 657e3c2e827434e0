//! Conversion from AgentForge messages to the Anthropic wire format.

use agentforge_protocols::{ChatMessage, ChatRequest, MessageRole};

use crate::api::ApiMessage;

/// Convert conversation turns, leaving out system messages.
///
/// The Messages API only accepts `user` and `assistant` roles in `messages`;
/// system text travels in the top-level `system` field instead.
pub fn convert_messages(messages: &[ChatMessage]) -> Vec<ApiMessage> {
    messages
        .iter()
        .filter(|m| m.role != MessageRole::System)
        .map(|m| ApiMessage {
            role: m.role.as_str().to_string(),
            content: m.content.clone(),
        })
        .collect()
}

/// Collect the out-of-band system prompt.
///
/// The request's own system prompt comes first, followed by any system-role
/// turns in conversation order.
pub fn convert_system(request: &ChatRequest) -> Option<String> {
    let parts: Vec<&str> = request
        .system()
        .into_iter()
        .chain(
            request
                .messages()
                .iter()
                .filter(|m| m.role == MessageRole::System)
                .map(|m| m.content.as_str()),
        )
        .collect();

    if parts.is_empty() {
        None
    } else {
        Some(parts.join("\n\n"))
    }
}

#[cfg(test)]
#[path = "converter_tests.rs"]
mod tests;
