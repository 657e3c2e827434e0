//! Chat request types.

use crate::error::ProviderError;
use crate::types::{ChatMessage, MessageRole};

/// Provider-neutral chat request.
///
/// Only obtainable through [`ChatRequest::builder`], which guarantees the
/// message list is never empty and always carries at least one
/// non-system turn.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatRequest {
    messages: Vec<ChatMessage>,
    system: Option<String>,
    model: Option<String>,
    max_tokens: Option<u32>,
    temperature: Option<f64>,
}

impl ChatRequest {
    pub fn builder() -> ChatRequestBuilder {
        ChatRequestBuilder::default()
    }

    /// Messages in conversation order.
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Out-of-band system prompt.
    pub fn system(&self) -> Option<&str> {
        self.system.as_deref()
    }

    /// Model override; adapters fall back to their configured default.
    pub fn model(&self) -> Option<&str> {
        self.model.as_deref()
    }

    pub fn max_tokens(&self) -> Option<u32> {
        self.max_tokens
    }

    /// Sampling temperature, forwarded to the vendor untouched.
    pub fn temperature(&self) -> Option<f64> {
        self.temperature
    }
}

/// Builder for [`ChatRequest`].
#[derive(Debug, Clone, Default)]
pub struct ChatRequestBuilder {
    messages: Vec<ChatMessage>,
    system: Option<String>,
    model: Option<String>,
    max_tokens: Option<u32>,
    temperature: Option<f64>,
}

impl ChatRequestBuilder {
    /// Replace the message list.
    pub fn messages(mut self, messages: impl IntoIterator<Item = ChatMessage>) -> Self {
        self.messages = messages.into_iter().collect();
        self
    }

    /// Append one message.
    pub fn message(mut self, message: ChatMessage) -> Self {
        self.messages.push(message);
        self
    }

    pub fn system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn temperature(mut self, temperature: f64) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Validate and freeze the request.
    pub fn build(self) -> Result<ChatRequest, ProviderError> {
        if self.messages.is_empty() {
            return Err(ProviderError::InvalidRequest(
                "messages must not be empty".to_string(),
            ));
        }
        if self.messages.iter().all(|m| m.role == MessageRole::System) {
            return Err(ProviderError::InvalidRequest(
                "messages must contain a user or assistant turn".to_string(),
            ));
        }
        if let Some(index) = self.messages.iter().position(|m| m.content.is_empty()) {
            return Err(ProviderError::InvalidRequest(format!(
                "message {index} has empty content"
            )));
        }
        if self.max_tokens == Some(0) {
            return Err(ProviderError::InvalidRequest(
                "max_tokens must be positive".to_string(),
            ));
        }

        Ok(ChatRequest {
            messages: self.messages,
            system: self.system,
            model: self.model,
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        })
    }
}

#[cfg(test)]
#[path = "request_tests.rs"]
mod tests;
