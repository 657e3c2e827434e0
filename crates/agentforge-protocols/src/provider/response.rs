//! Chat response types.

use crate::types::TokenUsage;

/// Provider-neutral chat response.
///
/// `R` is the vendor payload the response was built from. Adapters expose
/// the decoded JSON body verbatim; synthesized responses use `()`.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatResponse<R = serde_json::Value> {
    /// Vendor-assigned response ID.
    pub id: String,

    /// Concatenated assistant text.
    pub content: String,

    /// Model that produced the answer.
    pub model: String,

    /// Vendor stop reason, passed through verbatim.
    pub stop_reason: Option<String>,

    /// Token usage, when reported.
    pub usage: Option<TokenUsage>,

    /// Raw vendor payload.
    pub raw: R,
}

/// A response with no vendor payload attached.
pub type SimpleChatResponse = ChatResponse<()>;

impl ChatResponse<()> {
    /// Build a synthesized response.
    pub fn of(
        id: impl Into<String>,
        content: impl Into<String>,
        model: impl Into<String>,
        stop_reason: Option<String>,
        usage: Option<TokenUsage>,
    ) -> SimpleChatResponse {
        ChatResponse {
            id: id.into(),
            content: content.into(),
            model: model.into(),
            stop_reason,
            usage,
            raw: (),
        }
    }
}

impl<R> ChatResponse<R> {
    pub fn raw_response(&self) -> &R {
        &self.raw
    }

    /// Replace the vendor payload.
    pub fn with_raw<T>(self, raw: T) -> ChatResponse<T> {
        ChatResponse {
            id: self.id,
            content: self.content,
            model: self.model,
            stop_reason: self.stop_reason,
            usage: self.usage,
            raw,
        }
    }

    /// Drop the vendor payload.
    pub fn without_raw(self) -> SimpleChatResponse {
        self.with_raw(())
    }
}

#[cfg(test)]
#[path = "response_tests.rs"]
mod tests;
