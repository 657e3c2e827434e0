//! LLM provider trait definition.

use std::pin::Pin;
use std::sync::Arc;

use async_trait::async_trait;
use futures::Stream;
use tokio::runtime::{Handle, RuntimeFlavor};

use super::{ChatRequest, ChatResponse, ChatTask};
use crate::error::ProviderError;

/// Lazy sequence of assistant text fragments.
///
/// No network traffic happens until the stream is first polled; dropping it
/// aborts the underlying request.
pub type ChatStream = Pin<Box<dyn Stream<Item = Result<String, ProviderError>> + Send>>;

/// Core trait for LLM providers.
///
/// Implementations are shared across concurrent callers and hold no
/// per-request state.
#[async_trait]
pub trait LlmProvider: Send + Sync + 'static {
    /// Returns the provider ID.
    fn id(&self) -> &str;

    /// Complete a chat request, resolving once the full response arrived.
    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse, ProviderError>;

    /// Stream the assistant's answer as text fragments in wire order.
    fn chat_stream(&self, request: ChatRequest) -> ChatStream;

    /// Run [`LlmProvider::chat`] in the background.
    fn chat_async(self: Arc<Self>, request: ChatRequest) -> ChatTask {
        ChatTask::spawn(async move { self.chat(request).await })
    }

    /// Block the calling thread until [`LlmProvider::chat`] completes.
    ///
    /// Requires a multi-thread Tokio runtime; the worker thread is handed
    /// over to the blocking pool for the duration of the call.
    fn chat_blocking(&self, request: ChatRequest) -> Result<ChatResponse, ProviderError> {
        let handle = Handle::try_current().map_err(|_| {
            ProviderError::InvalidRequest("chat_blocking requires a Tokio runtime".to_string())
        })?;
        if handle.runtime_flavor() != RuntimeFlavor::MultiThread {
            return Err(ProviderError::InvalidRequest(
                "chat_blocking requires a multi-thread runtime".to_string(),
            ));
        }
        tokio::task::block_in_place(|| handle.block_on(self.chat(request)))
    }
}

#[cfg(test)]
#[path = "traits_tests.rs"]
mod tests;
