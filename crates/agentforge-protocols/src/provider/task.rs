//! Deferred chat handle.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use tokio::task::JoinHandle;

use super::ChatResponse;
use crate::error::ProviderError;

/// A chat completion running on the Tokio runtime.
///
/// Resolves once with the response or an error. Dropping the handle or
/// calling [`ChatTask::cancel`] aborts the in-flight request.
#[derive(Debug)]
pub struct ChatTask {
    handle: JoinHandle<Result<ChatResponse, ProviderError>>,
}

impl ChatTask {
    /// Spawn `future` onto the current runtime.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn spawn<F>(future: F) -> Self
    where
        F: Future<Output = Result<ChatResponse, ProviderError>> + Send + 'static,
    {
        Self {
            handle: tokio::spawn(future),
        }
    }

    pub fn cancel(&self) {
        self.handle.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Future for ChatTask {
    type Output = Result<ChatResponse, ProviderError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.handle).poll(cx).map(|joined| match joined {
            Ok(result) => result,
            Err(e) if e.is_cancelled() => Err(ProviderError::Cancelled),
            Err(e) => Err(ProviderError::TaskFailed(e.to_string())),
        })
    }
}

impl Drop for ChatTask {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
