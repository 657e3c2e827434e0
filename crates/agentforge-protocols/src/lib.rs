//! # AgentForge Protocols
//!
//! Provider-neutral definitions shared by every AgentForge crate.
//! Contains only interface definitions and value types - no vendor code.
//!
//! ## Core Traits
//!
//! - [`LlmProvider`] - Blocking, deferred and streaming chat completions
//! - [`HistoryStore`] - Persistence of chat messages and daily summaries

pub mod error;
pub mod history;
pub mod provider;
pub mod types;

pub use error::{HistoryError, ProviderError};
pub use history::{DailySummary, HistoryStore, StoredMessage};
pub use provider::{
    ChatRequest, ChatRequestBuilder, ChatResponse, ChatStream, ChatTask, LlmProvider,
    SimpleChatResponse,
};
pub use types::*;
