//! OpenAI LLM provider for AgentForge.

mod api;
mod converter;
mod provider;

pub use provider::OpenAIProvider;
