//! Anthropic LLM provider for AgentForge.

mod api;
mod converter;
mod parser;
mod provider;

pub use provider::AnthropicProvider;
