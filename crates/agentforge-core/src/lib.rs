//! # AgentForge Core
//!
//! Host-level services built on top of the provider and history protocols.
//!
//! ## Components
//!
//! - [`create_provider`] - Picks and builds the primary LLM provider at startup
//! - [`Summarizer`] - Condenses one day of chat history into a stored summary
//! - [`PromptRenderer`] - Renders `{{ var }}` prompt templates

pub mod prompt;
pub mod selector;
pub mod summarizer;

pub use prompt::{PromptError, PromptRenderer};
pub use selector::{ProviderKind, create_provider, resolve_provider_name};
pub use summarizer::{SummaryError, Summarizer};
