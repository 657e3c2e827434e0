//! Error types for the AgentForge protocol layer.

mod history;
mod provider;

pub use history::*;
pub use provider::*;
