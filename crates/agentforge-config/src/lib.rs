//! # AgentForge Config
//!
//! Configuration management for AgentForge.

mod error;
mod loader;
mod schema;

pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use schema::*;
