//! Configuration schema definitions.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

mod schema_llm;

pub use schema_llm::*;

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub llm: LlmConfig,

    #[serde(default)]
    pub http: HttpConfig,

    #[serde(default)]
    pub history: HistoryConfig,

    #[serde(default)]
    pub prompts: PromptsConfig,
}

/// Outbound HTTP settings shared by every provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Seconds allowed for establishing a connection.
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,

    /// Seconds a response may stay idle between reads.
    #[serde(default = "default_read_timeout")]
    pub read_timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: default_connect_timeout(),
            read_timeout_secs: default_read_timeout(),
        }
    }
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_read_timeout() -> u64 {
    120
}

/// Chat history database settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryConfig {
    #[serde(default = "default_database_path")]
    pub database_path: String,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
        }
    }
}

impl HistoryConfig {
    /// Database path with `~` expanded.
    pub fn resolved_path(&self) -> PathBuf {
        PathBuf::from(shellexpand::tilde(&self.database_path).as_ref())
    }
}

fn default_database_path() -> String {
    "~/.agentforge/agentforge.db".to_string()
}

/// Prompt template settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PromptsConfig {
    /// Directory searched before the embedded templates.
    #[serde(default)]
    pub dir: Option<PathBuf>,
}

#[cfg(test)]
#[path = "schema_tests.rs"]
mod tests;
