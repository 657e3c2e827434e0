//! LLM provider configuration.

use serde::{Deserialize, Serialize};

/// Provider selection and per-vendor settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LlmConfig {
    /// `"claude"`, `"openai"`, or blank to detect from the environment.
    #[serde(default)]
    pub provider: String,

    #[serde(default)]
    pub claude: ClaudeConfig,

    #[serde(default)]
    pub openai: OpenAiConfig,
}

/// Anthropic Messages API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClaudeConfig {
    #[serde(default)]
    pub api_key: String,

    #[serde(default = "default_claude_base_url")]
    pub base_url: String,

    #[serde(default = "default_messages_path")]
    pub messages_path: String,

    #[serde(default = "default_claude_model")]
    pub default_model: String,

    #[serde(default = "default_max_tokens")]
    pub default_max_tokens: u32,
}

impl Default for ClaudeConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: default_claude_base_url(),
            messages_path: default_messages_path(),
            default_model: default_claude_model(),
            default_max_tokens: default_max_tokens(),
        }
    }
}

impl ClaudeConfig {
    /// Configured key, else `ANTHROPIC_AUTH_TOKEN`, else `ANTHROPIC_API_KEY`.
    pub fn resolved_api_key(&self) -> Option<String> {
        self.resolved_api_key_with(|name| std::env::var(name).ok())
    }

    pub fn resolved_api_key_with(&self, env: impl Fn(&str) -> Option<String>) -> Option<String> {
        first_non_blank(
            &self.api_key,
            &["ANTHROPIC_AUTH_TOKEN", "ANTHROPIC_API_KEY"],
            env,
        )
    }

    /// Full Messages endpoint.
    pub fn endpoint(&self) -> String {
        join_url(&self.base_url, &self.messages_path)
    }
}

/// OpenAI Chat Completions API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAiConfig {
    #[serde(default)]
    pub api_key: String,

    #[serde(default = "default_openai_base_url")]
    pub base_url: String,

    #[serde(default = "default_chat_path")]
    pub chat_path: String,

    #[serde(default = "default_openai_model")]
    pub default_model: String,

    #[serde(default = "default_max_tokens")]
    pub default_max_tokens: u32,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: default_openai_base_url(),
            chat_path: default_chat_path(),
            default_model: default_openai_model(),
            default_max_tokens: default_max_tokens(),
        }
    }
}

impl OpenAiConfig {
    /// Configured key, else `OPENAI_API_KEY`.
    pub fn resolved_api_key(&self) -> Option<String> {
        self.resolved_api_key_with(|name| std::env::var(name).ok())
    }

    pub fn resolved_api_key_with(&self, env: impl Fn(&str) -> Option<String>) -> Option<String> {
        first_non_blank(&self.api_key, &["OPENAI_API_KEY"], env)
    }

    /// Full Chat Completions endpoint.
    pub fn endpoint(&self) -> String {
        join_url(&self.base_url, &self.chat_path)
    }
}

fn first_non_blank(
    configured: &str,
    env_names: &[&str],
    env: impl Fn(&str) -> Option<String>,
) -> Option<String> {
    if !configured.trim().is_empty() {
        return Some(configured.to_string());
    }
    env_names
        .iter()
        .filter_map(|name| env(name))
        .find(|value| !value.trim().is_empty())
}

fn join_url(base: &str, path: &str) -> String {
    format!("{}{}", base.trim_end_matches('/'), path)
}

fn default_claude_base_url() -> String {
    "https://api.anthropic.com".to_string()
}

fn default_messages_path() -> String {
    "/v1/messages".to_string()
}

fn default_claude_model() -> String {
    "claude-sonnet-4-20250514".to_string()
}

fn default_openai_base_url() -> String {
    "https://api.openai.com".to_string()
}

fn default_chat_path() -> String {
    "/v1/chat/completions".to_string()
}

fn default_openai_model() -> String {
    "gpt-4o".to_string()
}

fn default_max_tokens() -> u32 {
    1024
}
