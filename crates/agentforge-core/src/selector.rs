//! Primary provider selection.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use tracing::info;

use agentforge_config::{Config, LlmConfig};
use agentforge_protocols::{LlmProvider, ProviderError};
use agentforge_provider_anthropic::AnthropicProvider;
use agentforge_provider_openai::OpenAIProvider;
use agentforge_transport::HttpTransport;

const ANTHROPIC_ENV: [&str; 2] = ["ANTHROPIC_AUTH_TOKEN", "ANTHROPIC_API_KEY"];
const OPENAI_ENV: &str = "OPENAI_API_KEY";

/// Supported vendors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderKind {
    Claude,
    OpenAi,
}

impl ProviderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::Claude => "claude",
            ProviderKind::OpenAi => "openai",
        }
    }

    /// Map a resolved provider name; anything but `"openai"` means Claude.
    pub fn from_resolved(name: &str) -> Self {
        if name.trim() == "openai" {
            ProviderKind::OpenAi
        } else {
            ProviderKind::Claude
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Strict parse for user-supplied names.
impl FromStr for ProviderKind {
    type Err = ProviderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "claude" => Ok(ProviderKind::Claude),
            "openai" => Ok(ProviderKind::OpenAi),
            _ => Err(ProviderError::UnknownProvider(s.to_string())),
        }
    }
}

/// Resolve the provider name from config, then the process environment.
pub fn resolve_provider_name(config: &LlmConfig) -> String {
    resolve_with(config, |name| std::env::var(name).ok())
}

/// Resolve the provider name using `env` for variable lookups.
///
/// A non-blank configured name wins. Otherwise an Anthropic key selects
/// `"claude"`, an OpenAI key selects `"openai"`, and `"claude"` is the default.
pub fn resolve_with(config: &LlmConfig, env: impl Fn(&str) -> Option<String>) -> String {
    let configured = config.provider.trim();
    if !configured.is_empty() {
        return configured.to_string();
    }

    let is_set = |name: &str| env(name).is_some_and(|v| !v.trim().is_empty());
    if ANTHROPIC_ENV.iter().any(|name| is_set(name)) {
        ProviderKind::Claude.as_str().to_string()
    } else if is_set(OPENAI_ENV) {
        ProviderKind::OpenAi.as_str().to_string()
    } else {
        ProviderKind::Claude.as_str().to_string()
    }
}

/// The kind to build: an explicit override, else the resolved config.
pub fn select_kind(config: &LlmConfig, kind_override: Option<ProviderKind>) -> ProviderKind {
    kind_override.unwrap_or_else(|| ProviderKind::from_resolved(&resolve_provider_name(config)))
}

/// Build the primary provider.
pub fn create_provider(
    config: &Config,
    kind_override: Option<ProviderKind>,
    transport: HttpTransport,
) -> Result<Arc<dyn LlmProvider>, ProviderError> {
    let kind = select_kind(&config.llm, kind_override);
    info!("Using LLM provider: {}", kind);

    let provider: Arc<dyn LlmProvider> = match kind {
        ProviderKind::Claude => Arc::new(AnthropicProvider::new(&config.llm.claude, transport)?),
        ProviderKind::OpenAi => Arc::new(OpenAIProvider::new(&config.llm.openai, transport)?),
    };
    Ok(provider)
}
