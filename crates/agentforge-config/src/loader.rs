//! Configuration loader.

use std::fs;
use std::path::{Path, PathBuf};

use regex::Regex;

use crate::error::ConfigError;
use crate::schema::Config;

/// Configuration loader with environment variable substitution.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Config, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.display().to_string()));
        }
        let content = fs::read_to_string(path)?;
        Self::load_str(&content)
    }

    /// Load configuration from a string.
    pub fn load_str(content: &str) -> Result<Config, ConfigError> {
        let expanded = Self::expand_env_vars(content)?;
        let config: Config = toml::from_str(&expanded)?;
        Self::validate(&config)?;
        Ok(config)
    }

    /// Load `path`, falling back to defaults when the file does not exist.
    pub fn load_or_default(path: &Path) -> Result<Config, ConfigError> {
        match Self::load(path) {
            Err(ConfigError::NotFound(_)) => Ok(Config::default()),
            other => other,
        }
    }

    /// `~/.agentforge/config.toml`.
    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .map(|h| h.join(".agentforge"))
            .unwrap_or_else(|| PathBuf::from(".agentforge"))
            .join("config.toml")
    }

    /// Expand environment variables in the format `${VAR}`.
    fn expand_env_vars(content: &str) -> Result<String, ConfigError> {
        let re = Regex::new(r"\$\{([^}]+)\}")
            .map_err(|e| ConfigError::InvalidFormat(e.to_string()))?;

        let mut result = content.to_string();
        for cap in re.captures_iter(content) {
            let var_name = &cap[1];
            let var_value = std::env::var(var_name)
                .map_err(|_| ConfigError::EnvVarNotSet(var_name.to_string()))?;
            result = result.replace(&cap[0], &var_value);
        }

        Ok(result)
    }

    fn validate(config: &Config) -> Result<(), ConfigError> {
        let checks = [
            ("http.connect_timeout_secs", config.http.connect_timeout_secs),
            ("http.read_timeout_secs", config.http.read_timeout_secs),
            (
                "llm.claude.default_max_tokens",
                u64::from(config.llm.claude.default_max_tokens),
            ),
            (
                "llm.openai.default_max_tokens",
                u64::from(config.llm.openai.default_max_tokens),
            ),
        ];
        for (field, value) in checks {
            if value == 0 {
                return Err(ConfigError::InvalidValue {
                    field: field.to_string(),
                    message: "must be positive".to_string(),
                });
            }
        }
        Ok(())
    }

    /// Expand shell-style paths (e.g., `~/.agentforge`).
    pub fn expand_path(path: &str) -> String {
        shellexpand::tilde(path).to_string()
    }
}
