//! LLM provider errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProviderError {
    /// Non-2xx response from the vendor.
    #[error("{vendor} API error {status}: {body}")]
    ApiError {
        vendor: String,
        status: u16,
        body: String,
    },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Timeout: {0}")]
    Timeout(String),

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Unknown provider: {0}")]
    UnknownProvider(String),

    #[error("Missing API key for provider: {0}")]
    MissingApiKey(String),

    #[error("Request cancelled")]
    Cancelled,

    #[error("Chat task failed: {0}")]
    TaskFailed(String),
}

impl ProviderError {
    /// HTTP status carried by the error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            ProviderError::ApiError { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the vendor rejected the credentials.
    pub fn is_auth_error(&self) -> bool {
        matches!(self.status(), Some(401) | Some(403))
    }

    /// Errors raised before any I/O happens.
    pub fn is_argument_error(&self) -> bool {
        matches!(
            self,
            ProviderError::InvalidRequest(_) | ProviderError::UnknownProvider(_)
        )
    }
}

impl From<serde_json::Error> for ProviderError {
    fn from(e: serde_json::Error) -> Self {
        ProviderError::Decode(e.to_string())
    }
}

#[cfg(test)]
#[path = "provider_tests.rs"]
mod tests;
