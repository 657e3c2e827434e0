//! Transport errors.

use thiserror::Error;

use agentforge_protocols::ProviderError;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("Connection failed: {0}")]
    Connect(String),

    #[error("Timed out: {0}")]
    Timeout(String),

    #[error("Request failed: {0}")]
    Request(String),

    /// Non-2xx response; `body` is the full response text.
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Cannot encode request body: {0}")]
    Encode(String),
}

impl TransportError {
    /// Attach a vendor label and lift into the provider error space.
    pub fn into_provider_error(self, vendor: &str) -> ProviderError {
        match self {
            TransportError::Status { status, body } => ProviderError::ApiError {
                vendor: vendor.to_string(),
                status,
                body,
            },
            TransportError::Timeout(msg) => ProviderError::Timeout(msg),
            TransportError::Connect(msg) | TransportError::Request(msg) => {
                ProviderError::Network(msg)
            }
            TransportError::Encode(msg) => ProviderError::InvalidRequest(msg),
        }
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            TransportError::Timeout(e.to_string())
        } else if e.is_connect() {
            TransportError::Connect(e.to_string())
        } else {
            TransportError::Request(e.to_string())
        }
    }
}
