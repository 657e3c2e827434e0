//! Anthropic provider implementation.

use async_trait::async_trait;
use futures::{StreamExt, future};
use tracing::debug;

use agentforge_config::ClaudeConfig;
use agentforge_protocols::{ChatRequest, ChatResponse, ChatStream, LlmProvider, ProviderError};
use agentforge_transport::{HeaderMap, HeaderName, HeaderValue, HttpTransport};

use crate::api::ApiRequest;
use crate::converter::{convert_messages, convert_system};
use crate::parser::{parse_response, parse_stream_frame};

const PROVIDER_ID: &str = "claude";
const VENDOR: &str = "Claude";
const API_VERSION: &str = "2023-06-01";

/// Anthropic Messages API provider.
#[derive(Debug, Clone)]
pub struct AnthropicProvider {
    transport: HttpTransport,
    endpoint: String,
    headers: HeaderMap,
    default_model: String,
    default_max_tokens: u32,
}

impl AnthropicProvider {
    /// Create a provider, resolving the API key from config or environment.
    pub fn new(config: &ClaudeConfig, transport: HttpTransport) -> Result<Self, ProviderError> {
        let api_key = config
            .resolved_api_key()
            .ok_or_else(|| ProviderError::MissingApiKey(PROVIDER_ID.to_string()))?;
        Self::with_api_key(config, &api_key, transport)
    }

    /// Create a provider with an explicit API key.
    pub fn with_api_key(
        config: &ClaudeConfig,
        api_key: &str,
        transport: HttpTransport,
    ) -> Result<Self, ProviderError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            HeaderName::from_static("x-api-key"),
            HeaderValue::from_str(api_key)
                .map_err(|e| ProviderError::InvalidRequest(format!("invalid API key: {e}")))?,
        );
        headers.insert(
            HeaderName::from_static("anthropic-version"),
            HeaderValue::from_static(API_VERSION),
        );

        Ok(Self {
            transport,
            endpoint: config.endpoint(),
            headers,
            default_model: config.default_model.clone(),
            default_max_tokens: config.default_max_tokens,
        })
    }

    pub(crate) fn build_request(&self, request: &ChatRequest, stream: bool) -> ApiRequest {
        ApiRequest {
            model: request
                .model()
                .unwrap_or(&self.default_model)
                .to_string(),
            max_tokens: request.max_tokens().unwrap_or(self.default_max_tokens),
            messages: convert_messages(request.messages()),
            system: convert_system(request),
            temperature: request.temperature(),
            stream: stream.then_some(true),
        }
    }
}

#[async_trait]
impl LlmProvider for AnthropicProvider {
    fn id(&self) -> &str {
        PROVIDER_ID
    }

    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse, ProviderError> {
        let api_request = self.build_request(&request, false);
        debug!(
            "Claude chat: model={}, messages={}",
            api_request.model,
            api_request.messages.len()
        );

        let body = self
            .transport
            .post_json(&self.endpoint, self.headers.clone(), &api_request)
            .await
            .map_err(|e| e.into_provider_error(VENDOR))?;

        parse_response(&body)
    }

    fn chat_stream(&self, request: ChatRequest) -> ChatStream {
        let api_request = self.build_request(&request, true);
        debug!("Claude stream: model={}", api_request.model);

        self.transport
            .post_json_stream(&self.endpoint, self.headers.clone(), &api_request)
            .filter_map(|frame| {
                future::ready(match frame {
                    Ok(frame) => parse_stream_frame(&frame).map(Ok),
                    Err(e) => Some(Err(e.into_provider_error(VENDOR))),
                })
            })
            .boxed()
    }
}

#[cfg(test)]
#[path = "provider_tests.rs"]
mod tests;
