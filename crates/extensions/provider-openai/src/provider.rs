//! OpenAI provider implementation.

use async_trait::async_trait;
use futures::{StreamExt, future};
use tracing::debug;

use agentforge_config::OpenAiConfig;
use agentforge_protocols::{ChatRequest, ChatResponse, ChatStream, LlmProvider, ProviderError};
use agentforge_transport::{HeaderMap, HeaderValue, HttpTransport};

use crate::api::ApiRequest;
use crate::converter::{convert_messages, convert_response, is_done, parse_stream_chunk};

const PROVIDER_ID: &str = "openai";
const VENDOR: &str = "OpenAI";

/// OpenAI Chat Completions provider.
#[derive(Debug, Clone)]
pub struct OpenAIProvider {
    transport: HttpTransport,
    endpoint: String,
    headers: HeaderMap,
    default_model: String,
    default_max_tokens: u32,
}

impl OpenAIProvider {
    /// Create a provider, resolving the API key from config or environment.
    pub fn new(config: &OpenAiConfig, transport: HttpTransport) -> Result<Self, ProviderError> {
        let api_key = config
            .resolved_api_key()
            .ok_or_else(|| ProviderError::MissingApiKey(PROVIDER_ID.to_string()))?;
        Self::with_api_key(config, &api_key, transport)
    }

    /// Create a provider with an explicit API key.
    pub fn with_api_key(
        config: &OpenAiConfig,
        api_key: &str,
        transport: HttpTransport,
    ) -> Result<Self, ProviderError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            "authorization",
            HeaderValue::from_str(&format!("Bearer {api_key}"))
                .map_err(|e| ProviderError::InvalidRequest(format!("invalid API key: {e}")))?,
        );

        Ok(Self {
            transport,
            endpoint: config.endpoint(),
            headers,
            default_model: config.default_model.clone(),
            default_max_tokens: config.default_max_tokens,
        })
    }

    fn build_request(&self, request: &ChatRequest, stream: bool) -> ApiRequest {
        ApiRequest {
            model: request
                .model()
                .unwrap_or(&self.default_model)
                .to_string(),
            messages: convert_messages(request),
            max_tokens: Some(request.max_tokens().unwrap_or(self.default_max_tokens)),
            temperature: request.temperature(),
            stream: stream.then_some(true),
        }
    }
}

#[async_trait]
impl LlmProvider for OpenAIProvider {
    fn id(&self) -> &str {
        PROVIDER_ID
    }

    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse, ProviderError> {
        let api_request = self.build_request(&request, false);
        debug!(
            "OpenAI chat: model={}, messages={}",
            api_request.model,
            api_request.messages.len()
        );

        let body = self
            .transport
            .post_json(&self.endpoint, self.headers.clone(), &api_request)
            .await
            .map_err(|e| e.into_provider_error(VENDOR))?;

        convert_response(&body)
    }

    fn chat_stream(&self, request: ChatRequest) -> ChatStream {
        let api_request = self.build_request(&request, true);
        debug!("OpenAI stream: model={}", api_request.model);

        self.transport
            .post_json_stream(&self.endpoint, self.headers.clone(), &api_request)
            .take_while(|frame| {
                future::ready(!matches!(frame, Ok(frame) if is_done(&frame.data)))
            })
            .filter_map(|frame| {
                future::ready(match frame {
                    Ok(frame) => parse_stream_chunk(&frame.data).map(Ok),
                    Err(e) => Some(Err(e.into_provider_error(VENDOR))),
                })
            })
            .boxed()
    }
}
