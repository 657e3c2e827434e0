//! Shared HTTPS client.

use std::pin::Pin;
use std::time::Duration;

use bytes::Bytes;
use futures::{Stream, StreamExt, TryStreamExt, future, stream};
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::Serialize;
use tracing::debug;

use agentforge_config::HttpConfig;

use crate::error::TransportError;
use crate::sse::{SseFrame, SseFrames};

/// Cold stream of SSE frames from a single POST.
pub type SseStream = Pin<Box<dyn Stream<Item = Result<SseFrame, TransportError>> + Send>>;

type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, reqwest::Error>> + Send>>;

/// JSON-over-HTTPS transport.
///
/// Clones share one connection pool.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// Build a transport with a connect timeout and an idle read timeout.
    pub fn new(connect_timeout: Duration, read_timeout: Duration) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .connect_timeout(connect_timeout)
            .read_timeout(read_timeout)
            .build()
            .map_err(|e| TransportError::Request(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client })
    }

    pub fn from_config(config: &HttpConfig) -> Result<Self, TransportError> {
        Self::new(
            Duration::from_secs(config.connect_timeout_secs),
            Duration::from_secs(config.read_timeout_secs),
        )
    }

    /// POST `body` as JSON and return the full response body.
    pub async fn post_json<T>(
        &self,
        url: &str,
        headers: HeaderMap,
        body: &T,
    ) -> Result<Bytes, TransportError>
    where
        T: Serialize + ?Sized,
    {
        let payload = serde_json::to_vec(body).map_err(|e| TransportError::Encode(e.to_string()))?;
        debug!("POST {} ({} bytes)", url, payload.len());

        let response = self
            .client
            .post(url)
            .headers(headers)
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
            .body(payload)
            .send()
            .await?;

        let response = ensure_success(response).await?;
        Ok(response.bytes().await?)
    }

    /// POST `body` as JSON and stream the `text/event-stream` response.
    ///
    /// The body is encoded immediately; the request itself is only sent once
    /// the returned stream is first polled.
    pub fn post_json_stream<T>(&self, url: &str, headers: HeaderMap, body: &T) -> SseStream
    where
        T: Serialize + ?Sized,
    {
        let payload = match serde_json::to_vec(body) {
            Ok(payload) => payload,
            Err(e) => {
                let err = TransportError::Encode(e.to_string());
                return Box::pin(stream::once(future::ready(Err::<SseFrame, _>(err))));
            }
        };

        let request = self
            .client
            .post(url)
            .headers(headers)
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
            .header(ACCEPT, HeaderValue::from_static("text/event-stream"))
            .body(payload);
        let url = url.to_string();

        let frames = stream::once(async move {
            debug!("POST {} (stream)", url);
            let response = ensure_success(request.send().await?).await?;
            let bytes: ByteStream = Box::pin(response.bytes_stream());
            Ok::<_, TransportError>(SseFrames::new(bytes))
        })
        .try_flatten();

        frames.boxed()
    }
}

/// Turn a non-2xx response into [`TransportError::Status`] carrying the body.
async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, TransportError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = match response.text().await {
        Ok(body) => body,
        Err(e) => {
            debug!("Failed to read error body: {}", e);
            format!("<unreadable body: {e}>")
        }
    };
    debug!("HTTP {} from upstream", status.as_u16());
    Err(TransportError::Status {
        status: status.as_u16(),
        body,
    })
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
