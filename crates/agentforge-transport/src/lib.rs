//! HTTPS transport for AgentForge providers.
//!
//! Owns the shared connection pool and turns `text/event-stream` bodies into
//! [`SseFrame`]s. Payloads are never interpreted beyond SSE framing.

mod client;
mod error;
mod sse;

pub use client::{HttpTransport, SseStream};
pub use error::TransportError;
pub use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
pub use sse::{SseDecoder, SseFrame, SseFrames};
