//! Gemini Backend Implementation
//!
//! LLM backend for the Google Generative Language API.
//!
//! # Gemini API
//!
//! - `POST /v1beta/models/{model}:streamGenerateContent?alt=sse` streams
//!   `GenerateContentResponse` chunks as server-sent events
//! - Authentication is the `x-goog-api-key` header
//!
//! Each SSE event carries one JSON chunk. The text parts of a chunk's first
//! candidate become one [`Fragment::Text`]; an `error` object or a transport
//! failure becomes a final [`Fragment::Error`].

use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use futures::StreamExt;
use serde::Deserialize;
use tokio::sync::mpsc;

use super::traits::{GenerateRequest, LlmBackend};
use crate::config::ReviewerConfig;
use crate::stream::Fragment;

/// Default API endpoint
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com";

/// Buffer between the HTTP reader task and the consumer
const FRAGMENT_CHANNEL_CAPACITY: usize = 100;

/// Gemini backend client
#[derive(Clone)]
pub struct GeminiBackend {
    /// API key sent with every request
    api_key: String,
    /// Base URL without trailing slash
    base_url: String,
    /// HTTP client
    http_client: reqwest::Client,
}

impl GeminiBackend {
    /// Create a client for `base_url` authenticated with `api_key`
    ///
    /// # Errors
    ///
    /// Fails if the HTTP client cannot be built (TLS backend unavailable).
    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>) -> anyhow::Result<Self> {
        let http_client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(300))
            .build()
            .context("failed to create HTTP client")?;

        Ok(Self {
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http_client,
        })
    }

    /// Create from a loaded [`ReviewerConfig`]
    ///
    /// # Errors
    ///
    /// Fails if no API key is configured.
    pub fn from_config(config: &ReviewerConfig) -> anyhow::Result<Self> {
        let api_key = config
            .google_ai_api_key
            .as_deref()
            .filter(|key| !key.is_empty())
            .context("Google AI API key is not configured")?;

        Self::new(api_key, config.api_base_url.clone())
    }

    /// Streaming endpoint for `model`
    fn stream_url(&self, model: &str) -> String {
        format!(
            "{}/v1beta/models/{model}:streamGenerateContent?alt=sse",
            self.base_url
        )
    }

    /// JSON body for a single-turn request
    fn request_body(request: &GenerateRequest) -> serde_json::Value {
        serde_json::json!({
            "contents": [{
                "role": "user",
                "parts": [{ "text": request.prompt }],
            }],
        })
    }
}

#[async_trait]
impl LlmBackend for GeminiBackend {
    fn name(&self) -> &'static str {
        "Gemini"
    }

    async fn send_streaming(
        &self,
        request: &GenerateRequest,
    ) -> anyhow::Result<mpsc::Receiver<Fragment>> {
        let url = self.stream_url(&request.model);
        tracing::debug!(model = %request.model, prompt_chars = request.prompt.len(), "sending Gemini request");

        let response = self
            .http_client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&Self::request_body(request))
            .send()
            .await
            .context("failed to reach Gemini API")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Gemini returned {status}: {}", error_message(&body));
        }

        let (tx, rx) = mpsc::channel(FRAGMENT_CHANNEL_CAPACITY);
        let mut stream = response.bytes_stream();

        tokio::spawn(async move {
            let mut decoder = SseDecoder::default();

            while let Some(chunk) = stream.next().await {
                let fragments = match chunk {
                    Ok(bytes) => decoder.push(&bytes),
                    Err(e) => vec![Fragment::error(format!("stream interrupted: {e}"))],
                };
                if !forward(&tx, fragments).await {
                    return;
                }
            }

            forward(&tx, decoder.finish()).await;
        });

        Ok(rx)
    }
}

/// Send fragments in order; `false` once the stream must stop
async fn forward(tx: &mpsc::Sender<Fragment>, fragments: Vec<Fragment>) -> bool {
    for fragment in fragments {
        let is_error = matches!(fragment, Fragment::Error(_));
        if tx.send(fragment).await.is_err() {
            // Receiver dropped, stop streaming
            return false;
        }
        if is_error {
            return false;
        }
    }
    true
}

/// Best-effort human message from an error response body
fn error_message(body: &str) -> String {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) => envelope.error.to_string(),
        Err(_) if body.trim().is_empty() => "empty response body".to_string(),
        Err(_) => body.trim().to_string(),
    }
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ApiError,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    #[serde(default)]
    code: Option<u16>,
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: Option<String>,
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (&self.status, self.code) {
            (Some(status), _) => write!(f, "{} ({status})", self.message),
            (None, Some(code)) => write!(f, "{} ({code})", self.message),
            (None, None) => f.write_str(&self.message),
        }
    }
}

#[derive(Deserialize)]
struct StreamChunk {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    error: Option<ApiError>,
}

#[derive(Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
}

#[derive(Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Deserialize)]
struct Part {
    #[serde(default)]
    text: Option<String>,
}

impl StreamChunk {
    fn into_fragment(self) -> Option<Fragment> {
        if let Some(error) = self.error {
            return Some(Fragment::error(error.to_string()));
        }

        let text: String = self
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|part| part.text)
                    .collect()
            })
            .unwrap_or_default();

        (!text.is_empty()).then_some(Fragment::Text(text))
    }
}

/// Incremental `text/event-stream` decoder
///
/// Bytes may split anywhere, including inside a UTF-8 sequence or a line,
/// so raw bytes are buffered until a full line is available.
#[derive(Default)]
struct SseDecoder {
    pending: Vec<u8>,
    data: Vec<String>,
}

impl SseDecoder {
    /// Feed raw bytes, returning fragments for every completed event
    fn push(&mut self, bytes: &[u8]) -> Vec<Fragment> {
        self.pending.extend_from_slice(bytes);

        let mut fragments = Vec::new();
        while let Some(pos) = self.pending.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.pending.drain(..=pos).collect();
            let line = String::from_utf8_lossy(&line);
            let line = line.trim_end_matches(['\n', '\r']);

            if line.is_empty() {
                fragments.extend(self.dispatch());
            } else if let Some(value) = line.strip_prefix("data:") {
                self.data.push(value.strip_prefix(' ').unwrap_or(value).to_string());
            }
            // Comments, `event:` and `id:` lines carry nothing we use
        }
        fragments
    }

    /// Flush an event left open when the body ended without a blank line
    fn finish(mut self) -> Vec<Fragment> {
        if !self.pending.is_empty() {
            let mut rest = std::mem::take(&mut self.pending);
            rest.extend_from_slice(b"\n\n");
            return self.push(&rest);
        }
        self.dispatch().into_iter().collect()
    }

    fn dispatch(&mut self) -> Option<Fragment> {
        if self.data.is_empty() {
            return None;
        }
        let payload = self.data.join("\n");
        self.data.clear();

        match serde_json::from_str::<StreamChunk>(&payload) {
            Ok(chunk) => chunk.into_fragment(),
            Err(e) => {
                tracing::warn!(error = %e, "malformed Gemini stream chunk");
                Some(Fragment::error(format!("malformed response chunk: {e}")))
            }
        }
    }
}
