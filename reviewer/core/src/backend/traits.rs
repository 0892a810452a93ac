//! LLM Backend Traits
//!
//! The agent talks to its model through [`LlmBackend`] only, so tests can
//! swap the Gemini client for a scripted one.

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::stream::Fragment;

/// One generation request
#[derive(Clone, Debug, PartialEq)]
pub struct GenerateRequest {
    /// Full prompt text, sent as a single user turn
    pub prompt: String,
    /// Backend-specific model identifier
    pub model: String,
}

impl GenerateRequest {
    /// Create a request with prompt and model
    pub fn new(prompt: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            model: model.into(),
        }
    }
}

/// Streaming text generation provider
#[async_trait]
pub trait LlmBackend: Send + Sync {
    /// Backend name for logs
    fn name(&self) -> &str;

    /// Start a generation and return its fragment stream.
    ///
    /// The channel yields text fragments in arrival order and closes when the
    /// response is complete. A failure after the request was accepted arrives
    /// as a final [`Fragment::Error`].
    ///
    /// # Errors
    ///
    /// Fails if the request could not be sent or was rejected outright.
    async fn send_streaming(
        &self,
        request: &GenerateRequest,
    ) -> anyhow::Result<mpsc::Receiver<Fragment>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_request_new() {
        let request = GenerateRequest::new("Hello", "gemini-2.5-flash");

        assert_eq!(request.prompt, "Hello");
        assert_eq!(request.model, "gemini-2.5-flash");
    }
}
