//! Review Agent
//!
//! Turns a diff into a report by prompting an [`LlmBackend`] and folding the
//! streamed answer with [`aggregate_stream`].
//!
//! ```text
//! diff ──▶ PromptKind::build ──▶ send_streaming ──▶ aggregate_stream ──▶ String
//! ```

mod prompt;

pub use prompt::PromptKind;

use tokio_stream::wrappers::ReceiverStream;
use tracing::{debug, info};

use crate::backend::{GenerateRequest, LlmBackend};
use crate::stream::{aggregate_stream, GenerationError, StreamError};

/// Prompt sent to check that a model name is usable
const VALIDATION_PROMPT: &str = "Hi";

/// Model suggested when the user has not picked one
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Language used when the user has not picked one
pub const DEFAULT_LANGUAGE: &str = "Korean";

/// Review/fix/document agent over a backend
pub struct Agent<B: LlmBackend> {
    backend: B,
    model: String,
    language: String,
}

impl<B: LlmBackend> Agent<B> {
    /// Create an agent answering in `language` with `model`
    pub fn new(backend: B, model: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            backend,
            model: model.into(),
            language: language.into(),
        }
    }

    /// Model identifier
    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Output language
    #[must_use]
    pub fn language(&self) -> &str {
        &self.language
    }

    /// Graded review report for `diff`
    ///
    /// # Errors
    ///
    /// See [`generate`](Self::generate).
    pub async fn analyze(&self, diff: &str) -> Result<String, GenerationError> {
        self.complete(PromptKind::Review, diff).await
    }

    /// Proposed fix for `diff`
    ///
    /// # Errors
    ///
    /// See [`generate`](Self::generate).
    pub async fn fix(&self, diff: &str) -> Result<String, GenerationError> {
        self.complete(PromptKind::Fix, diff).await
    }

    /// Technical documentation for `diff`
    ///
    /// # Errors
    ///
    /// See [`generate`](Self::generate).
    pub async fn document(&self, diff: &str) -> Result<String, GenerationError> {
        self.complete(PromptKind::Document, diff).await
    }

    /// Build the `kind` prompt for `diff` and generate the answer
    ///
    /// # Errors
    ///
    /// See [`generate`](Self::generate).
    pub async fn complete(&self, kind: PromptKind, diff: &str) -> Result<String, GenerationError> {
        info!(?kind, diff_bytes = diff.len(), model = %self.model, "generating");
        self.generate(kind.build(&self.language, diff)).await
    }

    /// Send `prompt` and aggregate the streamed response.
    ///
    /// # Errors
    ///
    /// [`GenerationError::Stream`] if the request could not be started or
    /// the stream failed, [`GenerationError::NoContent`] if it carried no
    /// text.
    pub async fn generate(&self, prompt: String) -> Result<String, GenerationError> {
        let request = GenerateRequest::new(prompt, self.model.clone());
        let rx = self
            .backend
            .send_streaming(&request)
            .await
            .map_err(setup_failure)?;

        aggregate_stream(ReceiverStream::new(rx)).await
    }

    /// Check that `model` answers a trivial prompt; see [`validate_model`]
    ///
    /// # Errors
    ///
    /// Same as [`validate_model`].
    pub async fn validate_model(&self, model: &str) -> Result<(), StreamError> {
        validate_model(&self.backend, model).await
    }
}

/// Send a minimal prompt to `model` and drain the answer.
///
/// An empty answer still counts as valid; only a failed request or an error
/// fragment does not.
///
/// # Errors
///
/// The reason the model is unusable.
pub async fn validate_model<B>(backend: &B, model: &str) -> Result<(), StreamError>
where
    B: LlmBackend + ?Sized,
{
    debug!(model, backend = backend.name(), "validating model");
    let request = GenerateRequest::new(VALIDATION_PROMPT, model);
    let mut rx = backend
        .send_streaming(&request)
        .await
        .map_err(|err| StreamError::new(format!("{err:#}")))?;

    while let Some(fragment) = rx.recv().await {
        if let crate::stream::Fragment::Error(err) = fragment {
            return Err(err);
        }
    }
    Ok(())
}

fn setup_failure(err: anyhow::Error) -> GenerationError {
    GenerationError::Stream(StreamError::new(format!("{err:#}")))
}
