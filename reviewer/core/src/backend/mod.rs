//! LLM Backend Integration
//!
//! Abstracted access to the model behind a common trait.
//!
//! # Available Backends
//!
//! - **Gemini**: Google Generative Language API over SSE (default)
//!
//! # Usage
//!
//! ```ignore
//! use reviewer_core::backend::{GeminiBackend, GenerateRequest, LlmBackend};
//!
//! let backend = GeminiBackend::from_config(&config)?;
//! let request = GenerateRequest::new("Hi", "gemini-2.5-flash");
//! let rx = backend.send_streaming(&request).await?;
//! ```

mod gemini;
mod traits;

pub use gemini::{GeminiBackend, DEFAULT_API_BASE};
pub use traits::{GenerateRequest, LlmBackend};
