//! Provider abstraction over LLM backends, plus the test doubles used to exercise it
//!
//! A provider exposes up to five capabilities: text generation, structured
//! generation, embeddings, image generation and text streaming. Concrete
//! providers override the capabilities they support; everything else fails with
//! [`ProviderError::UnsupportedAction`].
//!
//! # Testing without a backend
//!
//! [`FakeProvider`] answers every capability call from a queue of canned
//! responses, falling back to fixed placeholder responses once the queue runs
//! out, and records the last request together with a call counter.
//!
//! ```rust,no_run
//! use providers::{FakeProvider, Provider, ProviderError, TextRequest, TextResponse};
//!
//! async fn example(first: TextResponse, second: TextResponse) -> Result<(), ProviderError> {
//!     let expected = first.text.clone();
//!     let mut provider = FakeProvider::new();
//!     provider.enqueue_response(first).enqueue_response(second);
//!
//!     let reply = provider
//!         .text(TextRequest::new("claude-3-5-sonnet-20240620", "Who are you?"))
//!         .await?;
//!
//!     assert_eq!(reply.text, expected);
//!     assert_eq!(provider.call_count(), 1);
//!     assert_eq!(
//!         provider.request().and_then(|r| r.as_text()).and_then(|r| r.prompt.as_deref()),
//!         Some("Who are you?")
//!     );
//!     Ok(())
//! }
//! ```

pub mod fake;
pub mod fixtures;
pub mod models;

use std::pin::Pin;

use async_trait::async_trait;
use futures_core::Stream;

// Re-export commonly used types for convenience
pub use fake::FakeProvider;
pub use fixtures::FixtureError;
pub use models::{
    ClientOptions, ClientRetry, Embedding, EmbeddingRequest, EmbeddingResponse,
    EmbeddingsUsage, FinishReason, GeneratedImage, ImageRequest, ImageResponse, Message,
    MessageRole, Meta, ProviderError, ProviderOptions, ProviderRequest, ProviderResponse,
    RateLimit, Schema, Step, StructuredMode, StructuredRequest, StructuredResponse, TextChunk,
    TextRequest, TextResponse, TokenUsage, ToolCall, ToolChoice, ToolDefinition, ToolResult,
};

/// Type alias for streaming text generation results
pub type StreamingResult = Pin<Box<dyn Stream<Item = Result<TextChunk, ProviderError>> + Send>>;

/// Capability interface implemented by every provider
///
/// Methods take `&mut self`: providers may keep per-call state (the fake records
/// requests), and callers sharing one across tasks must synchronise externally.
#[async_trait]
pub trait Provider: Send {
    /// Name used to identify this provider in errors and logs
    fn name(&self) -> &str;

    /// Generates text for a prompt or conversation
    async fn text(&mut self, _request: TextRequest) -> Result<TextResponse, ProviderError> {
        Err(self.unsupported("text"))
    }

    /// Generates output constrained to the request's JSON schema
    async fn structured(
        &mut self,
        _request: StructuredRequest,
    ) -> Result<StructuredResponse, ProviderError> {
        Err(self.unsupported("structured"))
    }

    async fn embeddings(
        &mut self,
        _request: EmbeddingRequest,
    ) -> Result<EmbeddingResponse, ProviderError> {
        Err(self.unsupported("embeddings"))
    }

    async fn images(&mut self, _request: ImageRequest) -> Result<ImageResponse, ProviderError> {
        Err(self.unsupported("images"))
    }

    /// Performs a streaming text generation request
    ///
    /// Returns a stream of `TextChunk` items; usage and finish reason arrive
    /// with the final chunk.
    async fn stream(&mut self, _request: TextRequest) -> Result<StreamingResult, ProviderError> {
        Err(self.unsupported("stream"))
    }

    /// Builds the error returned for a capability this provider lacks
    fn unsupported(&self, method: &str) -> ProviderError {
        let provider = self.name();
        tracing::warn!(provider, method, "unsupported provider action");
        ProviderError::unsupported_action(format!("{provider}::{method}"), provider)
    }
}
