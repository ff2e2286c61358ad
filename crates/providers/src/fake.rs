//! Fake implementation of Provider for testing
//!
//! This module provides a provider that answers from a queue of canned responses
//! without contacting any backend, and records what it was asked.

use crate::{
    fixtures::{self, FixtureError},
    EmbeddingRequest, EmbeddingResponse, EmbeddingsUsage, FinishReason, GeneratedImage,
    ImageRequest, ImageResponse, Meta, Provider, ProviderError, ProviderRequest,
    ProviderResponse, StreamingResult, StructuredRequest, StructuredResponse, TextRequest,
    TextResponse, TokenUsage,
};
use async_trait::async_trait;
use config::FixturesConfig;

const PROVIDER_NAME: &str = "FakeProvider";

const DEFAULT_META_ID: &str = "123";
const DEFAULT_TEXT_MODEL: &str = "claude-3-5-sonnet-20240620";
const DEFAULT_EMBEDDING_MODEL: &str = "your-model";
const DEFAULT_IMAGE_MODEL: &str = "dall-e-3";
const DEFAULT_IMAGE_URL: &str = "https://example.com/test-image.png";

/// A response type that can be served from the fake's queue
trait QueuedResponse: Clone + Sized {
    /// Capability name, matching `ProviderResponse::kind`
    const KIND: &'static str;

    fn from_queued(response: &ProviderResponse) -> Option<&Self>;

    /// Response returned once the queue has no entry for the current call
    fn placeholder() -> Self;
}

impl QueuedResponse for TextResponse {
    const KIND: &'static str = "text";

    fn from_queued(response: &ProviderResponse) -> Option<&Self> {
        match response {
            ProviderResponse::Text(r) => Some(r),
            _ => None,
        }
    }

    fn placeholder() -> Self {
        TextResponse {
            text: "I'm nyx!".to_string(),
            steps: Vec::new(),
            response_messages: Vec::new(),
            tool_calls: Vec::new(),
            tool_results: Vec::new(),
            usage: TokenUsage::new(10, 10),
            finish_reason: FinishReason::Stop,
            meta: Meta::new(DEFAULT_META_ID, DEFAULT_TEXT_MODEL),
            messages: Vec::new(),
        }
    }
}

impl QueuedResponse for StructuredResponse {
    const KIND: &'static str = "structured";

    fn from_queued(response: &ProviderResponse) -> Option<&Self> {
        match response {
            ProviderResponse::Structured(r) => Some(r),
            _ => None,
        }
    }

    fn placeholder() -> Self {
        StructuredResponse {
            text: "[]".to_string(),
            structured: serde_json::Value::Array(Vec::new()),
            steps: Vec::new(),
            response_messages: Vec::new(),
            usage: TokenUsage::new(10, 10),
            finish_reason: FinishReason::Stop,
            meta: Meta::new(DEFAULT_META_ID, DEFAULT_TEXT_MODEL),
        }
    }
}

impl QueuedResponse for EmbeddingResponse {
    const KIND: &'static str = "embeddings";

    fn from_queued(response: &ProviderResponse) -> Option<&Self> {
        match response {
            ProviderResponse::Embeddings(r) => Some(r),
            _ => None,
        }
    }

    fn placeholder() -> Self {
        EmbeddingResponse {
            embeddings: Vec::new(),
            usage: EmbeddingsUsage::new(10),
            finish_reason: FinishReason::Stop,
            meta: Meta::new(DEFAULT_META_ID, DEFAULT_EMBEDDING_MODEL),
        }
    }
}

impl QueuedResponse for ImageResponse {
    const KIND: &'static str = "images";

    fn from_queued(response: &ProviderResponse) -> Option<&Self> {
        match response {
            ProviderResponse::Images(r) => Some(r),
            _ => None,
        }
    }

    fn placeholder() -> Self {
        ImageResponse {
            images: vec![GeneratedImage {
                url: Some(DEFAULT_IMAGE_URL.to_string()),
                base64: None,
                revised_prompt: None,
            }],
            usage: TokenUsage::new(10, 10),
            finish_reason: FinishReason::Stop,
            meta: Meta::new(DEFAULT_META_ID, DEFAULT_IMAGE_MODEL),
        }
    }
}

/// Fake provider that implements Provider for testing
///
/// The n-th capability call (counting `text`, `structured`, `embeddings` and
/// `images` together) is answered with the n-th queued response, or with a fixed
/// placeholder once the queue is exhausted. Streaming is never simulated.
#[derive(Debug, Default)]
pub struct FakeProvider {
    /// Responses served in call order
    responses: Vec<ProviderResponse>,
    /// Number of capability calls made so far
    call_count: usize,
    /// Most recent request received by any capability
    request: Option<ProviderRequest>,
}

impl FakeProvider {
    /// Create a fake with no queued responses
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a fake pre-loaded with a response chain
    pub fn with_responses(responses: Vec<ProviderResponse>) -> Self {
        Self {
            responses,
            ..Self::default()
        }
    }

    /// Create a fake pre-loaded with the response chain stored in a fixture file
    pub fn from_fixture(config: &FixturesConfig, name: &str) -> Result<Self, FixtureError> {
        let responses = fixtures::load_response_chain(config, name)?;
        Ok(Self::with_responses(responses))
    }

    /// Append one response to the queue
    pub fn enqueue_response(&mut self, response: impl Into<ProviderResponse>) -> &mut Self {
        self.responses.push(response.into());
        self
    }

    /// Replace the whole queue with `responses`
    pub fn enqueue_response_chain(&mut self, responses: Vec<ProviderResponse>) -> &mut Self {
        self.responses = responses;
        self
    }

    pub fn call_count(&self) -> usize {
        self.call_count
    }

    /// The last request received, if any capability has been called
    pub fn request(&self) -> Option<&ProviderRequest> {
        self.request.as_ref()
    }

    pub fn responses(&self) -> &[ProviderResponse] {
        &self.responses
    }

    /// Record a capability call and pick its response
    fn respond<R: QueuedResponse>(
        &mut self,
        request: impl Into<ProviderRequest>,
    ) -> Result<R, ProviderError> {
        self.call_count += 1;
        self.request = Some(request.into());
        let call = self.call_count;

        match self.responses.get(call - 1) {
            None => {
                tracing::debug!(
                    capability = R::KIND,
                    call,
                    queued = self.responses.len(),
                    "Queue exhausted, returning placeholder response"
                );
                Ok(R::placeholder())
            }
            Some(queued) => match R::from_queued(queued) {
                Some(response) => {
                    tracing::debug!(capability = R::KIND, call, "Returning queued response");
                    Ok(response.clone())
                }
                None => {
                    tracing::warn!(
                        capability = R::KIND,
                        call,
                        found = queued.kind(),
                        "Queued response does not match the capability"
                    );
                    Err(ProviderError::ResponseMismatch {
                        provider: PROVIDER_NAME.to_string(),
                        call,
                        expected: R::KIND,
                        found: queued.kind(),
                    })
                }
            },
        }
    }
}

#[async_trait]
impl Provider for FakeProvider {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    async fn text(&mut self, request: TextRequest) -> Result<TextResponse, ProviderError> {
        self.respond(request)
    }

    async fn structured(
        &mut self,
        request: StructuredRequest,
    ) -> Result<StructuredResponse, ProviderError> {
        self.respond(request)
    }

    async fn embeddings(
        &mut self,
        request: EmbeddingRequest,
    ) -> Result<EmbeddingResponse, ProviderError> {
        self.respond(request)
    }

    async fn images(&mut self, request: ImageRequest) -> Result<ImageResponse, ProviderError> {
        self.respond(request)
    }

    // Not a recorded call: the counter and last request stay untouched.
    async fn stream(&mut self, _request: TextRequest) -> Result<StreamingResult, ProviderError> {
        Err(self.unsupported("stream"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Schema;

    fn text_response(text: &str) -> TextResponse {
        TextResponse {
            text: text.to_string(),
            ..TextResponse::placeholder()
        }
    }

    #[tokio::test]
    async fn test_empty_queue_returns_placeholders() {
        let mut provider = FakeProvider::new();

        let text = provider
            .text(TextRequest::new("gpt-4o", "hello"))
            .await
            .unwrap();
        assert_eq!(text.text, "I'm nyx!");
        assert_eq!(text.usage, TokenUsage::new(10, 10));
        assert_eq!(text.finish_reason, FinishReason::Stop);
        assert_eq!(text.meta, Meta::new("123", "claude-3-5-sonnet-20240620"));

        let structured = provider
            .structured(StructuredRequest::new("gpt-4o", "hello", Schema::default()))
            .await
            .unwrap();
        assert_eq!(structured.text, "[]");
        assert_eq!(structured.structured, serde_json::json!([]));
        assert_eq!(structured.meta.model, "claude-3-5-sonnet-20240620");

        let embeddings = provider
            .embeddings(EmbeddingRequest::new("text-embedding-3-small", vec![]))
            .await
            .unwrap();
        assert!(embeddings.embeddings.is_empty());
        assert_eq!(embeddings.usage, EmbeddingsUsage::new(10));
        assert_eq!(embeddings.meta, Meta::new("123", "your-model"));

        let images = provider
            .images(ImageRequest::new("dall-e-3", "a cat"))
            .await
            .unwrap();
        assert_eq!(images.images.len(), 1);
        assert_eq!(
            images.images[0].url.as_deref(),
            Some("https://example.com/test-image.png")
        );
        assert_eq!(images.images[0].revised_prompt, None);
        assert_eq!(images.meta, Meta::new("123", "dall-e-3"));

        assert_eq!(provider.call_count(), 4);
    }

    #[tokio::test]
    async fn test_queued_responses_are_served_in_order() {
        let mut provider = FakeProvider::new();
        provider
            .enqueue_response(text_response("first"))
            .enqueue_response(text_response("second"));

        let first = provider.text(TextRequest::new("m", "1")).await.unwrap();
        let second = provider.text(TextRequest::new("m", "2")).await.unwrap();

        assert_eq!(first, text_response("first"));
        assert_eq!(second, text_response("second"));
        assert_eq!(provider.call_count(), 2);
    }

    #[tokio::test]
    async fn test_falls_back_after_queue_is_exhausted() {
        let mut provider = FakeProvider::with_responses(vec![text_response("only").into()]);

        let first = provider.text(TextRequest::new("m", "1")).await.unwrap();
        let second = provider.text(TextRequest::new("m", "2")).await.unwrap();

        assert_eq!(first.text, "only");
        assert_eq!(second, TextResponse::placeholder());
    }

    #[tokio::test]
    async fn test_call_index_is_shared_across_capabilities() {
        let placeholder_image = ImageResponse::placeholder();
        let mut provider = FakeProvider::new();
        provider
            .enqueue_response(text_response("chat"))
            .enqueue_response(ImageResponse {
                images: vec![GeneratedImage {
                    base64: Some("aGVsbG8=".to_string()),
                    ..Default::default()
                }],
                ..placeholder_image
            });

        provider.text(TextRequest::new("m", "1")).await.unwrap();
        let images = provider
            .images(ImageRequest::new("dall-e-3", "2"))
            .await
            .unwrap();

        assert_eq!(images.images[0].base64.as_deref(), Some("aGVsbG8="));
        assert_eq!(provider.call_count(), 2);
    }

    #[tokio::test]
    async fn test_last_request_wins() {
        let mut provider = FakeProvider::new();

        provider.text(TextRequest::new("m", "first")).await.unwrap();
        provider
            .embeddings(EmbeddingRequest::new("emb", vec!["second".to_string()]))
            .await
            .unwrap();

        let request = provider.request().unwrap();
        assert_eq!(request.kind(), "embeddings");
        assert!(request.as_text().is_none());
        assert_eq!(request.as_embeddings().unwrap().inputs, vec!["second"]);
    }

    #[tokio::test]
    async fn test_chain_replaces_queue() {
        let mut provider = FakeProvider::new();
        provider
            .enqueue_response(text_response("stale"))
            .enqueue_response_chain(vec![text_response("fresh").into()]);

        assert_eq!(provider.responses().len(), 1);
        let response = provider.text(TextRequest::new("m", "1")).await.unwrap();
        assert_eq!(response.text, "fresh");
    }

    #[tokio::test]
    async fn test_mismatched_queue_entry_is_an_error() {
        let mut provider = FakeProvider::new();
        provider.enqueue_response(ImageResponse::placeholder());

        let err = provider
            .text(TextRequest::new("m", "1"))
            .await
            .unwrap_err();

        assert_eq!(
            err,
            ProviderError::ResponseMismatch {
                provider: "FakeProvider".to_string(),
                call: 1,
                expected: "text",
                found: "images",
            }
        );
        assert_eq!(provider.call_count(), 1);
        assert!(provider.request().unwrap().as_text().is_some());
    }

    #[tokio::test]
    async fn test_stream_is_unsupported_and_unrecorded() {
        let mut provider = FakeProvider::new();
        provider.enqueue_response(text_response("queued"));

        let err = match provider.stream(TextRequest::new("m", "1")).await {
            Ok(_) => panic!("stream must not be supported"),
            Err(err) => err,
        };

        assert_eq!(
            err,
            ProviderError::unsupported_action("FakeProvider::stream", "FakeProvider")
        );
        assert_eq!(provider.call_count(), 0);
        assert!(provider.request().is_none());
    }
}
