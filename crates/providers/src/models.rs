use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Options forwarded to the HTTP client of a real provider (timeouts, proxies, headers)
pub type ClientOptions = serde_json::Map<String, serde_json::Value>;

/// Provider-specific request options, keyed by option name
pub type ProviderOptions = serde_json::Map<String, serde_json::Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinishReason {
    Stop,
    Length,
    ContentFilter,
    ToolCalls,
    Error,
    Other,
    #[default]
    Unknown,
}

/// Token usage reported for a generation
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_write_input_tokens: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_read_input_tokens: Option<u32>,
    /// Tokens spent on hidden reasoning, for models that report it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thought_tokens: Option<u32>,
}

impl TokenUsage {
    pub fn new(prompt_tokens: u32, completion_tokens: u32) -> Self {
        Self {
            prompt_tokens,
            completion_tokens,
            cache_write_input_tokens: None,
            cache_read_input_tokens: None,
            thought_tokens: None,
        }
    }

    pub fn total_tokens(&self) -> u32 {
        self.prompt_tokens + self.completion_tokens
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EmbeddingsUsage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tokens: Option<u32>,
}

impl EmbeddingsUsage {
    pub fn new(tokens: u32) -> Self {
        Self {
            tokens: Some(tokens),
        }
    }
}

/// Rate limit state reported by the provider alongside a response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimit {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remaining: Option<u64>,
    /// RFC 3339 timestamp at which the limit resets
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resets_at: Option<String>,
}

/// Provider metadata attached to every response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meta {
    /// Response identifier assigned by the provider
    pub id: String,
    /// Model that produced the response
    pub model: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rate_limits: Vec<RateLimit>,
}

impl Meta {
    pub fn new(id: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            model: model.into(),
            rate_limits: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
    Assistant,
    Tool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: MessageRole,
    pub content: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tool_calls: Vec<ToolCall>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
}

impl Message {
    fn with_role(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            tool_calls: Vec::new(),
            tool_call_id: None,
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::with_role(MessageRole::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::with_role(MessageRole::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::with_role(MessageRole::Assistant, content)
    }
}

/// Tool definition offered to the model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    /// JSON schema of the tool arguments
    pub parameters: serde_json::Value,
}

/// Tool choice specification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolChoice {
    Auto,
    Any,
    None,
    Tool(String),
}

/// Tool call emitted by the model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    pub id: String,
    pub name: String,
    pub arguments: serde_json::Value,
}

/// Result of running a tool call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolResult {
    pub tool_call_id: String,
    pub tool_name: String,
    pub args: serde_json::Value,
    pub result: serde_json::Value,
}

/// A single generation step in a multi-step (tool calling) exchange
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Step {
    pub text: String,
    pub finish_reason: FinishReason,
    #[serde(default)]
    pub tool_calls: Vec<ToolCall>,
    #[serde(default)]
    pub tool_results: Vec<ToolResult>,
    #[serde(default)]
    pub usage: TokenUsage,
    pub meta: Meta,
}

/// Retry policy a real provider would apply to its HTTP client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientRetry {
    pub times: u32,
    #[serde(default)]
    pub sleep_milliseconds: u64,
    /// Whether the final failure is surfaced as an error
    #[serde(default = "default_retry_throw")]
    pub throw: bool,
}

fn default_retry_throw() -> bool {
    true
}

/// JSON schema the structured output must conform to
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Schema {
    pub name: String,
    pub definition: serde_json::Value,
    #[serde(default)]
    pub strict: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StructuredMode {
    #[default]
    Auto,
    Structured,
    Json,
}

/// Parameters for text generation
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TextRequest {
    pub model: String,
    #[serde(default)]
    pub system_prompts: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    #[serde(default)]
    pub messages: Vec<Message>,
    /// Maximum number of tool-calling round trips
    #[serde(default)]
    pub max_steps: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f32>,
    #[serde(default)]
    pub tools: Vec<ToolDefinition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_choice: Option<ToolChoice>,
    #[serde(default)]
    pub client_options: ClientOptions,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_retry: Option<ClientRetry>,
    #[serde(default)]
    pub provider_options: ProviderOptions,
}

impl TextRequest {
    pub fn new(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            prompt: Some(prompt.into()),
            max_steps: 1,
            ..Default::default()
        }
    }
}

/// Parameters for structured (schema-constrained) generation
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StructuredRequest {
    pub model: String,
    #[serde(default)]
    pub system_prompts: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    #[serde(default)]
    pub messages: Vec<Message>,
    pub schema: Schema,
    #[serde(default)]
    pub mode: StructuredMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f32>,
    #[serde(default)]
    pub client_options: ClientOptions,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_retry: Option<ClientRetry>,
    #[serde(default)]
    pub provider_options: ProviderOptions,
}

impl StructuredRequest {
    pub fn new(model: impl Into<String>, prompt: impl Into<String>, schema: Schema) -> Self {
        Self {
            model: model.into(),
            prompt: Some(prompt.into()),
            schema,
            ..Default::default()
        }
    }
}

/// Parameters for an embeddings request
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EmbeddingRequest {
    pub model: String,
    pub inputs: Vec<String>,
    #[serde(default)]
    pub client_options: ClientOptions,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_retry: Option<ClientRetry>,
    #[serde(default)]
    pub provider_options: ProviderOptions,
}

impl EmbeddingRequest {
    pub fn new(model: impl Into<String>, inputs: Vec<String>) -> Self {
        Self {
            model: model.into(),
            inputs,
            ..Default::default()
        }
    }
}

/// Parameters for image generation
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ImageRequest {
    pub model: String,
    pub prompt: String,
    #[serde(default)]
    pub client_options: ClientOptions,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_retry: Option<ClientRetry>,
    #[serde(default)]
    pub provider_options: ProviderOptions,
}

impl ImageRequest {
    pub fn new(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            prompt: prompt.into(),
            ..Default::default()
        }
    }
}

/// Any request a provider capability accepts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProviderRequest {
    Text(TextRequest),
    Structured(StructuredRequest),
    Embeddings(EmbeddingRequest),
    Images(ImageRequest),
}

impl ProviderRequest {
    /// Capability name of this request
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Text(_) => "text",
            Self::Structured(_) => "structured",
            Self::Embeddings(_) => "embeddings",
            Self::Images(_) => "images",
        }
    }

    pub fn model(&self) -> &str {
        match self {
            Self::Text(r) => &r.model,
            Self::Structured(r) => &r.model,
            Self::Embeddings(r) => &r.model,
            Self::Images(r) => &r.model,
        }
    }

    pub fn client_options(&self) -> &ClientOptions {
        match self {
            Self::Text(r) => &r.client_options,
            Self::Structured(r) => &r.client_options,
            Self::Embeddings(r) => &r.client_options,
            Self::Images(r) => &r.client_options,
        }
    }

    pub fn client_retry(&self) -> Option<&ClientRetry> {
        match self {
            Self::Text(r) => r.client_retry.as_ref(),
            Self::Structured(r) => r.client_retry.as_ref(),
            Self::Embeddings(r) => r.client_retry.as_ref(),
            Self::Images(r) => r.client_retry.as_ref(),
        }
    }

    pub fn as_text(&self) -> Option<&TextRequest> {
        match self {
            Self::Text(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_structured(&self) -> Option<&StructuredRequest> {
        match self {
            Self::Structured(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_embeddings(&self) -> Option<&EmbeddingRequest> {
        match self {
            Self::Embeddings(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_images(&self) -> Option<&ImageRequest> {
        match self {
            Self::Images(r) => Some(r),
            _ => None,
        }
    }
}

impl From<TextRequest> for ProviderRequest {
    fn from(request: TextRequest) -> Self {
        Self::Text(request)
    }
}

impl From<StructuredRequest> for ProviderRequest {
    fn from(request: StructuredRequest) -> Self {
        Self::Structured(request)
    }
}

impl From<EmbeddingRequest> for ProviderRequest {
    fn from(request: EmbeddingRequest) -> Self {
        Self::Embeddings(request)
    }
}

impl From<ImageRequest> for ProviderRequest {
    fn from(request: ImageRequest) -> Self {
        Self::Images(request)
    }
}

/// Complete text generation response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextResponse {
    /// Final generated text
    pub text: String,

    /// Generation steps, one per model round trip
    #[serde(default)]
    pub steps: Vec<Step>,

    /// Messages produced by the model during this generation
    #[serde(default)]
    pub response_messages: Vec<Message>,

    #[serde(default)]
    pub tool_calls: Vec<ToolCall>,

    #[serde(default)]
    pub tool_results: Vec<ToolResult>,

    #[serde(default)]
    pub usage: TokenUsage,

    #[serde(default)]
    pub finish_reason: FinishReason,

    pub meta: Meta,

    /// Full conversation including the request messages
    #[serde(default)]
    pub messages: Vec<Message>,
}

/// Complete structured generation response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructuredResponse {
    /// Raw text the structured value was parsed from
    pub text: String,

    /// Parsed structured output
    #[serde(default)]
    pub structured: serde_json::Value,

    #[serde(default)]
    pub steps: Vec<Step>,

    #[serde(default)]
    pub response_messages: Vec<Message>,

    #[serde(default)]
    pub usage: TokenUsage,

    #[serde(default)]
    pub finish_reason: FinishReason,

    pub meta: Meta,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Embedding {
    pub embedding: Vec<f32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbeddingResponse {
    #[serde(default)]
    pub embeddings: Vec<Embedding>,

    #[serde(default)]
    pub usage: EmbeddingsUsage,

    #[serde(default)]
    pub finish_reason: FinishReason,

    pub meta: Meta,
}

/// Image returned by an image generation request, either hosted or inline
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GeneratedImage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base64: Option<String>,
    /// Prompt as rewritten by the provider before generation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revised_prompt: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageResponse {
    #[serde(default)]
    pub images: Vec<GeneratedImage>,

    #[serde(default)]
    pub usage: TokenUsage,

    #[serde(default)]
    pub finish_reason: FinishReason,

    pub meta: Meta,
}

/// Any response a provider capability can produce
///
/// Tagged on `type` so that response chains can be kept as JSON fixtures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProviderResponse {
    Text(TextResponse),
    Structured(StructuredResponse),
    Embeddings(EmbeddingResponse),
    Images(ImageResponse),
}

impl ProviderResponse {
    /// Capability name of this response
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Text(_) => "text",
            Self::Structured(_) => "structured",
            Self::Embeddings(_) => "embeddings",
            Self::Images(_) => "images",
        }
    }

    pub fn meta(&self) -> &Meta {
        match self {
            Self::Text(r) => &r.meta,
            Self::Structured(r) => &r.meta,
            Self::Embeddings(r) => &r.meta,
            Self::Images(r) => &r.meta,
        }
    }

    pub fn finish_reason(&self) -> FinishReason {
        match self {
            Self::Text(r) => r.finish_reason,
            Self::Structured(r) => r.finish_reason,
            Self::Embeddings(r) => r.finish_reason,
            Self::Images(r) => r.finish_reason,
        }
    }
}

impl From<TextResponse> for ProviderResponse {
    fn from(response: TextResponse) -> Self {
        Self::Text(response)
    }
}

impl From<StructuredResponse> for ProviderResponse {
    fn from(response: StructuredResponse) -> Self {
        Self::Structured(response)
    }
}

impl From<EmbeddingResponse> for ProviderResponse {
    fn from(response: EmbeddingResponse) -> Self {
        Self::Embeddings(response)
    }
}

impl From<ImageResponse> for ProviderResponse {
    fn from(response: ImageResponse) -> Self {
        Self::Images(response)
    }
}

/// Text stream chunk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextChunk {
    /// Incremental text delta
    pub text: String,

    /// Reason why generation finished (only in the final chunk)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<FinishReason>,

    /// Usage statistics (typically only in the final chunk)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<TokenUsage>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProviderError {
    #[error("{method} is not supported by {provider}")]
    UnsupportedAction { method: String, provider: String },
    #[error("{provider} call {call} expected a queued {expected} response but found {found}")]
    ResponseMismatch {
        provider: String,
        call: usize,
        expected: &'static str,
        found: &'static str,
    },
}

impl ProviderError {
    pub fn unsupported_action(method: impl Into<String>, provider: impl Into<String>) -> Self {
        Self::UnsupportedAction {
            method: method.into(),
            provider: provider.into(),
        }
    }
}
