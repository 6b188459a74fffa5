//! Model Gateway Port - Interface for the remote multimodal model provider.
//!
//! This port abstracts all interactions with the model provider, enabling
//! the analysis, synthesis, critique, and chat components to generate
//! content without coupling to a specific provider or transport.
//!
//! # Design
//!
//! - One request shape for every call: an ordered sequence of parts (text
//!   or inline image), plus options for structured output and tools
//! - One response shape: optional text, ordered inline image payloads, and
//!   function-call requests
//! - Error types for common failure modes (rate limits, timeouts, etc.)
//!
//! # Example
//!
//! ```ignore
//! use async_trait::async_trait;
//!
//! struct MockGateway;
//!
//! #[async_trait]
//! impl ModelGateway for MockGateway {
//!     async fn generate(&self, request: GenerationRequest) -> Result<GenerationResponse, GatewayError> {
//!         Ok(GenerationResponse::text_only("Hello!"))
//!     }
//!     // ... other methods
//! }
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::chat::{FunctionCallRequest, ToolDefinition};
use crate::domain::image::ImageData;

/// Port for remote model interactions.
///
/// Implementations connect to an external model service and translate
/// between the provider-specific API and these types.
#[async_trait]
pub trait ModelGateway: Send + Sync {
    /// Generate content for a multi-part request.
    ///
    /// Every call is a single bounded remote operation; timeouts surface as
    /// [`GatewayError::Timeout`] and are recoverable per call.
    async fn generate(&self, request: GenerationRequest) -> Result<GenerationResponse, GatewayError>;

    /// Get gateway information (provider name, capabilities).
    fn gateway_info(&self) -> GatewayInfo;
}

/// One part of a multi-part request, in content order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentPart {
    /// A text instruction or transcript fragment.
    Text(String),
    /// An inline image payload.
    InlineImage(ImageData),
}

/// Request for model generation.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    /// Model identifier (e.g. "gemini-2.5-flash").
    pub model: String,
    /// Ordered content parts.
    pub parts: Vec<ContentPart>,
    /// Whether machine-structured (JSON) output is requested.
    pub structured_output: bool,
    /// Capabilities the model may invoke.
    pub tools: Vec<ToolDefinition>,
}

impl GenerationRequest {
    /// Creates a new request for the given model.
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            parts: Vec::new(),
            structured_output: false,
            tools: Vec::new(),
        }
    }

    /// Appends a text part.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.parts.push(ContentPart::Text(text.into()));
        self
    }

    /// Appends an inline image part.
    pub fn with_image(mut self, image: ImageData) -> Self {
        self.parts.push(ContentPart::InlineImage(image));
        self
    }

    /// Requests machine-structured (JSON) output.
    pub fn with_structured_output(mut self) -> Self {
        self.structured_output = true;
        self
    }

    /// Exposes a callable capability to the model.
    pub fn with_tool(mut self, tool: ToolDefinition) -> Self {
        self.tools.push(tool);
        self
    }

    /// Exposes several callable capabilities to the model.
    pub fn with_tools(mut self, tools: impl IntoIterator<Item = ToolDefinition>) -> Self {
        self.tools.extend(tools);
        self
    }

    /// Returns the number of image parts.
    pub fn image_part_count(&self) -> usize {
        self.parts
            .iter()
            .filter(|p| matches!(p, ContentPart::InlineImage(_)))
            .count()
    }
}

/// Response from model generation.
#[derive(Debug, Clone, Default)]
pub struct GenerationResponse {
    /// Concatenated text parts, if any.
    pub text: Option<String>,
    /// Inline image payloads, in response order.
    pub images: Vec<ImageData>,
    /// Function-call requests, in response order.
    pub function_calls: Vec<FunctionCallRequest>,
}

impl GenerationResponse {
    /// Creates a text-only response.
    pub fn text_only(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            images: Vec::new(),
            function_calls: Vec::new(),
        }
    }

    /// Creates an image-bearing response.
    pub fn with_image(mut self, image: ImageData) -> Self {
        self.images.push(image);
        self
    }

    /// Creates a function-call-bearing response.
    pub fn with_function_call(mut self, call: FunctionCallRequest) -> Self {
        self.function_calls.push(call);
        self
    }

    /// Returns the first inline image payload, if any.
    pub fn first_image(&self) -> Option<&ImageData> {
        self.images.first()
    }

    /// Returns the first function-call request, if any.
    pub fn first_function_call(&self) -> Option<&FunctionCallRequest> {
        self.function_calls.first()
    }

    /// Returns the text, or an empty string when the model sent none.
    pub fn text_or_empty(&self) -> &str {
        self.text.as_deref().unwrap_or("")
    }
}

/// Gateway information and capabilities.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayInfo {
    /// Provider name (e.g. "gemini", "mock").
    pub name: String,
    /// Whether inline image output is supported.
    pub supports_images: bool,
    /// Whether function calling is supported.
    pub supports_functions: bool,
}

impl GatewayInfo {
    /// Creates new gateway info.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            supports_images: true,
            supports_functions: true,
        }
    }

    /// Sets image output support.
    pub fn with_images(mut self, supports: bool) -> Self {
        self.supports_images = supports;
        self
    }

    /// Sets function calling support.
    pub fn with_functions(mut self, supports: bool) -> Self {
        self.supports_functions = supports;
        self
    }
}

/// Gateway errors.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// Rate limited by provider.
    #[error("rate limited: retry after {retry_after_secs}s")]
    RateLimited {
        /// Seconds until retry is allowed.
        retry_after_secs: u32,
    },

    /// Provider is unavailable.
    #[error("provider unavailable: {message}")]
    Unavailable {
        /// Error details.
        message: String,
    },

    /// API key or authentication failed.
    #[error("authentication failed")]
    AuthenticationFailed,

    /// Network error during request.
    #[error("network error: {0}")]
    Network(String),

    /// Request timed out.
    #[error("request timed out after {timeout_secs}s")]
    Timeout {
        /// Configured timeout.
        timeout_secs: u32,
    },

    /// Invalid request configuration.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Failed to decode the provider response envelope.
    #[error("response decode error: {0}")]
    Decode(String),
}

impl GatewayError {
    /// Creates a rate limited error.
    pub fn rate_limited(retry_after_secs: u32) -> Self {
        Self::RateLimited { retry_after_secs }
    }

    /// Creates an unavailable error.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    /// Creates a network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    /// Creates a decode error.
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode(message.into())
    }

    /// Returns true if this error is retryable.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            GatewayError::RateLimited { .. }
                | GatewayError::Unavailable { .. }
                | GatewayError::Network(_)
                | GatewayError::Timeout { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_image() -> ImageData {
        ImageData::jpeg(vec![1, 2, 3]).unwrap()
    }

    #[test]
    fn request_builder_preserves_part_order() {
        let request = GenerationRequest::new("gemini-2.5-flash")
            .with_image(test_image())
            .with_text("Analyze the face in this image.");

        assert_eq!(request.parts.len(), 2);
        assert!(matches!(request.parts[0], ContentPart::InlineImage(_)));
        assert!(matches!(request.parts[1], ContentPart::Text(_)));
        assert_eq!(request.image_part_count(), 1);
    }

    #[test]
    fn request_defaults_to_unstructured_no_tools() {
        let request = GenerationRequest::new("gemini-2.5-flash");
        assert!(!request.structured_output);
        assert!(request.tools.is_empty());
    }

    #[test]
    fn request_with_structured_output_sets_flag() {
        let request = GenerationRequest::new("m").with_structured_output();
        assert!(request.structured_output);
    }

    #[test]
    fn request_with_tools_extends() {
        let tool = ToolDefinition::new("t", "d", serde_json::json!({}));
        let request = GenerationRequest::new("m").with_tools(vec![tool.clone(), tool]);
        assert_eq!(request.tools.len(), 2);
    }

    #[test]
    fn response_first_image_respects_order() {
        let first = ImageData::png(vec![1]).unwrap();
        let second = ImageData::png(vec![2]).unwrap();
        let response = GenerationResponse::default()
            .with_image(first.clone())
            .with_image(second);

        assert_eq!(response.first_image(), Some(&first));
    }

    #[test]
    fn response_text_or_empty_handles_missing_text() {
        let response = GenerationResponse::default();
        assert_eq!(response.text_or_empty(), "");

        let response = GenerationResponse::text_only("hi");
        assert_eq!(response.text_or_empty(), "hi");
    }

    #[test]
    fn response_first_function_call() {
        let call = FunctionCallRequest::new("modify_hairstyle", serde_json::json!({}));
        let response = GenerationResponse::default().with_function_call(call.clone());
        assert_eq!(response.first_function_call(), Some(&call));
    }

    #[test]
    fn gateway_info_builder_works() {
        let info = GatewayInfo::new("gemini")
            .with_images(true)
            .with_functions(false);

        assert_eq!(info.name, "gemini");
        assert!(info.supports_images);
        assert!(!info.supports_functions);
    }

    #[test]
    fn gateway_error_retryable_classification() {
        assert!(GatewayError::rate_limited(30).is_retryable());
        assert!(GatewayError::unavailable("down").is_retryable());
        assert!(GatewayError::network("reset").is_retryable());
        assert!(GatewayError::Timeout { timeout_secs: 60 }.is_retryable());

        assert!(!GatewayError::AuthenticationFailed.is_retryable());
        assert!(!GatewayError::InvalidRequest("bad".into()).is_retryable());
        assert!(!GatewayError::decode("bad envelope").is_retryable());
    }

    #[test]
    fn gateway_error_displays_correctly() {
        let err = GatewayError::rate_limited(30);
        assert_eq!(err.to_string(), "rate limited: retry after 30s");

        let err = GatewayError::Timeout { timeout_secs: 60 };
        assert_eq!(err.to_string(), "request timed out after 60s");
    }

    #[tokio::test]
    async fn model_gateway_trait_is_send_sync() {
        fn assert_send_sync<T: Send + Sync + ?Sized>() {}
        assert_send_sync::<dyn ModelGateway>();
    }
}
