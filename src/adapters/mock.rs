//! Mock Model Gateway for testing.
//!
//! Provides a configurable mock implementation of the ModelGateway port,
//! allowing tests to run without calling the real API.
//!
//! # Features
//!
//! - Pre-configured replies (consumed in order)
//! - Simulated delays for timeout/serialization testing
//! - Error injection for resilience testing
//! - Call tracking for verification
//!
//! # Example
//!
//! ```ignore
//! let gateway = MockModelGateway::new()
//!     .with_text("Hello, I'm the stylist!")
//!     .with_delay(Duration::from_millis(100));
//!
//! let response = gateway.generate(request).await?;
//! assert_eq!(response.text_or_empty(), "Hello, I'm the stylist!");
//! ```

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::sleep;

use crate::domain::chat::FunctionCallRequest;
use crate::domain::image::ImageData;
use crate::ports::{
    GatewayError, GatewayInfo, GenerationRequest, GenerationResponse, ModelGateway,
};

/// A configured mock reply.
#[derive(Debug, Clone)]
enum MockReply {
    Success(GenerationResponse),
    Failure(MockFailure),
}

/// Mock failure modes for testing error handling.
#[derive(Debug, Clone)]
pub enum MockFailure {
    /// Simulate rate limiting.
    RateLimited { retry_after_secs: u32 },
    /// Simulate provider unavailable.
    Unavailable { message: String },
    /// Simulate authentication failure.
    AuthenticationFailed,
    /// Simulate network error.
    Network { message: String },
    /// Simulate timeout.
    Timeout { timeout_secs: u32 },
}

impl From<MockFailure> for GatewayError {
    fn from(failure: MockFailure) -> Self {
        match failure {
            MockFailure::RateLimited { retry_after_secs } => {
                GatewayError::rate_limited(retry_after_secs)
            }
            MockFailure::Unavailable { message } => GatewayError::unavailable(message),
            MockFailure::AuthenticationFailed => GatewayError::AuthenticationFailed,
            MockFailure::Network { message } => GatewayError::network(message),
            MockFailure::Timeout { timeout_secs } => GatewayError::Timeout { timeout_secs },
        }
    }
}

/// Mock model gateway for testing.
///
/// Configurable to return specific replies, simulate delays, or inject
/// errors.
#[derive(Debug, Clone)]
pub struct MockModelGateway {
    /// Pre-configured replies (consumed in order).
    replies: Arc<Mutex<VecDeque<MockReply>>>,
    /// Simulated latency per request.
    delay: Duration,
    /// Call history for verification.
    calls: Arc<Mutex<Vec<GenerationRequest>>>,
}

impl Default for MockModelGateway {
    fn default() -> Self {
        Self::new()
    }
}

impl MockModelGateway {
    /// Creates a new mock gateway with default settings.
    pub fn new() -> Self {
        Self {
            replies: Arc::new(Mutex::new(VecDeque::new())),
            delay: Duration::ZERO,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Queues a text-only reply.
    pub fn with_text(self, text: impl Into<String>) -> Self {
        self.with_response(GenerationResponse::text_only(text))
    }

    /// Queues an image-bearing reply.
    pub fn with_image(self, image: ImageData) -> Self {
        self.with_response(GenerationResponse::default().with_image(image))
    }

    /// Queues a function-call reply.
    pub fn with_function_call(self, name: impl Into<String>, args: serde_json::Value) -> Self {
        self.with_response(
            GenerationResponse::default()
                .with_function_call(FunctionCallRequest::new(name, args)),
        )
    }

    /// Queues a fully configured reply.
    pub fn with_response(self, response: GenerationResponse) -> Self {
        self.replies
            .lock()
            .unwrap()
            .push_back(MockReply::Success(response));
        self
    }

    /// Queues a failure.
    pub fn with_failure(self, failure: MockFailure) -> Self {
        self.replies
            .lock()
            .unwrap()
            .push_back(MockReply::Failure(failure));
        self
    }

    /// Sets simulated latency per request.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Returns the number of calls made to this gateway.
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Returns all recorded calls.
    pub fn get_calls(&self) -> Vec<GenerationRequest> {
        self.calls.lock().unwrap().clone()
    }

    /// Clears the call history.
    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    /// Gets the next reply or a default.
    fn next_reply(&self) -> MockReply {
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| MockReply::Success(GenerationResponse::text_only("Mock reply")))
    }
}

#[async_trait]
impl ModelGateway for MockModelGateway {
    async fn generate(
        &self,
        request: GenerationRequest,
    ) -> Result<GenerationResponse, GatewayError> {
        // Record the call
        self.calls.lock().unwrap().push(request);

        // Simulate delay
        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }

        match self.next_reply() {
            MockReply::Success(response) => Ok(response),
            MockReply::Failure(failure) => Err(failure.into()),
        }
    }

    fn gateway_info(&self) -> GatewayInfo {
        GatewayInfo::new("mock")
            .with_images(true)
            .with_functions(true)
    }
}
