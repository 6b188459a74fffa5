//! Gemini Gateway - Implementation of ModelGateway for the Gemini API.
//!
//! Speaks the `generateContent` REST endpoint: multi-part requests with
//! inline image payloads, structured-output requests, and function
//! declarations.
//!
//! # Configuration
//!
//! ```ignore
//! let config = GeminiConfig::new(api_key)
//!     .with_base_url("https://generativelanguage.googleapis.com");
//!
//! let gateway = GeminiGateway::new(config);
//! ```

use async_trait::async_trait;
use reqwest::{Client, Response};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::time::sleep;

use crate::domain::chat::FunctionCallRequest;
use crate::domain::image::ImageData;
use crate::ports::{
    ContentPart, GatewayError, GatewayInfo, GenerationRequest, GenerationResponse, ModelGateway,
};

/// Configuration for the Gemini gateway.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    /// API key for authentication.
    api_key: Secret<String>,
    /// Base URL for the API.
    pub base_url: String,
    /// Request timeout.
    pub timeout: Duration,
    /// Maximum retries on transient failures.
    pub max_retries: u32,
}

impl GeminiConfig {
    /// Creates a new configuration with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Secret::new(api_key.into()),
            base_url: "https://generativelanguage.googleapis.com".to_string(),
            timeout: Duration::from_secs(60),
            max_retries: 3,
        }
    }

    /// Sets the base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the maximum retry count.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Exposes the API key (for making requests).
    fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }
}

/// Gemini API gateway implementation.
pub struct GeminiGateway {
    config: GeminiConfig,
    client: Client,
}

impl GeminiGateway {
    /// Creates a new Gemini gateway with the given configuration.
    pub fn new(config: GeminiConfig) -> Self {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self { config, client }
    }

    /// Builds the generateContent endpoint URL for a model.
    fn generate_url(&self, model: &str) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.base_url, model
        )
    }

    /// Sends a request and maps transport failures.
    async fn send_request(&self, request: &GenerationRequest) -> Result<Response, GatewayError> {
        let gemini_request = to_gemini_request(request);

        self.client
            .post(self.generate_url(&request.model))
            .header("x-goog-api-key", self.config.api_key())
            .header("Content-Type", "application/json")
            .json(&gemini_request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GatewayError::Timeout {
                        timeout_secs: self.config.timeout.as_secs() as u32,
                    }
                } else if e.is_connect() {
                    GatewayError::network(format!("Connection failed: {}", e))
                } else {
                    GatewayError::network(e.to_string())
                }
            })
    }

    /// Parses the API response status and handles errors.
    async fn handle_response_status(&self, response: Response) -> Result<Response, GatewayError> {
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        let error_body = response.text().await.unwrap_or_default();
        Err(map_error_status(status.as_u16(), &error_body))
    }

    /// Parses a successful response body.
    async fn parse_response(&self, response: Response) -> Result<GenerationResponse, GatewayError> {
        let response = self.handle_response_status(response).await?;

        let envelope: GeminiResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::decode(format!("Failed to parse response: {}", e)))?;

        from_gemini_response(envelope)
    }
}

#[async_trait]
impl ModelGateway for GeminiGateway {
    async fn generate(
        &self,
        request: GenerationRequest,
    ) -> Result<GenerationResponse, GatewayError> {
        let mut last_error = GatewayError::network("No attempts made");
        let mut retry_count = 0;

        while retry_count <= self.config.max_retries {
            match self.send_request(&request).await {
                Ok(response) => match self.parse_response(response).await {
                    Ok(generation) => return Ok(generation),
                    Err(err) => {
                        if !err.is_retryable() || retry_count >= self.config.max_retries {
                            return Err(err);
                        }
                        last_error = err;
                    }
                },
                Err(err) => {
                    if !err.is_retryable() || retry_count >= self.config.max_retries {
                        return Err(err);
                    }
                    last_error = err;
                }
            }

            // Exponential backoff: 1s, 2s, 4s, ...
            let delay = Duration::from_secs(1 << retry_count);
            tracing::debug!(retry = retry_count + 1, ?delay, "retrying gateway call");
            sleep(delay).await;
            retry_count += 1;
        }

        Err(last_error)
    }

    fn gateway_info(&self) -> GatewayInfo {
        GatewayInfo::new("gemini")
            .with_images(true)
            .with_functions(true)
    }
}

/// Maps a non-success HTTP status to a gateway error.
fn map_error_status(status: u16, error_body: &str) -> GatewayError {
    match status {
        401 | 403 => GatewayError::AuthenticationFailed,
        429 => GatewayError::rate_limited(parse_retry_after(error_body)),
        400 => GatewayError::InvalidRequest(error_body.to_string()),
        500..=599 => {
            GatewayError::unavailable(format!("Server error {}: {}", status, error_body))
        }
        _ => GatewayError::network(format!("Unexpected status {}: {}", status, error_body)),
    }
}

/// Parses the retry delay from a rate-limit error body.
///
/// Gemini error details carry a RetryInfo entry with `"retryDelay": "30s"`.
fn parse_retry_after(error_body: &str) -> u32 {
    if let Ok(parsed) = serde_json::from_str::<serde_json::Value>(error_body) {
        if let Some(details) = parsed
            .get("error")
            .and_then(|e| e.get("details"))
            .and_then(|d| d.as_array())
        {
            for detail in details {
                if let Some(delay) = detail.get("retryDelay").and_then(|d| d.as_str()) {
                    if let Ok(secs) = delay.trim_end_matches('s').parse::<u32>() {
                        return secs;
                    }
                }
            }
        }
    }
    60 // Default retry window
}

/// Converts a port request to Gemini's wire format.
fn to_gemini_request(request: &GenerationRequest) -> GeminiRequest {
    let parts = request
        .parts
        .iter()
        .map(|part| match part {
            ContentPart::Text(text) => GeminiPart {
                text: Some(text.clone()),
                inline_data: None,
                function_call: None,
            },
            ContentPart::InlineImage(image) => GeminiPart {
                text: None,
                inline_data: Some(GeminiInlineData {
                    mime_type: image.mime_type().to_string(),
                    data: image.to_base64(),
                }),
                function_call: None,
            },
        })
        .collect();

    let generation_config = request.structured_output.then(|| GeminiGenerationConfig {
        response_mime_type: "application/json".to_string(),
    });

    let tools = if request.tools.is_empty() {
        Vec::new()
    } else {
        vec![GeminiTool {
            function_declarations: request
                .tools
                .iter()
                .map(|t| t.to_gemini_format())
                .collect(),
        }]
    };

    GeminiRequest {
        contents: vec![GeminiContent {
            role: "user".to_string(),
            parts,
        }],
        generation_config,
        tools,
    }
}

/// Converts a Gemini response envelope into the port response.
fn from_gemini_response(envelope: GeminiResponse) -> Result<GenerationResponse, GatewayError> {
    let mut text_parts: Vec<String> = Vec::new();
    let mut images = Vec::new();
    let mut function_calls = Vec::new();

    let parts = envelope
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|c| c.parts)
        .unwrap_or_default();

    for part in parts {
        if let Some(text) = part.text {
            text_parts.push(text);
        }
        if let Some(inline) = part.inline_data {
            let image = ImageData::from_base64(&inline.data, inline.mime_type)
                .map_err(|e| GatewayError::decode(format!("Bad inline image payload: {}", e)))?;
            images.push(image);
        }
        if let Some(call) = part.function_call {
            let args = if call.args.is_object() {
                call.args
            } else {
                serde_json::json!({})
            };
            function_calls.push(FunctionCallRequest::new(call.name, args));
        }
    }

    let text = if text_parts.is_empty() {
        None
    } else {
        Some(text_parts.join(""))
    };

    Ok(GenerationResponse {
        text,
        images,
        function_calls,
    })
}

// ----- Gemini API Types -----

#[derive(Debug, Serialize)]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    #[serde(rename = "generationConfig", skip_serializing_if = "Option::is_none")]
    generation_config: Option<GeminiGenerationConfig>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<GeminiTool>,
}

#[derive(Debug, Serialize)]
struct GeminiContent {
    role: String,
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiPart {
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(rename = "inlineData", skip_serializing_if = "Option::is_none")]
    inline_data: Option<GeminiInlineData>,
    #[serde(rename = "functionCall", skip_serializing_if = "Option::is_none")]
    function_call: Option<GeminiFunctionCall>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiInlineData {
    #[serde(rename = "mimeType")]
    mime_type: String,
    data: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiFunctionCall {
    name: String,
    #[serde(default)]
    args: serde_json::Value,
}

#[derive(Debug, Serialize)]
struct GeminiGenerationConfig {
    #[serde(rename = "responseMimeType")]
    response_mime_type: String,
}

#[derive(Debug, Serialize)]
struct GeminiTool {
    #[serde(rename = "functionDeclarations")]
    function_declarations: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: Option<GeminiCandidateContent>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidateContent {
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::chat::StyleCommand;

    #[test]
    fn config_builder_works() {
        let config = GeminiConfig::new("test-key")
            .with_base_url("https://custom.api.com")
            .with_timeout(Duration::from_secs(30))
            .with_max_retries(5);

        assert_eq!(config.base_url, "https://custom.api.com");
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.max_retries, 5);
        assert_eq!(config.api_key(), "test-key");
    }

    #[test]
    fn generate_url_includes_model() {
        let gateway = GeminiGateway::new(GeminiConfig::new("k"));
        assert_eq!(
            gateway.generate_url("gemini-2.5-flash"),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }

    #[test]
    fn request_conversion_preserves_part_order() {
        let image = ImageData::jpeg(vec![1, 2, 3]).unwrap();
        let request = GenerationRequest::new("gemini-2.5-flash")
            .with_image(image.clone())
            .with_text("Analyze this face.");

        let wire = to_gemini_request(&request);
        let json = serde_json::to_value(&wire).unwrap();

        let parts = json["contents"][0]["parts"].as_array().unwrap();
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0]["inlineData"]["mimeType"], "image/jpeg");
        assert_eq!(parts[0]["inlineData"]["data"], image.to_base64());
        assert_eq!(parts[1]["text"], "Analyze this face.");
    }

    #[test]
    fn request_conversion_sets_json_mime_when_structured() {
        let request = GenerationRequest::new("m")
            .with_text("hi")
            .with_structured_output();

        let json = serde_json::to_value(to_gemini_request(&request)).unwrap();
        assert_eq!(
            json["generationConfig"]["responseMimeType"],
            "application/json"
        );
    }

    #[test]
    fn request_conversion_omits_config_and_tools_by_default() {
        let request = GenerationRequest::new("m").with_text("hi");
        let json = serde_json::to_value(to_gemini_request(&request)).unwrap();

        assert!(json.get("generationConfig").is_none());
        assert!(json.get("tools").is_none());
    }

    #[test]
    fn request_conversion_declares_tools() {
        let request = GenerationRequest::new("m")
            .with_text("hi")
            .with_tools(StyleCommand::definitions());

        let json = serde_json::to_value(to_gemini_request(&request)).unwrap();
        let declarations = json["tools"][0]["functionDeclarations"].as_array().unwrap();
        assert_eq!(declarations.len(), 1);
        assert_eq!(declarations[0]["name"], "modify_hairstyle");
    }

    #[test]
    fn response_parsing_joins_text_parts() {
        let envelope: GeminiResponse = serde_json::from_str(
            r#"{"candidates":[{"content":{"parts":[{"text":"Hello"},{"text":" there"}]}}]}"#,
        )
        .unwrap();

        let response = from_gemini_response(envelope).unwrap();
        assert_eq!(response.text.as_deref(), Some("Hello there"));
        assert!(response.images.is_empty());
        assert!(response.function_calls.is_empty());
    }

    #[test]
    fn response_parsing_decodes_inline_images() {
        let image = ImageData::png(vec![9, 8, 7]).unwrap();
        let body = format!(
            r#"{{"candidates":[{{"content":{{"parts":[{{"inlineData":{{"mimeType":"image/png","data":"{}"}}}}]}}}}]}}"#,
            image.to_base64()
        );
        let envelope: GeminiResponse = serde_json::from_str(&body).unwrap();

        let response = from_gemini_response(envelope).unwrap();
        assert_eq!(response.first_image(), Some(&image));
    }

    #[test]
    fn response_parsing_rejects_bad_image_payload() {
        let envelope: GeminiResponse = serde_json::from_str(
            r#"{"candidates":[{"content":{"parts":[{"inlineData":{"mimeType":"image/png","data":"!!!"}}]}}]}"#,
        )
        .unwrap();

        let result = from_gemini_response(envelope);
        assert!(matches!(result, Err(GatewayError::Decode(_))));
    }

    #[test]
    fn response_parsing_extracts_function_calls() {
        let envelope: GeminiResponse = serde_json::from_str(
            r#"{"candidates":[{"content":{"parts":[{"functionCall":{"name":"modify_hairstyle","args":{"modification_description":"shorter"}}}]}}]}"#,
        )
        .unwrap();

        let response = from_gemini_response(envelope).unwrap();
        let call = response.first_function_call().unwrap();
        assert_eq!(call.name(), "modify_hairstyle");
        assert_eq!(call.arguments()["modification_description"], "shorter");
    }

    #[test]
    fn response_parsing_defaults_missing_args_to_object() {
        let envelope: GeminiResponse = serde_json::from_str(
            r#"{"candidates":[{"content":{"parts":[{"functionCall":{"name":"modify_hairstyle"}}]}}]}"#,
        )
        .unwrap();

        let response = from_gemini_response(envelope).unwrap();
        assert!(response.first_function_call().unwrap().arguments().is_object());
    }

    #[test]
    fn response_parsing_handles_empty_candidates() {
        let envelope: GeminiResponse = serde_json::from_str(r#"{"candidates":[]}"#).unwrap();
        let response = from_gemini_response(envelope).unwrap();

        assert!(response.text.is_none());
        assert!(response.images.is_empty());
    }

    #[test]
    fn error_status_mapping() {
        assert!(matches!(
            map_error_status(401, ""),
            GatewayError::AuthenticationFailed
        ));
        assert!(matches!(
            map_error_status(403, ""),
            GatewayError::AuthenticationFailed
        ));
        assert!(matches!(
            map_error_status(429, "{}"),
            GatewayError::RateLimited { .. }
        ));
        assert!(matches!(
            map_error_status(400, "bad"),
            GatewayError::InvalidRequest(_)
        ));
        assert!(matches!(
            map_error_status(503, "down"),
            GatewayError::Unavailable { .. }
        ));
    }

    #[test]
    fn parse_retry_after_reads_retry_info() {
        let body = r#"{"error":{"details":[{"@type":"type.googleapis.com/google.rpc.RetryInfo","retryDelay":"17s"}]}}"#;
        assert_eq!(parse_retry_after(body), 17);
    }

    #[test]
    fn parse_retry_after_defaults_without_detail() {
        assert_eq!(parse_retry_after(r#"{"error":{"message":"slow down"}}"#), 60);
        assert_eq!(parse_retry_after("not json"), 60);
    }

    #[test]
    fn gateway_info_reports_capabilities() {
        let gateway = GeminiGateway::new(GeminiConfig::new("k"));
        let info = gateway.gateway_info();
        assert_eq!(info.name, "gemini");
        assert!(info.supports_images);
        assert!(info.supports_functions);
    }
}
