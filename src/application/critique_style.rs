//! CritiqueStyleHandler - short stylist advice for a tried-on look.

use std::sync::Arc;
use thiserror::Error;

use crate::domain::critique::StyleCritique;
use crate::domain::parsing::ResponseParser;
use crate::ports::{GatewayError, GenerationRequest, ModelGateway};

/// Error type for style critique.
#[derive(Debug, Error)]
pub enum CritiqueError {
    /// Remote call failed or timed out.
    #[error("critique call failed: {0}")]
    Upstream(#[from] GatewayError),
}

/// Handler for style critique.
///
/// Two prompt variants: a free-text endorsement when the look was tried on
/// a real photo, and a structured two-pros/two-cons breakdown otherwise.
/// Parse failures on the structured path are absorbed into a deterministic
/// fallback, trading fidelity for pipeline resilience.
pub struct CritiqueStyleHandler {
    gateway: Arc<dyn ModelGateway>,
    parser: ResponseParser,
    model: String,
}

impl CritiqueStyleHandler {
    /// Creates a handler bound to a gateway and a text model.
    pub fn new(gateway: Arc<dyn ModelGateway>, model: impl Into<String>) -> Self {
        Self {
            gateway,
            parser: ResponseParser::new(),
            model: model.into(),
        }
    }

    /// Critiques a style by name.
    #[tracing::instrument(skip_all, fields(model = %self.model, style = style_name, endorsement = has_base_image))]
    pub async fn handle(
        &self,
        style_name: &str,
        has_base_image: bool,
    ) -> Result<StyleCritique, CritiqueError> {
        if has_base_image {
            self.endorsement(style_name).await
        } else {
            self.breakdown(style_name).await
        }
    }

    /// Free-text endorsement of a look tried on the user's own photo.
    async fn endorsement(&self, style_name: &str) -> Result<StyleCritique, CritiqueError> {
        let request =
            GenerationRequest::new(&self.model).with_text(endorsement_prompt(style_name));

        let response = self.gateway.generate(request).await?;

        Ok(StyleCritique::endorsement(
            response.text_or_empty().trim(),
        ))
    }

    /// Structured pros/cons breakdown, falling back deterministically when
    /// the response does not decode.
    async fn breakdown(&self, style_name: &str) -> Result<StyleCritique, CritiqueError> {
        let request = GenerationRequest::new(&self.model)
            .with_text(breakdown_prompt(style_name))
            .with_structured_output();

        let response = self.gateway.generate(request).await?;
        let raw = response.text_or_empty();

        let parsed = match self.parser.parse_structured(raw, &["pros", "cons"]) {
            Ok(value) => value,
            Err(failure) => {
                tracing::debug!(%failure, "critique parse failed, using fallback");
                return Ok(StyleCritique::fallback(raw));
            }
        };

        match (string_vec(&parsed["pros"]), string_vec(&parsed["cons"])) {
            (Some(pros), Some(cons)) => Ok(StyleCritique::breakdown(style_name, pros, cons)),
            _ => Ok(StyleCritique::fallback(raw)),
        }
    }
}

/// Extracts a JSON value as a vector of strings, if it is one.
fn string_vec(value: &serde_json::Value) -> Option<Vec<String>> {
    value.as_array().map(|items| {
        items
            .iter()
            .filter_map(|v| v.as_str().map(str::to_string))
            .collect()
    })
}

fn endorsement_prompt(style_name: &str) -> String {
    format!(
        "You are a professional hair stylist.\n\
         A user has just tried on the \"{}\" hairstyle.\n\
         Write a short, encouraging, and professional recommendation (max 3 sentences) \
         about how to style this look and why it might suit them.\n\
         Return the result as plain text.",
        style_name
    )
}

fn breakdown_prompt(style_name: &str) -> String {
    format!(
        "You are a professional hair stylist.\n\
         Analyze the \"{}\" hairstyle.\n\
         Provide exactly 2 Pros and 2 Cons for this hairstyle.\n\n\
         Return the response in this JSON format:\n\
         {{\n\
           \"pros\": [\"Pro 1\", \"Pro 2\"],\n\
           \"cons\": [\"Con 1\", \"Con 2\"]\n\
         }}",
        style_name
    )
}
