//! SynthesizeStyleHandler - generate or edit a styled portrait.

use std::sync::Arc;
use thiserror::Error;

use crate::domain::foundation::ValidationError;
use crate::domain::image::ImageData;
use crate::ports::{GatewayError, GenerationRequest, ModelGateway};

/// Error type for portrait synthesis.
#[derive(Debug, Error)]
pub enum SynthesisError {
    /// Caller input was empty or malformed.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Remote call failed or timed out.
    #[error("synthesis call failed: {0}")]
    Upstream(#[from] GatewayError),

    /// The model declined or returned text only.
    #[error("model returned no image")]
    NoImage,
}

/// Handler for portrait synthesis.
///
/// Two modes, selected solely by presence of a base image:
/// - **Edit**: alter only the hair of the subject in the base image,
///   preserving facial identity. Identity preservation is a prompt-level
///   request, not a structural guarantee; callers treat the output as
///   best-effort.
/// - **Generate**: synthesize a photorealistic persona wearing the style.
pub struct SynthesizeStyleHandler {
    gateway: Arc<dyn ModelGateway>,
    model: String,
}

impl SynthesizeStyleHandler {
    /// Creates a handler bound to a gateway and an image model.
    pub fn new(gateway: Arc<dyn ModelGateway>, model: impl Into<String>) -> Self {
        Self {
            gateway,
            model: model.into(),
        }
    }

    /// Synthesizes a portrait for a style description.
    ///
    /// The first inline image payload in the response is the result; a
    /// response with no image part fails with [`SynthesisError::NoImage`].
    /// No retry beyond the gateway's transport retry.
    #[tracing::instrument(skip_all, fields(model = %self.model, edit = base_image.is_some()))]
    pub async fn handle(
        &self,
        style_description: &str,
        base_image: Option<&ImageData>,
    ) -> Result<ImageData, SynthesisError> {
        let description = style_description.trim();
        if description.is_empty() {
            return Err(ValidationError::empty_field("style_description").into());
        }

        let request = match base_image {
            Some(base) => GenerationRequest::new(&self.model)
                .with_image(base.clone())
                .with_text(edit_prompt(description)),
            None => GenerationRequest::new(&self.model).with_text(generate_prompt(description)),
        };

        let response = self.gateway.generate(request).await?;

        match response.first_image() {
            Some(image) => Ok(image.clone()),
            None => {
                tracing::warn!("synthesis response carried no image part");
                Err(SynthesisError::NoImage)
            }
        }
    }
}

/// Edit-mode instruction: change the hair, keep the person.
fn edit_prompt(description: &str) -> String {
    format!(
        "Change this person's hair to a {} hairstyle. \
         Keep the face exactly the same. High quality, photorealistic.",
        description
    )
}

/// Generate-mode instruction: synthesize a persona wearing the style.
fn generate_prompt(description: &str) -> String {
    format!(
        "A photorealistic portrait of a person with a trendy {} hairstyle. \
         Professional studio lighting, high resolution.",
        description
    )
}
