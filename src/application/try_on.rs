//! TryOnHandler - the initial try-on step for a chosen style.
//!
//! Portrait synthesis and critique are independent remote calls, so they
//! run concurrently once a style (and optionally a photo) is chosen.

use futures::future;
use thiserror::Error;

use crate::domain::critique::StyleArtifact;
use crate::domain::image::ImageData;

use super::critique_style::{CritiqueError, CritiqueStyleHandler};
use super::synthesize_style::{SynthesisError, SynthesizeStyleHandler};

/// A try-on request: the chosen style plus an optional user photo.
#[derive(Debug, Clone)]
pub struct TryOnRequest {
    /// Display name of the chosen style.
    pub style_name: String,
    /// The user's photo; absent means persona generation.
    pub base_image: Option<ImageData>,
}

impl TryOnRequest {
    /// Creates a persona-generation request.
    pub fn new(style_name: impl Into<String>) -> Self {
        Self {
            style_name: style_name.into(),
            base_image: None,
        }
    }

    /// Attaches the user's photo, switching to edit mode.
    pub fn with_base_image(mut self, image: ImageData) -> Self {
        self.base_image = Some(image);
        self
    }
}

/// Error type for the combined try-on step.
#[derive(Debug, Error)]
pub enum TryOnError {
    /// Portrait synthesis failed.
    #[error(transparent)]
    Synthesis(#[from] SynthesisError),

    /// Critique generation failed.
    #[error(transparent)]
    Critique(#[from] CritiqueError),
}

/// Handler for the initial try-on step.
pub struct TryOnHandler {
    synthesis: SynthesizeStyleHandler,
    critique: CritiqueStyleHandler,
}

impl TryOnHandler {
    /// Creates a handler from the two underlying clients.
    pub fn new(synthesis: SynthesizeStyleHandler, critique: CritiqueStyleHandler) -> Self {
        Self {
            synthesis,
            critique,
        }
    }

    /// Produces the initial artifact: styled portrait plus critique.
    #[tracing::instrument(skip_all, fields(style = %request.style_name, edit = request.base_image.is_some()))]
    pub async fn handle(&self, request: &TryOnRequest) -> Result<StyleArtifact, TryOnError> {
        let synthesis = self
            .synthesis
            .handle(&request.style_name, request.base_image.as_ref());
        let critique = self
            .critique
            .handle(&request.style_name, request.base_image.is_some());

        let (image, critique) = future::join(synthesis, critique).await;

        Ok(StyleArtifact::new(image?, critique?))
    }
}
