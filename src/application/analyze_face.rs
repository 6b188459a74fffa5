//! AnalyzeFaceHandler - classify a face photo and recommend catalogued styles.

use std::sync::Arc;
use thiserror::Error;

use crate::domain::analysis::AnalysisResult;
use crate::domain::catalog::StyleCatalog;
use crate::domain::image::ImageData;
use crate::domain::parsing::{ParseFailure, ResponseParser};
use crate::ports::{GatewayError, GenerationRequest, ModelGateway};

/// Default rationale when the model omits one.
const DEFAULT_REASONING: &str = "Based on your features, we recommend these styles.";

/// Error type for face analysis.
///
/// There is no safe default for the primary shape classification, so an
/// unparseable response fails the whole call.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// Remote call failed or timed out.
    #[error("analysis call failed: {0}")]
    Upstream(#[from] GatewayError),

    /// The response could not be decoded into the expected shape.
    #[error("could not parse analysis: {0}")]
    Parse(#[from] ParseFailure),
}

/// Handler for face analysis.
pub struct AnalyzeFaceHandler {
    gateway: Arc<dyn ModelGateway>,
    parser: ResponseParser,
    model: String,
}

impl AnalyzeFaceHandler {
    /// Creates a handler bound to a gateway and a text model.
    pub fn new(gateway: Arc<dyn ModelGateway>, model: impl Into<String>) -> Self {
        Self {
            gateway,
            parser: ResponseParser::new(),
            model: model.into(),
        }
    }

    /// Analyzes a face photo against a style catalog.
    ///
    /// The photo is taken as already-decoded bytes plus a mime type; size
    /// and validity checks happen upstream. Recommended ids outside the
    /// catalog are dropped before returning; an emptied recommendation set
    /// is not an error.
    #[tracing::instrument(skip_all, fields(model = %self.model, catalog_size = catalog.len()))]
    pub async fn handle(
        &self,
        photo: &ImageData,
        catalog: &StyleCatalog,
    ) -> Result<AnalysisResult, AnalysisError> {
        let request = GenerationRequest::new(&self.model)
            .with_image(photo.clone())
            .with_text(analysis_prompt(catalog))
            .with_structured_output();

        let response = self.gateway.generate(request).await?;

        let value = self
            .parser
            .parse_structured(response.text_or_empty(), &["faceShape"])?;

        let face_shape = value["faceShape"]
            .as_str()
            .ok_or_else(|| ParseFailure::MissingField("faceShape".to_string()))?
            .to_string();

        let recommended: Vec<String> = value["recommendedStyleIds"]
            .as_array()
            .map(|ids| {
                ids.iter()
                    .filter_map(|id| id.as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default();

        let reasoning = value["reasoning"]
            .as_str()
            .unwrap_or(DEFAULT_REASONING)
            .to_string();

        let mut result = AnalysisResult::new(face_shape, recommended, reasoning);
        if let Some(texture) = value["hairTexture"].as_str() {
            result = result.with_hair_texture(texture);
        }
        if let Some(tone) = value["colorTone"].as_str() {
            result = result.with_color_tone(tone);
        }

        let result = result.retain_catalogued(catalog);
        tracing::debug!(
            face_shape = %result.face_shape,
            recommendations = result.recommended_style_ids.len(),
            "face analysis complete"
        );
        Ok(result)
    }
}

/// Builds the analysis instruction, listing the valid catalogue ids.
fn analysis_prompt(catalog: &StyleCatalog) -> String {
    let available_ids = catalog.ids().join(", ");

    format!(
        "Act as a world-class hair stylist consultant.\n\
         Analyze the face in this image.\n\n\
         1. Determine the Face Shape (e.g., Oval, Round, Square, Heart, Long).\n\
         2. Recommend 2 hairstyles from this specific list of IDs that would best suit this face shape: [{}].\n\
         3. Explain briefly why these styles suit the user's features.\n\n\
         Return the response in this JSON format ONLY:\n\
         {{\n\
           \"faceShape\": \"Shape Name\",\n\
           \"recommendedStyleIds\": [\"id1\", \"id2\"],\n\
           \"reasoning\": \"Your reasoning here...\"\n\
         }}",
        available_ids
    )
}
