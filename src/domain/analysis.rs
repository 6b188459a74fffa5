//! Face analysis results.
//!
//! Produced once per uploaded photo. Recommendations are untrusted until
//! filtered against a catalog: identifiers the model invented are dropped
//! before the result crosses into caller-visible state.

use serde::{Deserialize, Serialize};

use super::catalog::StyleCatalog;

/// Result of analyzing a face photo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Classified face shape (e.g. "Oval", "Round", "Square", "Heart", "Long").
    pub face_shape: String,
    /// Optional hair texture classification, when the model supplies one.
    pub hair_texture: Option<String>,
    /// Optional colour tone classification, when the model supplies one.
    pub color_tone: Option<String>,
    /// Recommended style ids; only catalogued ids after filtering.
    pub recommended_style_ids: Vec<String>,
    /// Short rationale for the recommendations.
    pub reasoning: String,
}

impl AnalysisResult {
    /// Creates a new analysis result.
    pub fn new(
        face_shape: impl Into<String>,
        recommended_style_ids: Vec<String>,
        reasoning: impl Into<String>,
    ) -> Self {
        Self {
            face_shape: face_shape.into(),
            hair_texture: None,
            color_tone: None,
            recommended_style_ids,
            reasoning: reasoning.into(),
        }
    }

    /// Sets the hair texture classification.
    pub fn with_hair_texture(mut self, texture: impl Into<String>) -> Self {
        self.hair_texture = Some(texture.into());
        self
    }

    /// Sets the colour tone classification.
    pub fn with_color_tone(mut self, tone: impl Into<String>) -> Self {
        self.color_tone = Some(tone.into());
        self
    }

    /// Drops every recommended id that is not present in the catalog.
    ///
    /// An emptied recommendation set is not an error; the shape
    /// classification and reasoning still stand on their own.
    pub fn retain_catalogued(mut self, catalog: &StyleCatalog) -> Self {
        self.recommended_style_ids.retain(|id| catalog.contains(id));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::catalog::{Hairstyle, StyleGender};
    use proptest::prelude::*;

    fn catalog_of(ids: &[&str]) -> StyleCatalog {
        StyleCatalog::new(
            ids.iter()
                .map(|id| Hairstyle::new(*id, id.to_uppercase(), "", StyleGender::Female, None))
                .collect(),
        )
    }

    #[test]
    fn retain_catalogued_drops_unknown_ids() {
        let catalog = catalog_of(&["a", "b", "c"]);
        let result = AnalysisResult::new("Oval", vec!["a".into(), "z".into()], "...")
            .retain_catalogued(&catalog);

        assert_eq!(result.recommended_style_ids, vec!["a"]);
    }

    #[test]
    fn retain_catalogued_keeps_order() {
        let catalog = catalog_of(&["a", "b", "c"]);
        let result = AnalysisResult::new("Oval", vec!["c".into(), "a".into()], "...")
            .retain_catalogued(&catalog);

        assert_eq!(result.recommended_style_ids, vec!["c", "a"]);
    }

    #[test]
    fn emptied_recommendations_are_not_an_error() {
        let catalog = catalog_of(&["a"]);
        let result = AnalysisResult::new("Round", vec!["x".into(), "y".into()], "rationale")
            .retain_catalogued(&catalog);

        assert!(result.recommended_style_ids.is_empty());
        assert_eq!(result.face_shape, "Round");
        assert_eq!(result.reasoning, "rationale");
    }

    #[test]
    fn optional_classifications_default_to_none() {
        let result = AnalysisResult::new("Oval", vec![], "...");
        assert!(result.hair_texture.is_none());
        assert!(result.color_tone.is_none());

        let result = result.with_hair_texture("Wavy").with_color_tone("Warm");
        assert_eq!(result.hair_texture.as_deref(), Some("Wavy"));
        assert_eq!(result.color_tone.as_deref(), Some("Warm"));
    }

    proptest! {
        // Filtering never lets an uncatalogued id through, for any catalog
        // and any model output.
        #[test]
        fn filtered_ids_are_always_catalogued(
            known in proptest::collection::vec("[a-z]{1,6}", 0..8),
            returned in proptest::collection::vec("[a-z]{1,6}", 0..8),
        ) {
            let catalog = catalog_of(&known.iter().map(String::as_str).collect::<Vec<_>>());
            let result = AnalysisResult::new("Oval", returned, "...")
                .retain_catalogued(&catalog);

            for id in &result.recommended_style_ids {
                prop_assert!(catalog.contains(id));
            }
        }
    }
}
