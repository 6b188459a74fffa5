//! Style critique results and the committed artifact.

use serde::{Deserialize, Serialize};

use super::image::ImageData;

/// Canned pros used when structured critique decoding fails.
pub const FALLBACK_PROS: [&str; 2] = ["Stylish look", "Modern appeal"];

/// Canned cons used when structured critique decoding fails.
pub const FALLBACK_CONS: [&str; 2] = ["Requires maintenance", "Regular trimming needed"];

/// Stylist critique of a tried-on look.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleCritique {
    /// Free-text advice line.
    pub advice: String,
    /// Pros, present only on the structured (no base image) path.
    pub pros: Option<Vec<String>>,
    /// Cons, present only on the structured (no base image) path.
    pub cons: Option<Vec<String>>,
}

impl StyleCritique {
    /// A free-text endorsement of a look tried on a real photo.
    pub fn endorsement(advice: impl Into<String>) -> Self {
        Self {
            advice: advice.into(),
            pros: None,
            cons: None,
        }
    }

    /// A structured breakdown of a style with a generic advice line.
    pub fn breakdown(style_name: &str, pros: Vec<String>, cons: Vec<String>) -> Self {
        Self {
            advice: format!("Here is a professional breakdown of the {}.", style_name),
            pros: Some(pros),
            cons: Some(cons),
        }
    }

    /// The deterministic fallback when structured decoding fails: raw text
    /// as advice plus the canned pros and cons.
    pub fn fallback(raw_text: impl Into<String>) -> Self {
        Self {
            advice: raw_text.into(),
            pros: Some(FALLBACK_PROS.iter().map(|s| s.to_string()).collect()),
            cons: Some(FALLBACK_CONS.iter().map(|s| s.to_string()).collect()),
        }
    }

    /// Returns true when this critique carries a pros/cons breakdown.
    pub fn has_breakdown(&self) -> bool {
        self.pros.is_some() || self.cons.is_some()
    }
}

/// A styled portrait with its accompanying critique.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleArtifact {
    /// The synthesized portrait.
    pub image: ImageData,
    /// The accompanying critique.
    pub critique: StyleCritique,
}

impl StyleArtifact {
    /// Creates an artifact from a portrait and its critique.
    pub fn new(image: ImageData, critique: StyleCritique) -> Self {
        Self { image, critique }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endorsement_has_no_breakdown() {
        let critique = StyleCritique::endorsement("Looks great on you.");
        assert_eq!(critique.advice, "Looks great on you.");
        assert!(!critique.has_breakdown());
    }

    #[test]
    fn breakdown_names_the_style() {
        let critique = StyleCritique::breakdown(
            "Wolf Cut",
            vec!["Edgy".into(), "Low effort".into()],
            vec!["Grows out fast".into(), "Not office-friendly".into()],
        );

        assert!(critique.advice.contains("Wolf Cut"));
        assert_eq!(critique.pros.as_ref().unwrap().len(), 2);
        assert_eq!(critique.cons.as_ref().unwrap().len(), 2);
    }

    #[test]
    fn fallback_is_deterministic() {
        let a = StyleCritique::fallback("raw model text");
        let b = StyleCritique::fallback("raw model text");

        assert_eq!(a, b);
        assert_eq!(a.advice, "raw model text");
        assert_eq!(a.pros.as_ref().unwrap().len(), 2);
        assert_eq!(a.cons.as_ref().unwrap().len(), 2);
        assert_eq!(a.pros.as_ref().unwrap()[0], FALLBACK_PROS[0]);
        assert_eq!(a.cons.as_ref().unwrap()[1], FALLBACK_CONS[1]);
    }

    #[test]
    fn artifact_bundles_image_and_critique() {
        let image = ImageData::png(vec![1, 2, 3]).unwrap();
        let artifact = StyleArtifact::new(image.clone(), StyleCritique::endorsement("Nice"));
        assert_eq!(artifact.image, image);
        assert_eq!(artifact.critique.advice, "Nice");
    }
}
