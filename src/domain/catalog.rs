//! Hairstyle catalog - the known set of styles the system can recommend.
//!
//! AI-returned recommendations are only trusted after validation against a
//! catalog, so hallucinated identifiers never reach callers.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// Who a style is catalogued for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StyleGender {
    Female,
    Male,
}

/// Editorial tag attached to trending styles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StyleTag {
    New,
    Popular,
    Trending,
}

/// A single catalogued hairstyle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hairstyle {
    /// Stable identifier (e.g. "f-wolf-cut").
    pub id: String,
    /// Display name (e.g. "Wolf Cut").
    pub name: String,
    /// Short editorial description.
    pub description: String,
    /// Target gender of the catalogue entry.
    pub gender: StyleGender,
    /// Optional trend tag.
    pub tag: Option<StyleTag>,
}

impl Hairstyle {
    /// Creates a new catalogue entry.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        gender: StyleGender,
        tag: Option<StyleTag>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            gender,
            tag,
        }
    }
}

/// The set of known hairstyles.
///
/// Only `{id, name}` pairs matter for validation; descriptions and tags are
/// carried for presentation layers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleCatalog {
    styles: Vec<Hairstyle>,
}

impl StyleCatalog {
    /// Creates a catalog from a list of styles.
    pub fn new(styles: Vec<Hairstyle>) -> Self {
        Self { styles }
    }

    /// Returns the built-in trending catalog.
    pub fn trending() -> Self {
        TRENDING.clone()
    }

    /// Returns all styles.
    pub fn styles(&self) -> &[Hairstyle] {
        &self.styles
    }

    /// Returns all known style ids, in catalogue order.
    pub fn ids(&self) -> Vec<&str> {
        self.styles.iter().map(|s| s.id.as_str()).collect()
    }

    /// Checks whether an id is a known style.
    pub fn contains(&self, id: &str) -> bool {
        self.styles.iter().any(|s| s.id == id)
    }

    /// Looks up a style by id.
    pub fn get(&self, id: &str) -> Option<&Hairstyle> {
        self.styles.iter().find(|s| s.id == id)
    }

    /// Returns the number of catalogued styles.
    pub fn len(&self) -> usize {
        self.styles.len()
    }

    /// Returns true if the catalog holds no styles.
    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }
}

/// The built-in trending catalog.
static TRENDING: Lazy<StyleCatalog> = Lazy::new(|| {
    use StyleGender::{Female, Male};
    use StyleTag::{New, Popular, Trending};

    StyleCatalog::new(vec![
        // Female styles
        Hairstyle::new(
            "f-hime-cut",
            "Hime Cut",
            "A princess-style cut with cheek-length sidelocks and frontal fringe.",
            Female,
            Some(New),
        ),
        Hairstyle::new(
            "f-wolf-cut",
            "Wolf Cut",
            "A trendy mix of a shag and a mullet with heavy layers.",
            Female,
            Some(Popular),
        ),
        Hairstyle::new(
            "f-french-bob",
            "French Bob",
            "A chic, chin-length bob often paired with bangs.",
            Female,
            Some(Trending),
        ),
        Hairstyle::new(
            "f-curtain-bangs",
            "Long Layers & Curtain Bangs",
            "Face-framing bangs with voluminous long layers.",
            Female,
            Some(Popular),
        ),
        Hairstyle::new(
            "f-pixie-cut",
            "Textured Pixie",
            "Short, edgy, and low maintenance with plenty of texture.",
            Female,
            None,
        ),
        Hairstyle::new(
            "f-balayage-waves",
            "Balayage Beach Waves",
            "Sun-kissed highlights on long, wavy hair.",
            Female,
            None,
        ),
        Hairstyle::new(
            "f-blunt-bob",
            "Blunt Bob",
            "Sharp, straight-cut bob ending at the jawline.",
            Female,
            None,
        ),
        Hairstyle::new(
            "f-shag",
            "Modern Shag",
            "Choppy layers and texture for a rock-n-roll vibe.",
            Female,
            None,
        ),
        Hairstyle::new(
            "f-butterfly",
            "Butterfly Cut",
            "Heavily layered cut that mimics short hair in front.",
            Female,
            Some(New),
        ),
        Hairstyle::new(
            "f-afro",
            "Natural Afro",
            "Voluminous, rounded natural texture.",
            Female,
            None,
        ),
        // Male styles
        Hairstyle::new(
            "m-undercut",
            "Classic Undercut",
            "Short sides with long top, styled back or to the side.",
            Male,
            Some(Popular),
        ),
        Hairstyle::new(
            "m-pompadour",
            "Modern Pompadour",
            "Voluminous top swept upwards and back.",
            Male,
            None,
        ),
        Hairstyle::new(
            "m-crew-cut",
            "Textured Crew Cut",
            "Clean, short, and low-maintenance with a messy top.",
            Male,
            Some(Trending),
        ),
        Hairstyle::new(
            "m-buzz-cut",
            "Buzz Cut",
            "Minimalist, military-inspired ultra-short cut.",
            Male,
            None,
        ),
        Hairstyle::new(
            "m-quiff",
            "The Quiff",
            "A hybrid of the pompadour and flattop, very versatile.",
            Male,
            Some(New),
        ),
        Hairstyle::new(
            "m-mid-fade",
            "Mid Fade + Crop",
            "Faded sides with a textured, cropped top.",
            Male,
            None,
        ),
        Hairstyle::new(
            "m-man-bun",
            "Man Bun",
            "Long hair tied back, paired with a beard or clean shave.",
            Male,
            None,
        ),
        Hairstyle::new(
            "m-slick-back",
            "Slicked Back",
            "Formal, glossy look combed straight back.",
            Male,
            None,
        ),
        Hairstyle::new(
            "m-curtains",
            "90s Curtains",
            "Middle part with long fringe, a classic revival.",
            Male,
            None,
        ),
        Hairstyle::new(
            "m-mullet",
            "Modern Mullet",
            "Business in the front, party in the back.",
            Male,
            Some(New),
        ),
    ])
});
