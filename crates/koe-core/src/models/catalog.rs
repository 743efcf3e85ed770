use serde::{Deserialize, Serialize};

use super::CastEdge;

/// A title as returned by the anime catalog, before any normalization.
///
/// Every field the provider may omit stays optional here.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogAnime {
    pub anime_id: u64,
    pub title_romaji: Option<String>,
    pub title_english: Option<String>,
    /// 0-100 provider score.
    pub average_score: Option<u32>,
    /// Raw description, may contain markup.
    pub description: Option<String>,
    pub cover_image_url: Option<String>,
    #[serde(default)]
    pub cast: Vec<CastEdge>,
}

impl CatalogAnime {
    /// Returns the best available display title.
    pub fn preferred_title(&self) -> &str {
        self.title_english
            .as_deref()
            .filter(|t| !t.is_empty())
            .or(self.title_romaji.as_deref().filter(|t| !t.is_empty()))
            .unwrap_or("Unknown")
    }
}
