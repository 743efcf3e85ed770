use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{CatalogAnime, CreditRecord};
use crate::credits;
use crate::description::{rating_from_score, strip_html, truncate_description};

/// A title on a user's watched list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WatchedTitle {
    /// Local row ID; 0 until stored.
    pub id: i64,
    pub user_id: i64,
    pub anime_id: u64,
    pub title: String,
    /// 0.0-10.0 with one decimal.
    pub rating: Option<f32>,
    pub description: String,
    pub cover_image_url: Option<String>,
    pub notes: String,
    pub credits: CreditRecord,
    pub added_at: DateTime<Utc>,
}

impl WatchedTitle {
    /// Build an unsaved watched title from a catalog result.
    pub fn from_catalog(user_id: i64, anime: &CatalogAnime, notes: Option<String>) -> Self {
        let description = anime
            .description
            .as_deref()
            .map(|raw| truncate_description(&strip_html(raw)))
            .unwrap_or_default();

        Self {
            id: 0,
            user_id,
            anime_id: anime.anime_id,
            title: anime.preferred_title().to_string(),
            rating: rating_from_score(anime.average_score),
            description,
            cover_image_url: anime.cover_image_url.clone().filter(|u| !u.is_empty()),
            notes: notes.unwrap_or_default(),
            credits: credits::encode(&anime.cast),
            added_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CastEdge, VoiceActorRole};

    #[test]
    fn test_from_catalog_normalizes_fields() {
        let anime = CatalogAnime {
            anime_id: 20,
            title_romaji: Some("Naruto".into()),
            title_english: None,
            average_score: Some(79),
            description: Some("Ninja <i>story</i>.<br>Part one &amp; two.".into()),
            cover_image_url: Some(String::new()),
            cast: vec![CastEdge::new(
                "Naruto Uzumaki",
                vec![
                    VoiceActorRole::new("Junko Takeuchi", "Japanese"),
                    VoiceActorRole::new("Maile Flanagan", "English"),
                ],
            )],
        };

        let watched = WatchedTitle::from_catalog(3, &anime, None);
        assert_eq!(watched.user_id, 3);
        assert_eq!(watched.anime_id, 20);
        assert_eq!(watched.title, "Naruto");
        assert_eq!(watched.rating, Some(7.9));
        assert_eq!(watched.description, "Ninja story.\nPart one & two.");
        assert!(watched.cover_image_url.is_none());
        assert_eq!(watched.notes, "");
        assert_eq!(watched.credits.japanese, "Naruto Uzumaki: Junko Takeuchi");
        assert_eq!(watched.credits.english, "Naruto Uzumaki: Maile Flanagan");
    }

    #[test]
    fn test_from_catalog_with_missing_fields() {
        let anime = CatalogAnime {
            anime_id: 1,
            ..Default::default()
        };
        let watched = WatchedTitle::from_catalog(1, &anime, Some("rewatch later".into()));
        assert_eq!(watched.title, "Unknown");
        assert!(watched.rating.is_none());
        assert_eq!(watched.description, "");
        assert_eq!(watched.notes, "rewatch later");
        assert!(watched.credits.is_empty());
    }
}
