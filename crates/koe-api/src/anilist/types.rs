use serde::Deserialize;

use koe_core::models::{CastEdge, CatalogAnime, VoiceActorRole};

// ── GraphQL response wrappers ────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct GraphQLResponse<T> {
    pub data: Option<T>,
    #[serde(default)]
    pub errors: Vec<GraphQLError>,
}

#[derive(Debug, Deserialize)]
pub struct GraphQLError {
    pub message: String,
    pub status: Option<u16>,
}

impl<T> GraphQLResponse<T> {
    /// Collapse the `errors` array into one message.
    pub fn error_message(&self) -> String {
        self.errors
            .iter()
            .map(|e| e.message.as_str())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

// ── Search / media queries ───────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct PageResponse {
    #[serde(rename = "Page")]
    pub page: PageData,
}

#[derive(Debug, Deserialize)]
pub struct PageData {
    #[serde(default)]
    pub media: Vec<AniListMedia>,
}

#[derive(Debug, Deserialize)]
pub struct MediaResponse {
    #[serde(rename = "Media")]
    pub media: Option<AniListMedia>,
}

#[derive(Debug, Deserialize)]
pub struct AniListMedia {
    pub id: u64,
    pub title: Option<AniListTitle>,
    #[serde(rename = "averageScore")]
    pub average_score: Option<u32>,
    pub description: Option<String>,
    #[serde(rename = "coverImage")]
    pub cover_image: Option<CoverImage>,
    pub characters: Option<CharacterConnection>,
}

#[derive(Debug, Deserialize)]
pub struct AniListTitle {
    pub romaji: Option<String>,
    pub english: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CoverImage {
    pub large: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CharacterConnection {
    pub edges: Option<Vec<CharacterEdge>>,
}

#[derive(Debug, Deserialize)]
pub struct CharacterEdge {
    pub node: Option<CharacterNode>,
    #[serde(rename = "voiceActors")]
    pub voice_actors: Option<Vec<StaffNode>>,
}

#[derive(Debug, Deserialize)]
pub struct CharacterNode {
    pub name: Option<PersonName>,
}

#[derive(Debug, Deserialize)]
pub struct StaffNode {
    pub name: Option<PersonName>,
    pub language: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PersonName {
    pub full: Option<String>,
}

// ── Conversions ──────────────────────────────────────────────────

fn full_name(name: Option<PersonName>) -> Option<String> {
    name.and_then(|n| n.full)
}

impl CharacterEdge {
    pub fn into_cast_edge(self) -> CastEdge {
        CastEdge {
            name: full_name(self.node.and_then(|n| n.name)),
            voice_actors: self
                .voice_actors
                .unwrap_or_default()
                .into_iter()
                .map(|va| VoiceActorRole {
                    actor_name: full_name(va.name),
                    language: va.language,
                })
                .collect(),
        }
    }
}

impl AniListMedia {
    pub fn into_catalog_anime(self) -> CatalogAnime {
        let (title_romaji, title_english) = match self.title {
            Some(t) => (t.romaji, t.english),
            None => (None, None),
        };

        CatalogAnime {
            anime_id: self.id,
            title_romaji,
            title_english,
            average_score: self.average_score,
            description: self.description,
            cover_image_url: self.cover_image.and_then(|c| c.large),
            cast: self
                .characters
                .and_then(|c| c.edges)
                .unwrap_or_default()
                .into_iter()
                .map(CharacterEdge::into_cast_edge)
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_search_response() {
        let json = r#"{
            "data": {
                "Page": {
                    "media": [
                        {
                            "id": 154587,
                            "title": {
                                "romaji": "Sousou no Frieren",
                                "english": "Frieren: Beyond Journey's End"
                            },
                            "averageScore": 90,
                            "description": "After the party defeats the Demon King...<br>",
                            "coverImage": { "large": "https://s4.anilist.co/file/anilistcdn/media/anime/cover/large/154587.jpg" },
                            "characters": {
                                "edges": [
                                    {
                                        "node": { "name": { "full": "Frieren" } },
                                        "voiceActors": [
                                            { "name": { "full": "Atsumi Tanezaki" }, "language": "Japanese" },
                                            { "name": { "full": "Mallorie Rodak" }, "language": "English" }
                                        ]
                                    },
                                    {
                                        "node": { "name": { "full": "Fern" } },
                                        "voiceActors": [
                                            { "name": { "full": "Kana Ichinose" }, "language": "Japanese" }
                                        ]
                                    }
                                ]
                            }
                        }
                    ]
                }
            }
        }"#;

        let resp: GraphQLResponse<PageResponse> = serde_json::from_str(json).unwrap();
        let media = resp.data.unwrap().page.media;
        assert_eq!(media.len(), 1);

        let anime = media.into_iter().next().unwrap().into_catalog_anime();
        assert_eq!(anime.anime_id, 154587);
        assert_eq!(anime.title_romaji.as_deref(), Some("Sousou no Frieren"));
        assert_eq!(
            anime.title_english.as_deref(),
            Some("Frieren: Beyond Journey's End")
        );
        assert_eq!(anime.average_score, Some(90));
        assert_eq!(anime.cast.len(), 2);
        assert_eq!(anime.cast[0].name.as_deref(), Some("Frieren"));
        assert_eq!(anime.cast[0].voice_actors.len(), 2);
        assert_eq!(
            anime.cast[0].voice_actors[1].actor_name.as_deref(),
            Some("Mallorie Rodak")
        );
        assert_eq!(
            anime.cast[0].voice_actors[1].language.as_deref(),
            Some("English")
        );
    }

    #[test]
    fn test_deserialize_minimal_media() {
        let json = r#"{ "id": 1 }"#;
        let media: AniListMedia = serde_json::from_str(json).unwrap();
        let anime = media.into_catalog_anime();
        assert_eq!(anime.anime_id, 1);
        assert!(anime.title_romaji.is_none());
        assert!(anime.cover_image_url.is_none());
        assert!(anime.cast.is_empty());
    }

    #[test]
    fn test_null_fields_degrade_to_absent() {
        let json = r#"{
            "id": 2,
            "title": null,
            "averageScore": null,
            "coverImage": { "large": null },
            "characters": {
                "edges": [
                    { "node": null, "voiceActors": null },
                    { "node": { "name": { "full": null } }, "voiceActors": [ { "name": null, "language": null } ] }
                ]
            }
        }"#;
        let anime: AniListMedia = serde_json::from_str(json).unwrap();
        let anime = anime.into_catalog_anime();
        assert!(anime.average_score.is_none());
        assert!(anime.cover_image_url.is_none());
        assert_eq!(anime.cast.len(), 2);
        assert!(anime.cast[0].name.is_none());
        assert!(anime.cast[0].voice_actors.is_empty());
        assert!(anime.cast[1].voice_actors[0].actor_name.is_none());
    }

    #[test]
    fn test_deserialize_missing_media() {
        let json = r#"{
            "data": { "Media": null },
            "errors": [ { "message": "Not Found.", "status": 404 } ]
        }"#;
        let resp: GraphQLResponse<MediaResponse> = serde_json::from_str(json).unwrap();
        assert_eq!(resp.error_message(), "Not Found.");
        assert_eq!(resp.errors[0].status, Some(404));
        assert!(resp.data.unwrap().media.is_none());
    }
}
