use axum::extract::{Query, State};
use axum::http::HeaderMap;
use axum::Json;
use serde::{Deserialize, Serialize};

use koe_api::traits::AnimeCatalog;
use koe_core::credits;
use koe_core::description::{rating_from_score, strip_html, truncate_description};
use koe_core::models::{CatalogAnime, CreditRecord};

use crate::auth;
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
}

/// A catalog hit, normalized the same way a watched title would be.
#[derive(Debug, Serialize)]
pub struct SearchResult {
    pub anime_id: u64,
    pub title: String,
    pub rating: Option<f32>,
    pub description: String,
    pub cover_image_url: Option<String>,
    pub credits: CreditRecord,
}

impl From<&CatalogAnime> for SearchResult {
    fn from(anime: &CatalogAnime) -> Self {
        Self {
            anime_id: anime.anime_id,
            title: anime.preferred_title().to_string(),
            rating: rating_from_score(anime.average_score),
            description: truncate_description(&strip_html(
                anime.description.as_deref().unwrap_or_default(),
            )),
            cover_image_url: anime.cover_image_url.clone().filter(|u| !u.is_empty()),
            credits: credits::encode(&anime.cast),
        }
    }
}

pub async fn search<C: AnimeCatalog + 'static>(
    State(state): State<AppState<C>>,
    headers: HeaderMap,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<SearchResult>>, ApiError> {
    auth::current_user(&state, &headers).await?;

    let query = params.q.trim();
    if query.is_empty() {
        return Err(ApiError::BadRequest("query must not be empty".into()));
    }

    let results = state
        .catalog
        .search_anime(query)
        .await
        .map_err(|e| ApiError::Catalog(e.to_string()))?;
    tracing::debug!(query, count = results.len(), "catalog search");

    Ok(Json(results.iter().map(SearchResult::from).collect()))
}
