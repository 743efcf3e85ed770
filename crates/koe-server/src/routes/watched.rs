use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use koe_api::traits::AnimeCatalog;
use koe_core::aggregate::{aggregate, AnnotatedView};
use koe_core::models::{Language, WatchedTitle};

use crate::auth;
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub language: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AddWatched {
    pub anime_id: u64,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateNotes {
    pub notes: String,
}

fn parse_language(label: Option<&str>) -> Result<Language, ApiError> {
    match label.map(str::trim).filter(|l| !l.is_empty()) {
        None => Ok(Language::default()),
        Some(label) => Language::from_label(label)
            .ok_or_else(|| ApiError::BadRequest(format!("unknown language: {label}"))),
    }
}

pub async fn list<C: AnimeCatalog + 'static>(
    State(state): State<AppState<C>>,
    headers: HeaderMap,
    Query(params): Query<ListParams>,
) -> Result<Json<AnnotatedView>, ApiError> {
    let user = auth::current_user(&state, &headers).await?;
    let language = parse_language(params.language.as_deref())?;

    let titles = state.db.get_watched_titles(user.id).await?;
    Ok(Json(aggregate(&titles, language)))
}

pub async fn add<C: AnimeCatalog + 'static>(
    State(state): State<AppState<C>>,
    headers: HeaderMap,
    Json(body): Json<AddWatched>,
) -> Result<impl IntoResponse, ApiError> {
    let user = auth::current_user(&state, &headers).await?;

    let anime = state
        .catalog
        .get_anime(body.anime_id)
        .await
        .map_err(|e| ApiError::Catalog(e.to_string()))?
        .ok_or_else(|| ApiError::NotFound(format!("anime {} not in catalog", body.anime_id)))?;

    let watched = WatchedTitle::from_catalog(user.id, &anime, body.notes);
    let stored = state.db.upsert_watched_title(watched).await?;
    tracing::info!(
        user = %user.username,
        anime_id = stored.anime_id,
        title = %stored.title,
        "added to watched list"
    );

    Ok((StatusCode::CREATED, Json(stored)))
}

pub async fn update_notes<C: AnimeCatalog + 'static>(
    State(state): State<AppState<C>>,
    headers: HeaderMap,
    Path(anime_id): Path<u64>,
    Json(body): Json<UpdateNotes>,
) -> Result<Json<WatchedTitle>, ApiError> {
    let user = auth::current_user(&state, &headers).await?;

    if !state
        .db
        .update_watched_notes(user.id, anime_id, body.notes)
        .await?
    {
        return Err(not_watched(anime_id));
    }

    state
        .db
        .get_watched_title(user.id, anime_id)
        .await?
        .map(Json)
        .ok_or_else(|| not_watched(anime_id))
}

pub async fn remove<C: AnimeCatalog + 'static>(
    State(state): State<AppState<C>>,
    headers: HeaderMap,
    Path(anime_id): Path<u64>,
) -> Result<StatusCode, ApiError> {
    let user = auth::current_user(&state, &headers).await?;

    if !state.db.delete_watched_title(user.id, anime_id).await? {
        return Err(not_watched(anime_id));
    }
    tracing::info!(user = %user.username, anime_id, "removed from watched list");
    Ok(StatusCode::NO_CONTENT)
}

fn not_watched(anime_id: u64) -> ApiError {
    ApiError::NotFound(format!("anime {anime_id} is not on the watched list"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_language() {
        assert_eq!(parse_language(None).unwrap(), Language::Japanese);
        assert_eq!(parse_language(Some("")).unwrap(), Language::Japanese);
        assert_eq!(parse_language(Some("English")).unwrap(), Language::English);
        assert!(matches!(
            parse_language(Some("french")),
            Err(ApiError::BadRequest(_))
        ));
    }
}
