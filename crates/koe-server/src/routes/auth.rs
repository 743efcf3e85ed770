use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};

use koe_api::traits::AnimeCatalog;

use crate::auth;
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub token: String,
    pub username: String,
}

pub async fn register<C: AnimeCatalog + 'static>(
    State(state): State<AppState<C>>,
    Json(body): Json<Credentials>,
) -> Result<impl IntoResponse, ApiError> {
    let username = body.username.trim().to_string();
    auth::validate_username(&username)?;
    auth::validate_password(&body.password, state.auth.min_password_len)?;

    let password = body.password;
    let hash = tokio::task::spawn_blocking(move || auth::hash_password(&password))
        .await
        .map_err(|e| ApiError::Internal(format!("hashing task failed: {e}")))??;

    let user = state.db.create_user(username, hash).await?;
    tracing::info!(user = %user.username, "registered");

    let session = auth::start_session(&state, &user).await?;
    Ok((
        StatusCode::CREATED,
        Json(SessionResponse {
            token: session.token,
            username: user.username,
        }),
    ))
}

pub async fn login<C: AnimeCatalog + 'static>(
    State(state): State<AppState<C>>,
    Json(body): Json<Credentials>,
) -> Result<Json<SessionResponse>, ApiError> {
    let user = state
        .db
        .get_user_by_username(body.username.trim().to_string())
        .await?
        .ok_or(ApiError::Unauthorized)?;

    let password = body.password;
    let stored = user.password_hash.clone();
    let valid = tokio::task::spawn_blocking(move || auth::verify_password(&password, &stored))
        .await
        .map_err(|e| ApiError::Internal(format!("verify task failed: {e}")))?;
    if !valid {
        tracing::debug!(user = %user.username, "login rejected");
        return Err(ApiError::Unauthorized);
    }

    let session = auth::start_session(&state, &user).await?;
    Ok(Json(SessionResponse {
        token: session.token,
        username: user.username,
    }))
}

pub async fn logout<C: AnimeCatalog + 'static>(
    State(state): State<AppState<C>>,
    headers: HeaderMap,
) -> Result<StatusCode, ApiError> {
    let token = auth::bearer_token(&headers).ok_or(ApiError::Unauthorized)?;
    if !state.db.delete_session(token.to_string()).await? {
        return Err(ApiError::Unauthorized);
    }
    Ok(StatusCode::NO_CONTENT)
}
