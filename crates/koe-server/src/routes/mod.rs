mod auth;
mod search;
mod watched;

use std::time::Instant;

use axum::extract::Request;
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, patch, post};
use axum::{Json, Router};
use serde_json::json;

use koe_api::traits::AnimeCatalog;

use crate::state::AppState;

/// Build the application router over the given state.
pub fn router<C: AnimeCatalog + 'static>(state: AppState<C>) -> Router {
    let api = Router::new()
        .route("/register", post(auth::register::<C>))
        .route("/login", post(auth::login::<C>))
        .route("/logout", post(auth::logout::<C>))
        .route("/search", get(search::search::<C>))
        .route(
            "/watched",
            get(watched::list::<C>).post(watched::add::<C>),
        )
        .route(
            "/watched/:anime_id",
            patch(watched::update_notes::<C>).delete(watched::remove::<C>),
        );

    Router::new()
        .route("/health", get(health))
        .nest("/api", api)
        .layer(middleware::from_fn(log_request))
        .with_state(state)
}

async fn health() -> impl IntoResponse {
    Json(json!({ "ok": true }))
}

async fn log_request(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let started = Instant::now();

    let response = next.run(req).await;

    tracing::info!(
        %method,
        %path,
        status = response.status().as_u16(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "request"
    );
    response
}
