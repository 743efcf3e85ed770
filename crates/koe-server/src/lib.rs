//! HTTP service for the koe watch tracker.
//!
//! ## Routes
//!
//! - `GET /health`
//! - `POST /api/register`, `POST /api/login`, `POST /api/logout`
//! - `GET /api/search?q=`
//! - `GET /api/watched?language=`, `POST /api/watched`
//! - `PATCH /api/watched/:anime_id`, `DELETE /api/watched/:anime_id`
//!
//! Everything under `/api` except register and login takes an
//! `Authorization: Bearer <token>` header.

pub mod auth;
pub mod db;
pub mod error;
pub mod logging;
pub mod routes;
pub mod state;

pub use db::DbHandle;
pub use error::ApiError;
pub use routes::router;
pub use state::AppState;

/// Serve the router on an already-bound listener until `shutdown` resolves.
pub async fn serve<C, F>(
    state: AppState<C>,
    listener: tokio::net::TcpListener,
    shutdown: F,
) -> Result<(), std::io::Error>
where
    C: koe_api::traits::AnimeCatalog + 'static,
    F: std::future::Future<Output = ()> + Send + 'static,
{
    let app = router(state);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
}
