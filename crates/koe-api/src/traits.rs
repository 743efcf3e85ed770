//! Trait definition for the anime catalog.
//!
//! The server only talks to the catalog through [`AnimeCatalog`], so tests
//! can swap the AniList client for an in-memory one.

use std::future::Future;

use koe_core::models::CatalogAnime;

/// A searchable anime catalog that exposes each title's cast.
pub trait AnimeCatalog: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Search for anime by title.
    fn search_anime(
        &self,
        query: &str,
    ) -> impl Future<Output = Result<Vec<CatalogAnime>, Self::Error>> + Send;

    /// Fetch one title by catalog ID. `None` if the catalog doesn't know it.
    fn get_anime(
        &self,
        anime_id: u64,
    ) -> impl Future<Output = Result<Option<CatalogAnime>, Self::Error>> + Send;
}
