use std::time::Duration;

use reqwest::Client;

use koe_core::models::CatalogAnime;

use super::error::AniListError;
use super::types::{GraphQLResponse, MediaResponse, PageResponse};
use crate::traits::AnimeCatalog;

pub const DEFAULT_API_URL: &str = "https://graphql.anilist.co";
const DEFAULT_SEARCH_LIMIT: u32 = 10;

/// Fields shared by every media query, including the cast graph.
///
/// `languageV2` is aliased so each voice actor carries a plain `language`
/// label such as `"Japanese"`.
const MEDIA_FRAGMENT: &str = r#"
fragment MediaFields on Media {
    id
    title { romaji english }
    averageScore
    description
    coverImage { large }
    characters(sort: [ROLE, RELEVANCE, ID], perPage: 50) {
        edges {
            node { name { full } }
            voiceActors { name { full } language: languageV2 }
        }
    }
}
"#;

const SEARCH_QUERY: &str = r#"
query ($search: String, $perPage: Int) {
    Page(perPage: $perPage) {
        media(search: $search, type: ANIME) {
            ...MediaFields
        }
    }
}
"#;

const GET_ANIME_QUERY: &str = r#"
query ($id: Int) {
    Media(id: $id, type: ANIME) {
        ...MediaFields
    }
}
"#;

/// AniList GraphQL API client. Catalog reads need no access token.
pub struct AniListClient {
    endpoint: String,
    search_limit: u32,
    http: Client,
}

impl AniListClient {
    pub fn new() -> Self {
        Self {
            endpoint: DEFAULT_API_URL.to_string(),
            search_limit: DEFAULT_SEARCH_LIMIT,
            http: Client::new(),
        }
    }

    /// Client for a specific endpoint with a request timeout.
    pub fn with_endpoint(
        endpoint: impl Into<String>,
        search_limit: u32,
        timeout: Duration,
    ) -> Result<Self, AniListError> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            endpoint: endpoint.into(),
            search_limit: search_limit.max(1),
            http,
        })
    }

    async fn graphql_request<T: serde::de::DeserializeOwned>(
        &self,
        operation: &str,
        query: &str,
        variables: serde_json::Value,
    ) -> Result<GraphQLResponse<T>, AniListError> {
        tracing::debug!(operation, "AniList GraphQL request");

        let resp = self
            .http
            .post(&self.endpoint)
            .header("Content-Type", "application/json")
            .header("Accept", "application/json")
            .json(&serde_json::json!({
                "query": format!("{query}{MEDIA_FRAGMENT}"),
                "variables": variables,
            }))
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let status_code = status.as_u16();
            let body = resp.text().await.unwrap_or_default();
            tracing::warn!(operation, status = status_code, "AniList API error");
            return Err(AniListError::Api {
                status: status_code,
                message: body,
            });
        }

        tracing::debug!(operation, status = %status, "AniList response received");
        let body: GraphQLResponse<T> = resp
            .json()
            .await
            .map_err(|e| AniListError::Parse(e.to_string()))?;

        if body.data.is_none() {
            let message = body.error_message();
            tracing::warn!(operation, %message, "AniList returned no data");
            return Err(AniListError::Api {
                status: status.as_u16(),
                message,
            });
        }
        Ok(body)
    }
}

impl Default for AniListClient {
    fn default() -> Self {
        Self::new()
    }
}

impl AnimeCatalog for AniListClient {
    type Error = AniListError;

    async fn search_anime(&self, query: &str) -> Result<Vec<CatalogAnime>, AniListError> {
        let resp: GraphQLResponse<PageResponse> = self
            .graphql_request(
                "Search",
                SEARCH_QUERY,
                serde_json::json!({ "search": query, "perPage": self.search_limit }),
            )
            .await?;

        Ok(resp
            .data
            .map(|d| d.page.media)
            .unwrap_or_default()
            .into_iter()
            .map(|m| m.into_catalog_anime())
            .collect())
    }

    async fn get_anime(&self, anime_id: u64) -> Result<Option<CatalogAnime>, AniListError> {
        let result: Result<GraphQLResponse<MediaResponse>, _> = self
            .graphql_request(
                "GetAnime",
                GET_ANIME_QUERY,
                serde_json::json!({ "id": anime_id }),
            )
            .await;

        match result {
            Ok(resp) => Ok(resp
                .data
                .and_then(|d| d.media)
                .map(|m| m.into_catalog_anime())),
            // AniList answers unknown IDs with a 404 and a GraphQL error.
            Err(AniListError::Api { status: 404, .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }
}
