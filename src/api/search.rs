// Cross-section name search backing the header search popup.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::catalog::{filter_entries, FilterState};
use crate::models::{Movie, WebSeries};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/", get(search))
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SearchHit {
    pub id: String,
    pub title: String,
    pub poster_url: Option<String>,
    /// "movie" or "series"
    pub kind: &'static str,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub hits: Vec<SearchHit>,
}

/// GET /search?q=
/// Name search over movies and web series via the catalog predicate,
/// capped at the configured result limit.
async fn search(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<SearchResponse>, StatusCode> {
    let q = query.q.unwrap_or_default();
    if q.trim().is_empty() {
        return Ok(Json(SearchResponse { hits: Vec::new() }));
    }

    let filter = FilterState::new(q);
    let limit = state.config.catalog.search_limit;

    let movies: Vec<Movie> = sqlx::query_as("SELECT * FROM movies ORDER BY created_at DESC")
        .fetch_all(&state.db)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    let series: Vec<WebSeries> =
        sqlx::query_as("SELECT * FROM web_series ORDER BY created_at DESC")
            .fetch_all(&state.db)
            .await
            .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    let mut hits: Vec<SearchHit> = filter_entries(&movies, &filter)
        .into_iter()
        .map(|m| SearchHit {
            id: m.id.clone(),
            title: m.title.clone(),
            poster_url: m.poster_url.clone(),
            kind: "movie",
        })
        .chain(
            filter_entries(&series, &filter)
                .into_iter()
                .map(|s| SearchHit {
                    id: s.id.clone(),
                    title: s.title.clone(),
                    poster_url: s.poster_url.clone(),
                    kind: "series",
                }),
        )
        .collect();
    hits.truncate(limit);

    Ok(Json(SearchResponse { hits }))
}
