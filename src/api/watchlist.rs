// Watchlist: per-user saved movies. Add/remove are idempotent.

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;

use crate::AppState;

use super::require_user;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/", get(list_watchlist)).route(
        "/:movie_id",
        axum::routing::post(add_to_watchlist).delete(remove_from_watchlist),
    )
}

#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct WatchlistItem {
    pub movie_id: String,
    pub added_at: String,
    pub title: String,
    pub poster_url: Option<String>,
    pub category: Option<String>,
    pub language: Option<String>,
}

/// GET /watchlist
async fn list_watchlist(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<Vec<WatchlistItem>>, StatusCode> {
    let user = require_user(&state, &headers).await?;

    let items: Vec<WatchlistItem> = sqlx::query_as(
        r#"
        SELECT w.movie_id, w.added_at, m.title, m.poster_url, m.category, m.language
        FROM watchlist w
        JOIN movies m ON m.id = w.movie_id
        WHERE w.user_id = ?
        ORDER BY w.added_at DESC
        "#,
    )
    .bind(&user.id)
    .fetch_all(&state.db)
    .await
    .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    Ok(Json(items))
}

/// POST /watchlist/:movie_id
async fn add_to_watchlist(
    State(state): State<Arc<AppState>>,
    Path(movie_id): Path<String>,
    headers: HeaderMap,
) -> Result<StatusCode, StatusCode> {
    let user = require_user(&state, &headers).await?;

    let movie_exists: Option<(String,)> = sqlx::query_as("SELECT id FROM movies WHERE id = ?")
        .bind(&movie_id)
        .fetch_optional(&state.db)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;
    if movie_exists.is_none() {
        return Err(StatusCode::NOT_FOUND);
    }

    sqlx::query("INSERT OR IGNORE INTO watchlist (user_id, movie_id) VALUES (?, ?)")
        .bind(&user.id)
        .bind(&movie_id)
        .execute(&state.db)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /watchlist/:movie_id
async fn remove_from_watchlist(
    State(state): State<Arc<AppState>>,
    Path(movie_id): Path<String>,
    headers: HeaderMap,
) -> Result<StatusCode, StatusCode> {
    let user = require_user(&state, &headers).await?;

    sqlx::query("DELETE FROM watchlist WHERE user_id = ? AND movie_id = ?")
        .bind(&user.id)
        .bind(&movie_id)
        .execute(&state.db)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    Ok(StatusCode::NO_CONTENT)
}
