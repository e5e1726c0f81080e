use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::services::history::{self, HistoryItem};
use crate::AppState;

use super::require_user;

/// Continue-watching shelf length, matching the original site.
const HISTORY_LIMIT: i64 = 10;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/", get(list_history)).route(
        "/:movie_id",
        axum::routing::post(report_progress).delete(clear_history),
    )
}

/// GET /history
async fn list_history(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<Vec<HistoryItem>>, StatusCode> {
    let user = require_user(&state, &headers).await?;

    let items = history::recent(&state.db, &user.id, HISTORY_LIMIT)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    Ok(Json(items))
}

#[derive(Debug, Deserialize)]
pub struct ProgressPayload {
    pub progress_seconds: i64,
    pub duration_seconds: Option<i64>,
}

/// POST /history/:movie_id
/// Player progress report; upserts the row for this user/movie pair.
async fn report_progress(
    State(state): State<Arc<AppState>>,
    Path(movie_id): Path<String>,
    headers: HeaderMap,
    Json(payload): Json<ProgressPayload>,
) -> Result<StatusCode, StatusCode> {
    let user = require_user(&state, &headers).await?;

    if payload.progress_seconds < 0 {
        return Err(StatusCode::BAD_REQUEST);
    }

    let movie_exists: Option<(String,)> = sqlx::query_as("SELECT id FROM movies WHERE id = ?")
        .bind(&movie_id)
        .fetch_optional(&state.db)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;
    if movie_exists.is_none() {
        return Err(StatusCode::NOT_FOUND);
    }

    history::update_progress(
        &state.db,
        &user.id,
        &movie_id,
        payload.progress_seconds,
        payload.duration_seconds,
    )
    .await
    .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /history/:movie_id
async fn clear_history(
    State(state): State<Arc<AppState>>,
    Path(movie_id): Path<String>,
    headers: HeaderMap,
) -> Result<StatusCode, StatusCode> {
    let user = require_user(&state, &headers).await?;

    history::clear(&state.db, &user.id, &movie_id)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    Ok(StatusCode::NO_CONTENT)
}
