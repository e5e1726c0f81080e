// Movie requests: visitors ask for a title, admins work the queue.

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    routing::{get, post, put},
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::models::MovieRequest;
use crate::AppState;

use super::require_admin;

const REQUEST_STATUSES: &[&str] = &["pending", "completed", "rejected"];

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/", post(create_request))
}

pub fn admin_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_requests))
        .route("/:id", put(update_request_status).delete(delete_request))
}

#[derive(Debug, Deserialize)]
pub struct RequestPayload {
    pub movie_name: String,
    pub language: String,
    pub whatsapp_number: Option<String>,
}

/// POST /requests
/// Open to anonymous visitors; every request starts out pending.
async fn create_request(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<RequestPayload>,
) -> Result<(StatusCode, Json<MovieRequest>), StatusCode> {
    if payload.movie_name.trim().is_empty() || payload.language.trim().is_empty() {
        return Err(StatusCode::BAD_REQUEST);
    }

    let id = Uuid::new_v4().to_string();
    sqlx::query(
        "INSERT INTO movie_requests (id, movie_name, language, whatsapp_number) VALUES (?, ?, ?, ?)",
    )
    .bind(&id)
    .bind(payload.movie_name.trim())
    .bind(payload.language.trim())
    .bind(&payload.whatsapp_number)
    .execute(&state.db)
    .await
    .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    let request: MovieRequest = sqlx::query_as("SELECT * FROM movie_requests WHERE id = ?")
        .bind(&id)
        .fetch_one(&state.db)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    tracing::info!("Movie requested: {}", request.movie_name);
    Ok((StatusCode::CREATED, Json(request)))
}

#[derive(Debug, Deserialize)]
pub struct RequestListQuery {
    pub status: Option<String>,
}

/// GET /admin/requests
async fn list_requests(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(query): Query<RequestListQuery>,
) -> Result<Json<Vec<MovieRequest>>, StatusCode> {
    require_admin(&state, &headers).await?;

    let requests: Vec<MovieRequest> = match query.status {
        Some(status) => {
            sqlx::query_as(
                "SELECT * FROM movie_requests WHERE status = ? ORDER BY created_at DESC",
            )
            .bind(status)
            .fetch_all(&state.db)
            .await
        }
        None => {
            sqlx::query_as("SELECT * FROM movie_requests ORDER BY created_at DESC")
                .fetch_all(&state.db)
                .await
        }
    }
    .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    Ok(Json(requests))
}

#[derive(Debug, Deserialize)]
pub struct StatusPayload {
    pub status: String,
}

/// PUT /admin/requests/:id
async fn update_request_status(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(payload): Json<StatusPayload>,
) -> Result<Json<MovieRequest>, StatusCode> {
    require_admin(&state, &headers).await?;

    if !REQUEST_STATUSES.contains(&payload.status.as_str()) {
        return Err(StatusCode::BAD_REQUEST);
    }

    let result = sqlx::query(
        "UPDATE movie_requests SET status = ?, updated_at = CURRENT_TIMESTAMP WHERE id = ?",
    )
    .bind(&payload.status)
    .bind(&id)
    .execute(&state.db)
    .await
    .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    if result.rows_affected() == 0 {
        return Err(StatusCode::NOT_FOUND);
    }

    let request: MovieRequest = sqlx::query_as("SELECT * FROM movie_requests WHERE id = ?")
        .bind(&id)
        .fetch_one(&state.db)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    Ok(Json(request))
}

/// DELETE /admin/requests/:id
async fn delete_request(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<StatusCode, StatusCode> {
    require_admin(&state, &headers).await?;

    let result = sqlx::query("DELETE FROM movie_requests WHERE id = ?")
        .bind(&id)
        .execute(&state.db)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    if result.rows_affected() == 0 {
        return Err(StatusCode::NOT_FOUND);
    }

    Ok(StatusCode::NO_CONTENT)
}
