use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    routing::{get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::catalog::FilterState;
use crate::models::{SoftwareTitle, SOFTWARE_PLATFORMS};
use crate::AppState;

use super::{paged, require_admin, Paged};

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_software))
        .route("/:id", get(get_software))
        .route("/:id/download", post(record_download))
}

pub fn admin_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", post(create_software))
        .route("/:id", put(update_software).delete(delete_software))
}

#[derive(Debug, Deserialize)]
pub struct SoftwareListQuery {
    pub search: Option<String>,
    pub platform: Option<String>,
    pub category: Option<String>,
    pub page: Option<usize>,
    pub max_visible: Option<usize>,
}

/// GET /software
/// Listing filtered on the platform tab plus optional category and search.
async fn list_software(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SoftwareListQuery>,
) -> Result<Json<Paged<SoftwareTitle>>, StatusCode> {
    let titles: Vec<SoftwareTitle> =
        sqlx::query_as("SELECT * FROM software_titles ORDER BY created_at DESC")
            .fetch_all(&state.db)
            .await
            .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    let filter = FilterState::new(query.search.unwrap_or_default())
        .with_axis("platform", query.platform)
        .with_axis("category", query.category);

    let catalog = &state.config.catalog;
    Ok(Json(paged(
        &titles,
        &filter,
        query.page.unwrap_or(1),
        catalog.page_size,
        query.max_visible.unwrap_or(catalog.max_visible_pages).max(1),
    )))
}

/// GET /software/:id
async fn get_software(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<SoftwareTitle>, StatusCode> {
    let title: SoftwareTitle = sqlx::query_as("SELECT * FROM software_titles WHERE id = ?")
        .bind(&id)
        .fetch_optional(&state.db)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?
        .ok_or(StatusCode::NOT_FOUND)?;

    Ok(Json(title))
}

#[derive(Debug, Serialize)]
pub struct DownloadResponse {
    pub download_link: Option<String>,
    pub download_count: i64,
}

/// POST /software/:id/download
/// Bumps the download counter and hands back the link.
async fn record_download(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<DownloadResponse>, StatusCode> {
    let result =
        sqlx::query("UPDATE software_titles SET download_count = download_count + 1 WHERE id = ?")
            .bind(&id)
            .execute(&state.db)
            .await
            .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    if result.rows_affected() == 0 {
        return Err(StatusCode::NOT_FOUND);
    }

    let (download_link, download_count): (Option<String>, i64) =
        sqlx::query_as("SELECT download_link, download_count FROM software_titles WHERE id = ?")
            .bind(&id)
            .fetch_one(&state.db)
            .await
            .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    Ok(Json(DownloadResponse {
        download_link,
        download_count,
    }))
}

#[derive(Debug, Deserialize)]
pub struct SoftwarePayload {
    pub name: String,
    pub description: Option<String>,
    pub version: Option<String>,
    pub platform: String,
    pub category: Option<String>,
    pub icon_url: Option<String>,
    pub file_size: Option<String>,
    pub reputation: Option<f64>,
    pub download_link: Option<String>,
}

/// POST /admin/software
async fn create_software(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(payload): Json<SoftwarePayload>,
) -> Result<(StatusCode, Json<SoftwareTitle>), StatusCode> {
    require_admin(&state, &headers).await?;

    if payload.name.trim().is_empty() || !SOFTWARE_PLATFORMS.contains(&payload.platform.as_str()) {
        return Err(StatusCode::BAD_REQUEST);
    }

    let id = Uuid::new_v4().to_string();
    sqlx::query(
        r#"
        INSERT INTO software_titles (id, name, description, version, platform, category,
                                     icon_url, file_size, reputation, download_link)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(payload.name.trim())
    .bind(&payload.description)
    .bind(&payload.version)
    .bind(&payload.platform)
    .bind(&payload.category)
    .bind(&payload.icon_url)
    .bind(&payload.file_size)
    .bind(payload.reputation)
    .bind(&payload.download_link)
    .execute(&state.db)
    .await
    .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    let title: SoftwareTitle = sqlx::query_as("SELECT * FROM software_titles WHERE id = ?")
        .bind(&id)
        .fetch_one(&state.db)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    tracing::info!("Software created: {} ({})", title.name, title.id);
    Ok((StatusCode::CREATED, Json(title)))
}

/// PUT /admin/software/:id
async fn update_software(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(payload): Json<SoftwarePayload>,
) -> Result<Json<SoftwareTitle>, StatusCode> {
    require_admin(&state, &headers).await?;

    if !SOFTWARE_PLATFORMS.contains(&payload.platform.as_str()) {
        return Err(StatusCode::BAD_REQUEST);
    }

    let result = sqlx::query(
        r#"
        UPDATE software_titles SET
            name = ?, description = ?, version = ?, platform = ?, category = ?,
            icon_url = ?, file_size = ?, reputation = ?, download_link = ?,
            updated_at = CURRENT_TIMESTAMP
        WHERE id = ?
        "#,
    )
    .bind(payload.name.trim())
    .bind(&payload.description)
    .bind(&payload.version)
    .bind(&payload.platform)
    .bind(&payload.category)
    .bind(&payload.icon_url)
    .bind(&payload.file_size)
    .bind(payload.reputation)
    .bind(&payload.download_link)
    .bind(&id)
    .execute(&state.db)
    .await
    .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    if result.rows_affected() == 0 {
        return Err(StatusCode::NOT_FOUND);
    }

    let title: SoftwareTitle = sqlx::query_as("SELECT * FROM software_titles WHERE id = ?")
        .bind(&id)
        .fetch_one(&state.db)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    Ok(Json(title))
}

/// DELETE /admin/software/:id
async fn delete_software(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<StatusCode, StatusCode> {
    require_admin(&state, &headers).await?;

    let result = sqlx::query("DELETE FROM software_titles WHERE id = ?")
        .bind(&id)
        .execute(&state.db)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    if result.rows_affected() == 0 {
        return Err(StatusCode::NOT_FOUND);
    }

    tracing::info!("Software deleted: {}", id);
    Ok(StatusCode::NO_CONTENT)
}
