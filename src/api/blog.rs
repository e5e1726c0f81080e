use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    routing::{get, post, put},
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::catalog::FilterState;
use crate::models::BlogPost;
use crate::AppState;

use super::{paged, require_admin, Paged};

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_posts))
        .route("/:id", get(get_post))
}

pub fn admin_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", post(create_post))
        .route("/:id", put(update_post).delete(delete_post))
}

#[derive(Debug, Deserialize)]
pub struct BlogListQuery {
    pub search: Option<String>,
    pub page: Option<usize>,
    pub max_visible: Option<usize>,
}

/// GET /blog
async fn list_posts(
    State(state): State<Arc<AppState>>,
    Query(query): Query<BlogListQuery>,
) -> Result<Json<Paged<BlogPost>>, StatusCode> {
    let posts: Vec<BlogPost> = sqlx::query_as("SELECT * FROM blog_posts ORDER BY created_at DESC")
        .fetch_all(&state.db)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    let filter = FilterState::new(query.search.unwrap_or_default());

    let catalog = &state.config.catalog;
    Ok(Json(paged(
        &posts,
        &filter,
        query.page.unwrap_or(1),
        catalog.page_size,
        query.max_visible.unwrap_or(catalog.max_visible_pages).max(1),
    )))
}

/// GET /blog/:id
async fn get_post(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<BlogPost>, StatusCode> {
    let post: BlogPost = sqlx::query_as("SELECT * FROM blog_posts WHERE id = ?")
        .bind(&id)
        .fetch_optional(&state.db)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?
        .ok_or(StatusCode::NOT_FOUND)?;

    Ok(Json(post))
}

#[derive(Debug, Deserialize)]
pub struct BlogPostPayload {
    pub movie_name: String,
    pub article: Option<String>,
    pub poster_url: Option<String>,
    pub download_link: Option<String>,
}

/// POST /admin/blog
async fn create_post(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(payload): Json<BlogPostPayload>,
) -> Result<(StatusCode, Json<BlogPost>), StatusCode> {
    require_admin(&state, &headers).await?;

    if payload.movie_name.trim().is_empty() {
        return Err(StatusCode::BAD_REQUEST);
    }

    let id = Uuid::new_v4().to_string();
    sqlx::query(
        "INSERT INTO blog_posts (id, movie_name, article, poster_url, download_link) VALUES (?, ?, ?, ?, ?)",
    )
    .bind(&id)
    .bind(payload.movie_name.trim())
    .bind(&payload.article)
    .bind(&payload.poster_url)
    .bind(&payload.download_link)
    .execute(&state.db)
    .await
    .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    let post: BlogPost = sqlx::query_as("SELECT * FROM blog_posts WHERE id = ?")
        .bind(&id)
        .fetch_one(&state.db)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    Ok((StatusCode::CREATED, Json(post)))
}

/// PUT /admin/blog/:id
async fn update_post(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(payload): Json<BlogPostPayload>,
) -> Result<Json<BlogPost>, StatusCode> {
    require_admin(&state, &headers).await?;

    let result = sqlx::query(
        r#"
        UPDATE blog_posts SET
            movie_name = ?, article = ?, poster_url = ?, download_link = ?,
            updated_at = CURRENT_TIMESTAMP
        WHERE id = ?
        "#,
    )
    .bind(payload.movie_name.trim())
    .bind(&payload.article)
    .bind(&payload.poster_url)
    .bind(&payload.download_link)
    .bind(&id)
    .execute(&state.db)
    .await
    .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    if result.rows_affected() == 0 {
        return Err(StatusCode::NOT_FOUND);
    }

    let post: BlogPost = sqlx::query_as("SELECT * FROM blog_posts WHERE id = ?")
        .bind(&id)
        .fetch_one(&state.db)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    Ok(Json(post))
}

/// DELETE /admin/blog/:id
async fn delete_post(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<StatusCode, StatusCode> {
    require_admin(&state, &headers).await?;

    let result = sqlx::query("DELETE FROM blog_posts WHERE id = ?")
        .bind(&id)
        .execute(&state.db)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    if result.rows_affected() == 0 {
        return Err(StatusCode::NOT_FOUND);
    }

    Ok(StatusCode::NO_CONTENT)
}
