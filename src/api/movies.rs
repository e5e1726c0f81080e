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
use crate::models::Movie;
use crate::AppState;

use super::{paged, require_admin, Paged};

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_movies))
        .route("/featured", get(featured_movies))
        .route("/:id", get(get_movie))
}

pub fn admin_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", post(create_movie))
        .route("/:id", put(update_movie).delete(delete_movie))
}

#[derive(Debug, Deserialize)]
pub struct MovieListQuery {
    pub search: Option<String>,
    pub category: Option<String>,
    pub language: Option<String>,
    pub page: Option<usize>,
    pub max_visible: Option<usize>,
}

/// GET /movies
/// Filtered, paged catalog listing, newest first.
async fn list_movies(
    State(state): State<Arc<AppState>>,
    Query(query): Query<MovieListQuery>,
) -> Result<Json<Paged<Movie>>, StatusCode> {
    let movies: Vec<Movie> = sqlx::query_as("SELECT * FROM movies ORDER BY created_at DESC")
        .fetch_all(&state.db)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    let filter = FilterState::new(query.search.unwrap_or_default())
        .with_axis("category", query.category)
        .with_axis("language", query.language);

    let catalog = &state.config.catalog;
    Ok(Json(paged(
        &movies,
        &filter,
        query.page.unwrap_or(1),
        catalog.page_size,
        query.max_visible.unwrap_or(catalog.max_visible_pages).max(1),
    )))
}

/// GET /movies/featured
/// Hero-banner rows.
async fn featured_movies(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Movie>>, StatusCode> {
    let movies: Vec<Movie> =
        sqlx::query_as("SELECT * FROM movies WHERE is_featured = 1 ORDER BY created_at DESC")
            .fetch_all(&state.db)
            .await
            .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    Ok(Json(movies))
}

/// GET /movies/:id
async fn get_movie(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Movie>, StatusCode> {
    let movie: Movie = sqlx::query_as("SELECT * FROM movies WHERE id = ?")
        .bind(&id)
        .fetch_optional(&state.db)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?
        .ok_or(StatusCode::NOT_FOUND)?;

    Ok(Json(movie))
}

#[derive(Debug, Deserialize)]
pub struct MoviePayload {
    pub title: String,
    pub poster_url: Option<String>,
    pub release_date: Option<String>,
    pub category: Option<String>,
    pub language: Option<String>,
    pub quality: Option<String>,
    pub info: Option<String>,
    pub download_link: Option<String>,
    pub normal_print_link: Option<String>,
    pub video_link: Option<String>,
    #[serde(default)]
    pub is_featured: bool,
}

/// POST /admin/movies
async fn create_movie(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(payload): Json<MoviePayload>,
) -> Result<(StatusCode, Json<Movie>), StatusCode> {
    require_admin(&state, &headers).await?;

    if payload.title.trim().is_empty() {
        return Err(StatusCode::BAD_REQUEST);
    }

    let id = Uuid::new_v4().to_string();
    sqlx::query(
        r#"
        INSERT INTO movies (id, title, poster_url, release_date, category, language, quality,
                            info, download_link, normal_print_link, video_link, is_featured)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(payload.title.trim())
    .bind(&payload.poster_url)
    .bind(&payload.release_date)
    .bind(&payload.category)
    .bind(&payload.language)
    .bind(&payload.quality)
    .bind(&payload.info)
    .bind(&payload.download_link)
    .bind(&payload.normal_print_link)
    .bind(&payload.video_link)
    .bind(payload.is_featured)
    .execute(&state.db)
    .await
    .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    let movie: Movie = sqlx::query_as("SELECT * FROM movies WHERE id = ?")
        .bind(&id)
        .fetch_one(&state.db)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    tracing::info!("Movie created: {} ({})", movie.title, movie.id);
    Ok((StatusCode::CREATED, Json(movie)))
}

/// PUT /admin/movies/:id
async fn update_movie(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(payload): Json<MoviePayload>,
) -> Result<Json<Movie>, StatusCode> {
    require_admin(&state, &headers).await?;

    let result = sqlx::query(
        r#"
        UPDATE movies SET
            title = ?, poster_url = ?, release_date = ?, category = ?, language = ?,
            quality = ?, info = ?, download_link = ?, normal_print_link = ?,
            video_link = ?, is_featured = ?, updated_at = CURRENT_TIMESTAMP
        WHERE id = ?
        "#,
    )
    .bind(payload.title.trim())
    .bind(&payload.poster_url)
    .bind(&payload.release_date)
    .bind(&payload.category)
    .bind(&payload.language)
    .bind(&payload.quality)
    .bind(&payload.info)
    .bind(&payload.download_link)
    .bind(&payload.normal_print_link)
    .bind(&payload.video_link)
    .bind(payload.is_featured)
    .bind(&id)
    .execute(&state.db)
    .await
    .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    if result.rows_affected() == 0 {
        return Err(StatusCode::NOT_FOUND);
    }

    let movie: Movie = sqlx::query_as("SELECT * FROM movies WHERE id = ?")
        .bind(&id)
        .fetch_one(&state.db)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    Ok(Json(movie))
}

/// DELETE /admin/movies/:id
async fn delete_movie(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<StatusCode, StatusCode> {
    require_admin(&state, &headers).await?;

    let result = sqlx::query("DELETE FROM movies WHERE id = ?")
        .bind(&id)
        .execute(&state.db)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    if result.rows_affected() == 0 {
        return Err(StatusCode::NOT_FOUND);
    }

    tracing::info!("Movie deleted: {}", id);
    Ok(StatusCode::NO_CONTENT)
}
