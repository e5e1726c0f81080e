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
use crate::models::{Episode, Season, WebSeries};
use crate::AppState;

use super::{paged, require_admin, Paged};

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_series))
        .route("/:id", get(get_series))
}

/// Mounted at /episodes
pub fn episode_routes() -> Router<Arc<AppState>> {
    Router::new().route("/:id", get(watch_episode))
}

pub fn admin_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", post(create_series))
        .route("/:id", put(update_series).delete(delete_series))
}

pub fn admin_season_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", post(create_season))
        .route("/:id", axum::routing::delete(delete_season))
}

pub fn admin_episode_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", post(create_episode))
        .route("/:id", put(update_episode).delete(delete_episode))
}

#[derive(Debug, Deserialize)]
pub struct SeriesListQuery {
    pub search: Option<String>,
    pub category: Option<String>,
    pub language: Option<String>,
    pub page: Option<usize>,
    pub max_visible: Option<usize>,
}

/// GET /series
async fn list_series(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SeriesListQuery>,
) -> Result<Json<Paged<WebSeries>>, StatusCode> {
    let series: Vec<WebSeries> =
        sqlx::query_as("SELECT * FROM web_series ORDER BY created_at DESC")
            .fetch_all(&state.db)
            .await
            .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    let filter = FilterState::new(query.search.unwrap_or_default())
        .with_axis("category", query.category)
        .with_axis("language", query.language);

    let catalog = &state.config.catalog;
    Ok(Json(paged(
        &series,
        &filter,
        query.page.unwrap_or(1),
        catalog.page_size,
        query.max_visible.unwrap_or(catalog.max_visible_pages).max(1),
    )))
}

/// A season with its episodes, ordered by episode number.
#[derive(Debug, Serialize)]
pub struct SeasonDetail {
    #[serde(flatten)]
    pub season: Season,
    pub episodes: Vec<Episode>,
}

#[derive(Debug, Serialize)]
pub struct SeriesDetail {
    #[serde(flatten)]
    pub series: WebSeries,
    pub seasons: Vec<SeasonDetail>,
}

/// GET /series/:id
/// Series with its seasons and episodes in watch order.
async fn get_series(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<SeriesDetail>, StatusCode> {
    let series: WebSeries = sqlx::query_as("SELECT * FROM web_series WHERE id = ?")
        .bind(&id)
        .fetch_optional(&state.db)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?
        .ok_or(StatusCode::NOT_FOUND)?;

    let seasons: Vec<Season> =
        sqlx::query_as("SELECT * FROM seasons WHERE series_id = ? ORDER BY season_number")
            .bind(&id)
            .fetch_all(&state.db)
            .await
            .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    let mut detail = SeriesDetail {
        series,
        seasons: Vec::with_capacity(seasons.len()),
    };

    for season in seasons {
        let episodes: Vec<Episode> =
            sqlx::query_as("SELECT * FROM episodes WHERE season_id = ? ORDER BY episode_number")
                .bind(&season.id)
                .fetch_all(&state.db)
                .await
                .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

        detail.seasons.push(SeasonDetail { season, episodes });
    }

    Ok(Json(detail))
}

/// Watch payload: the episode plus everything the player page needs to
/// navigate without further lookups.
#[derive(Debug, Serialize)]
pub struct WatchEpisodeResponse {
    pub episode: Episode,
    pub season: Season,
    pub series: WebSeries,
    /// All episodes of the season in watch order, for the episode picker.
    pub season_episodes: Vec<Episode>,
    pub prev_episode_id: Option<String>,
    pub next_episode_id: Option<String>,
}

/// GET /episodes/:id
async fn watch_episode(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<WatchEpisodeResponse>, StatusCode> {
    let episode: Episode = sqlx::query_as("SELECT * FROM episodes WHERE id = ?")
        .bind(&id)
        .fetch_optional(&state.db)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?
        .ok_or(StatusCode::NOT_FOUND)?;

    let season: Season = sqlx::query_as("SELECT * FROM seasons WHERE id = ?")
        .bind(&episode.season_id)
        .fetch_one(&state.db)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    let series: WebSeries = sqlx::query_as("SELECT * FROM web_series WHERE id = ?")
        .bind(&season.series_id)
        .fetch_one(&state.db)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    let season_episodes: Vec<Episode> =
        sqlx::query_as("SELECT * FROM episodes WHERE season_id = ? ORDER BY episode_number")
            .bind(&episode.season_id)
            .fetch_all(&state.db)
            .await
            .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    // Prev/next are neighbors in episode_number order within the season
    let current = season_episodes.iter().position(|e| e.id == episode.id);
    let prev_episode_id = current
        .and_then(|i| i.checked_sub(1))
        .and_then(|i| season_episodes.get(i))
        .map(|e| e.id.clone());
    let next_episode_id = current
        .and_then(|i| season_episodes.get(i + 1))
        .map(|e| e.id.clone());

    Ok(Json(WatchEpisodeResponse {
        episode,
        season,
        series,
        season_episodes,
        prev_episode_id,
        next_episode_id,
    }))
}

#[derive(Debug, Deserialize)]
pub struct SeriesPayload {
    pub title: String,
    pub poster_url: Option<String>,
    pub release_date: Option<String>,
    pub category: Option<String>,
    pub language: Option<String>,
    pub info: Option<String>,
}

/// POST /admin/series
async fn create_series(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(payload): Json<SeriesPayload>,
) -> Result<(StatusCode, Json<WebSeries>), StatusCode> {
    require_admin(&state, &headers).await?;

    if payload.title.trim().is_empty() {
        return Err(StatusCode::BAD_REQUEST);
    }

    let id = Uuid::new_v4().to_string();
    sqlx::query(
        r#"
        INSERT INTO web_series (id, title, poster_url, release_date, category, language, info)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(payload.title.trim())
    .bind(&payload.poster_url)
    .bind(&payload.release_date)
    .bind(&payload.category)
    .bind(&payload.language)
    .bind(&payload.info)
    .execute(&state.db)
    .await
    .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    let series: WebSeries = sqlx::query_as("SELECT * FROM web_series WHERE id = ?")
        .bind(&id)
        .fetch_one(&state.db)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    tracing::info!("Series created: {} ({})", series.title, series.id);
    Ok((StatusCode::CREATED, Json(series)))
}

/// PUT /admin/series/:id
async fn update_series(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(payload): Json<SeriesPayload>,
) -> Result<Json<WebSeries>, StatusCode> {
    require_admin(&state, &headers).await?;

    let result = sqlx::query(
        r#"
        UPDATE web_series SET
            title = ?, poster_url = ?, release_date = ?, category = ?, language = ?,
            info = ?, updated_at = CURRENT_TIMESTAMP
        WHERE id = ?
        "#,
    )
    .bind(payload.title.trim())
    .bind(&payload.poster_url)
    .bind(&payload.release_date)
    .bind(&payload.category)
    .bind(&payload.language)
    .bind(&payload.info)
    .bind(&id)
    .execute(&state.db)
    .await
    .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    if result.rows_affected() == 0 {
        return Err(StatusCode::NOT_FOUND);
    }

    let series: WebSeries = sqlx::query_as("SELECT * FROM web_series WHERE id = ?")
        .bind(&id)
        .fetch_one(&state.db)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    Ok(Json(series))
}

/// DELETE /admin/series/:id (cascades to seasons and episodes)
async fn delete_series(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<StatusCode, StatusCode> {
    require_admin(&state, &headers).await?;

    let result = sqlx::query("DELETE FROM web_series WHERE id = ?")
        .bind(&id)
        .execute(&state.db)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    if result.rows_affected() == 0 {
        return Err(StatusCode::NOT_FOUND);
    }

    tracing::info!("Series deleted: {}", id);
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize)]
pub struct SeasonPayload {
    pub series_id: String,
    pub season_number: i32,
    pub title: Option<String>,
}

/// POST /admin/seasons
async fn create_season(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(payload): Json<SeasonPayload>,
) -> Result<(StatusCode, Json<Season>), StatusCode> {
    require_admin(&state, &headers).await?;

    let series_exists: Option<(String,)> = sqlx::query_as("SELECT id FROM web_series WHERE id = ?")
        .bind(&payload.series_id)
        .fetch_optional(&state.db)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;
    if series_exists.is_none() {
        return Err(StatusCode::NOT_FOUND);
    }

    let id = Uuid::new_v4().to_string();
    sqlx::query("INSERT INTO seasons (id, series_id, season_number, title) VALUES (?, ?, ?, ?)")
        .bind(&id)
        .bind(&payload.series_id)
        .bind(payload.season_number)
        .bind(&payload.title)
        .execute(&state.db)
        .await
        .map_err(|e| match e {
            // duplicate season_number within the series
            sqlx::Error::Database(ref db) if db.is_unique_violation() => StatusCode::CONFLICT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        })?;

    let season: Season = sqlx::query_as("SELECT * FROM seasons WHERE id = ?")
        .bind(&id)
        .fetch_one(&state.db)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    Ok((StatusCode::CREATED, Json(season)))
}

/// DELETE /admin/seasons/:id (cascades to episodes)
async fn delete_season(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<StatusCode, StatusCode> {
    require_admin(&state, &headers).await?;

    let result = sqlx::query("DELETE FROM seasons WHERE id = ?")
        .bind(&id)
        .execute(&state.db)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    if result.rows_affected() == 0 {
        return Err(StatusCode::NOT_FOUND);
    }

    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize)]
pub struct EpisodePayload {
    pub season_id: String,
    pub episode_number: i32,
    pub title: String,
    pub video_link: Option<String>,
    pub download_link: Option<String>,
    pub duration: Option<String>,
}

/// POST /admin/episodes
async fn create_episode(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(payload): Json<EpisodePayload>,
) -> Result<(StatusCode, Json<Episode>), StatusCode> {
    require_admin(&state, &headers).await?;

    let season_exists: Option<(String,)> = sqlx::query_as("SELECT id FROM seasons WHERE id = ?")
        .bind(&payload.season_id)
        .fetch_optional(&state.db)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;
    if season_exists.is_none() {
        return Err(StatusCode::NOT_FOUND);
    }

    let id = Uuid::new_v4().to_string();
    sqlx::query(
        r#"
        INSERT INTO episodes (id, season_id, episode_number, title, video_link, download_link, duration)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(&payload.season_id)
    .bind(payload.episode_number)
    .bind(&payload.title)
    .bind(&payload.video_link)
    .bind(&payload.download_link)
    .bind(&payload.duration)
    .execute(&state.db)
    .await
    .map_err(|e| match e {
        sqlx::Error::Database(ref db) if db.is_unique_violation() => StatusCode::CONFLICT,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    })?;

    let episode: Episode = sqlx::query_as("SELECT * FROM episodes WHERE id = ?")
        .bind(&id)
        .fetch_one(&state.db)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    Ok((StatusCode::CREATED, Json(episode)))
}

/// PUT /admin/episodes/:id
async fn update_episode(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(payload): Json<EpisodePayload>,
) -> Result<Json<Episode>, StatusCode> {
    require_admin(&state, &headers).await?;

    let result = sqlx::query(
        r#"
        UPDATE episodes SET
            episode_number = ?, title = ?, video_link = ?, download_link = ?, duration = ?
        WHERE id = ?
        "#,
    )
    .bind(payload.episode_number)
    .bind(&payload.title)
    .bind(&payload.video_link)
    .bind(&payload.download_link)
    .bind(&payload.duration)
    .bind(&id)
    .execute(&state.db)
    .await
    .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    if result.rows_affected() == 0 {
        return Err(StatusCode::NOT_FOUND);
    }

    let episode: Episode = sqlx::query_as("SELECT * FROM episodes WHERE id = ?")
        .bind(&id)
        .fetch_one(&state.db)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    Ok(Json(episode))
}

/// DELETE /admin/episodes/:id
async fn delete_episode(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<StatusCode, StatusCode> {
    require_admin(&state, &headers).await?;

    let result = sqlx::query("DELETE FROM episodes WHERE id = ?")
        .bind(&id)
        .execute(&state.db)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    if result.rows_affected() == 0 {
        return Err(StatusCode::NOT_FOUND);
    }

    Ok(StatusCode::NO_CONTENT)
}
