use axum::{
    http::{HeaderMap, StatusCode},
    Router,
};
use serde::Serialize;
use std::sync::Arc;

use crate::catalog::{filter_entries, page_tokens, paginate, CatalogEntry, FilterState, PageToken};
use crate::models::User;
use crate::services::auth;
use crate::AppState;

mod blog;
mod history;
mod movies;
mod requests;
mod search;
mod series;
mod software;
mod users;
mod watchlist;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .nest("/auth", users::routes())
        .nest("/movies", movies::routes())
        .nest("/series", series::routes())
        .nest("/episodes", series::episode_routes())
        .nest("/software", software::routes())
        .nest("/blog", blog::routes())
        .nest("/search", search::routes())
        .nest("/requests", requests::routes())
        .nest("/watchlist", watchlist::routes())
        .nest("/history", history::routes())
        .nest("/admin/movies", movies::admin_routes())
        .nest("/admin/series", series::admin_routes())
        .nest("/admin/seasons", series::admin_season_routes())
        .nest("/admin/episodes", series::admin_episode_routes())
        .nest("/admin/software", software::admin_routes())
        .nest("/admin/blog", blog::admin_routes())
        .nest("/admin/requests", requests::admin_routes())
        .nest("/admin/users", users::admin_routes())
}

/// Pull the session token out of an `Authorization: Bearer` header.
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get("Authorization")?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
}

/// Resolve the calling user from the request headers.
pub(crate) async fn require_user(
    state: &AppState,
    headers: &HeaderMap,
) -> Result<User, StatusCode> {
    let token = bearer_token(headers).ok_or(StatusCode::UNAUTHORIZED)?;
    auth::validate_session(&state.db, token)
        .await
        .map_err(|_| StatusCode::UNAUTHORIZED)
}

/// Resolve the calling user and reject non-admins.
pub(crate) async fn require_admin(
    state: &AppState,
    headers: &HeaderMap,
) -> Result<User, StatusCode> {
    let user = require_user(state, headers).await?;
    if !user.is_admin {
        return Err(StatusCode::FORBIDDEN);
    }
    Ok(user)
}

/// One page of a filtered listing plus the pager labels to render.
#[derive(Debug, Serialize)]
pub struct Paged<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub total_pages: usize,
    pub total_items: usize,
    pub pages: Vec<PageToken>,
}

/// Runs fetched rows through the catalog engine: filter, clamp the page,
/// slice, and summarize the pager. Every list endpoint funnels through here.
pub(crate) fn paged<E: CatalogEntry + Clone>(
    rows: &[E],
    filter: &FilterState,
    requested_page: usize,
    page_size: usize,
    max_visible: usize,
) -> Paged<E> {
    let filtered = filter_entries(rows, filter);
    let slice = paginate(filtered.len(), page_size, requested_page);

    Paged {
        items: filtered[slice.start..slice.end]
            .iter()
            .map(|e| (*e).clone())
            .collect(),
        page: slice.page,
        total_pages: slice.total_pages,
        total_items: filtered.len(),
        pages: page_tokens(slice.page, slice.total_pages, max_visible),
    }
}
