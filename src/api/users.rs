use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::models::User;
use crate::services::auth::{self, AuthError};
use crate::AppState;

use super::{bearer_token, require_admin, require_user};

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/me", get(me))
}

pub fn admin_routes() -> Router<Arc<AppState>> {
    Router::new().route("/", get(list_users))
}

#[derive(Debug, Deserialize)]
pub struct CredentialsPayload {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub user: User,
    pub token: String,
}

/// POST /auth/register
async fn register(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CredentialsPayload>,
) -> Result<(StatusCode, Json<AuthResponse>), (StatusCode, String)> {
    let username = payload.username.trim();
    if username.is_empty() || payload.password.len() < 4 {
        return Err((
            StatusCode::BAD_REQUEST,
            "Username and a password of at least 4 characters are required".to_string(),
        ));
    }

    auth::create_user(&state.db, username, &payload.password, false)
        .await
        .map_err(|e| match e {
            AuthError::NameTaken => (StatusCode::CONFLICT, e.to_string()),
            _ => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
        })?;

    // Log the fresh account straight in
    let (user, session) = auth::authenticate(&state.db, username, &payload.password)
        .await
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;

    tracing::info!("User registered: {}", user.name);
    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            user,
            token: session.token,
        }),
    ))
}

/// POST /auth/login
async fn login(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CredentialsPayload>,
) -> Result<Json<AuthResponse>, StatusCode> {
    let (user, session) = auth::authenticate(&state.db, payload.username.trim(), &payload.password)
        .await
        .map_err(|e| match e {
            AuthError::UserNotFound | AuthError::InvalidPassword => StatusCode::UNAUTHORIZED,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        })?;

    Ok(Json(AuthResponse {
        user,
        token: session.token,
    }))
}

/// POST /auth/logout
async fn logout(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<StatusCode, StatusCode> {
    let token = bearer_token(&headers).ok_or(StatusCode::UNAUTHORIZED)?;
    auth::delete_session(&state.db, token)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /auth/me
async fn me(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<User>, StatusCode> {
    let user = require_user(&state, &headers).await?;
    Ok(Json(user))
}

/// GET /admin/users
async fn list_users(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<Vec<User>>, StatusCode> {
    require_admin(&state, &headers).await?;

    let users: Vec<User> = sqlx::query_as("SELECT * FROM users ORDER BY created_at")
        .fetch_all(&state.db)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    Ok(Json(users))
}
