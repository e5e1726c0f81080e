use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand_core::OsRng;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::models::{Session, User};

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("user not found")]
    UserNotFound,
    #[error("invalid password")]
    InvalidPassword,
    #[error("invalid or expired session")]
    InvalidSession,
    #[error("username already taken")]
    NameTaken,
    #[error("password hashing failed: {0}")]
    Hash(String),
    #[error(transparent)]
    Db(#[from] sqlx::Error),
}

/// Hash a password using Argon2
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AuthError::Hash(e.to_string()))?;
    Ok(hash.to_string())
}

/// Verify a password against a hash
pub fn verify_password(password: &str, hash: &str) -> Result<bool, AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|e| AuthError::Hash(e.to_string()))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

/// Create a new user
pub async fn create_user(
    pool: &SqlitePool,
    name: &str,
    password: &str,
    is_admin: bool,
) -> Result<User, AuthError> {
    let existing: Option<(String,)> = sqlx::query_as("SELECT id FROM users WHERE name = ?")
        .bind(name)
        .fetch_optional(pool)
        .await?;
    if existing.is_some() {
        return Err(AuthError::NameTaken);
    }

    let id = Uuid::new_v4().to_string();
    let password_hash = hash_password(password)?;

    sqlx::query("INSERT INTO users (id, name, password_hash, is_admin) VALUES (?, ?, ?, ?)")
        .bind(&id)
        .bind(name)
        .bind(&password_hash)
        .bind(is_admin)
        .execute(pool)
        .await?;

    Ok(User {
        id,
        name: name.to_string(),
        password_hash,
        is_admin,
        created_at: chrono::Utc::now().to_rfc3339(),
    })
}

/// Authenticate user and create session
pub async fn authenticate(
    pool: &SqlitePool,
    username: &str,
    password: &str,
) -> Result<(User, Session), AuthError> {
    let user: User = sqlx::query_as("SELECT * FROM users WHERE name = ?")
        .bind(username)
        .fetch_optional(pool)
        .await?
        .ok_or(AuthError::UserNotFound)?;

    if !verify_password(password, &user.password_hash)? {
        return Err(AuthError::InvalidPassword);
    }

    let token = Uuid::new_v4().to_string();

    sqlx::query("INSERT INTO sessions (token, user_id) VALUES (?, ?)")
        .bind(&token)
        .bind(&user.id)
        .execute(pool)
        .await?;

    let session = Session {
        token,
        user_id: user.id.clone(),
        created_at: chrono::Utc::now().to_rfc3339(),
    };

    Ok((user, session))
}

/// Validate session token and get user
pub async fn validate_session(pool: &SqlitePool, token: &str) -> Result<User, AuthError> {
    let session: Session = sqlx::query_as("SELECT * FROM sessions WHERE token = ?")
        .bind(token)
        .fetch_optional(pool)
        .await?
        .ok_or(AuthError::InvalidSession)?;

    let user: User = sqlx::query_as("SELECT * FROM users WHERE id = ?")
        .bind(&session.user_id)
        .fetch_one(pool)
        .await?;

    Ok(user)
}

/// Delete a session (logout)
pub async fn delete_session(pool: &SqlitePool, token: &str) -> Result<(), AuthError> {
    sqlx::query("DELETE FROM sessions WHERE token = ?")
        .bind(token)
        .execute(pool)
        .await?;
    Ok(())
}

/// Remove sessions older than `max_age_days`, returns the number removed
pub async fn cleanup_expired_sessions(
    pool: &SqlitePool,
    max_age_days: i64,
) -> Result<u64, AuthError> {
    let result = sqlx::query(
        "DELETE FROM sessions WHERE created_at < datetime('now', '-' || ? || ' days')",
    )
    .bind(max_age_days)
    .execute(pool)
    .await?;
    Ok(result.rows_affected())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;

    #[tokio::test]
    async fn register_login_and_validate() {
        let pool = db::test_pool().await;

        let user = create_user(&pool, "alice", "s3cret", false).await.unwrap();
        assert!(!user.is_admin);

        let (logged_in, session) = authenticate(&pool, "alice", "s3cret").await.unwrap();
        assert_eq!(logged_in.id, user.id);

        let validated = validate_session(&pool, &session.token).await.unwrap();
        assert_eq!(validated.name, "alice");

        delete_session(&pool, &session.token).await.unwrap();
        assert!(matches!(
            validate_session(&pool, &session.token).await,
            Err(AuthError::InvalidSession)
        ));
    }

    #[tokio::test]
    async fn wrong_password_is_rejected() {
        let pool = db::test_pool().await;
        create_user(&pool, "bob", "correct", false).await.unwrap();

        assert!(matches!(
            authenticate(&pool, "bob", "wrong").await,
            Err(AuthError::InvalidPassword)
        ));
        assert!(matches!(
            authenticate(&pool, "nobody", "x").await,
            Err(AuthError::UserNotFound)
        ));
    }

    #[tokio::test]
    async fn duplicate_username_is_rejected() {
        let pool = db::test_pool().await;
        create_user(&pool, "carol", "pw", false).await.unwrap();

        assert!(matches!(
            create_user(&pool, "carol", "pw2", false).await,
            Err(AuthError::NameTaken)
        ));
    }
}
