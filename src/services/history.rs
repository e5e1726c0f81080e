// Watch history: per-user playback progress keyed on (user_id, movie_id).
// Progress writes are upserts so a rewatch replaces the previous row.

use anyhow::Result;
use serde::Serialize;
use sqlx::SqlitePool;

/// A history row joined with the movie it refers to, newest first.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct HistoryItem {
    pub movie_id: String,
    pub progress_seconds: i64,
    pub duration_seconds: Option<i64>,
    pub last_watched_at: String,
    pub title: String,
    pub poster_url: Option<String>,
    pub video_link: Option<String>,
}

/// Fetch the user's most recent history entries (continue-watching shelf).
pub async fn recent(pool: &SqlitePool, user_id: &str, limit: i64) -> Result<Vec<HistoryItem>> {
    let items = sqlx::query_as(
        r#"
        SELECT h.movie_id, h.progress_seconds, h.duration_seconds, h.last_watched_at,
               m.title, m.poster_url, m.video_link
        FROM watch_history h
        JOIN movies m ON m.id = h.movie_id
        WHERE h.user_id = ?
        ORDER BY h.last_watched_at DESC
        LIMIT ?
        "#,
    )
    .bind(user_id)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(items)
}

/// Record playback progress for a movie, replacing any previous position.
pub async fn update_progress(
    pool: &SqlitePool,
    user_id: &str,
    movie_id: &str,
    progress_seconds: i64,
    duration_seconds: Option<i64>,
) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO watch_history (user_id, movie_id, progress_seconds, duration_seconds, last_watched_at)
        VALUES (?, ?, ?, ?, ?)
        ON CONFLICT(user_id, movie_id) DO UPDATE SET
            progress_seconds = excluded.progress_seconds,
            duration_seconds = excluded.duration_seconds,
            last_watched_at = excluded.last_watched_at
        "#,
    )
    .bind(user_id)
    .bind(movie_id)
    .bind(progress_seconds)
    .bind(duration_seconds)
    .bind(chrono::Utc::now().to_rfc3339())
    .execute(pool)
    .await?;

    Ok(())
}

/// Drop a movie from the user's history.
pub async fn clear(pool: &SqlitePool, user_id: &str, movie_id: &str) -> Result<()> {
    sqlx::query("DELETE FROM watch_history WHERE user_id = ? AND movie_id = ?")
        .bind(user_id)
        .bind(movie_id)
        .execute(pool)
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{db, services::auth};
    use uuid::Uuid;

    async fn insert_movie(pool: &SqlitePool, title: &str) -> String {
        let id = Uuid::new_v4().to_string();
        sqlx::query("INSERT INTO movies (id, title, video_link) VALUES (?, ?, ?)")
            .bind(&id)
            .bind(title)
            .bind("https://example.com/embed")
            .execute(pool)
            .await
            .unwrap();
        id
    }

    #[tokio::test]
    async fn progress_upsert_replaces_previous_position() {
        let pool = db::test_pool().await;
        let user = auth::create_user(&pool, "dave", "pw", false).await.unwrap();
        let movie = insert_movie(&pool, "Inception").await;

        update_progress(&pool, &user.id, &movie, 120, Some(7200))
            .await
            .unwrap();
        update_progress(&pool, &user.id, &movie, 300, Some(7200))
            .await
            .unwrap();

        let items = recent(&pool, &user.id, 10).await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].progress_seconds, 300);
        assert_eq!(items[0].title, "Inception");
    }

    #[tokio::test]
    async fn recent_orders_newest_first_and_clears() {
        let pool = db::test_pool().await;
        let user = auth::create_user(&pool, "erin", "pw", false).await.unwrap();
        let first = insert_movie(&pool, "First").await;
        let second = insert_movie(&pool, "Second").await;

        update_progress(&pool, &user.id, &first, 10, None).await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        update_progress(&pool, &user.id, &second, 20, None).await.unwrap();

        let items = recent(&pool, &user.id, 10).await.unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].title, "Second");

        clear(&pool, &user.id, &second).await.unwrap();
        let items = recent(&pool, &user.id, 10).await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].title, "First");
    }
}
