use anyhow::Result;
use sqlx::SqlitePool;

pub async fn migrate(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL UNIQUE,
            password_hash TEXT NOT NULL,
            is_admin INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        );

        CREATE TABLE IF NOT EXISTS sessions (
            token TEXT PRIMARY KEY,
            user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        );

        CREATE TABLE IF NOT EXISTS movies (
            id TEXT PRIMARY KEY,
            title TEXT NOT NULL,
            poster_url TEXT,
            release_date TEXT,
            category TEXT,
            language TEXT,
            quality TEXT,
            info TEXT,
            download_link TEXT,
            normal_print_link TEXT,
            video_link TEXT,
            is_featured INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
            updated_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        );

        CREATE TABLE IF NOT EXISTS web_series (
            id TEXT PRIMARY KEY,
            title TEXT NOT NULL,
            poster_url TEXT,
            release_date TEXT,
            category TEXT,
            language TEXT,
            info TEXT,
            created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
            updated_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        );

        CREATE TABLE IF NOT EXISTS seasons (
            id TEXT PRIMARY KEY,
            series_id TEXT NOT NULL REFERENCES web_series(id) ON DELETE CASCADE,
            season_number INTEGER NOT NULL,
            title TEXT,
            created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
            UNIQUE(series_id, season_number)
        );

        CREATE TABLE IF NOT EXISTS episodes (
            id TEXT PRIMARY KEY,
            season_id TEXT NOT NULL REFERENCES seasons(id) ON DELETE CASCADE,
            episode_number INTEGER NOT NULL,
            title TEXT NOT NULL,
            video_link TEXT,
            download_link TEXT,
            duration TEXT,
            created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
            UNIQUE(season_id, episode_number)
        );

        CREATE TABLE IF NOT EXISTS software_titles (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            description TEXT,
            version TEXT,
            platform TEXT NOT NULL DEFAULT 'windows',
            category TEXT,
            icon_url TEXT,
            download_count INTEGER NOT NULL DEFAULT 0,
            file_size TEXT,
            reputation REAL,
            download_link TEXT,
            created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
            updated_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        );

        CREATE TABLE IF NOT EXISTS blog_posts (
            id TEXT PRIMARY KEY,
            movie_name TEXT NOT NULL,
            article TEXT,
            poster_url TEXT,
            download_link TEXT,
            created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
            updated_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        );

        CREATE TABLE IF NOT EXISTS movie_requests (
            id TEXT PRIMARY KEY,
            movie_name TEXT NOT NULL,
            language TEXT NOT NULL,
            whatsapp_number TEXT,
            status TEXT NOT NULL DEFAULT 'pending',
            created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
            updated_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        );

        CREATE TABLE IF NOT EXISTS watchlist (
            user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            movie_id TEXT NOT NULL REFERENCES movies(id) ON DELETE CASCADE,
            added_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
            PRIMARY KEY (user_id, movie_id)
        );

        CREATE TABLE IF NOT EXISTS watch_history (
            user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            movie_id TEXT NOT NULL REFERENCES movies(id) ON DELETE CASCADE,
            progress_seconds INTEGER NOT NULL DEFAULT 0,
            duration_seconds INTEGER,
            last_watched_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
            PRIMARY KEY (user_id, movie_id)
        );
        "#,
    )
    .execute(pool)
    .await?;

    create_indexes(pool).await?;

    Ok(())
}

/// Create all database indexes for optimal query performance
async fn create_indexes(pool: &SqlitePool) -> Result<()> {
    let indexes = [
        // Catalog listings are fetched newest-first
        "CREATE INDEX IF NOT EXISTS idx_movies_created ON movies(created_at)",
        "CREATE INDEX IF NOT EXISTS idx_web_series_created ON web_series(created_at)",
        "CREATE INDEX IF NOT EXISTS idx_software_created ON software_titles(created_at)",
        "CREATE INDEX IF NOT EXISTS idx_blog_posts_created ON blog_posts(created_at)",
        // Hero banner rows
        "CREATE INDEX IF NOT EXISTS idx_movies_featured ON movies(is_featured) WHERE is_featured = 1",
        // Season/episode navigation
        "CREATE INDEX IF NOT EXISTS idx_seasons_series ON seasons(series_id, season_number)",
        "CREATE INDEX IF NOT EXISTS idx_episodes_season ON episodes(season_id, episode_number)",
        // Session lookup by user
        "CREATE INDEX IF NOT EXISTS idx_sessions_user ON sessions(user_id)",
        // Per-user shelves
        "CREATE INDEX IF NOT EXISTS idx_watchlist_user ON watchlist(user_id, added_at)",
        "CREATE INDEX IF NOT EXISTS idx_watch_history_recent ON watch_history(user_id, last_watched_at)",
        // Admin request queue, filtered by status
        "CREATE INDEX IF NOT EXISTS idx_movie_requests_status ON movie_requests(status, created_at)",
    ];

    for index_sql in indexes {
        if let Err(e) = sqlx::query(index_sql).execute(pool).await {
            tracing::warn!("Failed to create index: {} - {}", index_sql, e);
        }
    }

    tracing::debug!("Database indexes created/verified");

    Ok(())
}

/// Optimize the database (run periodically or on demand)
pub async fn optimize(pool: &SqlitePool) -> Result<()> {
    tracing::info!("Running database optimization...");

    sqlx::query("ANALYZE").execute(pool).await?;
    sqlx::query("PRAGMA optimize").execute(pool).await?;

    tracing::info!("Database optimization complete");

    Ok(())
}

#[cfg(test)]
pub async fn test_pool() -> SqlitePool {
    // A single connection keeps every query on the same in-memory database
    let pool = sqlx::sqlite::SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("in-memory sqlite");
    migrate(&pool).await.expect("migrations");
    pool
}
