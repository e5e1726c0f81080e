use anyhow::Result;
use axum::{routing::get, Router};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod api;
mod catalog;
mod config;
mod db;
mod models;
mod services;

use config::AppConfig;

/// Tracks all background task handles for graceful shutdown
struct BackgroundTasks {
    handles: Vec<(&'static str, JoinHandle<()>)>,
    shutdown: CancellationToken,
}

impl BackgroundTasks {
    fn new() -> Self {
        Self {
            handles: Vec::new(),
            shutdown: CancellationToken::new(),
        }
    }

    fn token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    fn spawn<F>(&mut self, name: &'static str, future: F)
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let handle = tokio::spawn(future);
        self.handles.push((name, handle));
    }

    async fn shutdown(self) {
        tracing::info!("Initiating graceful shutdown...");

        // Signal all tasks to stop
        self.shutdown.cancel();

        // Wait for all tasks with a timeout
        for (name, handle) in self.handles {
            tracing::debug!("Waiting for {} to finish...", name);
            match tokio::time::timeout(Duration::from_secs(10), handle).await {
                Ok(Ok(())) => tracing::debug!("{} finished cleanly", name),
                Ok(Err(e)) => tracing::warn!("{} panicked: {}", name, e),
                Err(_) => tracing::warn!("{} timed out during shutdown", name),
            }
        }

        tracing::info!("All background tasks stopped");
    }
}

pub struct AppState {
    pub db: sqlx::SqlitePool,
    pub config: AppConfig,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "valorex=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load .env file if present
    dotenvy::dotenv().ok();

    let config = AppConfig::load();

    config.paths.ensure_dirs().await?;

    config.log_config();

    // Database setup with optimized connection pool
    let database_url = config.database_url();
    tracing::debug!("Database URL: {}", database_url);

    let connect_options = SqliteConnectOptions::from_str(&database_url)?
        .create_if_missing(true)
        // WAL mode for better concurrent performance
        .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
        // NORMAL sync is safe with WAL and much faster
        .synchronous(sqlx::sqlite::SqliteSynchronous::Normal)
        // Enable foreign key enforcement (cascading deletes rely on it)
        .foreign_keys(true)
        // Busy timeout for concurrent access (5 seconds)
        .busy_timeout(Duration::from_secs(5));

    let pool = SqlitePoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(5))
        .idle_timeout(Duration::from_secs(600))
        .max_lifetime(Duration::from_secs(1800))
        .test_before_acquire(true)
        // Configure PRAGMAs on every new connection via after_connect hook
        .after_connect(|conn, _meta| {
            Box::pin(async move {
                use sqlx::Executor;
                // Cache size: -32000 = 32MB (negative = KB)
                conn.execute("PRAGMA cache_size = -32000").await?;
                // Store temp tables in memory
                conn.execute("PRAGMA temp_store = MEMORY").await?;
                Ok(())
            })
        })
        .connect_with(connect_options)
        .await?;

    tracing::info!("SQLite configured: WAL mode, 32MB cache (per connection)");

    db::migrate(&pool).await?;

    // Create the bootstrap admin account if no users exist
    let user_count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
        .fetch_one(&pool)
        .await?;

    if user_count.0 == 0 {
        tracing::info!("No users found, creating bootstrap admin account");
        services::auth::create_user(&pool, &config.admin.username, &config.admin.password, true)
            .await?;
        tracing::info!("Created admin user '{}'", config.admin.username);
    }

    let state = std::sync::Arc::new(AppState {
        db: pool.clone(),
        config: config.clone(),
    });

    // Initialize background task manager with graceful shutdown support
    let mut bg_tasks = BackgroundTasks::new();
    let shutdown_token = bg_tasks.token();

    // Spawn session cleanup task with cancellation
    {
        let session_pool = pool.clone();
        let max_age_days = config.sessions.max_age_days;
        let cancel = shutdown_token.clone();
        bg_tasks.spawn("session-cleanup", async move {
            tokio::time::sleep(Duration::from_secs(30)).await;
            tracing::info!("Session cleanup task started");

            loop {
                tokio::select! {
                    _ = cancel.cancelled() => {
                        tracing::debug!("Session cleanup received shutdown signal");
                        break;
                    }
                    _ = tokio::time::sleep(Duration::from_secs(3600)) => {
                        match services::auth::cleanup_expired_sessions(&session_pool, max_age_days).await {
                            Ok(removed) if removed > 0 => {
                                tracing::info!("Cleaned up {} expired sessions", removed);
                            }
                            Ok(_) => {}
                            Err(e) => tracing::warn!("Session cleanup failed: {}", e),
                        }
                    }
                }
            }
        });
    }

    // Spawn nightly database optimization task
    {
        let optimize_pool = pool.clone();
        let cancel = shutdown_token.clone();
        bg_tasks.spawn("db-optimize", async move {
            loop {
                tokio::select! {
                    _ = cancel.cancelled() => {
                        tracing::debug!("DB optimize task received shutdown signal");
                        break;
                    }
                    _ = tokio::time::sleep(Duration::from_secs(86400)) => {
                        if let Err(e) = db::optimize(&optimize_pool).await {
                            tracing::warn!("Database optimization failed: {}", e);
                        }
                    }
                }
            }
        });
    }

    // Root handler
    async fn root_handler() -> &'static str {
        "Valorex Catalog Server"
    }

    // Build router
    let app = Router::new()
        .route("/", get(root_handler).head(root_handler))
        .route("/health", get(|| async { "OK" }))
        .nest("/", api::routes())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let bind_ip: std::net::IpAddr = config
        .bind_address
        .parse()
        .unwrap_or_else(|_| std::net::IpAddr::from([0, 0, 0, 0]));
    let addr = SocketAddr::from((bind_ip, config.port));
    tracing::info!("Starting server on {}", addr);

    // Create shutdown signal listener
    let shutdown_signal = async {
        let ctrl_c = async {
            tokio::signal::ctrl_c()
                .await
                .expect("Failed to install Ctrl+C handler");
        };

        #[cfg(unix)]
        let terminate = async {
            tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
                .expect("Failed to install SIGTERM handler")
                .recv()
                .await;
        };

        #[cfg(not(unix))]
        let terminate = std::future::pending::<()>();

        tokio::select! {
            _ = ctrl_c => tracing::info!("Received Ctrl+C, shutting down..."),
            _ = terminate => tracing::info!("Received SIGTERM, shutting down..."),
        }
    };

    // Start server with graceful shutdown
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await?;

    // After server stops, gracefully shutdown background tasks
    bg_tasks.shutdown().await;

    tracing::info!("Server shutdown complete");
    Ok(())
}
