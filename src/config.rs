// Configuration module for valorex
// Handles XDG-compliant directory paths and TOML configuration file

use serde::Deserialize;
use std::path::PathBuf;

const APP_NAME: &str = "valorex";
const CONFIG_FILENAME: &str = "config.toml";

/// TOML configuration file structure
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ConfigFile {
    /// Server configuration
    pub server: ServerConfig,

    /// Directory paths (overrides XDG defaults)
    pub paths: PathsConfig,

    /// Initial admin account created on first start
    pub admin: AdminConfig,

    /// Catalog listing configuration
    pub catalog: CatalogConfig,

    /// Session lifetime configuration
    pub sessions: SessionConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Server port (default: 8080)
    pub port: u16,

    /// Bind address (default: 0.0.0.0)
    pub bind_address: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            bind_address: "0.0.0.0".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Override data directory (database location)
    pub data_dir: Option<PathBuf>,

    /// Override config directory
    pub config_dir: Option<PathBuf>,
}

/// Bootstrap admin account, only used when the users table is empty
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AdminConfig {
    pub username: String,
    pub password: String,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            username: "admin".to_string(),
            password: "admin".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Items per page on movie/series/software/blog listings (default: 10)
    pub page_size: usize,

    /// Default pager button budget when the client does not send one
    /// (narrow clients send 3, wide clients 5)
    pub max_visible_pages: usize,

    /// Result cap for the cross-section name search endpoint
    pub search_limit: usize,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            page_size: 10,
            max_visible_pages: 5,
            search_limit: 20,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Sessions older than this are removed by the cleanup task (default: 30)
    pub max_age_days: i64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self { max_age_days: 30 }
    }
}

/// Application paths following XDG Base Directory Specification on Unix
#[derive(Debug, Clone)]
pub struct AppPaths {
    /// Directory for configuration files (config.toml)
    /// XDG: $XDG_CONFIG_HOME/valorex or ~/.config/valorex
    pub config_dir: PathBuf,

    /// Directory for persistent data (database)
    /// XDG: $XDG_DATA_HOME/valorex or ~/.local/share/valorex
    pub data_dir: PathBuf,
}

impl AppPaths {
    /// Create application paths using XDG directories (or fallbacks)
    ///
    /// Priority order:
    /// 1. Environment variables (VALOREX_CONFIG_DIR, VALOREX_DATA_DIR)
    /// 2. Config file overrides
    /// 3. XDG directories
    /// 4. Current directory fallback
    pub fn new(config_overrides: &PathsConfig) -> Self {
        Self {
            config_dir: Self::resolve_config_dir(&config_overrides.config_dir),
            data_dir: Self::resolve_data_dir(&config_overrides.data_dir),
        }
    }

    /// Create application paths using current directory (portable mode)
    pub fn current_dir() -> Self {
        let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self {
            config_dir: cwd.clone(),
            data_dir: cwd,
        }
    }

    fn resolve_config_dir(config_override: &Option<PathBuf>) -> PathBuf {
        if let Ok(path) = std::env::var("VALOREX_CONFIG_DIR") {
            return PathBuf::from(path);
        }
        if let Some(ref path) = config_override {
            return path.clone();
        }
        if let Some(dir) = dirs::config_dir() {
            return dir.join(APP_NAME);
        }
        std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
    }

    fn resolve_data_dir(config_override: &Option<PathBuf>) -> PathBuf {
        if let Ok(path) = std::env::var("VALOREX_DATA_DIR") {
            return PathBuf::from(path);
        }
        if let Some(ref path) = config_override {
            return path.clone();
        }
        if let Some(dir) = dirs::data_dir() {
            return dir.join(APP_NAME);
        }
        std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
    }

    /// Get the database file path
    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join("valorex.db")
    }

    /// Get the database URL for SQLite
    pub fn database_url(&self) -> String {
        format!("sqlite:{}?mode=rwc", self.database_path().display())
    }

    /// Get the config file path
    pub fn config_file_path(&self) -> PathBuf {
        self.config_dir.join(CONFIG_FILENAME)
    }

    /// Ensure all directories exist
    pub async fn ensure_dirs(&self) -> std::io::Result<()> {
        tokio::fs::create_dir_all(&self.config_dir).await?;
        tokio::fs::create_dir_all(&self.data_dir).await?;
        Ok(())
    }

    /// Log the configured paths
    pub fn log_paths(&self) {
        tracing::info!("Configuration directory: {}", self.config_dir.display());
        tracing::info!("Data directory: {}", self.data_dir.display());
        tracing::debug!("Database path: {}", self.database_path().display());
    }
}

impl Default for AppPaths {
    fn default() -> Self {
        Self::new(&PathsConfig::default())
    }
}

/// Application configuration - combines TOML file with environment overrides
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Application paths
    pub paths: AppPaths,

    /// Server port
    pub port: u16,

    /// Bind address
    pub bind_address: String,

    /// Bootstrap admin account
    pub admin: AdminConfig,

    /// Catalog listing knobs
    pub catalog: CatalogConfig,

    /// Session lifetime knobs
    pub sessions: SessionConfig,
}

impl AppConfig {
    /// Load configuration from TOML file and environment
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables
    /// 2. TOML config file
    /// 3. Default values
    pub fn load() -> Self {
        let portable_mode = std::env::var("VALOREX_PORTABLE")
            .map(|v| v.eq_ignore_ascii_case("true") || v == "1")
            .unwrap_or(false);

        if portable_mode {
            tracing::info!("Running in portable mode (using current directory)");
            return Self::portable();
        }

        let config_dir = Self::find_config_dir();
        let config_file = Self::load_config_file(&config_dir);

        Self::build(config_file)
    }

    /// Create a portable configuration (current directory for everything)
    fn portable() -> Self {
        Self {
            paths: AppPaths::current_dir(),
            port: Self::env_port().unwrap_or(8080),
            bind_address: Self::env_bind_address().unwrap_or_else(|| "0.0.0.0".to_string()),
            admin: Self::env_admin(AdminConfig::default()),
            catalog: CatalogConfig::default(),
            sessions: SessionConfig::default(),
        }
    }

    /// Find the config directory (for locating config.toml)
    fn find_config_dir() -> PathBuf {
        if let Ok(path) = std::env::var("VALOREX_CONFIG_DIR") {
            return PathBuf::from(path);
        }
        if let Some(dir) = dirs::config_dir() {
            return dir.join(APP_NAME);
        }
        std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
    }

    /// Load and parse the TOML config file
    fn load_config_file(config_dir: &std::path::Path) -> ConfigFile {
        let config_path = config_dir.join(CONFIG_FILENAME);

        if !config_path.exists() {
            tracing::debug!(
                "No config file found at {}, using defaults",
                config_path.display()
            );
            return ConfigFile::default();
        }

        match std::fs::read_to_string(&config_path) {
            Ok(contents) => match toml::from_str(&contents) {
                Ok(config) => {
                    tracing::info!("Loaded configuration from {}", config_path.display());
                    config
                }
                Err(e) => {
                    tracing::warn!(
                        "Failed to parse config file {}: {}. Using defaults.",
                        config_path.display(),
                        e
                    );
                    ConfigFile::default()
                }
            },
            Err(e) => {
                tracing::warn!(
                    "Failed to read config file {}: {}. Using defaults.",
                    config_path.display(),
                    e
                );
                ConfigFile::default()
            }
        }
    }

    /// Build configuration from config file with environment overrides
    fn build(config_file: ConfigFile) -> Self {
        let paths = AppPaths::new(&config_file.paths);

        let port = Self::env_port().unwrap_or(config_file.server.port);
        let bind_address =
            Self::env_bind_address().unwrap_or_else(|| config_file.server.bind_address.clone());
        let admin = Self::env_admin(config_file.admin);

        Self {
            paths,
            port,
            bind_address,
            admin,
            catalog: config_file.catalog,
            sessions: config_file.sessions,
        }
    }

    fn env_port() -> Option<u16> {
        std::env::var("VALOREX_PORT").ok().and_then(|p| p.parse().ok())
    }

    fn env_bind_address() -> Option<String> {
        std::env::var("VALOREX_BIND_ADDRESS").ok()
    }

    fn env_admin(fallback: AdminConfig) -> AdminConfig {
        AdminConfig {
            username: std::env::var("VALOREX_ADMIN_USER").unwrap_or(fallback.username),
            password: std::env::var("VALOREX_ADMIN_PASSWORD").unwrap_or(fallback.password),
        }
    }

    /// Get the database URL, with override from DATABASE_URL env var
    pub fn database_url(&self) -> String {
        std::env::var("DATABASE_URL").unwrap_or_else(|_| self.paths.database_url())
    }

    /// Log configuration status
    pub fn log_config(&self) {
        self.paths.log_paths();
        tracing::info!("Server listening on {}:{}", self.bind_address, self.port);
        tracing::debug!(
            "Catalog: {} items per page, pager budget {}",
            self.catalog.page_size,
            self.catalog.max_visible_pages
        );
        tracing::debug!("Session max age: {} days", self.sessions.max_age_days);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_database_url_format() {
        let paths = AppPaths::current_dir();
        let url = paths.database_url();
        assert!(url.starts_with("sqlite:"));
        assert!(url.ends_with("?mode=rwc"));
    }

    #[test]
    fn test_default_config_file() {
        let config = ConfigFile::default();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.bind_address, "0.0.0.0");
        assert_eq!(config.catalog.page_size, 10);
        assert_eq!(config.catalog.max_visible_pages, 5);
        assert_eq!(config.sessions.max_age_days, 30);
    }

    #[test]
    fn test_parse_config_toml() {
        let toml_str = r#"
[server]
port = 9000
bind_address = "127.0.0.1"

[paths]
data_dir = "/custom/data"

[admin]
username = "root"
password = "hunter2"

[catalog]
page_size = 24
"#;
        let config: ConfigFile = toml::from_str(toml_str).unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.bind_address, "127.0.0.1");
        assert_eq!(config.paths.data_dir, Some(PathBuf::from("/custom/data")));
        assert_eq!(config.admin.username, "root");
        assert_eq!(config.catalog.page_size, 24);
        // untouched sections keep their defaults
        assert_eq!(config.catalog.max_visible_pages, 5);
    }

    #[test]
    fn test_partial_config_toml() {
        let toml_str = r#"
[sessions]
max_age_days = 7
"#;
        let config: ConfigFile = toml::from_str(toml_str).unwrap();
        assert_eq!(config.server.port, 8080); // default
        assert_eq!(config.sessions.max_age_days, 7); // from file
    }
}
