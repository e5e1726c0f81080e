use serde::{Deserialize, Serialize};

use crate::catalog::CatalogEntry;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub is_admin: bool,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Session {
    pub token: String,
    pub user_id: String,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Movie {
    pub id: String,
    pub title: String,
    pub poster_url: Option<String>,
    pub release_date: Option<String>,
    /// "hollywood" or "bollywood"
    pub category: Option<String>,
    /// "english", "hindi" or "dual"
    pub language: Option<String>,
    pub quality: Option<String>,
    pub info: Option<String>,
    pub download_link: Option<String>,
    pub normal_print_link: Option<String>,
    pub video_link: Option<String>,
    pub is_featured: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl CatalogEntry for Movie {
    fn display_name(&self) -> &str {
        &self.title
    }

    fn axis_value(&self, axis: &str) -> Option<&str> {
        match axis {
            "category" => self.category.as_deref(),
            "language" => self.language.as_deref(),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct WebSeries {
    pub id: String,
    pub title: String,
    pub poster_url: Option<String>,
    pub release_date: Option<String>,
    pub category: Option<String>,
    pub language: Option<String>,
    pub info: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl CatalogEntry for WebSeries {
    fn display_name(&self) -> &str {
        &self.title
    }

    fn axis_value(&self, axis: &str) -> Option<&str> {
        match axis {
            "category" => self.category.as_deref(),
            "language" => self.language.as_deref(),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Season {
    pub id: String,
    pub series_id: String,
    pub season_number: i32,
    pub title: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Episode {
    pub id: String,
    pub season_id: String,
    pub episode_number: i32,
    pub title: String,
    pub video_link: Option<String>,
    pub download_link: Option<String>,
    pub duration: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct SoftwareTitle {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub version: Option<String>,
    /// One of: windows, mac, android_apps, android_games, pc_games
    pub platform: String,
    pub category: Option<String>,
    pub icon_url: Option<String>,
    pub download_count: i64,
    pub file_size: Option<String>,
    pub reputation: Option<f64>,
    pub download_link: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Platform values accepted for software listings.
pub const SOFTWARE_PLATFORMS: &[&str] =
    &["windows", "mac", "android_apps", "android_games", "pc_games"];

impl CatalogEntry for SoftwareTitle {
    fn display_name(&self) -> &str {
        &self.name
    }

    fn axis_value(&self, axis: &str) -> Option<&str> {
        match axis {
            "platform" => Some(&self.platform),
            "category" => self.category.as_deref(),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct BlogPost {
    pub id: String,
    pub movie_name: String,
    pub article: Option<String>,
    pub poster_url: Option<String>,
    pub download_link: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl CatalogEntry for BlogPost {
    fn display_name(&self) -> &str {
        &self.movie_name
    }

    fn axis_value(&self, _axis: &str) -> Option<&str> {
        None
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct MovieRequest {
    pub id: String,
    pub movie_name: String,
    pub language: String,
    pub whatsapp_number: Option<String>,
    /// "pending", "completed" or "rejected"
    pub status: String,
    pub created_at: String,
    pub updated_at: String,
}
