pub mod auth;
pub mod history;
