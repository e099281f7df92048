/// Database configuration and connection management
pub mod database;

/// Application settings loading from config.toml
pub mod settings;

/// Bootstrap account credentials from environment variables
pub mod users;

pub use settings::{AppConfig, ServerConfig, load_app_config};
