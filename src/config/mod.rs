/// Default category definitions loaded from config.toml
pub mod categories;

/// Database configuration and connection management
pub mod database;
