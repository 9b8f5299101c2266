//! Bootstrap binary: prepares the tracker's database.
//!
//! Initializes logging, loads `.env`, connects to the configured database
//! and creates the schema. Transport layers run as separate processes on
//! top of the prepared database.

use dotenvy::dotenv;
use moneta::config::database;
use moneta::errors::Result;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing as early as possible
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // .env is optional; env vars can be set externally
    dotenv().ok();
    info!("Attempted to load .env file.");

    let db = database::create_connection()
        .await
        .inspect(|_| info!("Database connection established."))
        .inspect_err(|e| error!("Failed to connect to database: {e}"))?;

    database::create_tables(&db)
        .await
        .inspect_err(|e| error!("Failed to create tables: {e}"))?;

    info!(
        "Database schema is ready at {}",
        database::get_database_url()?
    );

    Ok(())
}
