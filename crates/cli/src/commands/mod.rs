//! CLI command implementations.

pub mod admin;
pub mod migrate;
pub mod seed;

use secrecy::SecretString;
use thiserror::Error;

/// Errors shared by the CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// Required environment variable is missing.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Migration error.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Session store migration error.
    #[error("Session store error: {0}")]
    SessionStore(String),

    /// Auth service error.
    #[error(transparent)]
    Auth(#[from] alto_server::services::auth::AuthError),

    /// Storage error.
    #[error(transparent)]
    Storage(#[from] alto_server::storage::StorageError),
}

/// Read the database URL from the environment.
pub fn database_url() -> Result<SecretString, CliError> {
    dotenvy::dotenv().ok();

    std::env::var("ALTO_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map(SecretString::from)
        .map_err(|_| CliError::MissingEnvVar("ALTO_DATABASE_URL"))
}
