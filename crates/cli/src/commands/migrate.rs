//! Database migration command.
//!
//! Runs the schema migrations embedded in the server crate, then lets the
//! tower-sessions Postgres store create its own table.

use tower_sessions_sqlx_store::PostgresStore;

use alto_server::storage::postgres::{MIGRATOR, create_pool};

use super::{CliError, database_url};

/// Run all migrations against `ALTO_DATABASE_URL`.
pub async fn run() -> Result<(), CliError> {
    let database_url = database_url()?;

    tracing::info!("Connecting to database...");
    let pool = create_pool(&database_url).await?;

    tracing::info!("Running schema migrations...");
    MIGRATOR.run(&pool).await?;

    tracing::info!("Running session store migrations...");
    PostgresStore::new(pool.clone())
        .migrate()
        .await
        .map_err(|e| CliError::SessionStore(e.to_string()))?;

    tracing::info!("Migrations complete!");
    Ok(())
}
