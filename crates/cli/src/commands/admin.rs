//! Admin user management command.

use alto_server::services::AuthService;
use alto_server::storage::{PgStorage, postgres::create_pool};

use super::{CliError, database_url};

/// Create a new admin user.
///
/// The password is hashed with Argon2id before it reaches the database.
pub async fn create_user(username: &str, password: &str) -> Result<(), CliError> {
    let database_url = database_url()?;

    tracing::info!("Connecting to database...");
    let pool = create_pool(&database_url).await?;
    let storage = PgStorage::new(pool);

    let auth = AuthService::new(&storage);
    let user = auth.create_admin(username, password).await?;

    tracing::info!("Created admin user {} (id {})", user.username, user.id);
    Ok(())
}
