//! Session middleware configuration.
//!
//! Sessions are cookie-keyed via tower-sessions, with the cookie signed by a
//! key derived from `ALTO_SESSION_SECRET`. The store follows the storage
//! backend: Postgres-backed sessions in production, in-memory sessions in
//! development.

use secrecy::{ExposeSecret, SecretString};
use sqlx::PgPool;
use tower_sessions::cookie::Key;
use tower_sessions::service::SignedCookie;
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};
use tower_sessions_sqlx_store::PostgresStore;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "alto.sid";

/// Session expiry time in seconds (7 days).
const SESSION_EXPIRY_SECONDS: i64 = 7 * 24 * 60 * 60;

/// Derive the cookie signing key from the configured session secret.
///
/// `Key::derive_from` requires at least 32 bytes of input; config validation
/// enforces that minimum before this is reached.
fn signing_key(secret: &SecretString) -> Key {
    Key::derive_from(secret.expose_secret().as_bytes())
}

fn configure<S: tower_sessions::SessionStore>(
    store: S,
    secret: &SecretString,
    secure: bool,
) -> SessionManagerLayer<S, SignedCookie> {
    SessionManagerLayer::new(store)
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(SESSION_EXPIRY_SECONDS),
        ))
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_http_only(true)
        .with_secure(secure)
        .with_path("/")
        .with_signed(signing_key(secret))
}

/// Create the session layer with `PostgreSQL` store.
///
/// The sessions table must be created via migration.
#[must_use]
pub fn postgres_session_layer(
    pool: &PgPool,
    secret: &SecretString,
    secure: bool,
) -> SessionManagerLayer<PostgresStore, SignedCookie> {
    configure(PostgresStore::new(pool.clone()), secret, secure)
}

/// Create the session layer with an in-memory store (development mode).
#[must_use]
pub fn memory_session_layer(
    secret: &SecretString,
    secure: bool,
) -> SessionManagerLayer<MemoryStore, SignedCookie> {
    configure(MemoryStore::default(), secret, secure)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signing_key_from_min_length_secret() {
        let secret = SecretString::from("aB3$xY9!mK2@nL5#pQ7&rT0*uW4^zC6d");
        let _ = signing_key(&secret);
    }

    #[test]
    fn test_memory_layer_builds() {
        let secret = SecretString::from("aB3$xY9!mK2@nL5#pQ7&rT0*uW4^zC6d");
        let _ = memory_session_layer(&secret, false);
    }
}
