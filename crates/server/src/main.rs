//! Alto server - storefront and admin API.
//!
//! Serves the JSON API under `/api` and uploaded media under `/uploads`.
//!
//! # Architecture
//!
//! - Axum web framework, JSON API consumed by the separate web client
//! - Storage behind a trait: `PostgreSQL` via sqlx in production, in-memory
//!   maps in development (selected by `ALTO_DATABASE_URL`)
//! - Session-cookie admin authentication via tower-sessions

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::sync::Arc;

use axum::Router;
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use alto_server::config::AltoConfig;
use alto_server::middleware::session::{memory_session_layer, postgres_session_layer};
use alto_server::state::AppState;
use alto_server::storage::{MemoryStorage, PgStorage, Storage, postgres::create_pool};

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &AltoConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

#[tokio::main]
async fn main() {
    // Load configuration from environment (needed for Sentry init)
    let config = AltoConfig::from_env().expect("Failed to load configuration");

    // Initialize Sentry (must be done before tracing subscriber)
    let _sentry_guard = init_sentry(&config);

    // Initialize tracing with EnvFilter and Sentry integration
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "alto_server=info,tower_http=debug".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    std::fs::create_dir_all(&config.upload_dir).expect("Failed to create upload directory");

    // Select the storage backend; the session store follows it.
    match config.database_url.clone() {
        Some(database_url) => {
            let pool = create_pool(&database_url)
                .await
                .expect("Failed to create database pool");
            tracing::info!("Database pool created");

            // NOTE: Migrations are NOT run automatically on startup.
            // Run them explicitly via: cargo run -p alto-cli -- migrate

            let storage: Arc<dyn Storage> = Arc::new(PgStorage::new(pool.clone()));
            let state = AppState::new(config.clone(), storage);
            let app = alto_server::router(state).layer(postgres_session_layer(
                &pool,
                &config.session_secret,
                config.secure_cookies,
            ));
            serve(app, &config).await;
        }
        None => {
            tracing::warn!("ALTO_DATABASE_URL not set, running on in-memory storage");

            let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new());
            let state = AppState::new(config.clone(), storage);
            let app = alto_server::router(state)
                .layer(memory_session_layer(&config.session_secret, config.secure_cookies));
            serve(app, &config).await;
        }
    }
}

/// Bind and serve with Sentry request layers and graceful shutdown.
async fn serve(app: Router, config: &AltoConfig) {
    // Sentry layers (outermost for full request coverage)
    let app = app
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction());

    let addr = config.socket_addr();
    tracing::info!("alto server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
