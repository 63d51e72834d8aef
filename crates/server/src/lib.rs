//! Alto server library.
//!
//! The API and upload serving for the Alto storefront, exposed as a library
//! so the CLI and integration tests can reuse the storage and service layers.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
pub mod storage;

use axum::{Router, extract::DefaultBodyLimit, routing::get};
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

use crate::routes::medias::UPLOADS_PREFIX;
use crate::state::AppState;

/// Maximum accepted request body size (covers media uploads).
const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

/// Build the application router.
///
/// The session layer is applied by the caller, since its store type follows
/// the storage backend.
pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .nest("/products", routes::product_routes())
        .nest("/checkout", routes::checkout_routes())
        .nest("/orders", routes::order_routes())
        .nest("/auth", routes::auth_routes())
        .nest("/medias", routes::media_routes())
        .nest("/versions", routes::version_routes());

    Router::new()
        .route("/health", get(routes::health::health))
        .route("/health/ready", get(routes::health::ready))
        .nest("/api", api)
        .nest_service(UPLOADS_PREFIX, ServeDir::new(&state.config.upload_dir))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        // The admin client runs on its own origin and sends the session cookie
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}
