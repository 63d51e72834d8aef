//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                              - Liveness check
//! GET  /health/ready                        - Readiness check (pings storage)
//!
//! # Products (reads public, writes admin)
//! GET    /api/products                      - Product listing (?color= filter)
//! POST   /api/products                      - Create product
//! GET    /api/products/{id}                 - Product detail incl. variations
//! PUT    /api/products/{id}                 - Update product
//! DELETE /api/products/{id}                 - Delete product and variations
//! GET    /api/products/{id}/variations      - List variations
//! POST   /api/products/{id}/variations      - Add variation
//! PUT    /api/products/{id}/variations/{vid}    - Update variation
//! DELETE /api/products/{id}/variations/{vid}    - Delete variation
//!
//! # Checkout (public)
//! POST /api/checkout                        - Place an order
//!
//! # Orders (admin)
//! GET    /api/orders                        - List orders newest-first
//! GET    /api/orders/{id}                   - Order detail incl. items
//! PATCH  /api/orders/{id}/status            - Update order status
//! DELETE /api/orders/{id}                   - Delete order
//!
//! # Auth
//! POST /api/auth/login                      - Login, sets session cookie
//! POST /api/auth/logout                     - Logout
//! GET  /api/auth/me                         - Current admin or 401
//!
//! # Media (admin)
//! GET    /api/medias                        - List uploads
//! POST   /api/medias                        - Multipart upload
//! DELETE /api/medias/{id}                   - Delete upload (file and row)
//!
//! # Site versions
//! GET  /api/versions                        - List versions
//! GET  /api/versions/active                 - Active version (public)
//! POST /api/versions                        - Create version (admin)
//! PUT  /api/versions/{id}/activate          - Activate version (admin)
//! ```

pub mod auth;
pub mod checkout;
pub mod health;
pub mod medias;
pub mod orders;
pub mod products;
pub mod versions;

use axum::{
    Router,
    routing::{delete, get, patch, post, put},
};

use crate::state::AppState;

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index).post(products::create))
        .route(
            "/{id}",
            get(products::show)
                .put(products::update)
                .delete(products::destroy),
        )
        .route(
            "/{id}/variations",
            get(products::variations_index).post(products::variations_create),
        )
        .route(
            "/{id}/variations/{vid}",
            put(products::variations_update).delete(products::variations_destroy),
        )
}

/// Create the checkout routes router.
pub fn checkout_routes() -> Router<AppState> {
    Router::new().route("/", post(checkout::create))
}

/// Create the order routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(orders::index))
        .route("/{id}", get(orders::show).delete(orders::destroy))
        .route("/{id}/status", patch(orders::update_status))
}

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
        .route("/me", get(auth::me))
}

/// Create the media routes router.
pub fn media_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(medias::index).post(medias::upload))
        .route("/{id}", delete(medias::destroy))
}

/// Create the site version routes router.
pub fn version_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(versions::index).post(versions::create))
        .route("/active", get(versions::active))
        .route("/{id}/activate", put(versions::activate))
}
