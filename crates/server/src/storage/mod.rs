//! Storage layer: a swappable persistence interface.
//!
//! Two implementations sit behind the [`Storage`] trait:
//!
//! - [`MemoryStorage`] - `RwLock`-guarded maps, used for development and tests.
//! - [`PgStorage`] - `PostgreSQL` via sqlx, used in production.
//!
//! The backend is chosen at startup from configuration: a configured database
//! URL selects Postgres, otherwise the server runs on memory.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use thiserror::Error;

use alto_core::{MediaId, OrderId, OrderStatus, ProductId, UserId, VariationId, VersionId};

use crate::models::{
    CheckoutRequest, Media, NewMedia, NewProduct, NewVariation, NewVersion, OrderDetail,
    OrderSummary, Product, ProductUpdate, ProductVariation, SiteVersion, User, VariationUpdate,
};

pub use memory::MemoryStorage;
pub use postgres::PgStorage;

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique email or username).
    #[error("constraint violation: {0}")]
    Conflict(String),

    /// A checkout line asked for more units than are in stock.
    #[error("insufficient stock for {0}")]
    InsufficientStock(String),
}

/// Persistence interface shared by the memory and Postgres backends.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Cheap connectivity check for the readiness endpoint.
    async fn ping(&self) -> Result<(), StorageError>;

    // -------------------------------------------------------------------------
    // Products & variations
    // -------------------------------------------------------------------------

    /// List products, optionally filtered by color.
    async fn list_products(&self, color: Option<&str>) -> Result<Vec<Product>, StorageError>;

    /// Get a product by id.
    async fn get_product(&self, id: ProductId) -> Result<Option<Product>, StorageError>;

    /// Create a product.
    async fn create_product(&self, input: NewProduct) -> Result<Product, StorageError>;

    /// Apply a partial update to a product.
    async fn update_product(
        &self,
        id: ProductId,
        changes: ProductUpdate,
    ) -> Result<Product, StorageError>;

    /// Delete a product and its variations.
    async fn delete_product(&self, id: ProductId) -> Result<(), StorageError>;

    /// List the variations of a product.
    async fn list_variations(
        &self,
        product_id: ProductId,
    ) -> Result<Vec<ProductVariation>, StorageError>;

    /// Add a variation to a product.
    async fn create_variation(
        &self,
        product_id: ProductId,
        input: NewVariation,
    ) -> Result<ProductVariation, StorageError>;

    /// Apply a partial update to a variation of the given product.
    async fn update_variation(
        &self,
        product_id: ProductId,
        id: VariationId,
        changes: VariationUpdate,
    ) -> Result<ProductVariation, StorageError>;

    /// Delete a variation of the given product.
    async fn delete_variation(
        &self,
        product_id: ProductId,
        id: VariationId,
    ) -> Result<(), StorageError>;

    // -------------------------------------------------------------------------
    // Checkout & orders
    // -------------------------------------------------------------------------

    /// Place an order: upsert the customer by email, create the order and its
    /// lines with snapshotted prices, and decrement stock - atomically.
    ///
    /// Fails with [`StorageError::NotFound`] for an unknown product or
    /// variation and [`StorageError::InsufficientStock`] when a line exceeds
    /// available stock; in both cases nothing is written.
    async fn checkout(&self, request: CheckoutRequest) -> Result<OrderDetail, StorageError>;

    /// List orders newest-first with customer summaries.
    async fn list_orders(&self) -> Result<Vec<OrderSummary>, StorageError>;

    /// Get an order with its customer and lines.
    async fn get_order(&self, id: OrderId) -> Result<Option<OrderDetail>, StorageError>;

    /// Update an order's status.
    async fn update_order_status(
        &self,
        id: OrderId,
        status: OrderStatus,
    ) -> Result<OrderDetail, StorageError>;

    /// Delete an order and its lines.
    async fn delete_order(&self, id: OrderId) -> Result<(), StorageError>;

    // -------------------------------------------------------------------------
    // Admin users
    // -------------------------------------------------------------------------

    /// Look up an admin user and their password hash by username.
    async fn get_user_by_username(
        &self,
        username: &str,
    ) -> Result<Option<(User, String)>, StorageError>;

    /// Get an admin user by id.
    async fn get_user(&self, id: UserId) -> Result<Option<User>, StorageError>;

    /// Create an admin user with a pre-hashed password.
    async fn create_user(&self, username: &str, password_hash: &str)
    -> Result<User, StorageError>;

    // -------------------------------------------------------------------------
    // Media
    // -------------------------------------------------------------------------

    /// List uploaded media newest-first.
    async fn list_media(&self) -> Result<Vec<Media>, StorageError>;

    /// Record an uploaded file.
    async fn create_media(&self, input: NewMedia) -> Result<Media, StorageError>;

    /// Delete a media row, returning it so the caller can remove the file.
    async fn delete_media(&self, id: MediaId) -> Result<Media, StorageError>;

    // -------------------------------------------------------------------------
    // Site versions
    // -------------------------------------------------------------------------

    /// List all site versions.
    async fn list_versions(&self) -> Result<Vec<SiteVersion>, StorageError>;

    /// Get the currently active version.
    async fn active_version(&self) -> Result<SiteVersion, StorageError>;

    /// Create a (non-active) site version.
    async fn create_version(&self, input: NewVersion) -> Result<SiteVersion, StorageError>;

    /// Activate a version, deactivating all others.
    async fn activate_version(&self, id: VersionId) -> Result<SiteVersion, StorageError>;
}
