//! `PostgreSQL` storage backend.
//!
//! Queries use sqlx's runtime API (`query_as` with `FromRow` row types) so the
//! crate builds without a live database. Rows convert into domain types via
//! `TryFrom`, surfacing bad database state as [`StorageError::DataCorruption`].
//!
//! Migrations live in `crates/server/migrations/` and run via:
//! ```bash
//! cargo run -p alto-cli -- migrate
//! ```

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use secrecy::ExposeSecret;
use sqlx::postgres::PgPoolOptions;
use sqlx::{FromRow, PgPool, Postgres, Transaction};

use alto_core::{
    CustomerId, Email, MediaId, OrderId, OrderItemId, OrderStatus, Price, ProductId, ShopMode,
    Theme, UserId, VariationId, VersionId,
};

use super::{Storage, StorageError};
use crate::models::{
    CheckoutRequest, Customer, Media, NewMedia, NewProduct, NewVariation, NewVersion, Order,
    OrderDetail, OrderItem, OrderSummary, Product, ProductUpdate, ProductVariation, SiteVersion,
    User, VariationUpdate, product::slugify,
};

/// Embedded schema migrations, run by the CLI.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

// =============================================================================
// Internal Row Types
// =============================================================================

#[derive(Debug, FromRow)]
struct ProductRow {
    id: ProductId,
    name: String,
    slug: String,
    color: String,
    description: String,
    price: Price,
    stock: i32,
    image_url: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            slug: row.slug,
            color: row.color,
            description: row.description,
            price: row.price,
            stock: row.stock,
            image_url: row.image_url,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, FromRow)]
struct VariationRow {
    id: VariationId,
    product_id: ProductId,
    color: String,
    price: Option<Price>,
    stock: i32,
    image_url: Option<String>,
}

impl From<VariationRow> for ProductVariation {
    fn from(row: VariationRow) -> Self {
        Self {
            id: row.id,
            product_id: row.product_id,
            color: row.color,
            price: row.price,
            stock: row.stock,
            image_url: row.image_url,
        }
    }
}

#[derive(Debug, FromRow)]
struct CustomerRow {
    id: CustomerId,
    email: Email,
    first_name: String,
    last_name: String,
    phone: Option<String>,
    address_line1: String,
    address_line2: Option<String>,
    postal_code: String,
    city: String,
    country: String,
    created_at: DateTime<Utc>,
}

impl From<CustomerRow> for Customer {
    fn from(row: CustomerRow) -> Self {
        Self {
            id: row.id,
            email: row.email,
            first_name: row.first_name,
            last_name: row.last_name,
            phone: row.phone,
            address_line1: row.address_line1,
            address_line2: row.address_line2,
            postal_code: row.postal_code,
            city: row.city,
            country: row.country,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, FromRow)]
struct OrderRow {
    id: OrderId,
    customer_id: CustomerId,
    status: String,
    total: Price,
    shipping_method: Option<String>,
    relay_point: Option<String>,
    created_at: DateTime<Utc>,
}

impl TryFrom<OrderRow> for Order {
    type Error = StorageError;

    fn try_from(row: OrderRow) -> Result<Self, Self::Error> {
        let status: OrderStatus = row.status.parse().map_err(|e| {
            StorageError::DataCorruption(format!("invalid order status in database: {e}"))
        })?;
        Ok(Self {
            id: row.id,
            customer_id: row.customer_id,
            status,
            total: row.total,
            shipping_method: row.shipping_method,
            relay_point: row.relay_point,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, FromRow)]
struct OrderSummaryRow {
    id: OrderId,
    customer_id: CustomerId,
    status: String,
    total: Price,
    shipping_method: Option<String>,
    relay_point: Option<String>,
    created_at: DateTime<Utc>,
    customer_email: Email,
    first_name: String,
    last_name: String,
    item_count: i64,
}

impl TryFrom<OrderSummaryRow> for OrderSummary {
    type Error = StorageError;

    fn try_from(row: OrderSummaryRow) -> Result<Self, Self::Error> {
        let customer_name = format!("{} {}", row.first_name, row.last_name);
        let order = Order::try_from(OrderRow {
            id: row.id,
            customer_id: row.customer_id,
            status: row.status,
            total: row.total,
            shipping_method: row.shipping_method,
            relay_point: row.relay_point,
            created_at: row.created_at,
        })?;
        Ok(Self {
            order,
            customer_email: row.customer_email,
            customer_name,
            item_count: row.item_count,
        })
    }
}

#[derive(Debug, FromRow)]
struct OrderItemRow {
    id: OrderItemId,
    order_id: OrderId,
    product_id: ProductId,
    variation_id: Option<VariationId>,
    product_name: String,
    unit_price: Price,
    quantity: i32,
}

impl From<OrderItemRow> for OrderItem {
    fn from(row: OrderItemRow) -> Self {
        Self {
            id: row.id,
            order_id: row.order_id,
            product_id: row.product_id,
            variation_id: row.variation_id,
            product_name: row.product_name,
            unit_price: row.unit_price,
            quantity: row.quantity,
        }
    }
}

#[derive(Debug, FromRow)]
struct UserRow {
    id: UserId,
    username: String,
    password_hash: String,
    created_at: DateTime<Utc>,
}

impl UserRow {
    fn into_user_and_hash(self) -> (User, String) {
        (
            User {
                id: self.id,
                username: self.username,
                created_at: self.created_at,
            },
            self.password_hash,
        )
    }
}

#[derive(Debug, FromRow)]
struct MediaRow {
    id: MediaId,
    filename: String,
    original_name: String,
    mime_type: String,
    size_bytes: i64,
    url: String,
    created_at: DateTime<Utc>,
}

impl From<MediaRow> for Media {
    fn from(row: MediaRow) -> Self {
        Self {
            id: row.id,
            filename: row.filename,
            original_name: row.original_name,
            mime_type: row.mime_type,
            size_bytes: row.size_bytes,
            url: row.url,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, FromRow)]
struct VersionRow {
    id: VersionId,
    name: String,
    shop_mode: String,
    theme: String,
    focus_product_id: Option<ProductId>,
    active: bool,
}

impl TryFrom<VersionRow> for SiteVersion {
    type Error = StorageError;

    fn try_from(row: VersionRow) -> Result<Self, Self::Error> {
        let shop_mode: ShopMode = row.shop_mode.parse().map_err(|e| {
            StorageError::DataCorruption(format!("invalid shop mode in database: {e}"))
        })?;
        let theme: Theme = row
            .theme
            .parse()
            .map_err(|e| StorageError::DataCorruption(format!("invalid theme in database: {e}")))?;
        Ok(Self {
            id: row.id,
            name: row.name,
            shop_mode,
            theme,
            focus_product_id: row.focus_product_id,
            active: row.active,
        })
    }
}

/// Map a unique-constraint violation to [`StorageError::Conflict`].
fn map_unique(e: sqlx::Error, message: &str) -> StorageError {
    if let sqlx::Error::Database(ref db_err) = e
        && db_err.is_unique_violation()
    {
        return StorageError::Conflict(message.to_owned());
    }
    StorageError::Database(e)
}

// =============================================================================
// Storage implementation
// =============================================================================

/// `PostgreSQL`-backed [`Storage`] implementation.
pub struct PgStorage {
    pool: PgPool,
}

impl PgStorage {
    /// Wrap an existing connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// The underlying pool, shared with the session store.
    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }

    async fn fetch_order_items(&self, order_id: OrderId) -> Result<Vec<OrderItem>, StorageError> {
        let rows = sqlx::query_as::<_, OrderItemRow>(
            r"
            SELECT id, order_id, product_id, variation_id, product_name, unit_price, quantity
            FROM order_items
            WHERE order_id = $1
            ORDER BY id
            ",
        )
        .bind(order_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn fetch_order_detail(&self, order: Order) -> Result<OrderDetail, StorageError> {
        let customer = sqlx::query_as::<_, CustomerRow>(
            r"
            SELECT id, email, first_name, last_name, phone,
                   address_line1, address_line2, postal_code, city, country, created_at
            FROM customers
            WHERE id = $1
            ",
        )
        .bind(order.customer_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| {
            StorageError::DataCorruption(format!(
                "order {} references missing customer {}",
                order.id, order.customer_id
            ))
        })?;

        let items = self.fetch_order_items(order.id).await?;
        Ok(OrderDetail {
            order,
            customer: customer.into(),
            items,
        })
    }
}

/// Quantities are validated positive; anything beyond i32 cannot be in stock
/// anyway, so the guarded decrement turns it into an insufficient-stock error.
fn clamp_quantity(quantity: u32) -> i32 {
    i32::try_from(quantity).unwrap_or(i32::MAX)
}

/// Decrement stock with a floor guard inside the checkout transaction.
///
/// Returns `false` when the row exists but has too little stock left.
async fn try_decrement(
    tx: &mut Transaction<'_, Postgres>,
    table_is_variation: bool,
    id: i32,
    quantity: i32,
) -> Result<bool, StorageError> {
    let sql = if table_is_variation {
        "UPDATE product_variations SET stock = stock - $1 WHERE id = $2 AND stock >= $1"
    } else {
        "UPDATE products SET stock = stock - $1 WHERE id = $2 AND stock >= $1"
    };
    let result = sqlx::query(sql)
        .bind(quantity)
        .bind(id)
        .execute(&mut **tx)
        .await?;
    Ok(result.rows_affected() > 0)
}

#[async_trait]
impl Storage for PgStorage {
    async fn ping(&self) -> Result<(), StorageError> {
        sqlx::query("SELECT 1").fetch_one(&self.pool).await?;
        Ok(())
    }

    async fn list_products(&self, color: Option<&str>) -> Result<Vec<Product>, StorageError> {
        let rows = sqlx::query_as::<_, ProductRow>(
            r"
            SELECT id, name, slug, color, description, price, stock, image_url,
                   created_at, updated_at
            FROM products
            WHERE $1::text IS NULL OR lower(color) = lower($1)
            ORDER BY id
            ",
        )
        .bind(color)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn get_product(&self, id: ProductId) -> Result<Option<Product>, StorageError> {
        let row = sqlx::query_as::<_, ProductRow>(
            r"
            SELECT id, name, slug, color, description, price, stock, image_url,
                   created_at, updated_at
            FROM products
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    async fn create_product(&self, input: NewProduct) -> Result<Product, StorageError> {
        let slug = slugify(&input.name);
        let row = sqlx::query_as::<_, ProductRow>(
            r"
            INSERT INTO products (name, slug, color, description, price, stock, image_url)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, name, slug, color, description, price, stock, image_url,
                      created_at, updated_at
            ",
        )
        .bind(&input.name)
        .bind(&slug)
        .bind(&input.color)
        .bind(&input.description)
        .bind(input.price)
        .bind(input.stock)
        .bind(&input.image_url)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    async fn update_product(
        &self,
        id: ProductId,
        changes: ProductUpdate,
    ) -> Result<Product, StorageError> {
        // Merge in Rust: partial updates with clear-vs-keep semantics for
        // image_url do not map cleanly onto a single COALESCE statement.
        let current = self.get_product(id).await?.ok_or(StorageError::NotFound)?;

        let name = changes.name.unwrap_or(current.name);
        let slug = slugify(&name);
        let color = changes.color.unwrap_or(current.color);
        let description = changes.description.unwrap_or(current.description);
        let price = changes.price.unwrap_or(current.price);
        let stock = changes.stock.unwrap_or(current.stock);
        let image_url = changes.image_url.unwrap_or(current.image_url);

        let row = sqlx::query_as::<_, ProductRow>(
            r"
            UPDATE products
            SET name = $1, slug = $2, color = $3, description = $4,
                price = $5, stock = $6, image_url = $7, updated_at = now()
            WHERE id = $8
            RETURNING id, name, slug, color, description, price, stock, image_url,
                      created_at, updated_at
            ",
        )
        .bind(&name)
        .bind(&slug)
        .bind(&color)
        .bind(&description)
        .bind(price)
        .bind(stock)
        .bind(&image_url)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StorageError::NotFound)?;

        Ok(row.into())
    }

    async fn delete_product(&self, id: ProductId) -> Result<(), StorageError> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }
        Ok(())
    }

    async fn list_variations(
        &self,
        product_id: ProductId,
    ) -> Result<Vec<ProductVariation>, StorageError> {
        if self.get_product(product_id).await?.is_none() {
            return Err(StorageError::NotFound);
        }
        let rows = sqlx::query_as::<_, VariationRow>(
            r"
            SELECT id, product_id, color, price, stock, image_url
            FROM product_variations
            WHERE product_id = $1
            ORDER BY id
            ",
        )
        .bind(product_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn create_variation(
        &self,
        product_id: ProductId,
        input: NewVariation,
    ) -> Result<ProductVariation, StorageError> {
        if self.get_product(product_id).await?.is_none() {
            return Err(StorageError::NotFound);
        }
        let row = sqlx::query_as::<_, VariationRow>(
            r"
            INSERT INTO product_variations (product_id, color, price, stock, image_url)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, product_id, color, price, stock, image_url
            ",
        )
        .bind(product_id)
        .bind(&input.color)
        .bind(input.price)
        .bind(input.stock)
        .bind(&input.image_url)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    async fn update_variation(
        &self,
        product_id: ProductId,
        id: VariationId,
        changes: VariationUpdate,
    ) -> Result<ProductVariation, StorageError> {
        let current = sqlx::query_as::<_, VariationRow>(
            r"
            SELECT id, product_id, color, price, stock, image_url
            FROM product_variations
            WHERE id = $1 AND product_id = $2
            ",
        )
        .bind(id)
        .bind(product_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StorageError::NotFound)?;

        let color = changes.color.unwrap_or(current.color);
        let price = changes.price.unwrap_or(current.price);
        let stock = changes.stock.unwrap_or(current.stock);
        let image_url = changes.image_url.unwrap_or(current.image_url);

        let row = sqlx::query_as::<_, VariationRow>(
            r"
            UPDATE product_variations
            SET color = $1, price = $2, stock = $3, image_url = $4
            WHERE id = $5 AND product_id = $6
            RETURNING id, product_id, color, price, stock, image_url
            ",
        )
        .bind(&color)
        .bind(price)
        .bind(stock)
        .bind(&image_url)
        .bind(id)
        .bind(product_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StorageError::NotFound)?;

        Ok(row.into())
    }

    async fn delete_variation(
        &self,
        product_id: ProductId,
        id: VariationId,
    ) -> Result<(), StorageError> {
        let result =
            sqlx::query("DELETE FROM product_variations WHERE id = $1 AND product_id = $2")
                .bind(id)
                .bind(product_id)
                .execute(&self.pool)
                .await?;
        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }
        Ok(())
    }

    async fn checkout(&self, request: CheckoutRequest) -> Result<OrderDetail, StorageError> {
        let mut tx = self.pool.begin().await?;

        // Resolve prices and decrement stock line by line. The guarded UPDATE
        // makes repeated lines against the same product accumulate correctly,
        // and a failed line rolls the whole transaction back.
        let mut total = Price::ZERO;
        let mut lines: Vec<(ProductId, Option<VariationId>, String, Price, u32)> =
            Vec::with_capacity(request.items.len());

        for line in &request.items {
            let product = sqlx::query_as::<_, ProductRow>(
                "SELECT id, name, slug, color, description, price, stock, image_url, created_at, updated_at FROM products WHERE id = $1 FOR UPDATE",
            )
            .bind(line.product_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(StorageError::NotFound)?;

            let unit_price = match line.variation_id {
                Some(variation_id) => {
                    let variation = sqlx::query_as::<_, VariationRow>(
                        "SELECT id, product_id, color, price, stock, image_url FROM product_variations WHERE id = $1 AND product_id = $2 FOR UPDATE",
                    )
                    .bind(variation_id)
                    .bind(line.product_id)
                    .fetch_optional(&mut *tx)
                    .await?
                    .ok_or(StorageError::NotFound)?;

                    if !try_decrement(&mut tx, true, variation_id.as_i32(), clamp_quantity(line.quantity))
                        .await?
                    {
                        return Err(StorageError::InsufficientStock(format!(
                            "{} ({})",
                            product.name, variation.color
                        )));
                    }
                    variation.price.unwrap_or(product.price)
                }
                None => {
                    if !try_decrement(
                        &mut tx,
                        false,
                        line.product_id.as_i32(),
                        clamp_quantity(line.quantity),
                    )
                    .await?
                    {
                        return Err(StorageError::InsufficientStock(product.name));
                    }
                    product.price
                }
            };

            total = total.add(unit_price.line_total(line.quantity));
            lines.push((
                line.product_id,
                line.variation_id,
                product.name,
                unit_price,
                line.quantity,
            ));
        }

        // Upsert the customer by email.
        let details = &request.customer;
        let customer = sqlx::query_as::<_, CustomerRow>(
            r"
            INSERT INTO customers (email, first_name, last_name, phone,
                                   address_line1, address_line2, postal_code, city, country)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ON CONFLICT (email) DO UPDATE SET
                first_name = EXCLUDED.first_name,
                last_name = EXCLUDED.last_name,
                phone = EXCLUDED.phone,
                address_line1 = EXCLUDED.address_line1,
                address_line2 = EXCLUDED.address_line2,
                postal_code = EXCLUDED.postal_code,
                city = EXCLUDED.city,
                country = EXCLUDED.country
            RETURNING id, email, first_name, last_name, phone,
                      address_line1, address_line2, postal_code, city, country, created_at
            ",
        )
        .bind(details.email.as_str())
        .bind(&details.first_name)
        .bind(&details.last_name)
        .bind(&details.phone)
        .bind(&details.address_line1)
        .bind(&details.address_line2)
        .bind(&details.postal_code)
        .bind(&details.city)
        .bind(&details.country)
        .fetch_one(&mut *tx)
        .await?;

        // Create the order and its lines.
        let order_row = sqlx::query_as::<_, OrderRow>(
            r"
            INSERT INTO orders (customer_id, status, total, shipping_method, relay_point)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, customer_id, status, total, shipping_method, relay_point, created_at
            ",
        )
        .bind(customer.id)
        .bind(OrderStatus::default().as_str())
        .bind(total)
        .bind(&request.shipping_method)
        .bind(&request.relay_point)
        .fetch_one(&mut *tx)
        .await?;
        let order = Order::try_from(order_row)?;

        let mut items = Vec::with_capacity(lines.len());
        for (product_id, variation_id, product_name, unit_price, quantity) in lines {
            let item_row = sqlx::query_as::<_, OrderItemRow>(
                r"
                INSERT INTO order_items (order_id, product_id, variation_id,
                                         product_name, unit_price, quantity)
                VALUES ($1, $2, $3, $4, $5, $6)
                RETURNING id, order_id, product_id, variation_id, product_name, unit_price, quantity
                ",
            )
            .bind(order.id)
            .bind(product_id)
            .bind(variation_id)
            .bind(&product_name)
            .bind(unit_price)
            .bind(clamp_quantity(quantity))
            .fetch_one(&mut *tx)
            .await?;
            items.push(OrderItem::from(item_row));
        }

        tx.commit().await?;

        Ok(OrderDetail {
            order,
            customer: customer.into(),
            items,
        })
    }

    async fn list_orders(&self) -> Result<Vec<OrderSummary>, StorageError> {
        let rows = sqlx::query_as::<_, OrderSummaryRow>(
            r"
            SELECT o.id, o.customer_id, o.status, o.total, o.shipping_method,
                   o.relay_point, o.created_at,
                   c.email AS customer_email, c.first_name, c.last_name,
                   (SELECT COUNT(*) FROM order_items i WHERE i.order_id = o.id) AS item_count
            FROM orders o
            JOIN customers c ON c.id = o.customer_id
            ORDER BY o.id DESC
            ",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    async fn get_order(&self, id: OrderId) -> Result<Option<OrderDetail>, StorageError> {
        let row = sqlx::query_as::<_, OrderRow>(
            r"
            SELECT id, customer_id, status, total, shipping_method, relay_point, created_at
            FROM orders
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => {
                let order = Order::try_from(row)?;
                Ok(Some(self.fetch_order_detail(order).await?))
            }
            None => Ok(None),
        }
    }

    async fn update_order_status(
        &self,
        id: OrderId,
        status: OrderStatus,
    ) -> Result<OrderDetail, StorageError> {
        let row = sqlx::query_as::<_, OrderRow>(
            r"
            UPDATE orders
            SET status = $1
            WHERE id = $2
            RETURNING id, customer_id, status, total, shipping_method, relay_point, created_at
            ",
        )
        .bind(status.as_str())
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StorageError::NotFound)?;

        let order = Order::try_from(row)?;
        self.fetch_order_detail(order).await
    }

    async fn delete_order(&self, id: OrderId) -> Result<(), StorageError> {
        let result = sqlx::query("DELETE FROM orders WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }
        Ok(())
    }

    async fn get_user_by_username(
        &self,
        username: &str,
    ) -> Result<Option<(User, String)>, StorageError> {
        let row = sqlx::query_as::<_, UserRow>(
            r"
            SELECT id, username, password_hash, created_at
            FROM users
            WHERE username = $1
            ",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(UserRow::into_user_and_hash))
    }

    async fn get_user(&self, id: UserId) -> Result<Option<User>, StorageError> {
        let row = sqlx::query_as::<_, UserRow>(
            r"
            SELECT id, username, password_hash, created_at
            FROM users
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| r.into_user_and_hash().0))
    }

    async fn create_user(
        &self,
        username: &str,
        password_hash: &str,
    ) -> Result<User, StorageError> {
        let row = sqlx::query_as::<_, UserRow>(
            r"
            INSERT INTO users (username, password_hash)
            VALUES ($1, $2)
            RETURNING id, username, password_hash, created_at
            ",
        )
        .bind(username)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_unique(e, "username already exists"))?;

        Ok(row.into_user_and_hash().0)
    }

    async fn list_media(&self) -> Result<Vec<Media>, StorageError> {
        let rows = sqlx::query_as::<_, MediaRow>(
            r"
            SELECT id, filename, original_name, mime_type, size_bytes, url, created_at
            FROM medias
            ORDER BY id DESC
            ",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn create_media(&self, input: NewMedia) -> Result<Media, StorageError> {
        let row = sqlx::query_as::<_, MediaRow>(
            r"
            INSERT INTO medias (filename, original_name, mime_type, size_bytes, url)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, filename, original_name, mime_type, size_bytes, url, created_at
            ",
        )
        .bind(&input.filename)
        .bind(&input.original_name)
        .bind(&input.mime_type)
        .bind(input.size_bytes)
        .bind(&input.url)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    async fn delete_media(&self, id: MediaId) -> Result<Media, StorageError> {
        let row = sqlx::query_as::<_, MediaRow>(
            r"
            DELETE FROM medias
            WHERE id = $1
            RETURNING id, filename, original_name, mime_type, size_bytes, url, created_at
            ",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StorageError::NotFound)?;

        Ok(row.into())
    }

    async fn list_versions(&self) -> Result<Vec<SiteVersion>, StorageError> {
        let rows = sqlx::query_as::<_, VersionRow>(
            r"
            SELECT id, name, shop_mode, theme, focus_product_id, active
            FROM site_versions
            ORDER BY id
            ",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    async fn active_version(&self) -> Result<SiteVersion, StorageError> {
        let row = sqlx::query_as::<_, VersionRow>(
            r"
            SELECT id, name, shop_mode, theme, focus_product_id, active
            FROM site_versions
            WHERE active
            LIMIT 1
            ",
        )
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StorageError::NotFound)?;

        row.try_into()
    }

    async fn create_version(&self, input: NewVersion) -> Result<SiteVersion, StorageError> {
        if let Some(product_id) = input.focus_product_id
            && self.get_product(product_id).await?.is_none()
        {
            return Err(StorageError::NotFound);
        }
        let row = sqlx::query_as::<_, VersionRow>(
            r"
            INSERT INTO site_versions (name, shop_mode, theme, focus_product_id, active)
            VALUES ($1, $2, $3, $4, FALSE)
            RETURNING id, name, shop_mode, theme, focus_product_id, active
            ",
        )
        .bind(&input.name)
        .bind(input.shop_mode.as_str())
        .bind(input.theme.as_str())
        .bind(input.focus_product_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_unique(e, "version name already exists"))?;

        row.try_into()
    }

    async fn activate_version(&self, id: VersionId) -> Result<SiteVersion, StorageError> {
        let mut tx = self.pool.begin().await?;

        let exists: Option<i32> = sqlx::query_scalar("SELECT id FROM site_versions WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
        if exists.is_none() {
            return Err(StorageError::NotFound);
        }

        // Two statements: the partial unique index on active rows forbids a
        // transient state with two active versions within one statement.
        sqlx::query("UPDATE site_versions SET active = FALSE WHERE active AND id <> $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("UPDATE site_versions SET active = TRUE WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let row = sqlx::query_as::<_, VersionRow>(
            r"
            SELECT id, name, shop_mode, theme, focus_product_id, active
            FROM site_versions
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        row.try_into()
    }
}
