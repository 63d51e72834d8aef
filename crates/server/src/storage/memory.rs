//! In-memory storage backend.
//!
//! Backs development runs and unit tests. All state lives behind a single
//! `RwLock` so checkout's read-check-write sequence is atomic, matching the
//! transactional guarantee of the Postgres backend.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use alto_core::{
    CustomerId, MediaId, OrderId, OrderItemId, OrderStatus, ProductId, ShopMode, Theme, UserId,
    VariationId, VersionId,
};

use super::{Storage, StorageError};
use crate::models::{
    CheckoutRequest, Customer, Media, NewMedia, NewProduct, NewVariation, NewVersion, Order,
    OrderDetail, OrderItem, OrderSummary, Product, ProductUpdate, ProductVariation, SiteVersion,
    User, VariationUpdate, product::slugify,
};

/// Per-entity id counters.
#[derive(Debug, Default)]
struct Counters {
    product: i32,
    variation: i32,
    customer: i32,
    order: i32,
    order_item: i32,
    user: i32,
    media: i32,
    version: i32,
}

impl Counters {
    fn next(field: &mut i32) -> i32 {
        *field += 1;
        *field
    }
}

#[derive(Debug, Default)]
struct Inner {
    products: BTreeMap<ProductId, Product>,
    variations: BTreeMap<VariationId, ProductVariation>,
    customers: BTreeMap<CustomerId, Customer>,
    orders: BTreeMap<OrderId, Order>,
    order_items: BTreeMap<OrderItemId, OrderItem>,
    /// The password hash rides along with the user, as in the users table.
    users: BTreeMap<UserId, (User, String)>,
    media: BTreeMap<MediaId, Media>,
    versions: BTreeMap<VersionId, SiteVersion>,
    counters: Counters,
}

/// In-memory [`Storage`] implementation.
pub struct MemoryStorage {
    inner: RwLock<Inner>,
}

impl MemoryStorage {
    /// Create an empty store with the default site version active.
    #[must_use]
    pub fn new() -> Self {
        let mut inner = Inner::default();
        let id = VersionId::new(Counters::next(&mut inner.counters.version));
        inner.versions.insert(
            id,
            SiteVersion {
                id,
                name: "default".to_owned(),
                shop_mode: ShopMode::General,
                theme: Theme::Light,
                focus_product_id: None,
                active: true,
            },
        );
        Self {
            inner: RwLock::new(inner),
        }
    }
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

/// A checkout line resolved against the catalog: what to decrement and at
/// which snapshotted price.
struct ResolvedLine {
    product_id: ProductId,
    variation_id: Option<VariationId>,
    product_name: String,
    unit_price: alto_core::Price,
    quantity: u32,
}

impl Inner {
    fn order_detail(&self, order: &Order) -> Result<OrderDetail, StorageError> {
        let customer = self
            .customers
            .get(&order.customer_id)
            .ok_or_else(|| {
                StorageError::DataCorruption(format!(
                    "order {} references missing customer {}",
                    order.id, order.customer_id
                ))
            })?
            .clone();
        let items = self
            .order_items
            .values()
            .filter(|item| item.order_id == order.id)
            .cloned()
            .collect();
        Ok(OrderDetail {
            order: order.clone(),
            customer,
            items,
        })
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn ping(&self) -> Result<(), StorageError> {
        Ok(())
    }

    async fn list_products(&self, color: Option<&str>) -> Result<Vec<Product>, StorageError> {
        let inner = self.inner.read().await;
        Ok(inner
            .products
            .values()
            .filter(|p| color.is_none_or(|c| p.color.eq_ignore_ascii_case(c)))
            .cloned()
            .collect())
    }

    async fn get_product(&self, id: ProductId) -> Result<Option<Product>, StorageError> {
        Ok(self.inner.read().await.products.get(&id).cloned())
    }

    async fn create_product(&self, input: NewProduct) -> Result<Product, StorageError> {
        let mut inner = self.inner.write().await;
        let id = ProductId::new(Counters::next(&mut inner.counters.product));
        let now = Utc::now();
        let product = Product {
            id,
            slug: slugify(&input.name),
            name: input.name,
            color: input.color,
            description: input.description,
            price: input.price,
            stock: input.stock,
            image_url: input.image_url,
            created_at: now,
            updated_at: now,
        };
        inner.products.insert(id, product.clone());
        Ok(product)
    }

    async fn update_product(
        &self,
        id: ProductId,
        changes: ProductUpdate,
    ) -> Result<Product, StorageError> {
        let mut inner = self.inner.write().await;
        let product = inner.products.get_mut(&id).ok_or(StorageError::NotFound)?;
        if let Some(name) = changes.name {
            product.slug = slugify(&name);
            product.name = name;
        }
        if let Some(color) = changes.color {
            product.color = color;
        }
        if let Some(description) = changes.description {
            product.description = description;
        }
        if let Some(price) = changes.price {
            product.price = price;
        }
        if let Some(stock) = changes.stock {
            product.stock = stock;
        }
        if let Some(image_url) = changes.image_url {
            product.image_url = image_url;
        }
        product.updated_at = Utc::now();
        Ok(product.clone())
    }

    async fn delete_product(&self, id: ProductId) -> Result<(), StorageError> {
        let mut inner = self.inner.write().await;
        inner
            .products
            .remove(&id)
            .ok_or(StorageError::NotFound)?;
        inner.variations.retain(|_, v| v.product_id != id);
        Ok(())
    }

    async fn list_variations(
        &self,
        product_id: ProductId,
    ) -> Result<Vec<ProductVariation>, StorageError> {
        let inner = self.inner.read().await;
        if !inner.products.contains_key(&product_id) {
            return Err(StorageError::NotFound);
        }
        Ok(inner
            .variations
            .values()
            .filter(|v| v.product_id == product_id)
            .cloned()
            .collect())
    }

    async fn create_variation(
        &self,
        product_id: ProductId,
        input: NewVariation,
    ) -> Result<ProductVariation, StorageError> {
        let mut inner = self.inner.write().await;
        if !inner.products.contains_key(&product_id) {
            return Err(StorageError::NotFound);
        }
        let id = VariationId::new(Counters::next(&mut inner.counters.variation));
        let variation = ProductVariation {
            id,
            product_id,
            color: input.color,
            price: input.price,
            stock: input.stock,
            image_url: input.image_url,
        };
        inner.variations.insert(id, variation.clone());
        Ok(variation)
    }

    async fn update_variation(
        &self,
        product_id: ProductId,
        id: VariationId,
        changes: VariationUpdate,
    ) -> Result<ProductVariation, StorageError> {
        let mut inner = self.inner.write().await;
        let variation = inner
            .variations
            .get_mut(&id)
            .filter(|v| v.product_id == product_id)
            .ok_or(StorageError::NotFound)?;
        if let Some(color) = changes.color {
            variation.color = color;
        }
        if let Some(price) = changes.price {
            variation.price = price;
        }
        if let Some(stock) = changes.stock {
            variation.stock = stock;
        }
        if let Some(image_url) = changes.image_url {
            variation.image_url = image_url;
        }
        Ok(variation.clone())
    }

    async fn delete_variation(
        &self,
        product_id: ProductId,
        id: VariationId,
    ) -> Result<(), StorageError> {
        let mut inner = self.inner.write().await;
        let belongs = inner
            .variations
            .get(&id)
            .is_some_and(|v| v.product_id == product_id);
        if !belongs {
            return Err(StorageError::NotFound);
        }
        inner.variations.remove(&id);
        Ok(())
    }

    async fn checkout(&self, request: CheckoutRequest) -> Result<OrderDetail, StorageError> {
        let mut inner = self.inner.write().await;

        // Resolve every line and verify stock before mutating anything, so a
        // failing line leaves no partial writes. Stock checks account for
        // repeated lines against the same product or variation.
        let mut resolved = Vec::with_capacity(request.items.len());
        let mut product_claims: BTreeMap<ProductId, u32> = BTreeMap::new();
        let mut variation_claims: BTreeMap<VariationId, u32> = BTreeMap::new();

        for line in &request.items {
            let product = inner
                .products
                .get(&line.product_id)
                .ok_or(StorageError::NotFound)?;

            let unit_price = match line.variation_id {
                Some(variation_id) => {
                    let variation = inner
                        .variations
                        .get(&variation_id)
                        .filter(|v| v.product_id == line.product_id)
                        .ok_or(StorageError::NotFound)?;
                    let claimed = variation_claims.entry(variation_id).or_insert(0);
                    *claimed += line.quantity;
                    if i64::from(variation.stock) < i64::from(*claimed) {
                        return Err(StorageError::InsufficientStock(format!(
                            "{} ({})",
                            product.name, variation.color
                        )));
                    }
                    variation.effective_price(product.price)
                }
                None => {
                    let claimed = product_claims.entry(line.product_id).or_insert(0);
                    *claimed += line.quantity;
                    if i64::from(product.stock) < i64::from(*claimed) {
                        return Err(StorageError::InsufficientStock(product.name.clone()));
                    }
                    product.price
                }
            };

            resolved.push(ResolvedLine {
                product_id: line.product_id,
                variation_id: line.variation_id,
                product_name: product.name.clone(),
                unit_price,
                quantity: line.quantity,
            });
        }

        // Upsert the customer by email.
        let details = request.customer;
        let existing_id = inner
            .customers
            .values()
            .find(|c| c.email == details.email)
            .map(|c| c.id);
        let customer_id = match existing_id {
            Some(id) => {
                let customer = inner
                    .customers
                    .get_mut(&id)
                    .ok_or(StorageError::NotFound)?;
                customer.first_name = details.first_name;
                customer.last_name = details.last_name;
                customer.phone = details.phone;
                customer.address_line1 = details.address_line1;
                customer.address_line2 = details.address_line2;
                customer.postal_code = details.postal_code;
                customer.city = details.city;
                customer.country = details.country;
                id
            }
            None => {
                let id = CustomerId::new(Counters::next(&mut inner.counters.customer));
                inner.customers.insert(
                    id,
                    Customer {
                        id,
                        email: details.email,
                        first_name: details.first_name,
                        last_name: details.last_name,
                        phone: details.phone,
                        address_line1: details.address_line1,
                        address_line2: details.address_line2,
                        postal_code: details.postal_code,
                        city: details.city,
                        country: details.country,
                        created_at: Utc::now(),
                    },
                );
                id
            }
        };

        // Apply the stock decrements.
        for (product_id, quantity) in &product_claims {
            if let Some(product) = inner.products.get_mut(product_id) {
                product.stock -= i32::try_from(*quantity).unwrap_or(i32::MAX);
            }
        }
        for (variation_id, quantity) in &variation_claims {
            if let Some(variation) = inner.variations.get_mut(variation_id) {
                variation.stock -= i32::try_from(*quantity).unwrap_or(i32::MAX);
            }
        }

        // Create the order and its lines.
        let total = resolved
            .iter()
            .fold(alto_core::Price::ZERO, |acc, line| {
                acc.add(line.unit_price.line_total(line.quantity))
            });
        let order_id = OrderId::new(Counters::next(&mut inner.counters.order));
        let order = Order {
            id: order_id,
            customer_id,
            status: OrderStatus::default(),
            total,
            shipping_method: request.shipping_method,
            relay_point: request.relay_point,
            created_at: Utc::now(),
        };
        inner.orders.insert(order_id, order.clone());

        for line in resolved {
            let item_id = OrderItemId::new(Counters::next(&mut inner.counters.order_item));
            inner.order_items.insert(
                item_id,
                OrderItem {
                    id: item_id,
                    order_id,
                    product_id: line.product_id,
                    variation_id: line.variation_id,
                    product_name: line.product_name,
                    unit_price: line.unit_price,
                    quantity: i32::try_from(line.quantity).unwrap_or(i32::MAX),
                },
            );
        }

        inner.order_detail(&order)
    }

    async fn list_orders(&self) -> Result<Vec<OrderSummary>, StorageError> {
        let inner = self.inner.read().await;
        let mut summaries = Vec::with_capacity(inner.orders.len());
        for order in inner.orders.values().rev() {
            let customer = inner.customers.get(&order.customer_id).ok_or_else(|| {
                StorageError::DataCorruption(format!(
                    "order {} references missing customer {}",
                    order.id, order.customer_id
                ))
            })?;
            let item_count = inner
                .order_items
                .values()
                .filter(|item| item.order_id == order.id)
                .count() as i64;
            summaries.push(OrderSummary {
                order: order.clone(),
                customer_email: customer.email.clone(),
                customer_name: format!("{} {}", customer.first_name, customer.last_name),
                item_count,
            });
        }
        Ok(summaries)
    }

    async fn get_order(&self, id: OrderId) -> Result<Option<OrderDetail>, StorageError> {
        let inner = self.inner.read().await;
        match inner.orders.get(&id) {
            Some(order) => Ok(Some(inner.order_detail(order)?)),
            None => Ok(None),
        }
    }

    async fn update_order_status(
        &self,
        id: OrderId,
        status: OrderStatus,
    ) -> Result<OrderDetail, StorageError> {
        let mut inner = self.inner.write().await;
        let order = inner.orders.get_mut(&id).ok_or(StorageError::NotFound)?;
        order.status = status;
        let order = order.clone();
        inner.order_detail(&order)
    }

    async fn delete_order(&self, id: OrderId) -> Result<(), StorageError> {
        let mut inner = self.inner.write().await;
        inner.orders.remove(&id).ok_or(StorageError::NotFound)?;
        inner.order_items.retain(|_, item| item.order_id != id);
        Ok(())
    }

    async fn get_user_by_username(
        &self,
        username: &str,
    ) -> Result<Option<(User, String)>, StorageError> {
        let inner = self.inner.read().await;
        Ok(inner
            .users
            .values()
            .find(|(user, _)| user.username == username)
            .cloned())
    }

    async fn get_user(&self, id: UserId) -> Result<Option<User>, StorageError> {
        let inner = self.inner.read().await;
        Ok(inner.users.get(&id).map(|(user, _)| user.clone()))
    }

    async fn create_user(
        &self,
        username: &str,
        password_hash: &str,
    ) -> Result<User, StorageError> {
        let mut inner = self.inner.write().await;
        if inner
            .users
            .values()
            .any(|(user, _)| user.username == username)
        {
            return Err(StorageError::Conflict("username already exists".to_owned()));
        }
        let id = UserId::new(Counters::next(&mut inner.counters.user));
        let user = User {
            id,
            username: username.to_owned(),
            created_at: Utc::now(),
        };
        inner
            .users
            .insert(id, (user.clone(), password_hash.to_owned()));
        Ok(user)
    }

    async fn list_media(&self) -> Result<Vec<Media>, StorageError> {
        let inner = self.inner.read().await;
        Ok(inner.media.values().rev().cloned().collect())
    }

    async fn create_media(&self, input: NewMedia) -> Result<Media, StorageError> {
        let mut inner = self.inner.write().await;
        let id = MediaId::new(Counters::next(&mut inner.counters.media));
        let media = Media {
            id,
            filename: input.filename,
            original_name: input.original_name,
            mime_type: input.mime_type,
            size_bytes: input.size_bytes,
            url: input.url,
            created_at: Utc::now(),
        };
        inner.media.insert(id, media.clone());
        Ok(media)
    }

    async fn delete_media(&self, id: MediaId) -> Result<Media, StorageError> {
        let mut inner = self.inner.write().await;
        inner.media.remove(&id).ok_or(StorageError::NotFound)
    }

    async fn list_versions(&self) -> Result<Vec<SiteVersion>, StorageError> {
        Ok(self.inner.read().await.versions.values().cloned().collect())
    }

    async fn active_version(&self) -> Result<SiteVersion, StorageError> {
        let inner = self.inner.read().await;
        inner
            .versions
            .values()
            .find(|v| v.active)
            .cloned()
            .ok_or(StorageError::NotFound)
    }

    async fn create_version(&self, input: NewVersion) -> Result<SiteVersion, StorageError> {
        let mut inner = self.inner.write().await;
        if let Some(product_id) = input.focus_product_id
            && !inner.products.contains_key(&product_id)
        {
            return Err(StorageError::NotFound);
        }
        if inner.versions.values().any(|v| v.name == input.name) {
            return Err(StorageError::Conflict("version name already exists".to_owned()));
        }
        let id = VersionId::new(Counters::next(&mut inner.counters.version));
        let version = SiteVersion {
            id,
            name: input.name,
            shop_mode: input.shop_mode,
            theme: input.theme,
            focus_product_id: input.focus_product_id,
            active: false,
        };
        inner.versions.insert(id, version.clone());
        Ok(version)
    }

    async fn activate_version(&self, id: VersionId) -> Result<SiteVersion, StorageError> {
        let mut inner = self.inner.write().await;
        if !inner.versions.contains_key(&id) {
            return Err(StorageError::NotFound);
        }
        for version in inner.versions.values_mut() {
            version.active = version.id == id;
        }
        inner
            .versions
            .get(&id)
            .cloned()
            .ok_or(StorageError::NotFound)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use alto_core::{Email, Price};
    use crate::models::{CheckoutLine, CustomerDetails};

    fn lamp(stock: i32) -> NewProduct {
        NewProduct {
            name: "Lampe Dune".to_owned(),
            color: "terracotta".to_owned(),
            description: "Lampe de table en grès".to_owned(),
            price: Price::from_cents(11_900),
            stock,
            image_url: None,
        }
    }

    fn checkout_request(items: Vec<CheckoutLine>) -> CheckoutRequest {
        CheckoutRequest {
            customer: CustomerDetails {
                email: Email::parse("claire@example.com").unwrap(),
                first_name: "Claire".to_owned(),
                last_name: "Moreau".to_owned(),
                phone: None,
                address_line1: "12 rue des Lilas".to_owned(),
                address_line2: None,
                postal_code: "75011".to_owned(),
                city: "Paris".to_owned(),
                country: "FR".to_owned(),
            },
            items,
            shipping_method: Some("relay".to_owned()),
            relay_point: Some("FR-24455".to_owned()),
        }
    }

    #[tokio::test]
    async fn test_product_crud() {
        let storage = MemoryStorage::new();
        let product = storage.create_product(lamp(5)).await.unwrap();
        assert_eq!(product.slug, "lampe-dune");

        let fetched = storage.get_product(product.id).await.unwrap().unwrap();
        assert_eq!(fetched, product);

        let updated = storage
            .update_product(
                product.id,
                ProductUpdate {
                    price: Some(Price::from_cents(12_900)),
                    ..ProductUpdate::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.price, Price::from_cents(12_900));
        assert_eq!(updated.name, "Lampe Dune");

        storage.delete_product(product.id).await.unwrap();
        assert!(storage.get_product(product.id).await.unwrap().is_none());
        assert!(matches!(
            storage.delete_product(product.id).await,
            Err(StorageError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_list_products_color_filter() {
        let storage = MemoryStorage::new();
        storage.create_product(lamp(5)).await.unwrap();
        let mut ochre = lamp(2);
        ochre.name = "Lampe Ombre".to_owned();
        ochre.color = "ocre".to_owned();
        storage.create_product(ochre).await.unwrap();

        assert_eq!(storage.list_products(None).await.unwrap().len(), 2);
        let filtered = storage.list_products(Some("Ocre")).await.unwrap();
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered.first().unwrap().name, "Lampe Ombre");
    }

    #[tokio::test]
    async fn test_variation_crud_scoped_to_product() {
        let storage = MemoryStorage::new();
        let product = storage.create_product(lamp(5)).await.unwrap();
        let other = storage
            .create_product(NewProduct {
                name: "Applique Brume".to_owned(),
                ..lamp(1)
            })
            .await
            .unwrap();

        let variation = storage
            .create_variation(
                product.id,
                NewVariation {
                    color: "sable".to_owned(),
                    price: Some(Price::from_cents(12_900)),
                    stock: 3,
                    image_url: None,
                },
            )
            .await
            .unwrap();

        // Variation is not reachable through another product
        assert!(matches!(
            storage
                .update_variation(other.id, variation.id, VariationUpdate::default())
                .await,
            Err(StorageError::NotFound)
        ));

        let updated = storage
            .update_variation(
                product.id,
                variation.id,
                VariationUpdate {
                    price: Some(None),
                    stock: Some(7),
                    ..VariationUpdate::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.price, None);
        assert_eq!(updated.stock, 7);

        storage
            .delete_variation(product.id, variation.id)
            .await
            .unwrap();
        assert!(storage.list_variations(product.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_product_removes_variations() {
        let storage = MemoryStorage::new();
        let product = storage.create_product(lamp(5)).await.unwrap();
        storage
            .create_variation(
                product.id,
                NewVariation {
                    color: "sable".to_owned(),
                    price: None,
                    stock: 3,
                    image_url: None,
                },
            )
            .await
            .unwrap();
        storage.delete_product(product.id).await.unwrap();
        assert!(matches!(
            storage.list_variations(product.id).await,
            Err(StorageError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_checkout_creates_order_and_decrements_stock() {
        let storage = MemoryStorage::new();
        let product = storage.create_product(lamp(5)).await.unwrap();

        let detail = storage
            .checkout(checkout_request(vec![CheckoutLine {
                product_id: product.id,
                variation_id: None,
                quantity: 2,
            }]))
            .await
            .unwrap();

        assert_eq!(detail.order.status, OrderStatus::Pending);
        assert_eq!(detail.order.total, Price::from_cents(23_800));
        assert_eq!(detail.order.relay_point.as_deref(), Some("FR-24455"));
        assert_eq!(detail.items.len(), 1);
        let item = detail.items.first().unwrap();
        assert_eq!(item.product_name, "Lampe Dune");
        assert_eq!(item.unit_price, Price::from_cents(11_900));
        assert_eq!(item.quantity, 2);

        let remaining = storage.get_product(product.id).await.unwrap().unwrap();
        assert_eq!(remaining.stock, 3);
    }

    #[tokio::test]
    async fn test_checkout_uses_variation_price_and_stock() {
        let storage = MemoryStorage::new();
        let product = storage.create_product(lamp(5)).await.unwrap();
        let variation = storage
            .create_variation(
                product.id,
                NewVariation {
                    color: "sable".to_owned(),
                    price: Some(Price::from_cents(12_900)),
                    stock: 2,
                    image_url: None,
                },
            )
            .await
            .unwrap();

        let detail = storage
            .checkout(checkout_request(vec![CheckoutLine {
                product_id: product.id,
                variation_id: Some(variation.id),
                quantity: 2,
            }]))
            .await
            .unwrap();
        assert_eq!(detail.order.total, Price::from_cents(25_800));

        // Variation stock is consumed, base stock untouched
        let variations = storage.list_variations(product.id).await.unwrap();
        assert_eq!(variations.first().unwrap().stock, 0);
        let base = storage.get_product(product.id).await.unwrap().unwrap();
        assert_eq!(base.stock, 5);
    }

    #[tokio::test]
    async fn test_checkout_insufficient_stock_leaves_no_writes() {
        let storage = MemoryStorage::new();
        let product = storage.create_product(lamp(1)).await.unwrap();

        let result = storage
            .checkout(checkout_request(vec![CheckoutLine {
                product_id: product.id,
                variation_id: None,
                quantity: 3,
            }]))
            .await;
        assert!(matches!(result, Err(StorageError::InsufficientStock(_))));

        assert_eq!(
            storage
                .get_product(product.id)
                .await
                .unwrap()
                .unwrap()
                .stock,
            1
        );
        assert!(storage.list_orders().await.unwrap().is_empty());
        // The customer upsert must not have happened either
        let again = storage
            .checkout(checkout_request(vec![CheckoutLine {
                product_id: product.id,
                variation_id: None,
                quantity: 1,
            }]))
            .await
            .unwrap();
        assert_eq!(again.customer.id.as_i32(), 1);
    }

    #[tokio::test]
    async fn test_checkout_repeated_lines_checked_cumulatively() {
        let storage = MemoryStorage::new();
        let product = storage.create_product(lamp(3)).await.unwrap();

        let line = CheckoutLine {
            product_id: product.id,
            variation_id: None,
            quantity: 2,
        };
        let result = storage
            .checkout(checkout_request(vec![line.clone(), line]))
            .await;
        assert!(matches!(result, Err(StorageError::InsufficientStock(_))));
    }

    #[tokio::test]
    async fn test_checkout_unknown_product() {
        let storage = MemoryStorage::new();
        let result = storage
            .checkout(checkout_request(vec![CheckoutLine {
                product_id: ProductId::new(99),
                variation_id: None,
                quantity: 1,
            }]))
            .await;
        assert!(matches!(result, Err(StorageError::NotFound)));
    }

    #[tokio::test]
    async fn test_checkout_upserts_customer_by_email() {
        let storage = MemoryStorage::new();
        let product = storage.create_product(lamp(10)).await.unwrap();
        let line = CheckoutLine {
            product_id: product.id,
            variation_id: None,
            quantity: 1,
        };

        let first = storage
            .checkout(checkout_request(vec![line.clone()]))
            .await
            .unwrap();

        let mut second_request = checkout_request(vec![line]);
        second_request.customer.city = "Lyon".to_owned();
        let second = storage.checkout(second_request).await.unwrap();

        assert_eq!(first.customer.id, second.customer.id);
        assert_eq!(second.customer.city, "Lyon");
        assert_eq!(storage.list_orders().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_order_status_update_and_delete() {
        let storage = MemoryStorage::new();
        let product = storage.create_product(lamp(5)).await.unwrap();
        let detail = storage
            .checkout(checkout_request(vec![CheckoutLine {
                product_id: product.id,
                variation_id: None,
                quantity: 1,
            }]))
            .await
            .unwrap();

        let updated = storage
            .update_order_status(detail.order.id, OrderStatus::Shipped)
            .await
            .unwrap();
        assert_eq!(updated.order.status, OrderStatus::Shipped);

        storage.delete_order(detail.order.id).await.unwrap();
        assert!(storage.get_order(detail.order.id).await.unwrap().is_none());
        assert!(matches!(
            storage
                .update_order_status(detail.order.id, OrderStatus::Paid)
                .await,
            Err(StorageError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_order_summaries_newest_first() {
        let storage = MemoryStorage::new();
        let product = storage.create_product(lamp(10)).await.unwrap();
        let line = CheckoutLine {
            product_id: product.id,
            variation_id: None,
            quantity: 1,
        };
        let first = storage
            .checkout(checkout_request(vec![line.clone()]))
            .await
            .unwrap();
        let second = storage.checkout(checkout_request(vec![line])).await.unwrap();

        let summaries = storage.list_orders().await.unwrap();
        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries.first().unwrap().order.id, second.order.id);
        assert_eq!(summaries.get(1).unwrap().order.id, first.order.id);
        assert_eq!(summaries.first().unwrap().customer_name, "Claire Moreau");
    }

    #[tokio::test]
    async fn test_user_unique_username() {
        let storage = MemoryStorage::new();
        let user = storage.create_user("claire", "$argon2$hash").await.unwrap();

        let (found, hash) = storage
            .get_user_by_username("claire")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found, user);
        assert_eq!(hash, "$argon2$hash");

        assert!(matches!(
            storage.create_user("claire", "$other").await,
            Err(StorageError::Conflict(_))
        ));
        assert!(storage.get_user_by_username("noone").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_media_roundtrip() {
        let storage = MemoryStorage::new();
        let media = storage
            .create_media(NewMedia {
                filename: "abc.jpg".to_owned(),
                original_name: "lampe.jpg".to_owned(),
                mime_type: "image/jpeg".to_owned(),
                size_bytes: 1234,
                url: "/uploads/abc.jpg".to_owned(),
            })
            .await
            .unwrap();

        assert_eq!(storage.list_media().await.unwrap().len(), 1);
        let deleted = storage.delete_media(media.id).await.unwrap();
        assert_eq!(deleted.filename, "abc.jpg");
        assert!(storage.list_media().await.unwrap().is_empty());
        assert!(matches!(
            storage.delete_media(media.id).await,
            Err(StorageError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_default_version_is_active() {
        let storage = MemoryStorage::new();
        let active = storage.active_version().await.unwrap();
        assert_eq!(active.shop_mode, ShopMode::General);
        assert!(active.active);
    }

    #[tokio::test]
    async fn test_activate_version_is_exclusive() {
        let storage = MemoryStorage::new();
        let product = storage.create_product(lamp(1)).await.unwrap();
        let focus = storage
            .create_version(NewVersion {
                name: "focus-dune".to_owned(),
                shop_mode: ShopMode::Focus,
                theme: Theme::Dark,
                focus_product_id: Some(product.id),
            })
            .await
            .unwrap();
        assert!(!focus.active);

        let activated = storage.activate_version(focus.id).await.unwrap();
        assert!(activated.active);
        assert_eq!(storage.active_version().await.unwrap().id, focus.id);

        let versions = storage.list_versions().await.unwrap();
        assert_eq!(versions.iter().filter(|v| v.active).count(), 1);
    }

    #[tokio::test]
    async fn test_create_version_unknown_focus_product() {
        let storage = MemoryStorage::new();
        let result = storage
            .create_version(NewVersion {
                name: "broken".to_owned(),
                shop_mode: ShopMode::Focus,
                theme: Theme::Light,
                focus_product_id: Some(ProductId::new(404)),
            })
            .await;
        assert!(matches!(result, Err(StorageError::NotFound)));
    }
}
