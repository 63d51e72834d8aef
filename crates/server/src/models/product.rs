//! Product and variation models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use alto_core::{Price, ProductId, VariationId};

/// A catalog product (a lamp or furniture piece in its base color).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    /// URL-safe identifier derived from the name.
    pub slug: String,
    pub color: String,
    pub description: String,
    pub price: Price,
    pub stock: i32,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A color/stock/price/image combination of a base product.
///
/// `price` overrides the base product price when set.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProductVariation {
    pub id: VariationId,
    pub product_id: ProductId,
    pub color: String,
    pub price: Option<Price>,
    pub stock: i32,
    pub image_url: Option<String>,
}

impl ProductVariation {
    /// The effective unit price: the override if present, else the base price.
    #[must_use]
    pub fn effective_price(&self, base: Price) -> Price {
        self.price.unwrap_or(base)
    }
}

/// A product together with its variations, as returned by the detail endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductDetail {
    #[serde(flatten)]
    pub product: Product,
    pub variations: Vec<ProductVariation>,
}

/// Payload for creating a product.
#[derive(Debug, Clone, Deserialize)]
pub struct NewProduct {
    pub name: String,
    pub color: String,
    #[serde(default)]
    pub description: String,
    pub price: Price,
    #[serde(default)]
    pub stock: i32,
    #[serde(default)]
    pub image_url: Option<String>,
}

impl NewProduct {
    /// Validate the payload before it reaches storage.
    ///
    /// # Errors
    ///
    /// Returns a human-readable message for the first failed check.
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("name cannot be empty".to_owned());
        }
        if self.color.trim().is_empty() {
            return Err("color cannot be empty".to_owned());
        }
        if self.price.is_negative() {
            return Err("price cannot be negative".to_owned());
        }
        if self.stock < 0 {
            return Err("stock cannot be negative".to_owned());
        }
        Ok(())
    }
}

/// Deserialize a present-but-possibly-null field as `Some(inner)`.
///
/// With plain `Option<Option<T>>`, serde collapses an explicit `null` into the
/// outer `None`, making "clear this field" indistinguishable from "leave it
/// alone". Pairing this with `#[serde(default)]` keeps the two apart.
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: serde::Deserialize<'de>,
    D: serde::Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Payload for updating a product. Absent fields are left unchanged;
/// `"image_url": null` clears the image.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub color: Option<String>,
    pub description: Option<String>,
    pub price: Option<Price>,
    pub stock: Option<i32>,
    #[serde(default, deserialize_with = "double_option")]
    pub image_url: Option<Option<String>>,
}

impl ProductUpdate {
    /// Validate the payload before it reaches storage.
    ///
    /// # Errors
    ///
    /// Returns a human-readable message for the first failed check.
    pub fn validate(&self) -> Result<(), String> {
        if let Some(name) = &self.name
            && name.trim().is_empty()
        {
            return Err("name cannot be empty".to_owned());
        }
        if let Some(price) = self.price
            && price.is_negative()
        {
            return Err("price cannot be negative".to_owned());
        }
        if let Some(stock) = self.stock
            && stock < 0
        {
            return Err("stock cannot be negative".to_owned());
        }
        Ok(())
    }
}

/// Payload for creating a variation.
#[derive(Debug, Clone, Deserialize)]
pub struct NewVariation {
    pub color: String,
    #[serde(default)]
    pub price: Option<Price>,
    #[serde(default)]
    pub stock: i32,
    #[serde(default)]
    pub image_url: Option<String>,
}

impl NewVariation {
    /// Validate the payload before it reaches storage.
    ///
    /// # Errors
    ///
    /// Returns a human-readable message for the first failed check.
    pub fn validate(&self) -> Result<(), String> {
        if self.color.trim().is_empty() {
            return Err("color cannot be empty".to_owned());
        }
        if let Some(price) = self.price
            && price.is_negative()
        {
            return Err("price cannot be negative".to_owned());
        }
        if self.stock < 0 {
            return Err("stock cannot be negative".to_owned());
        }
        Ok(())
    }
}

/// Payload for updating a variation. Absent fields are left unchanged;
/// `"price": null` drops the override back to the base product price.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VariationUpdate {
    pub color: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub price: Option<Option<Price>>,
    pub stock: Option<i32>,
    #[serde(default, deserialize_with = "double_option")]
    pub image_url: Option<Option<String>>,
}

impl VariationUpdate {
    /// Validate the payload before it reaches storage.
    ///
    /// # Errors
    ///
    /// Returns a human-readable message for the first failed check.
    pub fn validate(&self) -> Result<(), String> {
        if let Some(color) = &self.color
            && color.trim().is_empty()
        {
            return Err("color cannot be empty".to_owned());
        }
        if let Some(Some(price)) = self.price
            && price.is_negative()
        {
            return Err("price cannot be negative".to_owned());
        }
        if let Some(stock) = self.stock
            && stock < 0
        {
            return Err("stock cannot be negative".to_owned());
        }
        Ok(())
    }
}

/// Derive a URL-safe slug from a product name.
///
/// Lowercases, maps non-alphanumeric runs to single hyphens, trims hyphens.
#[must_use]
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut last_was_hyphen = true;
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
            last_was_hyphen = false;
        } else if !last_was_hyphen {
            slug.push('-');
            last_was_hyphen = true;
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}
