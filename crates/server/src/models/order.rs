//! Customer and order models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use alto_core::{CustomerId, Email, OrderId, OrderItemId, OrderStatus, Price, ProductId, VariationId};

/// A customer, created or refreshed at checkout.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Customer {
    pub id: CustomerId,
    pub email: Email,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub address_line1: String,
    pub address_line2: Option<String>,
    pub postal_code: String,
    pub city: String,
    pub country: String,
    pub created_at: DateTime<Utc>,
}

/// An order header.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Order {
    pub id: OrderId,
    pub customer_id: CustomerId,
    pub status: OrderStatus,
    pub total: Price,
    pub shipping_method: Option<String>,
    /// Mondial Relay pickup point identifier, when relay shipping was chosen.
    pub relay_point: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A line of an order.
///
/// `product_name` and `unit_price` are snapshots taken at checkout so later
/// catalog edits do not rewrite order history.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderItem {
    pub id: OrderItemId,
    pub order_id: OrderId,
    pub product_id: ProductId,
    pub variation_id: Option<VariationId>,
    pub product_name: String,
    pub unit_price: Price,
    pub quantity: i32,
}

impl OrderItem {
    /// Line total (unit price x quantity).
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.unit_price
            .line_total(u32::try_from(self.quantity).unwrap_or(0))
    }
}

/// Order list entry with a customer summary, for the admin order table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderSummary {
    #[serde(flatten)]
    pub order: Order,
    pub customer_email: Email,
    pub customer_name: String,
    pub item_count: i64,
}

/// Full order detail: header, customer, and lines.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderDetail {
    #[serde(flatten)]
    pub order: Order,
    pub customer: Customer,
    pub items: Vec<OrderItem>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_total() {
        let item = OrderItem {
            id: OrderItemId::new(1),
            order_id: OrderId::new(1),
            product_id: ProductId::new(1),
            variation_id: None,
            product_name: "Lampe Dune".to_owned(),
            unit_price: Price::from_cents(11_900),
            quantity: 2,
        };
        assert_eq!(item.line_total(), Price::from_cents(23_800));
    }
}
