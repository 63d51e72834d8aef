//! Checkout request payload.

use serde::Deserialize;

use alto_core::{Email, ProductId, VariationId};

/// Customer details submitted with a checkout.
#[derive(Debug, Clone, Deserialize)]
pub struct CustomerDetails {
    pub email: Email,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub phone: Option<String>,
    pub address_line1: String,
    #[serde(default)]
    pub address_line2: Option<String>,
    pub postal_code: String,
    pub city: String,
    pub country: String,
}

/// One cart line in a checkout request.
#[derive(Debug, Clone, Deserialize)]
pub struct CheckoutLine {
    pub product_id: ProductId,
    #[serde(default)]
    pub variation_id: Option<VariationId>,
    pub quantity: u32,
}

/// The full checkout payload: who is buying, and what.
///
/// Unit prices are never taken from the client; the server snapshots the
/// current catalog price for each line.
#[derive(Debug, Clone, Deserialize)]
pub struct CheckoutRequest {
    pub customer: CustomerDetails,
    pub items: Vec<CheckoutLine>,
    #[serde(default)]
    pub shipping_method: Option<String>,
    #[serde(default)]
    pub relay_point: Option<String>,
}

/// Upper bound on a single cart line's quantity.
///
/// Keeps stock claims comfortably inside `u32`/`i32` arithmetic and rejects
/// obviously bogus carts before any storage work.
pub const MAX_LINE_QUANTITY: u32 = 1_000;

impl CheckoutRequest {
    /// Validate the payload before any write happens.
    ///
    /// # Errors
    ///
    /// Returns a human-readable message for the first failed check.
    pub fn validate(&self) -> Result<(), String> {
        if self.items.is_empty() {
            return Err("cart is empty".to_owned());
        }
        if self.items.iter().any(|line| line.quantity == 0) {
            return Err("line quantity must be at least 1".to_owned());
        }
        if self
            .items
            .iter()
            .any(|line| line.quantity > MAX_LINE_QUANTITY)
        {
            return Err(format!(
                "line quantity cannot exceed {MAX_LINE_QUANTITY}"
            ));
        }
        if self.customer.first_name.trim().is_empty() || self.customer.last_name.trim().is_empty() {
            return Err("customer name is required".to_owned());
        }
        if self.customer.address_line1.trim().is_empty()
            || self.customer.postal_code.trim().is_empty()
            || self.customer.city.trim().is_empty()
            || self.customer.country.trim().is_empty()
        {
            return Err("shipping address is incomplete".to_owned());
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn request(items: Vec<CheckoutLine>) -> CheckoutRequest {
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
            shipping_method: None,
            relay_point: None,
        }
    }

    #[test]
    fn test_empty_cart_rejected() {
        assert!(request(vec![]).validate().is_err());
    }

    #[test]
    fn test_zero_quantity_rejected() {
        let req = request(vec![CheckoutLine {
            product_id: ProductId::new(1),
            variation_id: None,
            quantity: 0,
        }]);
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_valid_request() {
        let req = request(vec![CheckoutLine {
            product_id: ProductId::new(1),
            variation_id: None,
            quantity: 2,
        }]);
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_excessive_quantity_rejected() {
        let req = request(vec![CheckoutLine {
            product_id: ProductId::new(1),
            variation_id: None,
            quantity: MAX_LINE_QUANTITY + 1,
        }]);
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_invalid_email_rejected_at_deserialization() {
        // An empty email must never survive into a customer record
        let json = r#"{
            "customer": {
                "email": "",
                "first_name": "Claire",
                "last_name": "Moreau",
                "address_line1": "12 rue des Lilas",
                "postal_code": "75011",
                "city": "Paris",
                "country": "FR"
            },
            "items": [{"product_id": 1, "quantity": 1}]
        }"#;
        assert!(serde_json::from_str::<CheckoutRequest>(json).is_err());

        // Casing is normalized on the way in
        let json = json.replace("\"email\": \"\"", "\"email\": \"Claire@Example.COM\"");
        let req: CheckoutRequest = serde_json::from_str(&json).unwrap();
        assert_eq!(req.customer.email.as_str(), "claire@example.com");
    }

    #[test]
    fn test_incomplete_address_rejected() {
        let mut req = request(vec![CheckoutLine {
            product_id: ProductId::new(1),
            variation_id: None,
            quantity: 1,
        }]);
        req.customer.city = String::new();
        assert!(req.validate().is_err());
    }
}
