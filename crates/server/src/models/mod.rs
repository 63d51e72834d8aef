//! Domain models and request payloads.

pub mod checkout;
pub mod media;
pub mod order;
pub mod product;
pub mod user;
pub mod version;

pub use checkout::{CheckoutLine, CheckoutRequest, CustomerDetails};
pub use media::{Media, NewMedia};
pub use order::{Customer, Order, OrderDetail, OrderItem, OrderSummary};
pub use product::{NewProduct, NewVariation, Product, ProductDetail, ProductUpdate, ProductVariation, VariationUpdate};
pub use user::{CurrentAdmin, User, session_keys};
pub use version::{NewVersion, SiteVersion};
