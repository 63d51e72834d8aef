//! Site version model.

use serde::{Deserialize, Serialize};

use alto_core::{ProductId, ShopMode, Theme, VersionId};

/// A named combination of site presentation flags.
///
/// Exactly one version is active at a time; the client fetches the active one
/// at startup to decide between the general catalog and focus layouts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SiteVersion {
    pub id: VersionId,
    pub name: String,
    pub shop_mode: ShopMode,
    pub theme: Theme,
    /// The highlighted product when `shop_mode` is `focus`.
    pub focus_product_id: Option<ProductId>,
    pub active: bool,
}

/// Payload for creating a site version.
#[derive(Debug, Clone, Deserialize)]
pub struct NewVersion {
    pub name: String,
    #[serde(default)]
    pub shop_mode: ShopMode,
    #[serde(default)]
    pub theme: Theme,
    #[serde(default)]
    pub focus_product_id: Option<ProductId>,
}

impl NewVersion {
    /// Validate the payload before it reaches storage.
    ///
    /// # Errors
    ///
    /// Returns a human-readable message for the first failed check.
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("name cannot be empty".to_owned());
        }
        if self.shop_mode == ShopMode::Focus && self.focus_product_id.is_none() {
            return Err("focus mode requires a focus_product_id".to_owned());
        }
        Ok(())
    }
}
