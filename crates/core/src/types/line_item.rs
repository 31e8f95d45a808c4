//! A single product's presence in the cart.

use serde::{Deserialize, Serialize};

use super::id::ProductId;

/// One product entry in the cart.
///
/// Persisted as `{id, name, price, image, quantity}`. `price` is the unit
/// price in whole display-currency units, captured when the item was first
/// added. A stored line item always has `quantity >= 1`; [`Cart`] deletes
/// items instead of keeping them at zero.
///
/// [`Cart`]: super::Cart
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub id: ProductId,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "price")]
    pub unit_price: u64,
    #[serde(default)]
    pub image: String,
    pub quantity: u32,
}

impl LineItem {
    /// Name shown for a product added without one.
    #[must_use]
    pub fn default_name(id: &ProductId) -> String {
        format!("Product {id}")
    }

    /// `unit_price × quantity`, saturating.
    #[must_use]
    pub fn line_total(&self) -> u64 {
        self.unit_price.saturating_mul(u64::from(self.quantity))
    }
}
