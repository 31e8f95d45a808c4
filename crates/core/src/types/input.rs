//! Add-to-cart requests.
//!
//! UI code hands the cart loosely-shaped product data: ids as numbers or
//! text, prices and quantities as numbers, numeric strings, or garbage.
//! [`AddItemRequest::from_json`] validates that shape once, at the boundary,
//! and everything past it works with the typed request.
//!
//! # Defaulting rules
//!
//! | field      | source keys                            | fallback            |
//! |------------|----------------------------------------|---------------------|
//! | `id`       | `id`                                   | required            |
//! | `name`     | `name`, `displayName`, `shortName`     | `"Product <id>"`    |
//! | `price`    | `price`                                | `0`                 |
//! | `image`    | `image`, first of `images`             | empty               |
//! | `quantity` | `quantity`                             | `1`                 |
//!
//! Prices round to the nearest whole unit and clamp negatives to the
//! fallback. Quantities truncate toward zero; anything below one falls back.

use serde_json::Value;

use super::id::ProductId;
use super::line_item::LineItem;

/// Errors that can occur when reading an [`AddItemRequest`] from JSON.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    /// The input is not a JSON object.
    #[error("add-to-cart input must be an object")]
    NotAnObject,
    /// The input carries no usable product id.
    #[error("add-to-cart input has no product id")]
    MissingId,
}

/// A validated request to add a product to the cart.
///
/// Only `id` is required. Optional fields are resolved by
/// [`AddItemRequest::into_line_item`] when the product is not yet in the
/// cart; for a product already present only the quantity is used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddItemRequest {
    pub id: ProductId,
    pub name: Option<String>,
    pub unit_price: Option<u64>,
    pub image: Option<String>,
    pub quantity: Option<u32>,
}

impl AddItemRequest {
    /// A request for one unit of `id` with every optional field unset.
    #[must_use]
    pub const fn new(id: ProductId) -> Self {
        Self {
            id,
            name: None,
            unit_price: None,
            image: None,
            quantity: None,
        }
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub const fn with_price(mut self, unit_price: u64) -> Self {
        self.unit_price = Some(unit_price);
        self
    }

    #[must_use]
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    #[must_use]
    pub const fn with_quantity(mut self, quantity: u32) -> Self {
        self.quantity = Some(quantity);
        self
    }

    /// Read a request from loosely-typed product JSON.
    ///
    /// # Errors
    ///
    /// Returns [`InputError::NotAnObject`] for non-object input and
    /// [`InputError::MissingId`] when `id` is absent, null, or blank.
    pub fn from_json(value: &Value) -> Result<Self, InputError> {
        let obj = value.as_object().ok_or(InputError::NotAnObject)?;

        let id = obj
            .get("id")
            .and_then(ProductId::from_json)
            .ok_or(InputError::MissingId)?;

        let name = ["name", "displayName", "shortName"]
            .iter()
            .filter_map(|key| obj.get(*key).and_then(Value::as_str))
            .map(str::trim)
            .find(|s| !s.is_empty())
            .map(str::to_owned);

        let image = obj
            .get("image")
            .and_then(Value::as_str)
            .or_else(|| {
                obj.get("images")
                    .and_then(Value::as_array)
                    .and_then(|images| images.first())
                    .and_then(Value::as_str)
            })
            .map(str::to_owned);

        Ok(Self {
            id,
            name,
            unit_price: obj.get("price").and_then(coerce_price),
            image,
            quantity: obj.get("quantity").and_then(coerce_quantity),
        })
    }

    /// Quantity this request adds: the requested amount, or one.
    #[must_use]
    pub fn effective_quantity(&self) -> u32 {
        self.quantity.filter(|q| *q > 0).unwrap_or(1)
    }

    /// Build the line item inserted when the product is not yet in the cart.
    #[must_use]
    pub fn into_line_item(self) -> LineItem {
        let quantity = self.effective_quantity();
        let name = self
            .name
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| LineItem::default_name(&self.id));
        LineItem {
            id: self.id,
            name,
            unit_price: self.unit_price.unwrap_or(0),
            image: self.image.unwrap_or_default(),
            quantity,
        }
    }
}

fn as_number(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    number.filter(|n| n.is_finite())
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)] // Range checked above the casts
fn coerce_price(value: &Value) -> Option<u64> {
    let price = as_number(value)?.round();
    if price < 0.0 || price >= 1.8e19 {
        return None;
    }
    Some(price as u64)
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)] // Range checked above the casts
fn coerce_quantity(value: &Value) -> Option<u32> {
    let quantity = as_number(value)?.trunc();
    if quantity < 1.0 {
        return None;
    }
    Some(quantity.min(f64::from(u32::MAX)) as u32)
}
