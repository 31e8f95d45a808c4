//! The cart: an ordered sequence of line items and its aggregates.

use serde::{Deserialize, Deserializer, Serialize};

use super::id::ProductId;
use super::input::AddItemRequest;
use super::line_item::LineItem;

/// Outcome of [`Cart::change_quantity`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantityChange {
    /// The item is still in the cart with this quantity.
    Updated(u32),
    /// The quantity dropped to zero or below and the item was deleted.
    Removed,
    /// No item with that id is in the cart.
    Missing,
}

/// A shopping cart.
///
/// ## Invariants
///
/// - At most one [`LineItem`] per [`ProductId`]; adding an id that is already
///   present sums quantities and never overwrites name, price, or image.
/// - Every item has `quantity >= 1`.
/// - Items keep the order in which they were first added.
///
/// Serializes as a bare JSON array. Deserializing re-establishes the
/// invariants, so a hand-edited or stale persisted value with zero
/// quantities or repeated ids still loads into a valid cart.
///
/// ```
/// use pocket_shop_core::{AddItemRequest, Cart, ProductId};
///
/// let mut cart = Cart::new();
/// cart.add(AddItemRequest::new(ProductId::from(1)).with_name("X").with_price(100));
/// cart.add(AddItemRequest::new(ProductId::from(1)).with_quantity(2));
///
/// assert_eq!(cart.len(), 1);
/// assert_eq!(cart.count(), 3);
/// assert_eq!(cart.total(), 300);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Cart {
    items: Vec<LineItem>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Build a cart from raw line items, dropping zero quantities, naming
    /// unnamed items, and merging repeated ids into their first occurrence.
    #[must_use]
    pub fn from_items(items: impl IntoIterator<Item = LineItem>) -> Self {
        let mut cart = Self::new();
        for mut item in items {
            if item.quantity == 0 {
                continue;
            }
            if item.name.trim().is_empty() {
                item.name = LineItem::default_name(&item.id);
            }
            match cart.position(&item.id) {
                Some(idx) => {
                    if let Some(existing) = cart.items.get_mut(idx) {
                        existing.quantity = existing.quantity.saturating_add(item.quantity);
                    }
                }
                None => cart.items.push(item),
            }
        }
        cart
    }

    /// Line items in insertion order.
    #[must_use]
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Look up the line item for `id`.
    #[must_use]
    pub fn get(&self, id: &ProductId) -> Option<&LineItem> {
        self.items.iter().find(|item| &item.id == id)
    }

    /// Number of distinct products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sum of quantities across all items.
    #[must_use]
    pub fn count(&self) -> u64 {
        self.items
            .iter()
            .fold(0u64, |acc, item| acc.saturating_add(u64::from(item.quantity)))
    }

    /// Sum of `unit_price × quantity` across all items.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.items
            .iter()
            .fold(0u64, |acc, item| acc.saturating_add(item.line_total()))
    }

    /// Add a product, merging into an existing line when the id is present.
    ///
    /// Returns the product's quantity after the add.
    pub fn add(&mut self, request: AddItemRequest) -> u32 {
        let quantity = request.effective_quantity();
        if let Some(existing) = self.items.iter_mut().find(|item| item.id == request.id) {
            existing.quantity = existing.quantity.saturating_add(quantity);
            return existing.quantity;
        }
        let item = request.into_line_item();
        let quantity = item.quantity;
        self.items.push(item);
        quantity
    }

    /// Delete the line item for `id`. Returns whether anything was removed.
    pub fn remove(&mut self, id: &ProductId) -> bool {
        let before = self.items.len();
        self.items.retain(|item| &item.id != id);
        self.items.len() != before
    }

    /// Add `delta` to the quantity for `id`, deleting the item when the result
    /// is zero or below.
    pub fn change_quantity(&mut self, id: &ProductId, delta: i64) -> QuantityChange {
        let Some(idx) = self.position(id) else {
            return QuantityChange::Missing;
        };
        let Some(item) = self.items.get_mut(idx) else {
            return QuantityChange::Missing;
        };

        let next = i64::from(item.quantity).saturating_add(delta);
        if next <= 0 {
            self.items.remove(idx);
            return QuantityChange::Removed;
        }
        item.quantity = u32::try_from(next).unwrap_or(u32::MAX);
        QuantityChange::Updated(item.quantity)
    }

    /// Remove every item. Returns whether the cart had anything in it.
    pub fn clear(&mut self) -> bool {
        let had_items = !self.items.is_empty();
        self.items.clear();
        had_items
    }

    fn position(&self, id: &ProductId) -> Option<usize> {
        self.items.iter().position(|item| &item.id == id)
    }
}

impl<'de> Deserialize<'de> for Cart {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let items = Vec::<LineItem>::deserialize(deserializer)?;
        Ok(Self::from_items(items))
    }
}
