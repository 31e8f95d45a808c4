//! Cart persistence.
//!
//! The cart is stored as one JSON array under [`CART_KEY`]. Reads and writes
//! never fail outward: a missing or unreadable value loads as an empty cart
//! and a failed write is logged and dropped.

use pocket_shop_core::Cart;

use crate::storage::{Storage, StorageError};

/// Storage key holding the serialized cart.
pub const CART_KEY: &str = "cart";

/// Storage key holding the time of the last successful save (diagnostic only).
pub const UPDATED_AT_KEY: &str = "cart_updated_at";

/// Reads and writes the cart value in a [`Storage`].
#[derive(Debug, Clone)]
pub struct CartPersistence<S> {
    storage: S,
}

impl<S: Storage> CartPersistence<S> {
    pub const fn new(storage: S) -> Self {
        Self { storage }
    }

    /// The underlying storage.
    pub const fn storage(&self) -> &S {
        &self.storage
    }

    /// Load the cart, falling back to an empty cart on any failure.
    pub fn load(&self) -> Cart {
        self.read().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Cart storage unreadable, using an empty cart");
            Cart::new()
        })
    }

    /// Load the cart, reporting storage access failures.
    ///
    /// Missing and malformed values are not errors: both load as an empty
    /// cart, the latter with a warning.
    ///
    /// # Errors
    ///
    /// Returns the backend's error when storage cannot be read at all.
    pub fn read(&self) -> Result<Cart, StorageError> {
        let Some(raw) = self.storage.get_item(CART_KEY)? else {
            return Ok(Cart::new());
        };
        Ok(serde_json::from_str(&raw).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Stored cart is malformed, using an empty cart");
            Cart::new()
        }))
    }

    /// Save `cart` as one value. Returns whether the write succeeded.
    pub fn save(&self, cart: &Cart) -> bool {
        let body = match serde_json::to_string(cart) {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to serialize cart");
                return false;
            }
        };

        if let Err(e) = self.storage.set_item(CART_KEY, &body) {
            tracing::warn!(error = %e, "Failed to persist cart, keeping it in memory");
            return false;
        }

        let stamp = chrono::Utc::now().to_rfc3339();
        if let Err(e) = self.storage.set_item(UPDATED_AT_KEY, &stamp) {
            tracing::debug!(error = %e, "Failed to record cart update time");
        }
        true
    }
}
