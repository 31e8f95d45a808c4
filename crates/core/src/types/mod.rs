//! Core types for Pocket Shop.
//!
//! This module provides type-safe wrappers for the cart domain.

pub mod cart;
pub mod id;
pub mod input;
pub mod line_item;
pub mod price;

pub use cart::{Cart, QuantityChange};
pub use id::ProductId;
pub use input::{AddItemRequest, InputError};
pub use line_item::LineItem;
pub use price::{CurrencyCode, CurrencyError, DisplayCurrency};
