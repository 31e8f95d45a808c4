//! Unified error handling with Sentry integration.
//!
//! Library operations return their own error types. `AppError` collects them
//! for front ends, which call [`AppError::report`] once before showing
//! [`AppError::user_message`].

use pocket_shop_core::InputError;
use thiserror::Error;

use crate::cart::AddToCartError;
use crate::catalog::CatalogError;
use crate::config::ConfigError;
use crate::storage::StorageError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration could not be loaded.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// The catalog could not be loaded.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// A product could not be added to the cart.
    #[error("Add to cart failed: {0}")]
    AddToCart(#[from] AddToCartError),

    /// Storage could not be accessed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Product input was unusable.
    #[error("Invalid input: {0}")]
    Input(#[from] InputError),

    /// Bad request from the user.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl AppError {
    /// Log the error, capturing infrastructure failures to Sentry.
    pub fn report(&self) {
        if matches!(self, Self::Catalog(_) | Self::Storage(_) | Self::Config(_)) {
            let event_id = sentry::capture_error(self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Storefront error"
            );
        } else {
            tracing::debug!(error = %self, "Storefront error");
        }
    }

    /// Message suitable for showing to the shopper.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::AddToCart(err) => err.advisory().to_string(),
            Self::Catalog(_) => "The product list is unavailable right now.".to_string(),
            Self::Storage(_) => "Your cart could not be saved.".to_string(),
            _ => self.to_string(),
        }
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
