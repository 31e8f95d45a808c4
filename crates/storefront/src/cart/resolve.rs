//! Turning a product id into an add-to-cart request.

use pocket_shop_core::{AddItemRequest, DisplayCurrency, ProductId};
use thiserror::Error;

use crate::catalog::{Catalog, CatalogError};

/// Why a product could not be added to the cart.
#[derive(Debug, Error)]
pub enum AddToCartError {
    #[error("no product with id {0}")]
    UnknownProduct(ProductId),

    #[error("product {0} has no usable price")]
    InvalidPrice(ProductId),

    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

impl AddToCartError {
    /// Message suitable for showing to the shopper.
    #[must_use]
    pub const fn advisory(&self) -> &'static str {
        match self {
            Self::UnknownProduct(_) | Self::InvalidPrice(_) => {
                "Sorry, this product could not be added to your cart."
            }
            Self::Catalog(_) => {
                "Sorry, the product list is unavailable right now. Please try again."
            }
        }
    }
}

/// Look `id` up in the catalog and build a request with its name, image,
/// and price converted once into the display currency.
///
/// # Errors
///
/// Fails when the catalog cannot be loaded, the product is unknown, or its
/// price cannot be converted.
pub async fn resolve(
    catalog: &Catalog,
    id: &ProductId,
    quantity: Option<u32>,
    currency: &DisplayCurrency,
) -> Result<AddItemRequest, AddToCartError> {
    let product = catalog
        .find(id)
        .await?
        .ok_or_else(|| AddToCartError::UnknownProduct(id.clone()))?;

    product.to_add_request(currency, quantity).ok_or_else(|| {
        tracing::warn!(%id, price = %product.price, "Product price cannot be converted");
        AddToCartError::InvalidPrice(id.clone())
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::str::FromStr;

    use pocket_shop_core::CurrencyCode;
    use rust_decimal::Decimal;

    use super::*;
    use crate::catalog::{CatalogSource, Product};

    fn catalog() -> Catalog {
        let product = |id: i64, price: Decimal| Product {
            id: ProductId::from(id),
            name: format!("Item {id}"),
            short_name: None,
            price,
            images: vec!["/img/item.jpg".to_string()],
            brand: String::new(),
            category: String::new(),
            description: None,
        };
        Catalog::from_products(vec![
            product(1, Decimal::from_str("19.99").unwrap()),
            product(2, Decimal::from_str("-1").unwrap()),
        ])
    }

    #[tokio::test]
    async fn test_resolve_converts_price() {
        let currency = DisplayCurrency::new(CurrencyCode::INR, Decimal::from(80)).unwrap();
        let request = resolve(&catalog(), &ProductId::from(1), Some(3), &currency)
            .await
            .unwrap();
        assert_eq!(request.unit_price, Some(1599));
        assert_eq!(request.name.as_deref(), Some("Item 1"));
        assert_eq!(request.quantity, Some(3));
    }

    #[tokio::test]
    async fn test_unknown_product() {
        let err = resolve(&catalog(), &ProductId::from(7), None, &DisplayCurrency::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AddToCartError::UnknownProduct(_)));
        assert!(err.advisory().contains("could not be added"));
    }

    #[tokio::test]
    async fn test_unconvertible_price() {
        let err = resolve(&catalog(), &ProductId::from(2), None, &DisplayCurrency::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AddToCartError::InvalidPrice(_)));
    }

    #[tokio::test]
    async fn test_catalog_failure_is_reported() {
        let catalog = Catalog::new(CatalogSource::File("/nonexistent/pocket-shop.json".into()));
        let err = resolve(&catalog, &ProductId::from(1), None, &DisplayCurrency::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AddToCartError::Catalog(CatalogError::Io { .. })));
    }
}
