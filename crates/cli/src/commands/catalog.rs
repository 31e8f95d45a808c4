//! Catalog listing.

#![allow(clippy::print_stdout)]

use pocket_shop_storefront::catalog::{Catalog, ProductQuery};
use pocket_shop_storefront::config::StorefrontConfig;
use pocket_shop_storefront::error::AppError;

/// Print the products matching `query`, one per line.
///
/// # Errors
///
/// Returns an error if the catalog cannot be loaded.
pub async fn list(config: &StorefrontConfig, query: ProductQuery) -> Result<(), AppError> {
    let catalog = Catalog::new(config.catalog.clone());
    let products = catalog.search(&query, &config.currency).await?;

    if products.is_empty() {
        println!("No products found.");
        return Ok(());
    }

    for product in &products {
        let price = product.display_price(&config.currency).map_or_else(
            || "-".to_string(),
            |price| config.currency.format(price),
        );
        println!("{:>8}  {:<40}  {:>10}", product.id, product.display_name(), price);
    }
    tracing::debug!(count = products.len(), "Listed catalog products");
    Ok(())
}
