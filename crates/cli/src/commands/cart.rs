//! Cart commands.
//!
//! Each invocation opens the file-backed store, applies one operation, and
//! prints the result. Every bound surface is present in the page, so the
//! markup printed by `show --html` is what a storefront page would display.

#![allow(clippy::print_stdout)]

use pocket_shop_core::{AddItemRequest, ProductId, QuantityChange};
use pocket_shop_storefront::cart::{CartStore, resolve};
use pocket_shop_storefront::catalog::Catalog;
use pocket_shop_storefront::config::StorefrontConfig;
use pocket_shop_storefront::error::AppError;
use pocket_shop_storefront::storage::FileStorage;
use pocket_shop_storefront::view::{Bindings, MemoryDocument, Surface, ViewSynchronizer};

type Store = CartStore<FileStorage, MemoryDocument>;

fn open(config: &StorefrontConfig) -> Store {
    let bindings = Bindings::default();
    let page = MemoryDocument::with_elements(
        Surface::ALL
            .into_iter()
            .filter_map(|surface| bindings.ids(surface).first())
            .map(String::as_str),
    );
    CartStore::new(
        FileStorage::new(&config.storage_path),
        page,
        ViewSynchronizer::new(bindings, config.currency),
    )
}

fn parse_id(raw: &str) -> Result<ProductId, AppError> {
    ProductId::parse(raw).ok_or_else(|| AppError::BadRequest("product id is empty".to_string()))
}

fn print_summary(store: &Store) {
    let currency = store.currency();
    println!(
        "{} item(s), total {}",
        store.count(),
        currency.format(store.total())
    );
}

/// Print the cart, or the rendered markup of each surface with `html`.
pub fn show(config: &StorefrontConfig, html: bool) {
    let store = open(config);

    if html {
        for (id, markup) in store.document().elements() {
            println!("<!-- #{id} -->");
            println!("{markup}");
        }
        return;
    }

    let items = store.items();
    if items.is_empty() {
        println!("Your cart is empty.");
        return;
    }
    let currency = store.currency();
    for item in &items {
        println!(
            "{:>8}  {:<40}  {:>4} x {:>10}  {:>10}",
            item.id,
            item.name,
            item.quantity,
            currency.format(item.unit_price),
            currency.format(item.line_total())
        );
    }
    print_summary(&store);
}

/// Look up a product in the catalog and add it.
///
/// # Errors
///
/// Returns an error if the id is blank, the catalog cannot be loaded, or the
/// product cannot be resolved.
pub async fn add(config: &StorefrontConfig, id: &str, quantity: Option<u32>) -> Result<(), AppError> {
    let id = parse_id(id)?;
    let catalog = Catalog::new(config.catalog.clone());
    let request = resolve(&catalog, &id, quantity, &config.currency).await?;
    let name = request.name.clone().unwrap_or_else(|| id.to_string());

    let mut store = open(config);
    let total = store.add_item(request);
    println!("Added {name} (now {total} in cart)");
    print_summary(&store);
    Ok(())
}

/// Parse `raw` as loose product JSON and add it as given.
///
/// # Errors
///
/// Returns an error if `raw` is not JSON or carries no usable product id.
pub fn add_json(config: &StorefrontConfig, raw: &str) -> Result<(), AppError> {
    let request = parse_product(raw)?;
    let name = request.name.clone().unwrap_or_else(|| request.id.to_string());

    let mut store = open(config);
    let total = store.add_item(request);
    println!("Added {name} (now {total} in cart)");
    print_summary(&store);
    Ok(())
}

fn parse_product(raw: &str) -> Result<AddItemRequest, AppError> {
    let value: serde_json::Value =
        serde_json::from_str(raw).map_err(|e| AppError::BadRequest(format!("invalid JSON: {e}")))?;
    Ok(AddItemRequest::from_json(&value)?)
}

/// Remove a product's line.
///
/// # Errors
///
/// Returns an error if the id is blank.
pub fn remove(config: &StorefrontConfig, id: &str) -> Result<(), AppError> {
    let id = parse_id(id)?;
    let mut store = open(config);
    if store.remove_item(&id) {
        println!("Removed {id}");
    } else {
        println!("{id} is not in the cart");
    }
    print_summary(&store);
    Ok(())
}

/// Change a product's quantity by `delta`.
///
/// # Errors
///
/// Returns an error if the id is blank.
pub fn change_quantity(config: &StorefrontConfig, id: &str, delta: i64) -> Result<(), AppError> {
    let id = parse_id(id)?;
    let mut store = open(config);
    match store.change_quantity(&id, delta) {
        QuantityChange::Updated(quantity) => println!("{id} quantity is now {quantity}"),
        QuantityChange::Removed => println!("Removed {id}"),
        QuantityChange::Missing => println!("{id} is not in the cart"),
    }
    print_summary(&store);
    Ok(())
}

/// Empty the cart.
pub fn clear(config: &StorefrontConfig) {
    let mut store = open(config);
    if store.clear() {
        println!("Cart cleared");
    } else {
        println!("Your cart is already empty.");
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pocket_shop_core::InputError;

    use super::*;

    #[test]
    fn test_parse_product_accepts_loose_object() {
        let request = parse_product(r#"{"id": "gift-wrap", "price": 3.6}"#).unwrap();
        assert_eq!(request.id, ProductId::parse("gift-wrap").unwrap());
        assert_eq!(request.unit_price, Some(4));
    }

    #[test]
    fn test_parse_product_without_id_is_input_error() {
        let err = parse_product(r#"{"name": "No id"}"#).unwrap_err();
        assert!(matches!(err, AppError::Input(InputError::MissingId)));

        let err = parse_product("[1, 2]").unwrap_err();
        assert!(matches!(err, AppError::Input(InputError::NotAnObject)));
    }

    #[test]
    fn test_parse_product_rejects_malformed_json() {
        let err = parse_product("{id: 1").unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }
}
