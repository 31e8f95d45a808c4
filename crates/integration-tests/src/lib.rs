//! Integration tests for Pocket Shop.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p pocket-shop-integration-tests
//! ```
//!
//! # Test Suites
//!
//! - `cart_store` - Cart store scenarios across storage, view, and listeners
//! - `view_sync` - Rendering and late-binding surfaces
//! - `catalog` - Catalog loading, search, and add-to-cart resolution
//!
//! Shared fixtures live here.

use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;
use std::str::FromStr;

use pocket_shop_core::ProductId;
use pocket_shop_storefront::catalog::Product;
use pocket_shop_storefront::cart::CartStore;
use pocket_shop_storefront::storage::MemoryStorage;
use pocket_shop_storefront::view::{Bindings, Document, MemoryDocument, MutationRecord, Surface};
use rust_decimal::Decimal;

/// A page carrying every default binding id.
#[must_use]
pub fn full_page() -> MemoryDocument {
    let bindings = Bindings::default();
    let ids: Vec<String> = Surface::ALL
        .into_iter()
        .flat_map(|surface| bindings.ids(surface).to_vec())
        .collect();
    MemoryDocument::with_elements(ids.iter().map(String::as_str))
}

/// A page with the primary element of each surface.
#[must_use]
pub fn page() -> MemoryDocument {
    MemoryDocument::with_elements(["cart-count", "cart-items", "cart-total"])
}

/// A document handle that can be read while a store owns a clone of it.
#[derive(Debug, Clone, Default)]
pub struct SharedDocument(pub Rc<RefCell<MemoryDocument>>);

impl SharedDocument {
    #[must_use]
    pub fn new(doc: MemoryDocument) -> Self {
        Self(Rc::new(RefCell::new(doc)))
    }

    /// Current markup of `id`.
    #[must_use]
    pub fn inner_html(&self, id: &str) -> Option<String> {
        self.0.borrow().inner_html(id).map(str::to_string)
    }
}

impl Document for SharedDocument {
    fn contains(&self, id: &str) -> bool {
        self.0.borrow().contains(id)
    }

    fn set_inner_html(&mut self, id: &str, html: &str) -> bool {
        self.0.borrow_mut().set_inner_html(id, html)
    }

    fn take_records(&mut self) -> Vec<MutationRecord> {
        self.0.borrow_mut().take_records()
    }
}

/// A store over fresh in-memory storage and [`page`].
#[must_use]
pub fn memory_store() -> (MemoryStorage, CartStore<MemoryStorage, MemoryDocument>) {
    let storage = MemoryStorage::new();
    let store = CartStore::with_defaults(storage.clone(), page());
    (storage, store)
}

/// Build a catalog product.
///
/// # Panics
///
/// Panics if `price` is not a decimal literal.
#[must_use]
#[allow(clippy::unwrap_used)]
pub fn product(id: i64, name: &str, brand: &str, category: &str, price: &str) -> Product {
    Product {
        id: ProductId::from(id),
        name: name.to_string(),
        short_name: None,
        price: Decimal::from_str(price).unwrap(),
        images: vec![format!("/images/{id}.jpg")],
        brand: brand.to_string(),
        category: category.to_string(),
        description: None,
    }
}

/// A small mixed catalog.
#[must_use]
pub fn sample_products() -> Vec<Product> {
    vec![
        product(1, "Galaxy Phone 12", "Stellar", "phones", "499.99"),
        product(2, "Pixel Phone 8", "Orbit", "phones", "449.50"),
        product(3, "Air Laptop 14", "Stellar", "laptops", "1199.00"),
        product(4, "Noise Buds", "Orbit", "audio", "79.49"),
        product(5, "Studio Headphones", "Echo", "audio", "249.00"),
    ]
}

/// A unique path under the system temp directory.
#[must_use]
pub fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir()
        .join(format!("pocket-shop-it-{}", uuid::Uuid::new_v4()))
        .join(name)
}
