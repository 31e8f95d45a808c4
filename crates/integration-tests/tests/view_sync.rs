//! Rendering cart surfaces, including surfaces that appear after start-up.

#![allow(clippy::unwrap_used)]

use std::str::FromStr;

use pocket_shop_core::{AddItemRequest, CurrencyCode, DisplayCurrency, ProductId};
use pocket_shop_integration_tests::{SharedDocument, full_page};
use pocket_shop_storefront::cart::CartStore;
use pocket_shop_storefront::storage::MemoryStorage;
use pocket_shop_storefront::view::{
    Bindings, Document, MemoryDocument, ViewSynchronizer, WatchState,
};
use rust_decimal::Decimal;

fn lamp() -> AddItemRequest {
    AddItemRequest::new(ProductId::from(12))
        .with_name("Desk <Lamp>")
        .with_price(1250)
        .with_image("/images/lamp.jpg")
}

#[test]
fn test_every_alternative_id_is_updated() {
    let mut store = CartStore::with_defaults(MemoryStorage::new(), full_page());
    store.add_item(lamp().with_quantity(2));

    let doc = store.document();
    for id in ["cart-count", "cart-badge", "nav-cart-count", "header-cart-count"] {
        assert_eq!(doc.inner_html(id), Some("2"), "badge {id}");
    }
    for id in ["cart-total", "cart-modal-total"] {
        assert_eq!(doc.inner_html(id), Some("$2,500"), "total {id}");
    }
    for id in ["cart-items", "cart-modal-items"] {
        let html = doc.inner_html(id).unwrap();
        assert!(html.contains("Desk &lt;Lamp&gt;") || html.contains("Desk &#60;Lamp&#62;"));
        assert!(html.contains("/images/lamp.jpg"));
    }
}

#[test]
fn test_render_twice_changes_nothing() {
    let mut store = CartStore::with_defaults(MemoryStorage::new(), full_page());
    store.add_item(lamp());
    let first = store.document().clone();
    store.render();
    assert_eq!(*store.document(), first);
}

#[test]
fn test_page_without_surfaces_is_fine() {
    let mut store = CartStore::with_defaults(MemoryStorage::new(), MemoryDocument::new());
    store.add_item(lamp());
    assert_eq!(store.count(), 1);
    assert!(store.document().elements().is_empty());
    assert!(store.view().is_watching());
}

#[test]
fn test_late_badge_rendered_once_then_unwatched() {
    let mut doc = MemoryDocument::with_elements(["cart-items", "cart-total"]);
    doc.take_records();
    let mut store = CartStore::with_defaults(MemoryStorage::new(), doc);
    store.add_item(lamp().with_quantity(3));
    assert_eq!(
        store.view().watch_state("header-cart-count"),
        Some(WatchState::Watching)
    );

    // Injected header markup arrives after the cart was already populated.
    store.document_mut().insert_element("header-cart-count");
    assert_eq!(store.document().inner_html("header-cart-count"), Some("3"));
    assert_eq!(
        store.view().watch_state("header-cart-count"),
        Some(WatchState::Satisfied)
    );

    // Regular renders still reach the late badge.
    store.add_item(lamp());
    assert_eq!(store.document().inner_html("header-cart-count"), Some("4"));

    // Markup replaced after its corrective pass waits for the next mutation.
    {
        let mut page = store.document_mut();
        page.remove_element("header-cart-count");
        page.insert_element("header-cart-count");
    }
    assert_eq!(store.document().inner_html("header-cart-count"), Some(""));
    store.change_quantity(&ProductId::from(12), -1);
    assert_eq!(store.document().inner_html("header-cart-count"), Some("3"));
}

#[test]
fn test_alternative_badge_rendered_beside_primary_badge() {
    let mut store = CartStore::with_defaults(
        MemoryStorage::new(),
        MemoryDocument::with_elements(["cart-count", "cart-items", "cart-total"]),
    );
    store.add_item(lamp().with_quantity(3));
    assert_eq!(store.view().watch_state("cart-count"), None);

    store.document_mut().insert_element("header-cart-count");
    assert_eq!(store.document().inner_html("header-cart-count"), Some("3"));
    assert_eq!(store.document().inner_html("cart-count"), Some("3"));

    // Each alternative id gets its own corrective pass.
    store.document_mut().insert_element("cart-badge");
    assert_eq!(store.document().inner_html("cart-badge"), Some("3"));
    assert!(store.view().is_watching());
}

#[test]
fn test_late_surface_rendered_without_mutation() {
    let mut store = CartStore::with_defaults(
        MemoryStorage::new(),
        MemoryDocument::with_elements(["cart-count"]),
    );
    store.add_item(lamp());
    store.document_mut().insert_element("cart-modal-total");

    assert_eq!(store.document().inner_html("cart-modal-total"), Some("$1,250"));
    assert_eq!(
        store.view().watch_state("cart-modal-total"),
        Some(WatchState::Satisfied)
    );
    assert_eq!(store.view().watch_state("cart-total"), Some(WatchState::Watching));
}

#[test]
fn test_late_surface_picked_up_during_mutation() {
    let mut doc = SharedDocument::new(MemoryDocument::with_elements(["cart-count"]));
    let mut store = CartStore::with_defaults(MemoryStorage::new(), doc.clone());
    store.add_item(lamp());

    // Markup injected behind the store's back is found by the next mutation.
    doc.0.borrow_mut().insert_element("cart-modal-total");
    store.add_item(lamp());
    assert_eq!(doc.inner_html("cart-modal-total"), Some("$2,500".to_string()));
    assert_eq!(
        store.view().watch_state("cart-modal-total"),
        Some(WatchState::Satisfied)
    );
    assert_eq!(doc.take_records(), Vec::new());
}

#[test]
fn test_removed_element_is_skipped() {
    let mut store = CartStore::with_defaults(MemoryStorage::new(), full_page());
    store.document_mut().remove_element("cart-modal-items");
    store.add_item(lamp());
    assert!(store.document().inner_html("cart-modal-items").is_none());
    assert!(store.document().inner_html("cart-items").unwrap().contains("cart-line"));
}

#[test]
fn test_custom_bindings_and_currency() {
    let bindings = Bindings {
        badge: vec!["mini-count".to_string()],
        items: vec!["drawer-lines".to_string()],
        total: vec!["drawer-total".to_string()],
    };
    let currency = DisplayCurrency::new(CurrencyCode::EUR, Decimal::from_str("0.9").unwrap()).unwrap();
    let page = MemoryDocument::with_elements(["mini-count", "drawer-lines", "drawer-total", "cart-count"]);
    let mut store = CartStore::new(
        MemoryStorage::new(),
        page,
        ViewSynchronizer::new(bindings, currency),
    );

    store.add_item(lamp().with_quantity(2));
    assert_eq!(store.document().inner_html("mini-count"), Some("2"));
    assert_eq!(store.document().inner_html("drawer-total"), Some("€2,500"));
    assert_eq!(store.document().inner_html("cart-count"), Some(""));
}
