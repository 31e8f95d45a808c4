//! The cart store.
//!
//! [`CartStore`] is the single entry point for reading and changing the
//! cart. Every mutator runs one synchronous cycle:
//!
//! 1. read the latest persisted cart
//! 2. compute the next cart with the pure logic in `pocket_shop_core`
//! 3. save it as one value
//! 4. render every bound surface of the document
//! 5. give late-arriving surfaces their corrective render
//! 6. notify change listeners once
//!
//! Mutators take `&mut self` and never suspend, so two mutations can never
//! interleave between a read and its write. A mutation that changes nothing
//! stops after step 2.
//!
//! When a save fails the store keeps working from its in-memory cart for the
//! rest of the session instead of re-reading storage that is out of date.

mod persist;
mod resolve;

pub use persist::{CART_KEY, CartPersistence, UPDATED_AT_KEY};
pub use resolve::{AddToCartError, resolve};

use std::ops::{Deref, DerefMut};

use pocket_shop_core::{AddItemRequest, Cart, DisplayCurrency, LineItem, ProductId, QuantityChange};
use serde_json::Value;

use crate::events::{CartChanged, ChangeNotifier, ListenerId};
use crate::storage::Storage;
use crate::view::{Bindings, Document, ViewSynchronizer};

/// Cart state shared by every surface of a page.
pub struct CartStore<S, D> {
    persistence: CartPersistence<S>,
    view: ViewSynchronizer,
    document: D,
    notifier: ChangeNotifier,
    cart: Cart,
    degraded: bool,
}

impl<S: Storage, D: Document> CartStore<S, D> {
    /// Load the persisted cart, arm late-binding watchers for absent
    /// surfaces, and render the surfaces that are present.
    pub fn new(storage: S, mut document: D, mut view: ViewSynchronizer) -> Self {
        let persistence = CartPersistence::new(storage);
        let cart = persistence.load();
        view.attach(&mut document);
        view.render(&cart, &mut document);

        Self {
            persistence,
            view,
            document,
            notifier: ChangeNotifier::new(),
            cart,
            degraded: false,
        }
    }

    /// A store with the default element bindings and display currency.
    pub fn with_defaults(storage: S, document: D) -> Self {
        Self::new(
            storage,
            document,
            ViewSynchronizer::new(Bindings::default(), DisplayCurrency::default()),
        )
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// The current cart.
    #[must_use]
    pub fn cart(&self) -> Cart {
        self.snapshot()
    }

    /// Current line items in insertion order.
    #[must_use]
    pub fn items(&self) -> Vec<LineItem> {
        self.snapshot().items().to_vec()
    }

    /// Sum of quantities.
    #[must_use]
    pub fn count(&self) -> u64 {
        self.snapshot().count()
    }

    /// Sum of `price × quantity`, in display-currency units.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.snapshot().total()
    }

    /// Whether the last save failed and the store is running from memory.
    #[must_use]
    pub const fn is_degraded(&self) -> bool {
        self.degraded
    }

    #[must_use]
    pub const fn currency(&self) -> &DisplayCurrency {
        self.view.currency()
    }

    #[must_use]
    pub const fn document(&self) -> &D {
        &self.document
    }

    /// Mutable access for page logic that injects or removes markup.
    ///
    /// Watched surfaces inserted through the returned handle get their
    /// corrective render when it is dropped.
    pub fn document_mut(&mut self) -> DocumentMut<'_, S, D> {
        DocumentMut { store: self }
    }

    #[must_use]
    pub const fn storage(&self) -> &S {
        self.persistence.storage()
    }

    /// The load/save adapter over this store's storage.
    #[must_use]
    pub const fn persistence(&self) -> &CartPersistence<S> {
        &self.persistence
    }

    #[must_use]
    pub const fn view(&self) -> &ViewSynchronizer {
        &self.view
    }

    // =========================================================================
    // Mutators
    // =========================================================================

    /// Add a product, merging into an existing line with the same id.
    ///
    /// Returns the product's quantity after the add.
    pub fn add_item(&mut self, request: AddItemRequest) -> u32 {
        let id = request.id.clone();
        let quantity = self.mutate(|cart| (cart.add(request), true));
        tracing::debug!(%id, quantity, "Added item to cart");
        quantity
    }

    /// Add a product described by loosely-typed JSON.
    ///
    /// Input without a usable id leaves the cart untouched and returns `None`.
    pub fn add_json(&mut self, product: &Value) -> Option<u32> {
        match AddItemRequest::from_json(product) {
            Ok(request) => Some(self.add_item(request)),
            Err(e) => {
                tracing::debug!(error = %e, "Ignoring add-to-cart input");
                None
            }
        }
    }

    /// Delete the line for `id`. Returns whether anything was removed.
    pub fn remove_item(&mut self, id: &ProductId) -> bool {
        let removed = self.mutate(|cart| {
            let removed = cart.remove(id);
            (removed, removed)
        });
        tracing::debug!(%id, removed, "Remove from cart");
        removed
    }

    /// Add `delta` to the quantity for `id`; the line is deleted when the
    /// result is zero or below.
    pub fn change_quantity(&mut self, id: &ProductId, delta: i64) -> QuantityChange {
        let change = self.mutate(|cart| {
            let change = cart.change_quantity(id, delta);
            (change, change != QuantityChange::Missing && delta != 0)
        });
        tracing::debug!(%id, delta, ?change, "Changed cart quantity");
        change
    }

    /// Empty the cart. Returns whether it had anything in it.
    pub fn clear(&mut self) -> bool {
        let cleared = self.mutate(|cart| {
            let cleared = cart.clear();
            (cleared, cleared)
        });
        tracing::debug!(cleared, "Cleared cart");
        cleared
    }

    // =========================================================================
    // Notifications and rendering
    // =========================================================================

    /// Register a listener called after every effective mutation.
    pub fn on_change(&mut self, listener: impl FnMut(&CartChanged) + 'static) -> ListenerId {
        self.notifier.subscribe(listener)
    }

    /// Remove a listener. Returns whether it was registered.
    pub fn off_change(&mut self, id: ListenerId) -> bool {
        self.notifier.unsubscribe(id)
    }

    /// Render the current cart onto every present surface.
    pub fn render(&mut self) -> usize {
        self.cart = self.snapshot();
        self.view.render(&self.cart, &mut self.document)
    }

    /// Pick up surfaces added to the document since the last check and give
    /// each watched one its corrective render. Returns how many were found.
    pub fn observe_document(&mut self) -> usize {
        if !self.view.is_watching() {
            self.document.take_records();
            return 0;
        }
        self.cart = self.snapshot();
        self.view.observe(&self.cart, &mut self.document)
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn snapshot(&self) -> Cart {
        if self.degraded {
            return self.cart.clone();
        }
        self.persistence.read().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Cart storage unreadable, using in-memory cart");
            self.cart.clone()
        })
    }

    fn mutate<T>(&mut self, op: impl FnOnce(&mut Cart) -> (T, bool)) -> T {
        let mut next = self.snapshot();
        let (result, changed) = op(&mut next);
        if changed {
            self.commit(next);
        } else {
            self.cart = next;
        }
        result
    }

    fn commit(&mut self, next: Cart) {
        let persisted = self.persistence.save(&next);
        if persisted == self.degraded {
            if persisted {
                tracing::info!("Cart storage recovered");
            } else {
                tracing::warn!("Cart storage failing, continuing in memory");
            }
        }
        self.degraded = !persisted;
        self.cart = next;

        self.view.render(&self.cart, &mut self.document);
        self.view.observe(&self.cart, &mut self.document);
        self.notifier.emit(&CartChanged::from(&self.cart));
    }
}

/// Write handle returned by [`CartStore::document_mut`].
///
/// Dereferences to the document and runs [`CartStore::observe_document`] on
/// drop.
pub struct DocumentMut<'a, S: Storage, D: Document> {
    store: &'a mut CartStore<S, D>,
}

impl<S: Storage, D: Document> Deref for DocumentMut<'_, S, D> {
    type Target = D;

    fn deref(&self) -> &D {
        &self.store.document
    }
}

impl<S: Storage, D: Document> DerefMut for DocumentMut<'_, S, D> {
    fn deref_mut(&mut self) -> &mut D {
        &mut self.store.document
    }
}

impl<S: Storage, D: Document> Drop for DocumentMut<'_, S, D> {
    fn drop(&mut self) {
        self.store.observe_document();
    }
}

impl<S, D> std::fmt::Debug for CartStore<S, D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartStore")
            .field("cart", &self.cart)
            .field("degraded", &self.degraded)
            .field("notifier", &self.notifier)
            .finish_non_exhaustive()
    }
}
