//! View synchronization.
//!
//! After every cart mutation the [`ViewSynchronizer`] writes the new cart
//! onto each bound surface found in the current [`Document`]. Pages differ
//! in which surfaces they carry and under which element ids, so each surface
//! is bound to a list of alternative ids and every one that exists is
//! updated; the rest are skipped.
//!
//! Elements injected after load are caught by a one-shot watcher per bound
//! id absent at attach: `Watching` until that element appears, then a single
//! corrective render of its surface and `Satisfied` for the rest of the
//! page's life.

mod document;
mod sync;
pub mod templates;

pub use document::MemoryDocument;
pub use sync::{ViewSynchronizer, WatchState};

/// A change to a document's element set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationRecord {
    /// An element with this id was added.
    Added(String),
    /// An element with this id was removed.
    Removed(String),
}

/// The page the cart renders into.
pub trait Document {
    /// Whether an element with `id` exists.
    fn contains(&self, id: &str) -> bool;

    /// Replace the content of element `id`. Returns `false` when the element
    /// does not exist.
    fn set_inner_html(&mut self, id: &str, html: &str) -> bool;

    /// Drain the mutation records accumulated since the last call.
    fn take_records(&mut self) -> Vec<MutationRecord>;
}

/// A conceptual on-screen representation of the cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Surface {
    /// Item count in the navigation.
    Badge,
    /// Line-item listing in the cart modal or cart page.
    Items,
    /// Formatted cart total.
    Total,
}

impl Surface {
    pub const ALL: [Self; 3] = [Self::Badge, Self::Items, Self::Total];
}

/// Element ids each surface may appear under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bindings {
    pub badge: Vec<String>,
    pub items: Vec<String>,
    pub total: Vec<String>,
}

impl Bindings {
    /// Alternative ids bound to `surface`.
    #[must_use]
    pub fn ids(&self, surface: Surface) -> &[String] {
        match surface {
            Surface::Badge => &self.badge,
            Surface::Items => &self.items,
            Surface::Total => &self.total,
        }
    }

    /// The surface an element id is bound to, if any.
    #[must_use]
    pub fn surface_of(&self, id: &str) -> Option<Surface> {
        Surface::ALL
            .into_iter()
            .find(|surface| self.ids(*surface).iter().any(|bound| bound == id))
    }
}

impl Default for Bindings {
    fn default() -> Self {
        fn ids(list: &[&str]) -> Vec<String> {
            list.iter().map(ToString::to_string).collect()
        }

        Self {
            badge: ids(&["cart-count", "cart-badge", "nav-cart-count", "header-cart-count"]),
            items: ids(&["cart-items", "cart-modal-items"]),
            total: ids(&["cart-total", "cart-modal-total"]),
        }
    }
}
