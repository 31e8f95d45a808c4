use askama::Template;
use pocket_shop_core::{Cart, DisplayCurrency};

use super::templates::{CartCountTemplate, CartItemsTemplate, CartTotalTemplate, CartView};
use super::{Bindings, Document, MutationRecord, Surface};

/// State of a late-binding watcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchState {
    /// The bound element has not appeared yet.
    Watching,
    /// An element appeared and received its corrective render.
    Satisfied,
}

#[derive(Debug, Clone)]
struct LateBinding {
    id: String,
    state: WatchState,
}

/// Renders the cart onto every bound surface of a document.
#[derive(Debug, Clone)]
pub struct ViewSynchronizer {
    bindings: Bindings,
    currency: DisplayCurrency,
    watchers: Vec<LateBinding>,
}

impl ViewSynchronizer {
    #[must_use]
    pub const fn new(bindings: Bindings, currency: DisplayCurrency) -> Self {
        Self {
            bindings,
            currency,
            watchers: Vec::new(),
        }
    }

    #[must_use]
    pub const fn bindings(&self) -> &Bindings {
        &self.bindings
    }

    #[must_use]
    pub const fn currency(&self) -> &DisplayCurrency {
        &self.currency
    }

    /// Arm a watcher for every bound id with no element in `doc`.
    ///
    /// Discards pending mutation records so that only elements added after
    /// this call count as late arrivals.
    pub fn attach(&mut self, doc: &mut impl Document) {
        doc.take_records();
        self.watchers = Surface::ALL
            .into_iter()
            .flat_map(|surface| self.bindings.ids(surface))
            .filter(|id| !doc.contains(id))
            .map(|id| LateBinding {
                id: id.clone(),
                state: WatchState::Watching,
            })
            .collect();

        tracing::debug!(
            watching = self.watchers.len(),
            "View synchronizer attached"
        );
    }

    /// Watcher state for the element `id`, or `None` if it was present at
    /// attach or is not bound.
    #[must_use]
    pub fn watch_state(&self, id: &str) -> Option<WatchState> {
        self.watchers
            .iter()
            .find(|w| w.id == id)
            .map(|w| w.state)
    }

    /// Render `cart` onto every present target. Returns how many elements
    /// were written.
    pub fn render(&self, cart: &Cart, doc: &mut impl Document) -> usize {
        let view = CartView::new(cart, &self.currency);
        Surface::ALL
            .into_iter()
            .map(|surface| self.render_surface(surface, &view, doc))
            .sum()
    }

    /// Process pending mutation records, giving each newly satisfied watcher
    /// its corrective render. Returns how many watchers were satisfied.
    pub fn observe(&mut self, cart: &Cart, doc: &mut impl Document) -> usize {
        let records = doc.take_records();
        if records.is_empty() || !self.is_watching() {
            return 0;
        }

        let view = CartView::new(cart, &self.currency);
        let mut satisfied = 0;
        for record in records {
            let MutationRecord::Added(id) = record else {
                continue;
            };
            let Some(watcher) = self
                .watchers
                .iter_mut()
                .find(|w| w.id == id && w.state == WatchState::Watching)
            else {
                continue;
            };
            watcher.state = WatchState::Satisfied;

            let Some(surface) = self.bindings.surface_of(&id) else {
                continue;
            };
            self.render_surface(surface, &view, doc);
            satisfied += 1;
            tracing::debug!(?surface, element = %id, "Late cart surface rendered");
        }
        satisfied
    }

    /// Whether any watcher is still waiting for its element.
    #[must_use]
    pub fn is_watching(&self) -> bool {
        self.watchers
            .iter()
            .any(|w| w.state == WatchState::Watching)
    }

    fn render_surface(&self, surface: Surface, view: &CartView, doc: &mut impl Document) -> usize {
        let targets: Vec<&String> = self
            .bindings
            .ids(surface)
            .iter()
            .filter(|id| doc.contains(id))
            .collect();
        if targets.is_empty() {
            return 0;
        }

        let rendered = match surface {
            Surface::Badge => CartCountTemplate { count: view.count }.render(),
            Surface::Items => CartItemsTemplate { cart: view }.render(),
            Surface::Total => CartTotalTemplate { total: &view.total }.render(),
        };
        let html = match rendered {
            Ok(html) => html,
            Err(e) => {
                tracing::warn!(?surface, error = %e, "Failed to render cart fragment");
                return 0;
            }
        };

        targets
            .into_iter()
            .filter(|id| doc.set_inner_html(id, &html))
            .count()
    }
}
