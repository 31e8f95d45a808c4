//! Cart change notifications.
//!
//! Listeners run synchronously, in registration order, inside the mutator
//! call that triggered them. By the time a mutator returns every listener
//! has seen the new state.

use std::fmt;

use pocket_shop_core::Cart;

/// Broadcast after every effective cart mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CartChanged {
    /// Sum of quantities in the cart.
    pub count: u64,
    /// Cart total in display-currency units.
    pub total: u64,
}

impl From<&Cart> for CartChanged {
    fn from(cart: &Cart) -> Self {
        Self {
            count: cart.count(),
            total: cart.total(),
        }
    }
}

/// Handle returned by [`ChangeNotifier::subscribe`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Listener = Box<dyn FnMut(&CartChanged)>;

/// Registry of change listeners.
#[derive(Default)]
pub struct ChangeNotifier {
    next_id: u64,
    listeners: Vec<(ListenerId, Listener)>,
}

impl ChangeNotifier {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `listener`; it is called once for every emitted change.
    pub fn subscribe(&mut self, listener: impl FnMut(&CartChanged) + 'static) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Remove a listener. Returns whether it was registered.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener_id, _)| *listener_id != id);
        self.listeners.len() != before
    }

    /// Deliver `event` to every listener.
    pub fn emit(&mut self, event: &CartChanged) {
        for (_, listener) in &mut self.listeners {
            listener(event);
        }
    }

    /// Number of registered listeners.
    #[must_use]
    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

impl fmt::Debug for ChangeNotifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChangeNotifier")
            .field("listeners", &self.len())
            .finish_non_exhaustive()
    }
}
