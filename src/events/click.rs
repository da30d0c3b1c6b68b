//! Outside-click listener registry.
//!
//! A grid with an open menu subscribes here under its table id so that
//! clicks anywhere on screen reach it, and unsubscribes when the menu
//! closes. Subscriptions are paired: a grid drops its previous listener
//! before registering a new one.

use std::collections::BTreeMap;

use tracing::trace;

/// Handle returned by [`ClickBus::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ListenerId(u64);

/// Registry of grids listening for clicks.
#[derive(Debug, Default)]
pub struct ClickBus {
    next_id: u64,
    listeners: BTreeMap<ListenerId, String>,
}

impl ClickBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener for the table `table_id`.
    pub fn subscribe(&mut self, table_id: &str) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners.insert(id, table_id.to_string());
        trace!(table = table_id, listener = id.0, "Click listener added");
        id
    }

    /// Remove a listener. Returns false if it was not registered.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let removed = self.listeners.remove(&id).is_some();
        trace!(listener = id.0, removed, "Click listener removed");
        removed
    }

    /// Total number of registered listeners.
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Number of listeners registered for `table_id`.
    pub fn listeners_for(&self, table_id: &str) -> usize {
        self.listeners.values().filter(|t| *t == table_id).count()
    }

    /// Whether `table_id` has at least one listener.
    pub fn is_listening(&self, table_id: &str) -> bool {
        self.listeners.values().any(|t| t == table_id)
    }
}
