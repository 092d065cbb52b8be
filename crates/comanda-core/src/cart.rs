//! # Cart Ledger
//!
//! The order in progress.
//!
//! ## Ledger Operations
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Ledger Operations                                    │
//! │                                                                         │
//! │  Session Action           Ledger Call             State Change          │
//! │  ──────────────           ───────────             ────────────          │
//! │                                                                         │
//! │  Confirm product ────────► add_item() ──────────► items.push(item)      │
//! │                                                   (new UUID, no dedup)  │
//! │                                                                         │
//! │  Remove line ────────────► remove_item(id) ─────► items.retain(..)      │
//! │                                                   (no-op if absent)     │
//! │                                                                         │
//! │  Complete / cancel ──────► clear() ─────────────► items.clear()         │
//! │                                                                         │
//! │  Show ticket ────────────► items() / total() ───► (read only, copy)     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Invariants
//! - Identical products produce separate lines; there is no quantity field
//! - The total is recomputed from the items on every call, never cached
//! - Nothing here is persisted. The ledger lives for one order.

use uuid::Uuid;

use crate::money::Money;
use crate::types::{LineItem, NewLineItem};

/// The line items of the order being built.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CartLedger {
    items: Vec<LineItem>,
}

impl CartLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an item under a freshly generated id and returns the stored
    /// line.
    pub fn add_item(&mut self, item: NewLineItem) -> LineItem {
        let line = LineItem {
            id: Uuid::new_v4().to_string(),
            name: item.name,
            price: item.price,
            category: item.category,
            customizations: item.customizations,
        };
        self.items.push(line.clone());
        line
    }

    /// Removes the line with `id`. Returns whether a line was removed.
    pub fn remove_item(&mut self, id: &str) -> bool {
        let before = self.items.len();
        self.items.retain(|item| item.id != id);
        self.items.len() != before
    }

    /// A copy of the current lines, in insertion order.
    pub fn items(&self) -> Vec<LineItem> {
        self.items.clone()
    }

    /// Sum of the line prices.
    pub fn total(&self) -> Money {
        self.items.iter().map(|item| item.price).sum()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_item(name: &str, cents: i64) -> NewLineItem {
        NewLineItem {
            name: name.to_string(),
            price: Money::from_cents(cents),
            category: "cervezas".to_string(),
            customizations: vec![],
        }
    }

    #[test]
    fn test_add_item_assigns_unique_ids() {
        let mut ledger = CartLedger::new();

        let a = ledger.add_item(new_item("CORONA", 5500));
        let b = ledger.add_item(new_item("CORONA", 5500));

        assert_ne!(a.id, b.id);
        assert_eq!(ledger.len(), 2); // No dedup
        assert_eq!(a.name, b.name);
    }

    #[test]
    fn test_total() {
        let mut ledger = CartLedger::new();
        assert_eq!(ledger.total(), Money::zero());

        ledger.add_item(new_item("Botella ABSOLUT", 10000));
        ledger.add_item(new_item("ALITAS", 5550));

        assert_eq!(ledger.total().to_string(), "$155.50");
    }

    #[test]
    fn test_remove_item() {
        let mut ledger = CartLedger::new();
        let keep = ledger.add_item(new_item("A", 100));
        let drop = ledger.add_item(new_item("B", 200));

        assert!(ledger.remove_item(&drop.id));
        assert!(!ledger.remove_item(&drop.id)); // Already gone

        assert_eq!(ledger.items(), vec![keep]);
        assert_eq!(ledger.total().cents(), 100);
    }

    #[test]
    fn test_remove_unknown_id_is_noop() {
        let mut ledger = CartLedger::new();
        ledger.add_item(new_item("A", 100));
        assert!(!ledger.remove_item("missing"));
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn test_items_is_a_copy() {
        let mut ledger = CartLedger::new();
        ledger.add_item(new_item("A", 100));

        let mut snapshot = ledger.items();
        snapshot.clear();

        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn test_clear() {
        let mut ledger = CartLedger::new();
        ledger.add_item(new_item("A", 100));
        ledger.clear();
        assert!(ledger.is_empty());
        assert!(ledger.total().is_zero());
    }
}
