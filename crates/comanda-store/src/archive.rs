//! # Order Archive
//!
//! Completed orders, kept as two JSON lists in a [`KeyValueStore`].
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  "orders"        [newest, ..., oldest]   active orders                  │
//! │        │                                                                │
//! │        │ move_to_history(id)  removes, stamps deletedAt                 │
//! │        ▼                                                                │
//! │  "orderHistory"  [newest, ..., oldest]   archived orders                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Failure Policy
//! Nothing here returns an error. A corrupt or unreadable list reads as
//! empty; a failed write returns `false`. Both are logged. The register must
//! stay usable with broken local state, and the caller decides whether to
//! offer a retry.

use chrono::Utc;
use comanda_core::Order;
use tracing::{debug, info, warn};

use crate::error::{StoreError, StoreResult};
use crate::kv::KeyValueStore;

/// Key of the active order list.
pub const ORDERS_KEY: &str = "orders";

/// Key of the archived order list.
pub const HISTORY_KEY: &str = "orderHistory";

pub struct OrderArchive<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> OrderArchive<S> {
    pub fn new(store: S) -> Self {
        OrderArchive { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Active orders, newest first.
    pub async fn get_active(&self) -> Vec<Order> {
        self.read_or_empty(ORDERS_KEY).await
    }

    /// Archived orders, newest first.
    pub async fn get_history(&self) -> Vec<Order> {
        self.read_or_empty(HISTORY_KEY).await
    }

    /// Prepends `order` to the active list.
    pub async fn save(&self, order: &Order) -> bool {
        let mut active = self.get_active().await;
        active.insert(0, order.clone());

        match self.write(ORDERS_KEY, &active).await {
            Ok(()) => {
                info!(order_id = %order.id, total = %order.total, "Order saved");
                true
            }
            Err(err) => {
                warn!(order_id = %order.id, error = %err, "Failed to save order");
                false
            }
        }
    }

    /// Moves an active order to the history. Returns false when no active
    /// order has `order_id` or a write fails.
    pub async fn move_to_history(&self, order_id: &str) -> bool {
        let mut active = self.get_active().await;
        let Some(index) = active.iter().position(|order| order.id == order_id) else {
            debug!(order_id, "Order not in active list");
            return false;
        };

        let mut order = active.remove(index);
        order.deleted_at = Some(Utc::now());

        // A retry after a failed active write finds the order archived
        // already; the new copy replaces it.
        let mut history = self.get_history().await;
        history.retain(|archived| archived.id != order.id);
        history.insert(0, order);

        // History first: a failure between the two writes leaves the order
        // in both lists rather than in neither.
        if let Err(err) = self.write(HISTORY_KEY, &history).await {
            warn!(order_id, error = %err, "Failed to write order history");
            return false;
        }
        if let Err(err) = self.write(ORDERS_KEY, &active).await {
            warn!(order_id, error = %err, "Failed to write active orders");
            return false;
        }

        info!(order_id, "Order moved to history");
        true
    }

    /// Empties the history.
    pub async fn clear_history(&self) -> bool {
        match self.write::<Order>(HISTORY_KEY, &[]).await {
            Ok(()) => {
                info!("Order history cleared");
                true
            }
            Err(err) => {
                warn!(error = %err, "Failed to clear order history");
                false
            }
        }
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    async fn read(&self, key: &str) -> StoreResult<Vec<Order>> {
        match self.store.get(key).await? {
            None => Ok(Vec::new()),
            Some(raw) if raw.trim().is_empty() => Ok(Vec::new()),
            Some(raw) => serde_json::from_str(&raw).map_err(|e| StoreError::corrupt(key, e)),
        }
    }

    async fn read_or_empty(&self, key: &str) -> Vec<Order> {
        self.read(key).await.unwrap_or_else(|err| {
            warn!(key, error = %err, "Unreadable order list, treating as empty");
            Vec::new()
        })
    }

    async fn write<T: serde::Serialize>(&self, key: &str, orders: &[T]) -> StoreResult<()> {
        let raw = serde_json::to_string(orders)?;
        self.store.set(key, &raw).await
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
