//! The cart store.
//!
//! Holds the line items for the current browser session, enforces the
//! quantity-vs-stock invariant on every mutation, and persists itself to
//! durable client storage after each successful change.
//!
//! Failure semantics: the only rejectable condition is exceeding available
//! stock, and it is reported through the notification sink, never returned
//! as an error. In-memory state is the source of truth; a failed persistence
//! write is logged and never reverts a mutation.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use bonbon_cache::{
    Clock, KvStore, NoticeKind, Notification, NotificationDedup, NotificationSink, StorageBackend,
};

use crate::catalog::Product;
use crate::ids::ProductId;
use crate::money::Money;
use crate::pricing::{self, CartPricing, ShippingPolicy};

/// Storage namespace owned by the cart. The session store never reads it.
pub const CART_NAMESPACE: &str = "bonbon.cart";

const ITEMS_KEY: &str = "items";

/// A (product, quantity) pair inside the cart.
///
/// Invariant: `0 < quantity <= product.stock`. A line item that would reach
/// quantity zero is removed instead.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LineItem {
    /// Product snapshot, stock included.
    pub product: Product,
    /// Quantity, always positive.
    pub quantity: i64,
}

impl LineItem {
    /// Line total (`quantity * unit price`).
    pub fn line_total(&self) -> Money {
        self.product.price.multiply(self.quantity)
    }
}

/// Persisted shape: `{ "items": [...] }` under the cart namespace.
#[derive(Debug, Serialize, Deserialize)]
struct PersistedCart {
    items: Vec<LineItem>,
}

/// The shopping cart and its panel-open UI flag.
///
/// One instance per browser session. Every public operation re-reads current
/// state at the start of the call, so UI double-invocations are safe.
pub struct CartStore {
    items: Vec<LineItem>,
    panel_open: bool,
    policy: ShippingPolicy,
    dedup: NotificationDedup,
    sink: Arc<dyn NotificationSink>,
    storage: KvStore,
}

impl CartStore {
    /// Create a cart store, restoring any persisted line items.
    ///
    /// Corrupt persisted data degrades to an empty cart and is overwritten
    /// on the next successful write.
    pub fn new(
        backend: Arc<dyn StorageBackend>,
        sink: Arc<dyn NotificationSink>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let storage = KvStore::new(backend, CART_NAMESPACE);
        let items = match storage.get::<PersistedCart>(ITEMS_KEY) {
            Ok(Some(persisted)) => persisted.items,
            Ok(None) => Vec::new(),
            Err(error) => {
                tracing::warn!(%error, "discarding corrupt persisted cart");
                Vec::new()
            }
        };

        Self {
            items,
            panel_open: false,
            policy: ShippingPolicy::default(),
            dedup: NotificationDedup::new(clock),
            sink,
            storage,
        }
    }

    /// Override the shipping policy.
    pub fn with_policy(mut self, policy: ShippingPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Add `quantity` units of a product to the cart.
    ///
    /// If a line item for the product already exists its quantity grows by
    /// `quantity`. A request that would exceed the stock snapshot leaves the
    /// cart unchanged and reports the available count through the sink.
    /// Non-positive quantities are ignored; a line item can only leave the
    /// cart through [`Self::remove_item`] or [`Self::update_quantity`].
    pub fn add_item(&mut self, product: &Product, quantity: i64) {
        if quantity <= 0 {
            return;
        }

        let new_quantity = match self.find(&product.id) {
            Some(index) => self.items[index].quantity.saturating_add(quantity),
            None => quantity,
        };

        if new_quantity > product.stock {
            self.reject_for_stock(product);
            return;
        }

        match self.find(&product.id) {
            Some(index) => {
                let item = &mut self.items[index];
                item.quantity = new_quantity;
                // Refresh the snapshot; the caller's copy is newer.
                item.product = product.clone();
            }
            None => self.items.push(LineItem {
                product: product.clone(),
                quantity: new_quantity,
            }),
        }

        self.persist();
        self.notify(Notification::success(
            NoticeKind::Added,
            product.id.as_str(),
            format!("{} added to cart", product.name),
        ));
    }

    /// Remove a line item. No-op, with no notification, if absent.
    pub fn remove_item(&mut self, product_id: &ProductId) {
        let Some(index) = self.find(product_id) else {
            return;
        };
        let removed = self.items.remove(index);

        self.persist();
        self.notify(Notification::success(
            NoticeKind::Removed,
            removed.product.id.as_str(),
            format!("{} removed from cart", removed.product.name),
        ));
    }

    /// Set a line item's quantity.
    ///
    /// A quantity of zero or less behaves exactly as [`Self::remove_item`].
    /// A quantity above the stock snapshot is rejected and the cart is left
    /// unchanged. Unknown products are ignored.
    pub fn update_quantity(&mut self, product_id: &ProductId, quantity: i64) {
        if quantity <= 0 {
            self.remove_item(product_id);
            return;
        }

        let Some(index) = self.find(product_id) else {
            return;
        };

        if quantity > self.items[index].product.stock {
            let product = self.items[index].product.clone();
            self.reject_for_stock(&product);
            return;
        }

        self.items[index].quantity = quantity;
        let name = self.items[index].product.name.clone();

        self.persist();
        self.notify(Notification::success(
            NoticeKind::Updated,
            product_id.as_str(),
            format!("{} quantity updated", name),
        ));
    }

    /// Empty the cart.
    pub fn clear(&mut self) {
        self.items.clear();
        self.persist();
        self.notify(Notification::success(
            NoticeKind::Cleared,
            "cart",
            "Cart cleared",
        ));
    }

    /// Current line items, in insertion order.
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Check if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Get a line item by product.
    pub fn get_item(&self, product_id: &ProductId) -> Option<&LineItem> {
        self.items.iter().find(|i| &i.product.id == product_id)
    }

    /// Total item count (sum of quantities).
    pub fn item_count(&self) -> i64 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    /// Number of distinct products in the cart.
    pub fn unique_item_count(&self) -> usize {
        self.items.len()
    }

    /// Subtotal over current items. Recomputed on every call.
    pub fn subtotal(&self) -> Money {
        pricing::subtotal(&self.items)
    }

    /// Shipping cost for the current subtotal.
    pub fn shipping_cost(&self) -> Money {
        pricing::shipping_cost(self.subtotal(), &self.policy)
    }

    /// Order total including shipping.
    pub fn total(&self) -> Money {
        self.pricing().grand_total
    }

    /// Full pricing breakdown.
    pub fn pricing(&self) -> CartPricing {
        pricing::price_cart(&self.items, &self.policy)
    }

    /// Open the cart panel.
    pub fn open_panel(&mut self) {
        self.panel_open = true;
    }

    /// Close the cart panel.
    pub fn close_panel(&mut self) {
        self.panel_open = false;
    }

    /// Toggle the cart panel.
    pub fn toggle_panel(&mut self) {
        self.panel_open = !self.panel_open;
    }

    /// Whether the cart panel is open.
    pub fn is_panel_open(&self) -> bool {
        self.panel_open
    }

    fn find(&self, product_id: &ProductId) -> Option<usize> {
        self.items.iter().position(|i| &i.product.id == product_id)
    }

    fn reject_for_stock(&mut self, product: &Product) {
        self.notify(Notification::error(
            NoticeKind::StockError,
            product.id.as_str(),
            format!("Only {} of {} available", product.stock, product.name),
        ));
    }

    fn persist(&self) {
        let snapshot = PersistedCart {
            items: self.items.clone(),
        };
        if let Err(error) = self.storage.set(ITEMS_KEY, &snapshot) {
            tracing::warn!(%error, "cart persistence write failed, keeping in-memory state");
        }
    }

    fn notify(&mut self, notification: Notification) {
        if self
            .dedup
            .should_emit(notification.kind.as_str(), &notification.key)
        {
            self.sink.display(&notification);
        }
    }
}
