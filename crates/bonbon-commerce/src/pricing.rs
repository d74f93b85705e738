//! Order total calculations.
//!
//! Pure functions over the current line items. Nothing here is cached across
//! mutations; the cart recomputes on every call so derived totals can never
//! drift from the state they were derived from.

use crate::cart::LineItem;
use crate::money::Money;
use serde::{Deserialize, Serialize};

/// Free-shipping threshold in the shop's home currency.
pub const FREE_SHIPPING_THRESHOLD: i64 = 8000;

/// Flat shipping fee charged below the threshold.
pub const FLAT_SHIPPING_FEE: i64 = 5000;

/// Shipping configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingPolicy {
    /// Orders at or above this subtotal ship free.
    pub free_threshold: Money,
    /// Fee charged below the threshold.
    pub flat_fee: Money,
}

impl Default for ShippingPolicy {
    fn default() -> Self {
        Self {
            free_threshold: Money::huf(FREE_SHIPPING_THRESHOLD),
            flat_fee: Money::huf(FLAT_SHIPPING_FEE),
        }
    }
}

/// Complete pricing breakdown for a cart. Derived, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartPricing {
    /// Sum of quantity times unit price over all line items.
    pub subtotal: Money,
    /// Shipping cost under the policy.
    pub shipping_total: Money,
    /// Final total (subtotal + shipping).
    pub grand_total: Money,
}

impl CartPricing {
    /// Whether the order qualifies for free shipping.
    pub fn ships_free(&self) -> bool {
        self.shipping_total.is_zero()
    }
}

/// Sum of `quantity * unit price` over all items. Empty list is zero.
pub fn subtotal(items: &[LineItem]) -> Money {
    let currency = items
        .first()
        .map(|item| item.product.price.currency)
        .unwrap_or_default();
    Money::sum(items.iter().map(LineItem::line_total), currency)
}

/// Shipping cost: zero at or above the free threshold, the flat fee below it.
pub fn shipping_cost(subtotal: Money, policy: &ShippingPolicy) -> Money {
    if subtotal.amount >= policy.free_threshold.amount {
        Money::zero(subtotal.currency)
    } else {
        policy.flat_fee
    }
}

/// Final total.
pub fn total(subtotal: Money, shipping: Money) -> Money {
    subtotal + shipping
}

/// Compute the full pricing breakdown for a set of line items.
pub fn price_cart(items: &[LineItem], policy: &ShippingPolicy) -> CartPricing {
    let subtotal = subtotal(items);
    let shipping_total = shipping_cost(subtotal, policy);
    CartPricing {
        subtotal,
        shipping_total,
        grand_total: total(subtotal, shipping_total),
    }
}
