//! Commerce domain types and cart state for Bonbon.
//!
//! This crate provides the storefront's client-side commerce layer:
//!
//! - **Ids**: newtype identifiers for products and users
//! - **Money**: integer minor-unit monetary values (forint by default)
//! - **Catalog**: the product snapshot the cart checks stock against
//! - **Pricing**: subtotal, threshold shipping, and order totals
//! - **Cart**: the persisted cart store with its stock invariant
//!
//! # Example
//!
//! ```rust,ignore
//! use bonbon_commerce::prelude::*;
//!
//! let mut cart = CartStore::new(backend, sink, clock);
//!
//! let truffle = Product::new("prod-1", "Hazelnut truffle", Money::huf(1200), 8);
//! cart.add_item(&truffle, 2);
//!
//! let pricing = cart.pricing();
//! println!("Total: {}", pricing.grand_total);
//! ```

pub mod cart;
pub mod catalog;
pub mod ids;
pub mod money;
pub mod pricing;

pub use cart::{CartStore, LineItem, CART_NAMESPACE};
pub use catalog::Product;
pub use ids::{ProductId, UserId};
pub use money::{Currency, Money};
pub use pricing::{CartPricing, ShippingPolicy};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::cart::{CartStore, LineItem};
    pub use crate::catalog::Product;
    pub use crate::ids::{ProductId, UserId};
    pub use crate::money::{Currency, Money};
    pub use crate::pricing::{
        price_cart, shipping_cost, subtotal, CartPricing, ShippingPolicy,
        FLAT_SHIPPING_FEE, FREE_SHIPPING_THRESHOLD,
    };
}
