//! Product snapshot types.
//!
//! The state layer never fetches products itself. Whatever screen triggers a
//! cart mutation passes in the product it rendered, stock count included, and
//! that snapshot is what the stock invariant is checked against.

use crate::ids::ProductId;
use crate::money::Money;
use serde::{Deserialize, Serialize};

/// A product as seen by the cart, including the stock snapshot.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    /// Unique product identifier.
    pub id: ProductId,
    /// Product name.
    pub name: String,
    /// Unit price.
    pub price: Money,
    /// Units available at the time the caller rendered this product.
    pub stock: i64,
    /// Primary image, if any.
    pub image_url: Option<String>,
    /// Short description for listings.
    pub description: Option<String>,
}

impl Product {
    /// Create a product snapshot.
    pub fn new(id: impl Into<ProductId>, name: impl Into<String>, price: Money, stock: i64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price,
            stock,
            image_url: None,
            description: None,
        }
    }

    /// Whether any units are purchasable.
    pub fn in_stock(&self) -> bool {
        self.stock > 0
    }
}
