//! Context and configuration types for the recommendation engine.

use serde::{Deserialize, Serialize};

use crate::domain::product::{Product, ProductId};

use super::history::BrowsingHistory;

/// Per-strategy weights applied when merging candidate lists.
///
/// Raw strategy outputs are combined without normalization: a product
/// surfaced by several strategies sums their weights.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct StrategyWeights {
    pub cart: f64,
    pub wishlist: f64,
    pub purchase_history: f64,
    pub browsing_history: f64,
    pub collaborative: f64,
    pub content: f64,
}

impl Default for StrategyWeights {
    fn default() -> Self {
        super::DEFAULT_WEIGHTS
    }
}

/// A cart line as the engine sees it: the resolved product plus quantity.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    pub product_id: ProductId,
    pub product: Product,
    pub quantity: u32,
}

/// Read-only shopper snapshot injected into every engine call.
///
/// Assembled per session by the storage layer; the engine never reaches
/// into ambient state. `purchased` is this shopper's purchase history, not
/// a global aggregate.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ShopperContext {
    pub cart: Vec<CartItem>,
    pub wishlist: Vec<ProductId>,
    pub purchased: Vec<ProductId>,
    pub history: BrowsingHistory,
}

impl ShopperContext {
    /// True when no context strategy has anything to work with, in which
    /// case the personalized feed degrades to pure trending.
    pub fn is_fresh(&self) -> bool {
        self.cart.is_empty()
            && self.wishlist.is_empty()
            && self.purchased.is_empty()
            && self.history.is_empty()
    }
}
