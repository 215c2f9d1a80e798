//! Storefront recommendation engine.
//!
//! Blends content-based similarity, collaborative co-occurrence, shopper
//! context (cart, wishlist, purchases, browsing history), and a trending
//! fallback into ranked product lists. Deterministic and synchronous: every
//! call scores a fresh candidate board over immutable snapshots.

mod board;
mod cooccurrence;
mod engine;
mod history;
mod similarity;
mod trending;
mod types;

pub use board::ScoreBoard;
pub use cooccurrence::CoOccurrenceIndex;
pub use engine::RecommendationEngine;
pub use history::BrowsingHistory;
pub use similarity::similarity;
pub use trending::{trending, trending_score};
pub use types::{CartItem, ShopperContext, StrategyWeights};

/// Default per-strategy weights applied when merging candidate lists.
pub const DEFAULT_WEIGHTS: StrategyWeights = StrategyWeights {
    cart: 3.0,
    wishlist: 2.5,
    purchase_history: 2.0,
    browsing_history: 1.5,
    collaborative: 3.0,
    content: 2.0,
};

/// Default result size for the personalized feed.
pub const DEFAULT_PERSONALIZED_LIMIT: usize = 12;
/// Default result size for the product-detail similar-products rail.
pub const DEFAULT_SIMILAR_LIMIT: usize = 8;
/// Candidate pull per context strategy inside the personalized feed.
pub const STRATEGY_POOL_SIZE: usize = 8;
/// Content neighbors fetched per cart or wishlist product.
pub const BASKET_NEIGHBORS: usize = 5;
/// Content neighbors fetched per purchased or recently viewed product.
pub const HISTORY_NEIGHBORS: usize = 3;
/// How many most-recent views feed the browsing-history strategy.
pub const RECENT_VIEW_WINDOW: usize = 5;
/// Collaborative candidate pull inside `similar_products`.
pub const SIMILAR_COLLABORATIVE_POOL: usize = 4;
/// Content-based candidate pull inside `similar_products`.
pub const SIMILAR_CONTENT_POOL: usize = 6;
/// Maximum retained browsing-history entries.
pub const HISTORY_CAP: usize = 20;
