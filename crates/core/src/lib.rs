pub mod config;
pub mod domain;
pub mod recs;

pub use domain::order::{Order, OrderId, OrderLine};
pub use domain::product::{Product, ProductId};
pub use recs::{
    BrowsingHistory, CartItem, CoOccurrenceIndex, RecommendationEngine, ScoreBoard,
    ShopperContext, StrategyWeights,
};
