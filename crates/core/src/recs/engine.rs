//! Recommendation aggregator: strategy functions and the public entry
//! points that merge them.

use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::domain::order::Order;
use crate::domain::product::{Product, ProductId};

use super::board::ScoreBoard;
use super::cooccurrence::CoOccurrenceIndex;
use super::similarity::similarity;
use super::trending;
use super::types::{ShopperContext, StrategyWeights};
use super::{
    BASKET_NEIGHBORS, HISTORY_NEIGHBORS, RECENT_VIEW_WINDOW, SIMILAR_COLLABORATIVE_POOL,
    SIMILAR_CONTENT_POOL, STRATEGY_POOL_SIZE,
};

/// The scoring pipeline over an immutable catalog snapshot.
///
/// Owns the catalog, an id index, and the co-occurrence index built from
/// order history at construction. All operations take `&self` and build
/// fresh scoring state per call, so concurrent invocations need no
/// coordination.
#[derive(Clone, Debug)]
pub struct RecommendationEngine {
    catalog: Vec<Product>,
    by_id: HashMap<ProductId, usize>,
    co_occurrence: CoOccurrenceIndex,
    weights: StrategyWeights,
}

impl RecommendationEngine {
    pub fn new(catalog: Vec<Product>, orders: &[Order]) -> Self {
        Self::with_weights(catalog, orders, StrategyWeights::default())
    }

    pub fn with_weights(catalog: Vec<Product>, orders: &[Order], weights: StrategyWeights) -> Self {
        let by_id = catalog.iter().enumerate().map(|(slot, p)| (p.id, slot)).collect();
        Self { catalog, by_id, co_occurrence: CoOccurrenceIndex::build(orders), weights }
    }

    pub fn catalog(&self) -> &[Product] {
        &self.catalog
    }

    pub fn product(&self, id: ProductId) -> Option<&Product> {
        self.by_id.get(&id).map(|&slot| &self.catalog[slot])
    }

    // ------------------------------------------------------------------
    // Strategies
    // ------------------------------------------------------------------

    /// In-stock products most similar to `id` by static attributes.
    /// Unknown ids contribute nothing. Ties keep catalog order.
    pub fn content_based(&self, id: ProductId, limit: usize) -> Vec<Product> {
        let Some(reference) = self.product(id) else {
            return Vec::new();
        };

        let mut scored: Vec<(&Product, u32)> = self
            .catalog
            .iter()
            .filter(|p| p.id != id && p.in_stock())
            .map(|p| (p, similarity(reference, p)))
            .collect();
        scored.sort_by(|a, b| b.1.cmp(&a.1));

        scored.into_iter().take(limit).map(|(p, _)| p.clone()).collect()
    }

    /// Products frequently purchased together with `id`, most frequent
    /// first, resolved against the catalog and filtered to in-stock.
    pub fn collaborative(&self, id: ProductId, limit: usize) -> Vec<Product> {
        self.co_occurrence
            .co_occurring(id)
            .iter()
            .filter_map(|&other| self.product(other))
            .filter(|p| p.in_stock())
            .take(limit)
            .cloned()
            .collect()
    }

    /// Content neighbors of everything in the cart, excluding the cart
    /// itself.
    pub fn cart_based(&self, ctx: &ShopperContext, limit: usize) -> Vec<Product> {
        let owned: HashSet<ProductId> = ctx.cart.iter().map(|item| item.product_id).collect();
        self.neighbor_union(
            ctx.cart.iter().map(|item| item.product_id),
            BASKET_NEIGHBORS,
            &owned,
            limit,
        )
    }

    /// Content neighbors of the wishlist, excluding the wishlist itself.
    pub fn wishlist_based(&self, ctx: &ShopperContext, limit: usize) -> Vec<Product> {
        let owned: HashSet<ProductId> = ctx.wishlist.iter().copied().collect();
        self.neighbor_union(ctx.wishlist.iter().copied(), BASKET_NEIGHBORS, &owned, limit)
    }

    /// Neighbors of previously purchased products, ranked by how many
    /// purchases point at each candidate. Already-purchased ids are
    /// excluded.
    pub fn purchase_history_based(&self, ctx: &ShopperContext, limit: usize) -> Vec<Product> {
        let owned: HashSet<ProductId> = ctx.purchased.iter().copied().collect();

        let mut board = ScoreBoard::new();
        for &purchased in &ctx.purchased {
            for neighbor in self.content_based(purchased, HISTORY_NEIGHBORS) {
                if owned.contains(&neighbor.id) {
                    continue;
                }
                board.add(neighbor.id, 1.0);
            }
        }

        self.resolve(board.ranked().into_iter().take(limit))
    }

    /// Neighbors of the five most recently viewed products, excluding
    /// everything still in the history.
    pub fn browsing_history_based(&self, ctx: &ShopperContext, limit: usize) -> Vec<Product> {
        let mut seen = HashSet::new();
        let mut picks = Vec::new();

        for &viewed in ctx.history.recent(RECENT_VIEW_WINDOW) {
            for neighbor in self.content_based(viewed, HISTORY_NEIGHBORS) {
                if ctx.history.contains(neighbor.id) || !seen.insert(neighbor.id) {
                    continue;
                }
                picks.push(neighbor);
            }
        }

        picks.truncate(limit);
        picks
    }

    /// Popularity fallback, ranked by rating times log review volume.
    pub fn trending(&self, limit: usize, exclude: &HashSet<ProductId>) -> Vec<Product> {
        trending::trending(&self.catalog, limit, exclude)
    }

    // ------------------------------------------------------------------
    // Public entry points
    // ------------------------------------------------------------------

    /// The hybrid personalized feed: all four context strategies merged by
    /// weighted sum, padded with trending when short of `limit`.
    pub fn personalized(&self, ctx: &ShopperContext, limit: usize) -> Vec<Product> {
        let mut board = ScoreBoard::new();

        for product in self.cart_based(ctx, STRATEGY_POOL_SIZE) {
            board.add(product.id, self.weights.cart);
        }
        for product in self.wishlist_based(ctx, STRATEGY_POOL_SIZE) {
            board.add(product.id, self.weights.wishlist);
        }
        for product in self.purchase_history_based(ctx, STRATEGY_POOL_SIZE) {
            board.add(product.id, self.weights.purchase_history);
        }
        for product in self.browsing_history_based(ctx, STRATEGY_POOL_SIZE) {
            board.add(product.id, self.weights.browsing_history);
        }

        debug!(candidates = board.len(), limit, "personalized feed scored");
        self.fill(board, limit, None)
    }

    /// Similar products for a product-detail page. Records the view into
    /// `ctx` history first, then merges collaborative and content-based
    /// candidates. An unknown `id` contributes nothing and the result
    /// degrades to pure trending (excluding the unknown id).
    pub fn similar_products(
        &self,
        ctx: &mut ShopperContext,
        id: ProductId,
        limit: usize,
    ) -> Vec<Product> {
        ctx.history.record_view(id);

        let mut board = ScoreBoard::new();
        for product in self.collaborative(id, SIMILAR_COLLABORATIVE_POOL) {
            board.add(product.id, self.weights.collaborative);
        }
        for product in self.content_based(id, SIMILAR_CONTENT_POOL) {
            board.add(product.id, self.weights.content);
        }

        debug!(product_id = %id, candidates = board.len(), limit, "similar products scored");
        self.fill(board, limit, Some(id))
    }

    /// Union of content neighbors across the seed ids, in encounter order.
    /// Candidates in `owned` are skipped and duplicates across seeds are
    /// dropped.
    fn neighbor_union(
        &self,
        seeds: impl Iterator<Item = ProductId>,
        per_seed: usize,
        owned: &HashSet<ProductId>,
        limit: usize,
    ) -> Vec<Product> {
        let mut seen = HashSet::new();
        let mut picks = Vec::new();

        for seed in seeds {
            for neighbor in self.content_based(seed, per_seed) {
                if owned.contains(&neighbor.id) || !seen.insert(neighbor.id) {
                    continue;
                }
                picks.push(neighbor);
            }
        }

        picks.truncate(limit);
        picks
    }

    /// Rank the board, truncate, then pad with trending until `limit` or
    /// catalog exhaustion. `source` is always excluded from the padding.
    fn fill(&self, board: ScoreBoard, limit: usize, source: Option<ProductId>) -> Vec<Product> {
        let mut picked = self.resolve(board.ranked().into_iter());
        picked.truncate(limit);

        if picked.len() < limit {
            let mut exclude: HashSet<ProductId> = picked.iter().map(|p| p.id).collect();
            exclude.extend(source);
            picked.extend(self.trending(limit - picked.len(), &exclude));
        }

        picked
    }

    fn resolve(&self, ids: impl Iterator<Item = ProductId>) -> Vec<Product> {
        ids.filter_map(|id| self.product(id)).cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use chrono::Utc;

    use crate::domain::order::{Order, OrderId, OrderLine};
    use crate::domain::product::{Product, ProductId};
    use crate::recs::types::{CartItem, ShopperContext};
    use crate::recs::{DEFAULT_PERSONALIZED_LIMIT, DEFAULT_SIMILAR_LIMIT};

    use super::RecommendationEngine;

    fn product(id: i64, category: &str, brand: &str, price: f64, rating: f64) -> Product {
        Product {
            id: ProductId(id),
            name: format!("Product {id}"),
            category: category.to_string(),
            subcategory: format!("{category}/general"),
            brand: brand.to_string(),
            price,
            rating,
            review_count: 25 + id as u32,
            stock: 10,
        }
    }

    fn order(id: &str, product_ids: &[i64]) -> Order {
        Order {
            id: OrderId(id.to_string()),
            placed_at: Utc::now(),
            lines: product_ids
                .iter()
                .map(|&id| OrderLine { product_id: ProductId(id), quantity: 1 })
                .collect(),
        }
    }

    fn demo_catalog() -> Vec<Product> {
        vec![
            product(1, "Electronics", "Acme", 100.0, 4.5),
            product(2, "Electronics", "Acme", 105.0, 4.6),
            product(3, "Electronics", "Brio", 220.0, 4.1),
            product(4, "Home", "Nest", 45.0, 4.8),
            product(5, "Home", "Nest", 48.0, 4.7),
            product(6, "Sports", "Peak", 80.0, 3.9),
            product(7, "Sports", "Peak", 85.0, 4.0),
            product(8, "Electronics", "Brio", 210.0, 4.2),
        ]
    }

    fn demo_orders() -> Vec<Order> {
        vec![order("o1", &[1, 2, 4]), order("o2", &[1, 2]), order("o3", &[1, 8]), order("o4", &[6, 7])]
    }

    fn engine() -> RecommendationEngine {
        RecommendationEngine::new(demo_catalog(), &demo_orders())
    }

    fn cart_item(catalog: &[Product], id: i64) -> CartItem {
        let product = catalog.iter().find(|p| p.id.0 == id).cloned().unwrap();
        CartItem { product_id: product.id, product, quantity: 1 }
    }

    fn ids(products: &[Product]) -> Vec<i64> {
        products.iter().map(|p| p.id.0).collect()
    }

    #[test]
    fn content_based_never_returns_self() {
        let engine = engine();

        for limit in [1, 4, 20] {
            let result = engine.content_based(ProductId(1), limit);
            assert!(!ids(&result).contains(&1));
            assert!(result.len() <= limit);
        }
    }

    #[test]
    fn content_based_ranks_closest_attributes_first() {
        let engine = engine();

        let result = engine.content_based(ProductId(1), 3);

        // Product 2 shares category, subcategory, brand, price band, rating.
        assert_eq!(ids(&result)[0], 2);
    }

    #[test]
    fn content_based_unknown_id_is_empty() {
        assert!(engine().content_based(ProductId(999), 5).is_empty());
    }

    #[test]
    fn collaborative_orders_by_co_purchase_frequency() {
        let engine = engine();

        let result = engine.collaborative(ProductId(1), 4);

        // 2 rode along twice; 4 and 8 once each, in first-observation order.
        assert_eq!(ids(&result), vec![2, 4, 8]);
    }

    #[test]
    fn collaborative_skips_out_of_stock() {
        let mut catalog = demo_catalog();
        catalog[1].stock = 0; // product 2
        let engine = RecommendationEngine::new(catalog, &demo_orders());

        let result = engine.collaborative(ProductId(1), 4);

        assert_eq!(ids(&result), vec![4, 8]);
    }

    #[test]
    fn cart_based_excludes_cart_contents() {
        let engine = engine();
        let catalog = demo_catalog();
        let ctx = ShopperContext {
            cart: vec![cart_item(&catalog, 1), cart_item(&catalog, 4)],
            ..ShopperContext::default()
        };

        let result = engine.cart_based(&ctx, 8);

        assert!(!ids(&result).contains(&1));
        assert!(!ids(&result).contains(&4));
        assert!(!result.is_empty());
    }

    #[test]
    fn basket_neighbors_union_dedups_across_seed_products() {
        let engine = engine();
        let catalog = demo_catalog();
        // Products 1 and 2 are near-twins, so their neighbor sets overlap
        // almost completely; the union must still be duplicate-free.
        let ctx = ShopperContext {
            cart: vec![cart_item(&catalog, 1), cart_item(&catalog, 2)],
            ..ShopperContext::default()
        };

        let result = engine.cart_based(&ctx, 8);

        let unique: HashSet<i64> = ids(&result).into_iter().collect();
        assert_eq!(unique.len(), result.len());
        assert!(!ids(&result).contains(&1));
        assert!(!ids(&result).contains(&2));

        let limited = engine.cart_based(&ctx, 2);
        assert_eq!(limited.len(), 2);
    }

    #[test]
    fn wishlist_based_excludes_wishlist_contents() {
        let engine = engine();
        let ctx = ShopperContext {
            wishlist: vec![ProductId(3), ProductId(8)],
            ..ShopperContext::default()
        };

        let result = engine.wishlist_based(&ctx, 8);

        assert!(!ids(&result).contains(&3));
        assert!(!ids(&result).contains(&8));
    }

    #[test]
    fn purchase_history_ranks_by_recommendation_count() {
        let engine = engine();
        // Products 1 and 3 both neighbor product 2 strongly; product 2
        // should accumulate two counts and lead.
        let ctx = ShopperContext {
            purchased: vec![ProductId(1), ProductId(3)],
            ..ShopperContext::default()
        };

        let result = engine.purchase_history_based(&ctx, 8);

        assert_eq!(ids(&result)[0], 2);
        assert!(!ids(&result).contains(&1));
        assert!(!ids(&result).contains(&3));
    }

    #[test]
    fn browsing_history_excludes_viewed_products() {
        let engine = engine();
        let mut ctx = ShopperContext::default();
        ctx.history.record_view(ProductId(1));
        ctx.history.record_view(ProductId(6));

        let result = engine.browsing_history_based(&ctx, 8);

        assert!(!ids(&result).contains(&1));
        assert!(!ids(&result).contains(&6));
        assert!(!result.is_empty());
    }

    #[test]
    fn personalized_is_deterministic_for_identical_context() {
        let engine = engine();
        let catalog = demo_catalog();
        let mut ctx = ShopperContext {
            cart: vec![cart_item(&catalog, 1)],
            wishlist: vec![ProductId(4)],
            purchased: vec![ProductId(6)],
            ..ShopperContext::default()
        };
        ctx.history.record_view(ProductId(3));

        let first = engine.personalized(&ctx, DEFAULT_PERSONALIZED_LIMIT);
        let second = engine.personalized(&ctx, DEFAULT_PERSONALIZED_LIMIT);

        assert_eq!(ids(&first), ids(&second));
    }

    #[test]
    fn personalized_has_unique_in_stock_results() {
        let mut catalog = demo_catalog();
        catalog[7].stock = 0; // product 8
        let engine = RecommendationEngine::new(catalog.clone(), &demo_orders());
        let mut ctx = ShopperContext {
            cart: vec![cart_item(&catalog, 1)],
            wishlist: vec![ProductId(4)],
            purchased: vec![ProductId(6)],
            ..ShopperContext::default()
        };
        ctx.history.record_view(ProductId(3));

        let result = engine.personalized(&ctx, DEFAULT_PERSONALIZED_LIMIT);

        let unique: HashSet<i64> = ids(&result).into_iter().collect();
        assert_eq!(unique.len(), result.len());
        assert!(result.iter().all(|p| p.stock > 0));
    }

    #[test]
    fn fresh_shopper_gets_exactly_the_trending_feed() {
        let engine = engine();
        let ctx = ShopperContext::default();

        let personalized = engine.personalized(&ctx, DEFAULT_PERSONALIZED_LIMIT);
        let trending = engine.trending(DEFAULT_PERSONALIZED_LIMIT, &HashSet::new());

        assert!(ctx.is_fresh());
        assert_eq!(ids(&personalized), ids(&trending));
    }

    #[test]
    fn multi_strategy_products_sum_their_weights() {
        let engine = engine();
        let catalog = demo_catalog();
        // Product 2 is the top neighbor of product 1 from both the cart and
        // the wishlist path, so it collects cart + wishlist weight and must
        // lead the feed.
        let ctx = ShopperContext {
            cart: vec![cart_item(&catalog, 1)],
            wishlist: vec![ProductId(3)],
            ..ShopperContext::default()
        };

        let result = engine.personalized(&ctx, DEFAULT_PERSONALIZED_LIMIT);

        assert_eq!(ids(&result)[0], 2);
    }

    #[test]
    fn similar_products_records_the_view_first() {
        let engine = engine();
        let mut ctx = ShopperContext::default();

        engine.similar_products(&mut ctx, ProductId(3), DEFAULT_SIMILAR_LIMIT);

        assert_eq!(ctx.history.entries(), &[ProductId(3)]);
    }

    #[test]
    fn similar_products_excludes_source_and_dedups() {
        let engine = engine();
        let mut ctx = ShopperContext::default();

        let result = engine.similar_products(&mut ctx, ProductId(1), DEFAULT_SIMILAR_LIMIT);

        assert!(!ids(&result).contains(&1));
        let unique: HashSet<i64> = ids(&result).into_iter().collect();
        assert_eq!(unique.len(), result.len());
    }

    #[test]
    fn similar_products_for_unknown_id_degrades_to_trending() {
        let engine = engine();
        let mut ctx = ShopperContext::default();
        let unknown = ProductId(999);

        let result = engine.similar_products(&mut ctx, unknown, 5);
        let fallback = engine.trending(5, &[unknown].into_iter().collect());

        assert_eq!(ids(&result), ids(&fallback));
    }

    #[test]
    fn empty_catalog_yields_empty_everywhere() {
        let engine = RecommendationEngine::new(Vec::new(), &[]);
        let mut ctx = ShopperContext::default();

        assert!(engine.personalized(&ctx, 12).is_empty());
        assert!(engine.similar_products(&mut ctx, ProductId(1), 8).is_empty());
        assert!(engine.trending(12, &HashSet::new()).is_empty());
    }

    #[test]
    fn collaborative_candidates_outrank_content_in_similar_products() {
        let engine = engine();
        let mut ctx = ShopperContext::default();

        // Product 4 (Home) reaches the rail only through co-purchase with
        // product 1; with collaborative weight 3.0 it must outrank pure
        // content candidates carrying 2.0.
        let result = engine.similar_products(&mut ctx, ProductId(1), DEFAULT_SIMILAR_LIMIT);
        let rail = ids(&result);

        let pos_4 = rail.iter().position(|&id| id == 4).expect("co-purchased product present");
        let pos_3 = rail.iter().position(|&id| id == 3).expect("content neighbor present");
        assert!(pos_4 < pos_3);
    }
}
