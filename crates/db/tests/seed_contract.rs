//! End-to-end contract over the seeded demo storefront: migrate, seed,
//! assemble the demo shopper's context, and check the engine's output
//! guarantees against real SQLite-backed repositories.

use std::collections::HashSet;

use shopfront_core::{ProductId, RecommendationEngine};
use shopfront_db::repositories::{
    BrowsingHistoryRepository, CatalogRepository, OrderRepository, SqlBrowsingHistoryRepository,
    SqlCartRepository, SqlCatalogRepository, SqlOrderRepository, SqlWishlistRepository,
};
use shopfront_db::{connect_with_settings, load_shopper_context, migrations, DbPool, DemoDataset, DEMO_SESSION};

async fn seeded_pool() -> DbPool {
    let pool = connect_with_settings("sqlite::memory:", 1, 5)
        .await
        .expect("in-memory sqlite connects");
    migrations::run_pending(&pool).await.expect("migrations apply");
    DemoDataset::load(&pool).await.expect("demo dataset seeds");
    pool
}

async fn engine_for(pool: &DbPool) -> RecommendationEngine {
    let catalog = SqlCatalogRepository::new(pool.clone())
        .list_all()
        .await
        .expect("catalog loads");
    let orders = SqlOrderRepository::new(pool.clone())
        .list_all()
        .await
        .expect("orders load");
    RecommendationEngine::new(catalog, &orders)
}

#[tokio::test]
async fn seeded_dataset_passes_verification() {
    let pool = seeded_pool().await;

    let result = DemoDataset::verify(&pool).await.expect("verification runs");
    assert!(result.all_passed(), "failed checks: {:?}", result.checks);

    pool.close().await;
}

#[tokio::test]
async fn seeding_twice_is_idempotent() {
    let pool = seeded_pool().await;

    let second = DemoDataset::load(&pool).await.expect("reseed succeeds");
    assert_eq!(second.products, 12);
    assert!(DemoDataset::verify(&pool).await.expect("verification runs").all_passed());

    pool.close().await;
}

#[tokio::test]
async fn demo_context_reflects_seeded_state() {
    let pool = seeded_pool().await;

    let cart = SqlCartRepository::new(pool.clone());
    let wishlist = SqlWishlistRepository::new(pool.clone());
    let orders = SqlOrderRepository::new(pool.clone());
    let history = SqlBrowsingHistoryRepository::new(pool.clone());

    let ctx = load_shopper_context(DEMO_SESSION, &cart, &wishlist, &orders, &history).await;

    assert_eq!(ctx.cart.len(), 2);
    assert_eq!(ctx.cart[0].product_id, ProductId(3));
    assert_eq!(ctx.cart[1].quantity, 2);
    assert_eq!(ctx.wishlist, vec![ProductId(5), ProductId(12)]);
    // Two demo orders: [1, 2] then [6].
    assert_eq!(ctx.purchased, vec![ProductId(1), ProductId(2), ProductId(6)]);
    assert_eq!(
        ctx.history.entries(),
        &[ProductId(4), ProductId(7), ProductId(2)]
    );

    pool.close().await;
}

#[tokio::test]
async fn personalized_output_is_unique_in_stock_and_deterministic() {
    let pool = seeded_pool().await;
    let engine = engine_for(&pool).await;

    let cart = SqlCartRepository::new(pool.clone());
    let wishlist = SqlWishlistRepository::new(pool.clone());
    let orders = SqlOrderRepository::new(pool.clone());
    let history = SqlBrowsingHistoryRepository::new(pool.clone());
    let ctx = load_shopper_context(DEMO_SESSION, &cart, &wishlist, &orders, &history).await;

    let picks = engine.personalized(&ctx, 12);
    assert!(!picks.is_empty());
    assert!(picks.len() <= 12);

    let mut seen = HashSet::new();
    for product in &picks {
        assert!(seen.insert(product.id), "duplicate recommendation {}", product.id);
        assert!(product.stock > 0, "out-of-stock recommendation {}", product.id);
    }

    let again = engine.personalized(&ctx, 12);
    let ids: Vec<ProductId> = picks.iter().map(|p| p.id).collect();
    let ids_again: Vec<ProductId> = again.iter().map(|p| p.id).collect();
    assert_eq!(ids, ids_again);

    pool.close().await;
}

#[tokio::test]
async fn similar_products_excludes_source_and_persists_the_view() {
    let pool = seeded_pool().await;
    let engine = engine_for(&pool).await;

    let cart = SqlCartRepository::new(pool.clone());
    let wishlist = SqlWishlistRepository::new(pool.clone());
    let orders = SqlOrderRepository::new(pool.clone());
    let history = SqlBrowsingHistoryRepository::new(pool.clone());
    let mut ctx = load_shopper_context(DEMO_SESSION, &cart, &wishlist, &orders, &history).await;

    let source = ProductId(1);
    let picks = engine.similar_products(&mut ctx, source, 8);

    assert!(!picks.is_empty());
    assert!(picks.iter().all(|p| p.id != source));
    assert_eq!(ctx.history.entries().first(), Some(&source));

    history.save(DEMO_SESSION, &ctx.history).await.expect("history persists");
    let reloaded = history.load(DEMO_SESSION).await.expect("history reloads");
    assert_eq!(reloaded.entries().first(), Some(&source));

    pool.close().await;
}

#[tokio::test]
async fn fresh_session_falls_back_to_trending() {
    let pool = seeded_pool().await;
    let engine = engine_for(&pool).await;

    let cart = SqlCartRepository::new(pool.clone());
    let wishlist = SqlWishlistRepository::new(pool.clone());
    let orders = SqlOrderRepository::new(pool.clone());
    let history = SqlBrowsingHistoryRepository::new(pool.clone());
    let ctx = load_shopper_context("first-visit", &cart, &wishlist, &orders, &history).await;
    assert!(ctx.is_fresh());

    let picks = engine.personalized(&ctx, 12);
    let trending = engine.trending(12, &HashSet::new());
    let ids: Vec<ProductId> = picks.iter().map(|p| p.id).collect();
    let trending_ids: Vec<ProductId> = trending.iter().map(|p| p.id).collect();
    assert_eq!(ids, trending_ids);

    pool.close().await;
}
