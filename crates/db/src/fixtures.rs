//! Deterministic demo dataset for local development and contract tests.
//!
//! Seeding is idempotent: managed rows are replaced wholesale, so a
//! reseed always lands the same storefront regardless of prior state.

use chrono::{DateTime, TimeDelta, Utc};
use sqlx::Row;

use crate::repositories::RepositoryError;
use crate::DbPool;

/// Session id that carries the seeded cart, wishlist, and history.
pub const DEMO_SESSION: &str = "demo-shopper";

struct ProductSeed {
    id: i64,
    name: &'static str,
    category: &'static str,
    subcategory: &'static str,
    brand: &'static str,
    price: f64,
    rating: f64,
    review_count: i64,
    stock: i64,
}

const PRODUCT_SEEDS: &[ProductSeed] = &[
    ProductSeed { id: 1, name: "Aurora Wireless Headphones", category: "Electronics", subcategory: "Audio", brand: "Auralis", price: 129.99, rating: 4.6, review_count: 842, stock: 34 },
    ProductSeed { id: 2, name: "Aurora Earbuds", category: "Electronics", subcategory: "Audio", brand: "Auralis", price: 89.99, rating: 4.4, review_count: 1211, stock: 58 },
    ProductSeed { id: 3, name: "Voltix Soundbar", category: "Electronics", subcategory: "Audio", brand: "Voltix", price: 199.99, rating: 4.2, review_count: 310, stock: 12 },
    ProductSeed { id: 4, name: "Voltix 4K Streaming Stick", category: "Electronics", subcategory: "Video", brand: "Voltix", price: 49.99, rating: 4.1, review_count: 2034, stock: 77 },
    ProductSeed { id: 5, name: "Voltix LED Monitor", category: "Electronics", subcategory: "Video", brand: "Voltix", price: 239.0, rating: 4.5, review_count: 156, stock: 9 },
    ProductSeed { id: 6, name: "Nestwell Pour-Over Kettle", category: "Home", subcategory: "Kitchen", brand: "Nestwell", price: 64.5, rating: 4.7, review_count: 98, stock: 21 },
    ProductSeed { id: 7, name: "Nestwell Chef Knife", category: "Home", subcategory: "Kitchen", brand: "Nestwell", price: 79.0, rating: 4.8, review_count: 412, stock: 15 },
    ProductSeed { id: 8, name: "Nestwell Linen Throw", category: "Home", subcategory: "Decor", brand: "Nestwell", price: 39.0, rating: 4.0, review_count: 67, stock: 0 },
    ProductSeed { id: 9, name: "Peakline Trail Bottle", category: "Sports", subcategory: "Hydration", brand: "Peakline", price: 24.0, rating: 4.3, review_count: 530, stock: 102 },
    ProductSeed { id: 10, name: "Peakline Running Cap", category: "Sports", subcategory: "Apparel", brand: "Peakline", price: 19.5, rating: 3.9, review_count: 88, stock: 44 },
    ProductSeed { id: 11, name: "Auralis Studio Mic", category: "Electronics", subcategory: "Audio", brand: "Auralis", price: 149.0, rating: 4.5, review_count: 201, stock: 7 },
    ProductSeed { id: 12, name: "Peakline Trail Pack", category: "Sports", subcategory: "Hydration", brand: "Peakline", price: 89.0, rating: 4.6, review_count: 149, stock: 18 },
];

struct OrderSeed {
    id: &'static str,
    session: &'static str,
    day_offset: i64,
    lines: &'static [i64],
}

const ORDER_SEEDS: &[OrderSeed] = &[
    OrderSeed { id: "ord-1001", session: DEMO_SESSION, day_offset: 0, lines: &[1, 2] },
    OrderSeed { id: "ord-1002", session: "s-berlin", day_offset: 1, lines: &[1, 2, 11] },
    OrderSeed { id: "ord-1003", session: "s-tokyo", day_offset: 2, lines: &[1, 11] },
    OrderSeed { id: "ord-1004", session: "s-lisbon", day_offset: 3, lines: &[6, 7] },
    OrderSeed { id: "ord-1005", session: "s-berlin", day_offset: 4, lines: &[9, 12] },
    OrderSeed { id: "ord-1006", session: DEMO_SESSION, day_offset: 5, lines: &[6] },
];

const DEMO_CART: &[(i64, i64)] = &[(3, 1), (9, 2)];
const DEMO_WISHLIST: &[i64] = &[5, 12];
/// Most-recent-first, matching the stored representation.
const DEMO_HISTORY: &[i64] = &[4, 7, 2];

fn seed_timestamp(day_offset: i64) -> DateTime<Utc> {
    // Fixed base date so reseeds reproduce identical rows.
    DateTime::UNIX_EPOCH + TimeDelta::days(20_000 + day_offset)
}

#[derive(Debug)]
pub struct SeedResult {
    pub products: usize,
    pub orders: usize,
    pub cart_items: usize,
    pub wishlist_items: usize,
}

#[derive(Debug)]
pub struct VerificationResult {
    pub checks: Vec<(String, bool)>,
}

impl VerificationResult {
    pub fn all_passed(&self) -> bool {
        self.checks.iter().all(|(_, passed)| *passed)
    }
}

pub struct DemoDataset;

impl DemoDataset {
    pub async fn load(pool: &DbPool) -> Result<SeedResult, RepositoryError> {
        let mut tx = pool.begin().await?;

        sqlx::query("DELETE FROM browsing_history").execute(&mut *tx).await?;
        sqlx::query("DELETE FROM wishlist_items").execute(&mut *tx).await?;
        sqlx::query("DELETE FROM cart_items").execute(&mut *tx).await?;
        sqlx::query("DELETE FROM order_lines").execute(&mut *tx).await?;
        sqlx::query("DELETE FROM orders").execute(&mut *tx).await?;
        sqlx::query("DELETE FROM products").execute(&mut *tx).await?;

        for seed in PRODUCT_SEEDS {
            sqlx::query(
                "INSERT INTO products \
                 (id, name, category, subcategory, brand, price, rating, review_count, stock) \
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
            )
            .bind(seed.id)
            .bind(seed.name)
            .bind(seed.category)
            .bind(seed.subcategory)
            .bind(seed.brand)
            .bind(seed.price)
            .bind(seed.rating)
            .bind(seed.review_count)
            .bind(seed.stock)
            .execute(&mut *tx)
            .await?;
        }

        for seed in ORDER_SEEDS {
            sqlx::query("INSERT INTO orders (id, session_id, placed_at) VALUES (?, ?, ?)")
                .bind(seed.id)
                .bind(seed.session)
                .bind(seed_timestamp(seed.day_offset))
                .execute(&mut *tx)
                .await?;

            for (line_no, product_id) in seed.lines.iter().enumerate() {
                sqlx::query(
                    "INSERT INTO order_lines (order_id, line_no, product_id, quantity) \
                     VALUES (?, ?, ?, 1)",
                )
                .bind(seed.id)
                .bind(line_no as i64)
                .bind(*product_id)
                .execute(&mut *tx)
                .await?;
            }
        }

        for (position, (product_id, quantity)) in DEMO_CART.iter().enumerate() {
            sqlx::query(
                "INSERT INTO cart_items (session_id, position, product_id, quantity) \
                 VALUES (?, ?, ?, ?)",
            )
            .bind(DEMO_SESSION)
            .bind(position as i64)
            .bind(*product_id)
            .bind(*quantity)
            .execute(&mut *tx)
            .await?;
        }

        for (position, product_id) in DEMO_WISHLIST.iter().enumerate() {
            sqlx::query(
                "INSERT INTO wishlist_items (session_id, position, product_id) VALUES (?, ?, ?)",
            )
            .bind(DEMO_SESSION)
            .bind(position as i64)
            .bind(*product_id)
            .execute(&mut *tx)
            .await?;
        }

        let entries = serde_json::to_string(DEMO_HISTORY)
            .map_err(|err| RepositoryError::Decode(format!("demo history: {err}")))?;
        sqlx::query(
            "INSERT INTO browsing_history (session_id, entries, updated_at) VALUES (?, ?, ?)",
        )
        .bind(DEMO_SESSION)
        .bind(entries)
        .bind(seed_timestamp(6))
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(SeedResult {
            products: PRODUCT_SEEDS.len(),
            orders: ORDER_SEEDS.len(),
            cart_items: DEMO_CART.len(),
            wishlist_items: DEMO_WISHLIST.len(),
        })
    }

    pub async fn verify(pool: &DbPool) -> Result<VerificationResult, RepositoryError> {
        let mut checks = Vec::new();

        let products: i64 = count(pool, "products").await?;
        checks.push(("product catalog seeded".to_owned(), products == PRODUCT_SEEDS.len() as i64));

        let orders: i64 = count(pool, "orders").await?;
        checks.push(("order history seeded".to_owned(), orders == ORDER_SEEDS.len() as i64));

        let in_stock: i64 =
            sqlx::query("SELECT COUNT(*) AS n FROM products WHERE stock > 0")
                .fetch_one(pool)
                .await?
                .get("n");
        checks.push(("catalog has in-stock products".to_owned(), in_stock > 0));

        let cart: i64 =
            sqlx::query("SELECT COUNT(*) AS n FROM cart_items WHERE session_id = ?")
                .bind(DEMO_SESSION)
                .fetch_one(pool)
                .await?
                .get("n");
        checks.push(("demo cart present".to_owned(), cart == DEMO_CART.len() as i64));

        let history: Option<(String,)> = sqlx::query_as(
            "SELECT entries FROM browsing_history WHERE session_id = ?",
        )
        .bind(DEMO_SESSION)
        .fetch_optional(pool)
        .await?;
        let history_ok = history
            .map(|(entries,)| serde_json::from_str::<Vec<i64>>(&entries).is_ok())
            .unwrap_or(false);
        checks.push(("demo browsing history decodes".to_owned(), history_ok));

        Ok(VerificationResult { checks })
    }
}

async fn count(pool: &DbPool, table: &str) -> Result<i64, RepositoryError> {
    // Table names come from the fixed list above, never from input.
    let row = sqlx::query(&format!("SELECT COUNT(*) AS n FROM {table}"))
        .fetch_one(pool)
        .await?;
    Ok(row.get("n"))
}
