//! Per-session shopper state: cart, wishlist, and browsing history.

use async_trait::async_trait;
use chrono::Utc;

use shopfront_core::{BrowsingHistory, CartItem, ProductId};

use super::catalog::ProductRow;
use super::{BrowsingHistoryRepository, CartRepository, RepositoryError, WishlistRepository};
use crate::DbPool;

pub struct SqlCartRepository {
    pool: DbPool,
}

impl SqlCartRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct CartRow {
    quantity: i64,
    #[sqlx(flatten)]
    product: ProductRow,
}

#[async_trait]
impl CartRepository for SqlCartRepository {
    async fn items(&self, session_id: &str) -> Result<Vec<CartItem>, RepositoryError> {
        let rows: Vec<CartRow> = sqlx::query_as(
            "SELECT c.quantity, p.id, p.name, p.category, p.subcategory, p.brand, \
                    p.price, p.rating, p.review_count, p.stock \
             FROM cart_items c JOIN products p ON p.id = c.product_id \
             WHERE c.session_id = ? ORDER BY c.position",
        )
        .bind(session_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|row| {
                let quantity = u32::try_from(row.quantity).map_err(|_| {
                    RepositoryError::Decode(format!(
                        "cart for {session_id}: quantity {} out of range",
                        row.quantity
                    ))
                })?;
                let product = row.product.into_product()?;
                Ok(CartItem { product_id: product.id, product, quantity })
            })
            .collect()
    }
}

pub struct SqlWishlistRepository {
    pool: DbPool,
}

impl SqlWishlistRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl WishlistRepository for SqlWishlistRepository {
    async fn product_ids(&self, session_id: &str) -> Result<Vec<ProductId>, RepositoryError> {
        let rows: Vec<(i64,)> = sqlx::query_as(
            "SELECT product_id FROM wishlist_items WHERE session_id = ? ORDER BY position",
        )
        .bind(session_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|(id,)| ProductId(id)).collect())
    }
}

pub struct SqlBrowsingHistoryRepository {
    pool: DbPool,
}

impl SqlBrowsingHistoryRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BrowsingHistoryRepository for SqlBrowsingHistoryRepository {
    async fn load(&self, session_id: &str) -> Result<BrowsingHistory, RepositoryError> {
        let row: Option<(String,)> = sqlx::query_as(
            "SELECT entries FROM browsing_history WHERE session_id = ?",
        )
        .bind(session_id)
        .fetch_optional(&self.pool)
        .await?;

        let Some((entries,)) = row else {
            return Ok(BrowsingHistory::default());
        };
        let ids: Vec<ProductId> = serde_json::from_str(&entries).map_err(|err| {
            RepositoryError::Decode(format!("browsing history for {session_id}: {err}"))
        })?;
        Ok(BrowsingHistory::from_entries(ids))
    }

    async fn save(
        &self,
        session_id: &str,
        history: &BrowsingHistory,
    ) -> Result<(), RepositoryError> {
        let entries = serde_json::to_string(history.entries()).map_err(|err| {
            RepositoryError::Decode(format!("browsing history for {session_id}: {err}"))
        })?;

        sqlx::query(
            "INSERT INTO browsing_history (session_id, entries, updated_at) VALUES (?, ?, ?) \
             ON CONFLICT(session_id) DO UPDATE SET entries = excluded.entries, \
             updated_at = excluded.updated_at",
        )
        .bind(session_id)
        .bind(entries)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
