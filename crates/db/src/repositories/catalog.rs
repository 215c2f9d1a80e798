use async_trait::async_trait;

use shopfront_core::{Product, ProductId};

use super::{CatalogRepository, RepositoryError};
use crate::DbPool;

pub struct SqlCatalogRepository {
    pool: DbPool,
}

impl SqlCatalogRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
pub(crate) struct ProductRow {
    pub id: i64,
    pub name: String,
    pub category: String,
    pub subcategory: String,
    pub brand: String,
    pub price: f64,
    pub rating: f64,
    pub review_count: i64,
    pub stock: i64,
}

impl ProductRow {
    pub(crate) fn into_product(self) -> Result<Product, RepositoryError> {
        let review_count = u32::try_from(self.review_count)
            .map_err(|_| RepositoryError::Decode(format!(
                "product {}: review_count {} out of range",
                self.id, self.review_count
            )))?;
        let stock = u32::try_from(self.stock).map_err(|_| {
            RepositoryError::Decode(format!("product {}: stock {} out of range", self.id, self.stock))
        })?;
        Ok(Product {
            id: ProductId(self.id),
            name: self.name,
            category: self.category,
            subcategory: self.subcategory,
            brand: self.brand,
            price: self.price,
            rating: self.rating,
            review_count,
            stock,
        })
    }
}

#[async_trait]
impl CatalogRepository for SqlCatalogRepository {
    async fn list_all(&self) -> Result<Vec<Product>, RepositoryError> {
        let rows: Vec<ProductRow> = sqlx::query_as(
            "SELECT id, name, category, subcategory, brand, price, rating, review_count, stock \
             FROM products ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(ProductRow::into_product).collect()
    }

    async fn find_by_id(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let row: Option<ProductRow> = sqlx::query_as(
            "SELECT id, name, category, subcategory, brand, price, rating, review_count, stock \
             FROM products WHERE id = ?",
        )
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await?;

        row.map(ProductRow::into_product).transpose()
    }
}
