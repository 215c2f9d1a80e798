//! Storage seams for the recommendation engine.
//!
//! Each trait covers one slice of storefront state. SQLite-backed
//! implementations live alongside in-memory ones used by tests and
//! offline tooling.

use async_trait::async_trait;
use thiserror::Error;

use shopfront_core::{BrowsingHistory, CartItem, Order, Product, ProductId};

pub mod catalog;
pub mod memory;
pub mod order;
pub mod shopper;

pub use catalog::SqlCatalogRepository;
pub use memory::{InMemoryCatalogRepository, InMemoryOrderRepository, InMemoryShopperRepository};
pub use order::SqlOrderRepository;
pub use shopper::{SqlBrowsingHistoryRepository, SqlCartRepository, SqlWishlistRepository};

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("failed to decode stored value: {0}")]
    Decode(String),
}

#[async_trait]
pub trait CatalogRepository: Send + Sync {
    /// Every product in the catalog, in stable id order.
    async fn list_all(&self) -> Result<Vec<Product>, RepositoryError>;

    async fn find_by_id(&self, id: ProductId) -> Result<Option<Product>, RepositoryError>;
}

#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// All orders across every session, oldest first. Feeds the
    /// co-occurrence index.
    async fn list_all(&self) -> Result<Vec<Order>, RepositoryError>;

    /// Orders placed within one session, oldest first.
    async fn list_for_session(&self, session_id: &str) -> Result<Vec<Order>, RepositoryError>;
}

#[async_trait]
pub trait CartRepository: Send + Sync {
    /// Cart contents for a session, in the order items were added.
    async fn items(&self, session_id: &str) -> Result<Vec<CartItem>, RepositoryError>;
}

#[async_trait]
pub trait WishlistRepository: Send + Sync {
    /// Wishlisted product ids for a session, in the order they were saved.
    async fn product_ids(&self, session_id: &str) -> Result<Vec<ProductId>, RepositoryError>;
}

#[async_trait]
pub trait BrowsingHistoryRepository: Send + Sync {
    /// The session's recently-viewed list. A session with no stored
    /// history gets an empty one.
    async fn load(&self, session_id: &str) -> Result<BrowsingHistory, RepositoryError>;

    async fn save(
        &self,
        session_id: &str,
        history: &BrowsingHistory,
    ) -> Result<(), RepositoryError>;
}
