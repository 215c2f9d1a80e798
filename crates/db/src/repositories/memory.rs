//! In-memory repositories for tests and offline tooling.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use shopfront_core::{BrowsingHistory, CartItem, Order, Product, ProductId};

use super::{
    BrowsingHistoryRepository, CartRepository, CatalogRepository, OrderRepository,
    RepositoryError, WishlistRepository,
};

#[derive(Default)]
pub struct InMemoryCatalogRepository {
    products: RwLock<Vec<Product>>,
}

impl InMemoryCatalogRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_products(products: Vec<Product>) -> Self {
        Self { products: RwLock::new(products) }
    }

    pub async fn insert(&self, product: Product) {
        self.products.write().await.push(product);
    }
}

#[async_trait]
impl CatalogRepository for InMemoryCatalogRepository {
    async fn list_all(&self) -> Result<Vec<Product>, RepositoryError> {
        Ok(self.products.read().await.clone())
    }

    async fn find_by_id(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        Ok(self.products.read().await.iter().find(|p| p.id == id).cloned())
    }
}

#[derive(Default)]
pub struct InMemoryOrderRepository {
    orders: RwLock<Vec<(String, Order)>>,
}

impl InMemoryOrderRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, session_id: &str, order: Order) {
        self.orders.write().await.push((session_id.to_owned(), order));
    }
}

#[async_trait]
impl OrderRepository for InMemoryOrderRepository {
    async fn list_all(&self) -> Result<Vec<Order>, RepositoryError> {
        Ok(self.orders.read().await.iter().map(|(_, order)| order.clone()).collect())
    }

    async fn list_for_session(&self, session_id: &str) -> Result<Vec<Order>, RepositoryError> {
        Ok(self
            .orders
            .read()
            .await
            .iter()
            .filter(|(session, _)| session == session_id)
            .map(|(_, order)| order.clone())
            .collect())
    }
}

/// One store covering cart, wishlist, and browsing history, keyed by session.
#[derive(Default)]
pub struct InMemoryShopperRepository {
    carts: RwLock<HashMap<String, Vec<CartItem>>>,
    wishlists: RwLock<HashMap<String, Vec<ProductId>>>,
    histories: RwLock<HashMap<String, BrowsingHistory>>,
}

impl InMemoryShopperRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn set_cart(&self, session_id: &str, items: Vec<CartItem>) {
        self.carts.write().await.insert(session_id.to_owned(), items);
    }

    pub async fn set_wishlist(&self, session_id: &str, ids: Vec<ProductId>) {
        self.wishlists.write().await.insert(session_id.to_owned(), ids);
    }
}

#[async_trait]
impl CartRepository for InMemoryShopperRepository {
    async fn items(&self, session_id: &str) -> Result<Vec<CartItem>, RepositoryError> {
        Ok(self.carts.read().await.get(session_id).cloned().unwrap_or_default())
    }
}

#[async_trait]
impl WishlistRepository for InMemoryShopperRepository {
    async fn product_ids(&self, session_id: &str) -> Result<Vec<ProductId>, RepositoryError> {
        Ok(self.wishlists.read().await.get(session_id).cloned().unwrap_or_default())
    }
}

#[async_trait]
impl BrowsingHistoryRepository for InMemoryShopperRepository {
    async fn load(&self, session_id: &str) -> Result<BrowsingHistory, RepositoryError> {
        Ok(self.histories.read().await.get(session_id).cloned().unwrap_or_default())
    }

    async fn save(
        &self,
        session_id: &str,
        history: &BrowsingHistory,
    ) -> Result<(), RepositoryError> {
        self.histories.write().await.insert(session_id.to_owned(), history.clone());
        Ok(())
    }
}
