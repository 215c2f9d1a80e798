//! Assembles the per-session shopper snapshot the engine scores against.
//!
//! Each source is read independently. A failing source degrades to its
//! empty value with a warning instead of failing the whole request, so a
//! broken wishlist read still leaves cart-driven recommendations intact.

use std::collections::HashSet;

use tracing::warn;

use shopfront_core::{BrowsingHistory, ProductId, ShopperContext};

use crate::repositories::{
    BrowsingHistoryRepository, CartRepository, OrderRepository, WishlistRepository,
};

pub async fn load_shopper_context(
    session_id: &str,
    cart: &dyn CartRepository,
    wishlist: &dyn WishlistRepository,
    orders: &dyn OrderRepository,
    history: &dyn BrowsingHistoryRepository,
) -> ShopperContext {
    let cart = match cart.items(session_id).await {
        Ok(items) => items,
        Err(error) => {
            warn!(%session_id, %error, "cart unavailable, scoring without it");
            Vec::new()
        }
    };

    let wishlist = match wishlist.product_ids(session_id).await {
        Ok(ids) => ids,
        Err(error) => {
            warn!(%session_id, %error, "wishlist unavailable, scoring without it");
            Vec::new()
        }
    };

    let purchased = match orders.list_for_session(session_id).await {
        Ok(orders) => {
            // Unique product ids in first-purchase order.
            let mut seen: HashSet<ProductId> = HashSet::new();
            let mut ids = Vec::new();
            for order in &orders {
                for line in &order.lines {
                    if seen.insert(line.product_id) {
                        ids.push(line.product_id);
                    }
                }
            }
            ids
        }
        Err(error) => {
            warn!(%session_id, %error, "purchase history unavailable, scoring without it");
            Vec::new()
        }
    };

    let history = match history.load(session_id).await {
        Ok(history) => history,
        Err(error) => {
            warn!(%session_id, %error, "browsing history unavailable, scoring without it");
            BrowsingHistory::default()
        }
    };

    ShopperContext { cart, wishlist, purchased, history }
}
