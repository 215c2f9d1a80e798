pub mod config;
pub mod doctor;
pub mod migrate;
pub mod recommend;
pub mod seed;
pub mod similar;
pub mod trending;

use serde::Serialize;

use shopfront_core::config::AppConfig;
use shopfront_core::{Product, RecommendationEngine, ShopperContext};
use shopfront_db::repositories::{
    CatalogRepository, OrderRepository, SqlBrowsingHistoryRepository, SqlCartRepository,
    SqlCatalogRepository, SqlOrderRepository, SqlWishlistRepository,
};
use shopfront_db::{connect, load_shopper_context, DbPool};

#[derive(Debug, Clone)]
pub struct CommandResult {
    pub exit_code: u8,
    pub output: String,
}

#[derive(Debug, Serialize)]
struct CommandOutcome {
    command: String,
    status: String,
    error_class: Option<String>,
    message: String,
}

impl CommandResult {
    pub fn success(command: &str, message: impl Into<String>) -> Self {
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "ok".to_string(),
            error_class: None,
            message: message.into(),
        };
        Self { exit_code: 0, output: serialize_payload(payload) }
    }

    pub fn failure(
        command: &str,
        error_class: &str,
        message: impl Into<String>,
        exit_code: u8,
    ) -> Self {
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "error".to_string(),
            error_class: Some(error_class.to_string()),
            message: message.into(),
        };
        Self { exit_code, output: serialize_payload(payload) }
    }
}

fn serialize_payload(payload: CommandOutcome) -> String {
    serde_json::to_string(&payload).unwrap_or_else(|error| {
        format!(
            "{{\"command\":\"unknown\",\"status\":\"error\",\"error_class\":\"serialization\",\"message\":\"{}\"}}",
            error.to_string().replace('\\', "\\\\").replace('"', "\\\"")
        )
    })
}

pub(crate) type CommandFailure = (&'static str, String, u8);

pub(crate) struct Storefront {
    pub pool: DbPool,
    pub engine: RecommendationEngine,
}

/// Connects, loads the catalog and order history, and builds the engine
/// with the configured strategy weights.
pub(crate) async fn open_storefront(config: &AppConfig) -> Result<Storefront, CommandFailure> {
    let pool = connect(&config.database)
        .await
        .map_err(|error| ("db_connectivity", error.to_string(), 4u8))?;

    let catalog = SqlCatalogRepository::new(pool.clone())
        .list_all()
        .await
        .map_err(|error| ("catalog_read", error.to_string(), 5u8))?;
    let orders = SqlOrderRepository::new(pool.clone())
        .list_all()
        .await
        .map_err(|error| ("order_read", error.to_string(), 5u8))?;

    let engine =
        RecommendationEngine::with_weights(catalog, &orders, config.recommendations.weights);
    Ok(Storefront { pool, engine })
}

pub(crate) async fn session_context(pool: &DbPool, session: &str) -> ShopperContext {
    let cart = SqlCartRepository::new(pool.clone());
    let wishlist = SqlWishlistRepository::new(pool.clone());
    let orders = SqlOrderRepository::new(pool.clone());
    let history = SqlBrowsingHistoryRepository::new(pool.clone());
    load_shopper_context(session, &cart, &wishlist, &orders, &history).await
}

pub(crate) fn render_products(products: &[Product]) -> String {
    products
        .iter()
        .enumerate()
        .map(|(index, product)| {
            format!(
                "{:>2}. {} [{}/{}] {} ${:.2}",
                index + 1,
                product.name,
                product.category,
                product.subcategory,
                product.brand,
                product.price
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use shopfront_core::ProductId;

    use super::*;

    #[test]
    fn success_envelope_has_ok_status_and_no_error_class() {
        let result = CommandResult::success("recommend", "3 picks");
        assert_eq!(result.exit_code, 0);

        let value: serde_json::Value = serde_json::from_str(&result.output).unwrap();
        assert_eq!(value["command"], "recommend");
        assert_eq!(value["status"], "ok");
        assert!(value["error_class"].is_null());
        assert_eq!(value["message"], "3 picks");
    }

    #[test]
    fn failure_envelope_carries_error_class_and_exit_code() {
        let result = CommandResult::failure("migrate", "db_connectivity", "no such file", 4);
        assert_eq!(result.exit_code, 4);

        let value: serde_json::Value = serde_json::from_str(&result.output).unwrap();
        assert_eq!(value["status"], "error");
        assert_eq!(value["error_class"], "db_connectivity");
    }

    #[test]
    fn rendered_product_lines_are_numbered() {
        let products = vec![Product {
            id: ProductId(3),
            name: "Voltix Soundbar".to_owned(),
            category: "Electronics".to_owned(),
            subcategory: "Audio".to_owned(),
            brand: "Voltix".to_owned(),
            price: 199.99,
            rating: 4.2,
            review_count: 310,
            stock: 12,
        }];

        let rendered = render_products(&products);
        assert_eq!(rendered, " 1. Voltix Soundbar [Electronics/Audio] Voltix $199.99");
    }
}
