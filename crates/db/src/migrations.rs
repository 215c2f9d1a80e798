use sqlx::migrate::{MigrateError, Migrator};

use crate::DbPool;

pub static MIGRATOR: Migrator = sqlx::migrate!("../../migrations");

pub async fn run_pending(pool: &DbPool) -> Result<(), MigrateError> {
    MIGRATOR.run(pool).await
}

#[cfg(test)]
mod tests {
    use sqlx::Row;

    use super::run_pending;
    use crate::connect_with_settings;

    const MANAGED_SCHEMA_OBJECTS: &[&str] = &[
        "products",
        "orders",
        "order_lines",
        "cart_items",
        "wishlist_items",
        "browsing_history",
        "idx_orders_session_id",
        "idx_order_lines_product_id",
        "idx_products_category",
    ];

    #[tokio::test]
    async fn migrations_create_every_managed_object() {
        let pool = connect_with_settings("sqlite::memory:", 1, 5)
            .await
            .expect("in-memory sqlite connects");
        run_pending(&pool).await.expect("migrations apply");

        let rows = sqlx::query(
            "SELECT name FROM sqlite_master WHERE type IN ('table', 'index') \
             AND name NOT LIKE 'sqlite_%' AND name NOT LIKE '_sqlx_%'",
        )
        .fetch_all(&pool)
        .await
        .expect("schema objects are listable");

        let names: Vec<String> = rows.iter().map(|row| row.get::<String, _>("name")).collect();
        for expected in MANAGED_SCHEMA_OBJECTS {
            assert!(names.iter().any(|name| name == expected), "missing schema object {expected}");
        }

        pool.close().await;
    }

    #[tokio::test]
    async fn migrations_are_idempotent() {
        let pool = connect_with_settings("sqlite::memory:", 1, 5)
            .await
            .expect("in-memory sqlite connects");

        run_pending(&pool).await.expect("first run applies");
        run_pending(&pool).await.expect("second run is a no-op");

        pool.close().await;
    }
}
