use async_trait::async_trait;
use chrono::{DateTime, Utc};

use shopfront_core::{Order, OrderId, OrderLine, ProductId};

use super::{OrderRepository, RepositoryError};
use crate::DbPool;

pub struct SqlOrderRepository {
    pool: DbPool,
}

impl SqlOrderRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    async fn fetch(&self, session_id: Option<&str>) -> Result<Vec<Order>, RepositoryError> {
        let sql = if session_id.is_some() {
            "SELECT o.id AS order_id, o.placed_at, l.product_id, l.quantity \
             FROM orders o JOIN order_lines l ON l.order_id = o.id \
             WHERE o.session_id = ? \
             ORDER BY o.placed_at, o.id, l.line_no"
        } else {
            "SELECT o.id AS order_id, o.placed_at, l.product_id, l.quantity \
             FROM orders o JOIN order_lines l ON l.order_id = o.id \
             ORDER BY o.placed_at, o.id, l.line_no"
        };

        let mut query = sqlx::query_as::<_, OrderLineRow>(sql);
        if let Some(session) = session_id {
            query = query.bind(session.to_owned());
        }
        let rows = query.fetch_all(&self.pool).await?;

        let mut orders: Vec<Order> = Vec::new();
        for row in rows {
            let line = row.line()?;
            match orders.last_mut() {
                Some(order) if order.id.0 == row.order_id => order.lines.push(line),
                _ => orders.push(Order {
                    id: OrderId(row.order_id),
                    placed_at: row.placed_at,
                    lines: vec![line],
                }),
            }
        }
        Ok(orders)
    }
}

#[derive(sqlx::FromRow)]
struct OrderLineRow {
    order_id: String,
    placed_at: DateTime<Utc>,
    product_id: i64,
    quantity: i64,
}

impl OrderLineRow {
    fn line(&self) -> Result<OrderLine, RepositoryError> {
        let quantity = u32::try_from(self.quantity).map_err(|_| {
            RepositoryError::Decode(format!(
                "order {}: quantity {} out of range",
                self.order_id, self.quantity
            ))
        })?;
        Ok(OrderLine { product_id: ProductId(self.product_id), quantity })
    }
}

#[async_trait]
impl OrderRepository for SqlOrderRepository {
    async fn list_all(&self) -> Result<Vec<Order>, RepositoryError> {
        self.fetch(None).await
    }

    async fn list_for_session(&self, session_id: &str) -> Result<Vec<Order>, RepositoryError> {
        self.fetch(Some(session_id)).await
    }
}
