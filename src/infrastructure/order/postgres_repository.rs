//! PostgreSQL order repository

use std::time::Duration;

use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgRow};
use sqlx::Row;

use crate::domain::order::{NewOrder, Order, OrderId, OrderRepository};
use crate::domain::user::UserId;
use crate::domain::{DomainError, RecordStatus};
use crate::infrastructure::storage::{bounded, storage_error};

const ORDER_COLUMNS: &str = "id, user_id, product, quantity, price, status, created_at, updated_at";

/// OrderRepository backed by the `orders` table
#[derive(Debug, Clone)]
pub struct PostgresOrderRepository {
    pool: PgPool,
    query_timeout: Duration,
}

impl PostgresOrderRepository {
    pub fn new(pool: PgPool, query_timeout: Duration) -> Self {
        Self {
            pool,
            query_timeout,
        }
    }
}

fn row_to_order(row: &PgRow) -> Result<Order, DomainError> {
    let decode = |e: sqlx::Error| storage_error("decode order row", e);

    let status: String = row.try_get("status").map_err(decode)?;

    Ok(Order::from_parts(
        OrderId::new(row.try_get("id").map_err(decode)?),
        UserId::new(row.try_get("user_id").map_err(decode)?),
        row.try_get("product").map_err(decode)?,
        row.try_get("quantity").map_err(decode)?,
        row.try_get("price").map_err(decode)?,
        RecordStatus::from_stored(&status),
        row.try_get("created_at").map_err(decode)?,
        row.try_get("updated_at").map_err(decode)?,
    ))
}

#[async_trait]
impl OrderRepository for PostgresOrderRepository {
    async fn insert(&self, order: NewOrder) -> Result<OrderId, DomainError> {
        bounded(self.query_timeout, "insert order", async {
            let row = sqlx::query(
                r#"
                INSERT INTO orders (user_id, product, quantity, price, status, created_at, updated_at)
                VALUES ($1, $2, $3, $4, $5, $6, $6)
                RETURNING id
                "#,
            )
            .bind(order.user_id.value())
            .bind(&order.product)
            .bind(order.quantity)
            .bind(order.price)
            .bind(RecordStatus::Active.as_str())
            .bind(order.created_at)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| storage_error("insert order", e))?;

            row.try_get::<i64, _>("id")
                .map(OrderId::new)
                .map_err(|e| storage_error("insert order", e))
        })
        .await
    }

    async fn find_by_id(&self, id: OrderId) -> Result<Option<Order>, DomainError> {
        bounded(self.query_timeout, "find order", async {
            let sql = format!(
                "SELECT {} FROM orders WHERE id = $1 AND status = 'active'",
                ORDER_COLUMNS
            );

            let row = sqlx::query(&sql)
                .bind(id.value())
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| storage_error("find order", e))?;

            row.map(|r| row_to_order(&r)).transpose()
        })
        .await
    }

    async fn list_by_user(&self, user_id: UserId) -> Result<Vec<Order>, DomainError> {
        bounded(self.query_timeout, "list orders", async {
            let sql = format!(
                "SELECT {} FROM orders WHERE user_id = $1 AND status = 'active' ORDER BY id",
                ORDER_COLUMNS
            );

            let rows = sqlx::query(&sql)
                .bind(user_id.value())
                .fetch_all(&self.pool)
                .await
                .map_err(|e| storage_error("list orders", e))?;

            rows.iter().map(row_to_order).collect()
        })
        .await
    }

    async fn update(&self, order: &Order) -> Result<(), DomainError> {
        bounded(self.query_timeout, "update order", async {
            let done = sqlx::query(
                r#"
                UPDATE orders
                SET product = $2, quantity = $3, price = $4, updated_at = $5
                WHERE id = $1 AND status = 'active'
                "#,
            )
            .bind(order.id().value())
            .bind(order.product())
            .bind(order.quantity())
            .bind(order.price())
            .bind(order.updated_at())
            .execute(&self.pool)
            .await
            .map_err(|e| storage_error("update order", e))?;

            if done.rows_affected() == 0 {
                return Err(DomainError::not_found(format!(
                    "Order '{}' not found",
                    order.id()
                )));
            }

            Ok(())
        })
        .await
    }

    async fn soft_delete(&self, id: OrderId) -> Result<(), DomainError> {
        bounded(self.query_timeout, "delete order", async {
            let done = sqlx::query(
                "UPDATE orders SET status = $2, updated_at = NOW() WHERE id = $1 AND status = 'active'",
            )
            .bind(id.value())
            .bind(RecordStatus::Deleted.as_str())
            .execute(&self.pool)
            .await
            .map_err(|e| storage_error("delete order", e))?;

            if done.rows_affected() == 0 {
                return Err(DomainError::not_found(format!("Order '{}' not found", id)));
            }

            Ok(())
        })
        .await
    }
}
