//! In-memory order repository implementation

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::order::{NewOrder, Order, OrderId, OrderRepository};
use crate::domain::user::UserId;
use crate::domain::DomainError;

#[derive(Debug, Default)]
struct OrderTable {
    orders: BTreeMap<OrderId, Order>,
    last_id: i64,
}

/// In-memory implementation of OrderRepository
#[derive(Debug, Default, Clone)]
pub struct InMemoryOrderRepository {
    table: Arc<RwLock<OrderTable>>,
}

impl InMemoryOrderRepository {
    /// Create a new empty repository
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl OrderRepository for InMemoryOrderRepository {
    async fn insert(&self, order: NewOrder) -> Result<OrderId, DomainError> {
        let mut table = self.table.write().await;

        table.last_id += 1;
        let id = OrderId::new(table.last_id);
        table.orders.insert(id, Order::from_new(id, order));

        Ok(id)
    }

    async fn find_by_id(&self, id: OrderId) -> Result<Option<Order>, DomainError> {
        let table = self.table.read().await;
        Ok(table.orders.get(&id).filter(|o| o.is_active()).cloned())
    }

    async fn list_by_user(&self, user_id: UserId) -> Result<Vec<Order>, DomainError> {
        let table = self.table.read().await;

        Ok(table
            .orders
            .values()
            .filter(|o| o.is_active() && o.is_owned_by(user_id))
            .cloned()
            .collect())
    }

    async fn update(&self, order: &Order) -> Result<(), DomainError> {
        let mut table = self.table.write().await;

        match table.orders.get_mut(&order.id()) {
            Some(existing) if existing.is_active() => {
                *existing = order.clone();
                Ok(())
            }
            _ => Err(DomainError::not_found(format!(
                "Order '{}' not found",
                order.id()
            ))),
        }
    }

    async fn soft_delete(&self, id: OrderId) -> Result<(), DomainError> {
        let mut table = self.table.write().await;

        match table.orders.get_mut(&id) {
            Some(existing) if existing.is_active() => {
                existing.mark_deleted();
                Ok(())
            }
            _ => Err(DomainError::not_found(format!("Order '{}' not found", id))),
        }
    }
}
