//! Order repository trait

use async_trait::async_trait;

#[cfg(test)]
use mockall::automock;

use super::entity::{NewOrder, Order, OrderId};
use crate::domain::user::UserId;
use crate::domain::DomainError;

/// Persistence for orders. Lookups only see `Active` orders.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait OrderRepository: Send + Sync {
    async fn insert(&self, order: NewOrder) -> Result<OrderId, DomainError>;

    async fn find_by_id(&self, id: OrderId) -> Result<Option<Order>, DomainError>;

    /// Active orders of one user, oldest first
    async fn list_by_user(&self, user_id: UserId) -> Result<Vec<Order>, DomainError>;

    async fn update(&self, order: &Order) -> Result<(), DomainError>;

    async fn soft_delete(&self, id: OrderId) -> Result<(), DomainError>;
}
