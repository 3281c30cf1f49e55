//! Application state for shared services

use std::sync::Arc;

use crate::domain::order::{Order, OrderId, OrderPatch, OrderRepository};
use crate::domain::pagination::{Page, PageRequest};
use crate::domain::user::{PublicUser, UserId, UserPatch, UserRepository};
use crate::domain::DomainError;
use crate::infrastructure::auth::{
    AuthService, JwtService, LoginResult, PasswordHasher, RegisterRequest,
};
use crate::infrastructure::order::{CreateOrderRequest, OrderService};
use crate::infrastructure::user::UserService;

/// Application state containing shared services using dynamic dispatch
#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<dyn AuthServiceTrait>,
    pub user_service: Arc<dyn UserServiceTrait>,
    pub order_service: Arc<dyn OrderServiceTrait>,
    /// Token verification for the identity gate
    pub jwt_service: Arc<JwtService>,
}

#[async_trait::async_trait]
pub trait AuthServiceTrait: Send + Sync {
    async fn register(&self, request: RegisterRequest) -> Result<PublicUser, DomainError>;
    async fn login(&self, email: &str, password: &str) -> Result<LoginResult, DomainError>;
}

#[async_trait::async_trait]
pub trait UserServiceTrait: Send + Sync {
    async fn get(&self, id: UserId) -> Result<PublicUser, DomainError>;
    async fn list(&self, request: &PageRequest) -> Result<Page<PublicUser>, DomainError>;
    async fn update(
        &self,
        actor: UserId,
        id: UserId,
        patch: UserPatch,
    ) -> Result<PublicUser, DomainError>;
    async fn delete(&self, actor: UserId, id: UserId) -> Result<(), DomainError>;
    /// Store probe used by the readiness check
    async fn count_active(&self) -> Result<u64, DomainError>;
}

/// Order operations; `actor` is the gate identity, `owner` the route's user id
#[async_trait::async_trait]
pub trait OrderServiceTrait: Send + Sync {
    async fn list(&self, actor: UserId, owner: UserId) -> Result<Vec<Order>, DomainError>;
    async fn create(
        &self,
        actor: UserId,
        owner: UserId,
        request: CreateOrderRequest,
    ) -> Result<Order, DomainError>;
    async fn get(&self, actor: UserId, owner: UserId, id: OrderId)
        -> Result<Order, DomainError>;
    async fn update(
        &self,
        actor: UserId,
        owner: UserId,
        id: OrderId,
        patch: OrderPatch,
    ) -> Result<Order, DomainError>;
    async fn delete(&self, actor: UserId, owner: UserId, id: OrderId)
        -> Result<(), DomainError>;
}

#[async_trait::async_trait]
impl<R, H> AuthServiceTrait for AuthService<R, H>
where
    R: UserRepository + 'static,
    H: PasswordHasher + 'static,
{
    async fn register(&self, request: RegisterRequest) -> Result<PublicUser, DomainError> {
        AuthService::register(self, request).await
    }

    async fn login(&self, email: &str, password: &str) -> Result<LoginResult, DomainError> {
        AuthService::login(self, email, password).await
    }
}

#[async_trait::async_trait]
impl<R, H> UserServiceTrait for UserService<R, H>
where
    R: UserRepository + 'static,
    H: PasswordHasher + 'static,
{
    async fn get(&self, id: UserId) -> Result<PublicUser, DomainError> {
        UserService::get(self, id).await
    }

    async fn list(&self, request: &PageRequest) -> Result<Page<PublicUser>, DomainError> {
        UserService::list(self, request).await
    }

    async fn update(
        &self,
        actor: UserId,
        id: UserId,
        patch: UserPatch,
    ) -> Result<PublicUser, DomainError> {
        UserService::update(self, actor, id, patch).await
    }

    async fn delete(&self, actor: UserId, id: UserId) -> Result<(), DomainError> {
        UserService::delete(self, actor, id).await
    }

    async fn count_active(&self) -> Result<u64, DomainError> {
        UserService::count_active(self).await
    }
}

#[async_trait::async_trait]
impl<O, U> OrderServiceTrait for OrderService<O, U>
where
    O: OrderRepository + 'static,
    U: UserRepository + 'static,
{
    async fn list(&self, actor: UserId, owner: UserId) -> Result<Vec<Order>, DomainError> {
        OrderService::list(self, actor, owner).await
    }

    async fn create(
        &self,
        actor: UserId,
        owner: UserId,
        request: CreateOrderRequest,
    ) -> Result<Order, DomainError> {
        OrderService::create(self, actor, owner, request).await
    }

    async fn get(
        &self,
        actor: UserId,
        owner: UserId,
        id: OrderId,
    ) -> Result<Order, DomainError> {
        OrderService::get(self, actor, owner, id).await
    }

    async fn update(
        &self,
        actor: UserId,
        owner: UserId,
        id: OrderId,
        patch: OrderPatch,
    ) -> Result<Order, DomainError> {
        OrderService::update(self, actor, owner, id, patch).await
    }

    async fn delete(
        &self,
        actor: UserId,
        owner: UserId,
        id: OrderId,
    ) -> Result<(), DomainError> {
        OrderService::delete(self, actor, owner, id).await
    }
}
