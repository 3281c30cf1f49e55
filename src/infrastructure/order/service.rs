//! Order service with ownership checks

use std::sync::Arc;

use crate::domain::order::{
    validate_price, validate_product, validate_quantity, NewOrder, Order, OrderId, OrderPatch,
    OrderRepository,
};
use crate::domain::user::{UserId, UserRepository};
use crate::domain::DomainError;

/// Request for placing an order
#[derive(Debug, Clone)]
pub struct CreateOrderRequest {
    pub product: String,
    pub quantity: i32,
    pub price: f64,
}

/// Order service
///
/// Every operation takes the gate-resolved `actor` and the `owner` from the
/// route. A mismatch is rejected before storage is touched, so the response
/// never reveals whether another user's order exists.
#[derive(Debug)]
pub struct OrderService<O: OrderRepository, U: UserRepository> {
    orders: Arc<O>,
    users: Arc<U>,
}

impl<O: OrderRepository, U: UserRepository> OrderService<O, U> {
    pub fn new(orders: Arc<O>, users: Arc<U>) -> Self {
        Self { orders, users }
    }

    async fn ensure_owner_exists(&self, owner: UserId) -> Result<(), DomainError> {
        match self.users.find_by_id(owner).await? {
            Some(_) => Ok(()),
            None => Err(DomainError::not_found(format!("User '{}' not found", owner))),
        }
    }

    async fn load_owned(&self, owner: UserId, id: OrderId) -> Result<Order, DomainError> {
        let order = self
            .orders
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("Order '{}' not found", id)))?;

        if !order.is_owned_by(owner) {
            tracing::warn!(order_id = %id, owner = %owner, "Order ownership mismatch");
            return Err(DomainError::forbidden("Order belongs to another user"));
        }

        Ok(order)
    }

    /// Active orders of `owner`
    pub async fn list(&self, actor: UserId, owner: UserId) -> Result<Vec<Order>, DomainError> {
        ensure_actor(actor, owner)?;
        self.ensure_owner_exists(owner).await?;

        self.orders.list_by_user(owner).await
    }

    /// Place an order for `owner`
    pub async fn create(
        &self,
        actor: UserId,
        owner: UserId,
        request: CreateOrderRequest,
    ) -> Result<Order, DomainError> {
        ensure_actor(actor, owner)?;

        validate_product(&request.product).map_err(|e| DomainError::validation(e.to_string()))?;
        validate_quantity(request.quantity).map_err(|e| DomainError::validation(e.to_string()))?;
        validate_price(request.price).map_err(|e| DomainError::validation(e.to_string()))?;

        self.ensure_owner_exists(owner).await?;

        let new_order = NewOrder::new(owner, request.product, request.quantity, request.price);
        let id = self.orders.insert(new_order.clone()).await?;

        tracing::info!(order_id = %id, owner = %owner, "Created order");

        Ok(Order::from_new(id, new_order))
    }

    pub async fn get(
        &self,
        actor: UserId,
        owner: UserId,
        id: OrderId,
    ) -> Result<Order, DomainError> {
        ensure_actor(actor, owner)?;
        self.load_owned(owner, id).await
    }

    /// Apply a partial update. The owner cannot change.
    pub async fn update(
        &self,
        actor: UserId,
        owner: UserId,
        id: OrderId,
        patch: OrderPatch,
    ) -> Result<Order, DomainError> {
        ensure_actor(actor, owner)?;

        let mut order = self.load_owned(owner, id).await?;

        let OrderPatch {
            product,
            quantity,
            price,
        } = patch;

        if let Some(product) = product.required("product").map_err(DomainError::validation)? {
            validate_product(&product).map_err(|e| DomainError::validation(e.to_string()))?;
            order.set_product(product);
        }

        if let Some(quantity) = quantity.required("quantity").map_err(DomainError::validation)? {
            validate_quantity(quantity).map_err(|e| DomainError::validation(e.to_string()))?;
            order.set_quantity(quantity);
        }

        if let Some(price) = price.required("price").map_err(DomainError::validation)? {
            validate_price(price).map_err(|e| DomainError::validation(e.to_string()))?;
            order.set_price(price);
        }

        self.orders.update(&order).await?;

        Ok(order)
    }

    pub async fn delete(
        &self,
        actor: UserId,
        owner: UserId,
        id: OrderId,
    ) -> Result<(), DomainError> {
        ensure_actor(actor, owner)?;

        let order = self.load_owned(owner, id).await?;
        self.orders.soft_delete(order.id()).await?;

        tracing::info!(order_id = %id, owner = %owner, "Deleted order");

        Ok(())
    }
}

fn ensure_actor(actor: UserId, owner: UserId) -> Result<(), DomainError> {
    if actor != owner {
        return Err(DomainError::forbidden(
            "Cannot access another user's orders",
        ));
    }

    Ok(())
}
