//! Order entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::patch::Patch;
use crate::domain::status::RecordStatus;
use crate::domain::user::UserId;

/// Order identifier assigned by storage on insert
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(i64);

impl OrderId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl std::str::FromStr for OrderId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<i64>().map(Self)
    }
}

impl std::fmt::Display for OrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An order placed by a user. The owner is fixed at creation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Order {
    id: OrderId,
    user_id: UserId,
    product: String,
    quantity: i32,
    price: f64,
    #[serde(skip)]
    status: RecordStatus,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Order {
    /// Rebuild a stored order
    #[allow(clippy::too_many_arguments)]
    pub fn from_parts(
        id: OrderId,
        user_id: UserId,
        product: String,
        quantity: i32,
        price: f64,
        status: RecordStatus,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            user_id,
            product,
            quantity,
            price,
            status,
            created_at,
            updated_at,
        }
    }

    pub fn from_new(id: OrderId, new: NewOrder) -> Self {
        Self {
            id,
            user_id: new.user_id,
            product: new.product,
            quantity: new.quantity,
            price: new.price,
            status: RecordStatus::Active,
            created_at: new.created_at,
            updated_at: new.created_at,
        }
    }

    pub fn id(&self) -> OrderId {
        self.id
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    pub fn product(&self) -> &str {
        &self.product
    }

    pub fn quantity(&self) -> i32 {
        self.quantity
    }

    pub fn price(&self) -> f64 {
        self.price
    }

    pub fn status(&self) -> RecordStatus {
        self.status
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }

    pub fn is_owned_by(&self, user_id: UserId) -> bool {
        self.user_id == user_id
    }

    pub fn set_product(&mut self, product: impl Into<String>) {
        self.product = product.into();
        self.touch();
    }

    pub fn set_quantity(&mut self, quantity: i32) {
        self.quantity = quantity;
        self.touch();
    }

    pub fn set_price(&mut self, price: f64) {
        self.price = price;
        self.touch();
    }

    pub fn mark_deleted(&mut self) {
        self.status = RecordStatus::Deleted;
        self.touch();
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// An order that has not been stored yet
#[derive(Debug, Clone, PartialEq)]
pub struct NewOrder {
    pub user_id: UserId,
    pub product: String,
    pub quantity: i32,
    pub price: f64,
    pub created_at: DateTime<Utc>,
}

impl NewOrder {
    pub fn new(user_id: UserId, product: impl Into<String>, quantity: i32, price: f64) -> Self {
        Self {
            user_id,
            product: product.into(),
            quantity,
            price,
            created_at: Utc::now(),
        }
    }
}

/// Partial order update. The owner is deliberately absent.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OrderPatch {
    #[serde(default)]
    pub product: Patch<String>,
    #[serde(default)]
    pub quantity: Patch<i32>,
    #[serde(default)]
    pub price: Patch<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_order() -> Order {
        Order::from_new(
            OrderId::new(10),
            NewOrder::new(UserId::new(1), "Keyboard", 2, 49.5),
        )
    }

    #[test]
    fn test_order_creation() {
        let order = create_test_order();

        assert_eq!(order.id(), OrderId::new(10));
        assert!(order.is_owned_by(UserId::new(1)));
        assert!(!order.is_owned_by(UserId::new(2)));
        assert_eq!(order.quantity(), 2);
        assert!(order.is_active());
    }

    #[test]
    fn test_order_serialization_hides_status() {
        let json = serde_json::to_value(create_test_order()).unwrap();

        assert_eq!(json["user_id"], 1);
        assert_eq!(json["product"], "Keyboard");
        assert!(json.get("status").is_none());
    }

    #[test]
    fn test_patch_cannot_carry_owner() {
        let result: Result<OrderPatch, _> = serde_json::from_str(r#"{"user_id": 2}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_mark_deleted() {
        let mut order = create_test_order();
        order.mark_deleted();
        assert!(!order.is_active());
    }
}
