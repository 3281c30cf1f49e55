//! Order endpoints, nested under the owning user

use axum::{
    extract::State,
    http::StatusCode,
    routing::get,
    Router,
};
use serde::Deserialize;

use crate::api::middleware::Identity;
use crate::api::state::AppState;
use crate::api::types::{ApiError, Json, Path};
use crate::domain::order::{Order, OrderId, OrderPatch};
use crate::domain::user::UserId;
use crate::infrastructure::order::CreateOrderRequest;

pub fn create_orders_router() -> Router<AppState> {
    Router::new()
        .route("/users/{id}/orders", get(list_orders).post(create_order))
        .route(
            "/users/{id}/orders/{order_id}",
            get(get_order).put(update_order).delete(delete_order),
        )
}

/// Order body. The owner always comes from the path.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateOrderBody {
    pub product: String,
    pub quantity: i32,
    pub price: f64,
}

impl From<CreateOrderBody> for CreateOrderRequest {
    fn from(body: CreateOrderBody) -> Self {
        Self {
            product: body.product,
            quantity: body.quantity,
            price: body.price,
        }
    }
}

/// GET /users/{id}/orders
pub async fn list_orders(
    State(state): State<AppState>,
    identity: Identity,
    Path(owner): Path<UserId>,
) -> Result<Json<Vec<Order>>, ApiError> {
    let orders = state
        .order_service
        .list(identity.user_id(), owner)
        .await?;

    Ok(Json(orders))
}

/// POST /users/{id}/orders
pub async fn create_order(
    State(state): State<AppState>,
    identity: Identity,
    Path(owner): Path<UserId>,
    Json(body): Json<CreateOrderBody>,
) -> Result<(StatusCode, Json<Order>), ApiError> {
    let order = state
        .order_service
        .create(identity.user_id(), owner, body.into())
        .await?;

    Ok((StatusCode::CREATED, Json(order)))
}

/// GET /users/{id}/orders/{order_id}
pub async fn get_order(
    State(state): State<AppState>,
    identity: Identity,
    Path((owner, id)): Path<(UserId, OrderId)>,
) -> Result<Json<Order>, ApiError> {
    let order = state
        .order_service
        .get(identity.user_id(), owner, id)
        .await?;

    Ok(Json(order))
}

/// PUT /users/{id}/orders/{order_id}
pub async fn update_order(
    State(state): State<AppState>,
    identity: Identity,
    Path((owner, id)): Path<(UserId, OrderId)>,
    Json(patch): Json<OrderPatch>,
) -> Result<Json<Order>, ApiError> {
    let order = state
        .order_service
        .update(identity.user_id(), owner, id, patch)
        .await?;

    Ok(Json(order))
}

/// DELETE /users/{id}/orders/{order_id}
pub async fn delete_order(
    State(state): State<AppState>,
    identity: Identity,
    Path((owner, id)): Path<(UserId, OrderId)>,
) -> Result<StatusCode, ApiError> {
    state
        .order_service
        .delete(identity.user_id(), owner, id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
