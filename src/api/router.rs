use axum::{middleware, routing::get, Router};
use tower_http::trace::TraceLayer;

use super::auth;
use super::health;
use super::middleware::{logging_middleware, metrics_middleware, require_identity};
use super::orders;
use super::state::AppState;
use super::users;

/// Create the full router with application state
///
/// Health checks, `/register` and `/login` are public. Everything else is
/// behind the identity gate.
pub fn create_router_with_state(state: AppState) -> Router {
    let protected = Router::new()
        .merge(auth::create_protected_auth_router())
        .merge(users::create_users_router())
        .merge(orders::create_orders_router())
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_identity,
        ));

    Router::new()
        .route("/health", get(health::health_check))
        .route("/ready", get(health::ready_check))
        .route("/live", get(health::live_check))
        .merge(auth::create_public_auth_router())
        .merge(protected)
        .with_state(state)
        .layer(middleware::from_fn(metrics_middleware))
        .layer(middleware::from_fn(logging_middleware))
        .layer(TraceLayer::new_for_http())
}
