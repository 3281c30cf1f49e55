//! User management endpoints

use axum::{
    extract::State,
    http::StatusCode,
    routing::get,
    Router,
};
use serde::Serialize;

use crate::api::auth::{register, RegisterBody};
use crate::api::middleware::Identity;
use crate::api::state::AppState;
use crate::api::types::{ApiError, Json, Path, Query};
use crate::domain::pagination::{Page, PageRequest};
use crate::domain::user::{PublicUser, UserId, UserPatch};

pub fn create_users_router() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users).post(create_user))
        .route(
            "/users/{id}",
            get(get_user).put(update_user).delete(delete_user),
        )
}

/// Paginated user listing
#[derive(Debug, Serialize)]
pub struct UserListResponse {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub total_pages: u64,
    pub users: Vec<PublicUser>,
}

impl From<Page<PublicUser>> for UserListResponse {
    fn from(page: Page<PublicUser>) -> Self {
        Self {
            page: page.page,
            limit: page.limit,
            total: page.total,
            total_pages: page.total_pages,
            users: page.items,
        }
    }
}

/// GET /users
pub async fn list_users(
    State(state): State<AppState>,
    _identity: Identity,
    Query(request): Query<PageRequest>,
) -> Result<Json<UserListResponse>, ApiError> {
    let page = state.user_service.list(&request).await?;

    Ok(Json(page.into()))
}

/// POST /users, same contract as registration
pub async fn create_user(
    state: State<AppState>,
    _identity: Identity,
    body: Json<RegisterBody>,
) -> Result<(StatusCode, Json<PublicUser>), ApiError> {
    register(state, body).await
}

/// GET /users/{id}
pub async fn get_user(
    State(state): State<AppState>,
    _identity: Identity,
    Path(id): Path<UserId>,
) -> Result<Json<PublicUser>, ApiError> {
    Ok(Json(state.user_service.get(id).await?))
}

/// PUT /users/{id}
pub async fn update_user(
    State(state): State<AppState>,
    identity: Identity,
    Path(id): Path<UserId>,
    Json(patch): Json<UserPatch>,
) -> Result<Json<PublicUser>, ApiError> {
    let user = state
        .user_service
        .update(identity.user_id(), id, patch)
        .await?;

    Ok(Json(user))
}

/// DELETE /users/{id}
pub async fn delete_user(
    State(state): State<AppState>,
    identity: Identity,
    Path(id): Path<UserId>,
) -> Result<StatusCode, ApiError> {
    state.user_service.delete(identity.user_id(), id).await?;

    Ok(StatusCode::NO_CONTENT)
}
