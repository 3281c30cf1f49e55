//! Authentication API endpoints
//!
//! Registration and login are public. `/me` sits behind the identity gate.

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::api::middleware::Identity;
use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::domain::user::PublicUser;
use crate::infrastructure::auth::RegisterRequest;

/// Routes that do not require a token
pub fn create_public_auth_router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
}

/// Routes that require a verified identity
pub fn create_protected_auth_router() -> Router<AppState> {
    Router::new().route("/me", get(get_current_user))
}

/// Registration body
#[derive(Debug, Deserialize)]
pub struct RegisterBody {
    pub name: String,
    pub email: String,
    pub age: i32,
    pub password: String,
}

impl From<RegisterBody> for RegisterRequest {
    fn from(body: RegisterBody) -> Self {
        Self {
            name: body.name,
            email: body.email,
            age: body.age,
            password: body.password,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginBody {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub token_type: &'static str,
    pub expires_at: DateTime<Utc>,
    pub user: PublicUser,
}

/// POST /register
pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterBody>,
) -> Result<(StatusCode, Json<PublicUser>), ApiError> {
    let user = state.auth_service.register(body.into()).await?;

    Ok((StatusCode::CREATED, Json(user)))
}

/// POST /login
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginBody>,
) -> Result<Json<LoginResponse>, ApiError> {
    let result = state.auth_service.login(&body.email, &body.password).await?;

    Ok(Json(LoginResponse {
        token: result.token,
        token_type: "Bearer",
        expires_at: result.expires_at,
        user: result.user,
    }))
}

/// GET /me
pub async fn get_current_user(
    State(state): State<AppState>,
    identity: Identity,
) -> Result<Json<PublicUser>, ApiError> {
    let user = state.user_service.get(identity.user_id()).await?;

    Ok(Json(user))
}
