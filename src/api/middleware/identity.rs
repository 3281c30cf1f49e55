//! Request identity gate
//!
//! `require_identity` runs in front of every protected route. It reads the
//! bearer token, verifies it and stores the resulting [`Identity`] in the
//! request extensions, where handlers pick it up with the extractor below.
//! Ownership is not checked here.

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};

use crate::api::state::AppState;
use crate::api::types::ApiError;
use crate::domain::user::UserId;
use crate::domain::DomainError;
use crate::infrastructure::auth::JwtService;
use crate::infrastructure::observability::record_auth_event;

const BEARER_SCHEME: &str = "Bearer";

/// The verified account behind the current request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identity(pub UserId);

impl Identity {
    pub fn user_id(&self) -> UserId {
        self.0
    }
}

/// Gate middleware for protected routes
pub async fn require_identity(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    match authenticate(request.headers(), &state.jwt_service) {
        Ok(user_id) => {
            request.extensions_mut().insert(Identity(user_id));
            Ok(next.run(request).await)
        }
        Err(err) => {
            let path = request.uri().path();

            match &err {
                DomainError::MissingCredential => {
                    tracing::debug!(path, kind = err.kind(), "Rejected unauthenticated request")
                }
                _ => tracing::warn!(path, kind = err.kind(), error = %err, "Rejected credential"),
            }

            record_auth_event("gate", err.kind());

            Err(err.into())
        }
    }
}

/// Resolve the identity asserted by the request headers
pub fn authenticate(headers: &HeaderMap, tokens: &JwtService) -> Result<UserId, DomainError> {
    let token = bearer_token(headers)?;
    Ok(tokens.verify(token)?)
}

/// Extract the token from `Authorization: Bearer <token>`
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, DomainError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or(DomainError::MissingCredential)?;

    let value = value
        .to_str()
        .map_err(|_| DomainError::malformed_credential("header is not valid ASCII"))?;

    let (scheme, token) = value
        .trim()
        .split_once(' ')
        .ok_or_else(|| DomainError::malformed_credential("expected '<scheme> <token>'"))?;

    if !scheme.eq_ignore_ascii_case(BEARER_SCHEME) {
        return Err(DomainError::malformed_credential(format!(
            "unsupported scheme '{}'",
            scheme
        )));
    }

    let token = token.trim();

    if token.is_empty() || token.contains(char::is_whitespace) {
        return Err(DomainError::malformed_credential("token must be a single value"));
    }

    Ok(token)
}

impl<S> FromRequestParts<S> for Identity
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Identity>()
            .copied()
            .ok_or_else(|| DomainError::MissingCredential.into())
    }
}
