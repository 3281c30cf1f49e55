//! Authentication infrastructure: password hashing, tokens and the auth flow

pub mod jwt;
pub mod password;
mod service;

pub use jwt::{IssuedToken, JwtClaims, JwtConfig, JwtService, TokenError, MAX_TOKEN_TTL_HOURS};
pub use password::{Argon2Hasher, PasswordHasher};
pub use service::{AuthService, LoginResult, RegisterRequest};
