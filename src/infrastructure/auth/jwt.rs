//! JWT token generation and validation

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use thiserror::Error;

use crate::domain::user::UserId;
use crate::domain::DomainError;

/// JWT claims structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtClaims {
    /// Subject (user ID)
    pub sub: String,
    /// Issued at timestamp (Unix epoch)
    pub iat: i64,
    /// Expiration timestamp (Unix epoch)
    pub exp: i64,
}

impl JwtClaims {
    /// Claims for `user_id` expiring `ttl` from now
    pub fn new(user_id: UserId, ttl: Duration) -> Result<Self, DomainError> {
        let now = Utc::now();
        let exp = now
            .checked_add_signed(ttl)
            .ok_or_else(|| DomainError::configuration("token lifetime is out of range"))?;

        Ok(Self {
            sub: user_id.to_string(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
        })
    }

    /// Check if the token has expired
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }

    /// Get user ID from claims
    pub fn user_id(&self) -> Result<UserId, TokenError> {
        self.sub
            .parse::<UserId>()
            .map_err(|_| TokenError::Invalid("subject is not a user id".to_string()))
    }
}

/// Why a token was rejected
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TokenError {
    /// Bad signature or malformed structure
    #[error("invalid token: {0}")]
    Invalid(String),
    /// Valid signature, past expiry
    #[error("token expired")]
    Expired,
}

impl From<TokenError> for DomainError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Invalid(message) => DomainError::token_invalid(message),
            TokenError::Expired => DomainError::TokenExpired,
        }
    }
}

/// Longest accepted token lifetime (one year)
pub const MAX_TOKEN_TTL_HOURS: u64 = 8760;

/// A signed token and the instant it stops verifying
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Configuration for JWT service
#[derive(Clone)]
pub struct JwtConfig {
    /// Secret key for signing tokens
    pub secret: String,
    /// Token expiration time in hours
    pub expiration_hours: u64,
}

impl JwtConfig {
    /// Create new JWT configuration
    pub fn new(secret: impl Into<String>, expiration_hours: u64) -> Self {
        Self {
            secret: secret.into(),
            expiration_hours,
        }
    }
}

impl Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"[hidden]")
            .field("expiration_hours", &self.expiration_hours)
            .finish()
    }
}

/// Token service: issues and verifies HS256 bearer tokens
///
/// The signing secret is fixed at construction. There is no refresh and no
/// revocation list: a token stays valid until its `exp`.
#[derive(Clone)]
pub struct JwtService {
    config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl Debug for JwtService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtService")
            .field("config", &self.config)
            .field("encoding_key", &"[hidden]")
            .field("decoding_key", &"[hidden]")
            .finish()
    }
}

impl JwtService {
    /// Create a new JWT service with the given configuration
    pub fn new(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        Self {
            config,
            encoding_key,
            decoding_key,
        }
    }

    /// Configured token lifetime
    pub fn default_ttl(&self) -> Result<Duration, DomainError> {
        i64::try_from(self.config.expiration_hours)
            .ok()
            .filter(|hours| *hours as u64 <= MAX_TOKEN_TTL_HOURS)
            .and_then(Duration::try_hours)
            .ok_or_else(|| {
                DomainError::configuration(format!(
                    "token lifetime of {} hours is out of range (max {})",
                    self.config.expiration_hours, MAX_TOKEN_TTL_HOURS
                ))
            })
    }

    /// Issue a token for `user_id` that expires after `ttl`
    pub fn issue(&self, user_id: UserId, ttl: Duration) -> Result<IssuedToken, DomainError> {
        let claims = JwtClaims::new(user_id, ttl)?;

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| DomainError::crypto_failure(format!("Failed to sign JWT: {}", e)))?;

        let expires_at = DateTime::from_timestamp(claims.exp, 0)
            .ok_or_else(|| DomainError::internal("token expiry is not representable"))?;

        Ok(IssuedToken { token, expires_at })
    }

    /// Issue a token with the configured lifetime
    pub fn issue_default(&self, user_id: UserId) -> Result<IssuedToken, DomainError> {
        self.issue(user_id, self.default_ttl()?)
    }

    /// Verify signature and expiry, returning the subject
    pub fn verify(&self, token: &str) -> Result<UserId, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        let token_data = decode::<JwtClaims>(token, &self.decoding_key, &validation).map_err(
            |e| match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid(e.to_string()),
            },
        )?;

        let claims = token_data.claims;

        // jsonwebtoken accepts exp == now; a token is only valid strictly before exp
        if claims.is_expired() {
            return Err(TokenError::Expired);
        }

        claims.user_id()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_service() -> JwtService {
        JwtService::new(JwtConfig::new("test-secret-key-12345", 24))
    }

    #[test]
    fn test_issue_and_verify() {
        let service = create_service();

        let issued = service.issue_default(UserId::new(42)).unwrap();
        assert!(!issued.token.is_empty());

        let user_id = service.verify(&issued.token).unwrap();
        assert_eq!(user_id, UserId::new(42));

        let remaining = issued.expires_at - Utc::now();
        assert!(remaining > Duration::hours(23) && remaining <= Duration::hours(24));
    }

    #[test]
    fn test_invalid_token() {
        let service = create_service();

        let result = service.verify("invalid-token");
        assert!(matches!(result, Err(TokenError::Invalid(_))));
    }

    #[test]
    fn test_wrong_secret() {
        let service1 = JwtService::new(JwtConfig::new("secret-1", 24));
        let service2 = JwtService::new(JwtConfig::new("secret-2", 24));

        let token = service1.issue_default(UserId::new(1)).unwrap().token;

        let result = service2.verify(&token);
        assert!(matches!(result, Err(TokenError::Invalid(_))));
    }

    #[test]
    fn test_expired_token() {
        let service = create_service();

        let token = service.issue(UserId::new(1), Duration::hours(-1)).unwrap().token;

        assert_eq!(service.verify(&token), Err(TokenError::Expired));
    }

    #[test]
    fn test_expired_token_with_wrong_secret_is_invalid() {
        let other = JwtService::new(JwtConfig::new("another-secret", 24));
        let token = other.issue(UserId::new(1), Duration::hours(-1)).unwrap().token;

        let result = create_service().verify(&token);
        assert!(matches!(result, Err(TokenError::Invalid(_))));
    }

    #[test]
    fn test_tampered_payload() {
        let service = create_service();
        let token = service.issue_default(UserId::new(1)).unwrap().token;
        let forged_claims = JwtClaims::new(UserId::new(2), Duration::hours(1)).unwrap();
        let forged_payload = encode(
            &Header::new(Algorithm::HS256),
            &forged_claims,
            &EncodingKey::from_secret(b"attacker"),
        )
        .unwrap();

        let mut parts: Vec<&str> = token.split('.').collect();
        let forged_parts: Vec<&str> = forged_payload.split('.').collect();
        parts[1] = forged_parts[1];
        let tampered = parts.join(".");

        assert!(matches!(service.verify(&tampered), Err(TokenError::Invalid(_))));
    }

    #[test]
    fn test_non_numeric_subject() {
        let service = create_service();
        let claims = JwtClaims {
            sub: "admin".to_string(),
            iat: Utc::now().timestamp(),
            exp: (Utc::now() + Duration::hours(1)).timestamp(),
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(b"test-secret-key-12345"),
        )
        .unwrap();

        assert!(matches!(service.verify(&token), Err(TokenError::Invalid(_))));
    }

    #[test]
    fn test_claims_expiration() {
        let claims = JwtClaims::new(UserId::new(3), Duration::hours(24)).unwrap();

        assert!(!claims.is_expired());
        assert_eq!(claims.user_id().unwrap(), UserId::new(3));
    }

    #[test]
    fn test_token_error_maps_to_domain() {
        assert!(matches!(
            DomainError::from(TokenError::Expired),
            DomainError::TokenExpired
        ));
        assert!(matches!(
            DomainError::from(TokenError::Invalid("x".into())),
            DomainError::TokenInvalid { .. }
        ));
    }

    #[test]
    fn test_debug_hides_secret() {
        let rendered = format!("{:?}", create_service());
        assert!(!rendered.contains("test-secret-key-12345"));
    }

    #[test]
    fn test_out_of_range_lifetime_is_rejected() {
        for hours in [MAX_TOKEN_TTL_HOURS + 1, 3_000_000_000_000_000, u64::MAX] {
            let service = JwtService::new(JwtConfig::new("secret", hours));

            assert!(
                matches!(
                    service.issue_default(UserId::new(1)),
                    Err(DomainError::Configuration { .. })
                ),
                "{}",
                hours
            );
        }

        let longest = JwtService::new(JwtConfig::new("secret", MAX_TOKEN_TTL_HOURS));
        let issued = longest.issue_default(UserId::new(1)).unwrap();
        assert_eq!(longest.verify(&issued.token).unwrap(), UserId::new(1));
    }

    #[test]
    fn test_unrepresentable_expiry_does_not_panic() {
        let result = JwtClaims::new(UserId::new(1), Duration::MAX);
        assert!(matches!(result, Err(DomainError::Configuration { .. })));
    }
}
