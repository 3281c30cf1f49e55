use thiserror::Error;

/// Core domain errors
///
/// The credential variants are kept apart so the gate can log which check
/// failed; the HTTP layer renders all of them as the same 401.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Email '{email}' is already registered")]
    DuplicateEmail { email: String },

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Missing bearer credential")]
    MissingCredential,

    #[error("Malformed bearer credential: {message}")]
    MalformedCredential { message: String },

    #[error("Invalid token: {message}")]
    TokenInvalid { message: String },

    #[error("Token expired")]
    TokenExpired,

    #[error("Forbidden: {message}")]
    Forbidden { message: String },

    #[error("Not found: {message}")]
    NotFound { message: String },

    #[error("Storage unavailable: {message}")]
    StorageUnavailable { message: String },

    #[error("Crypto failure: {message}")]
    CryptoFailure { message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl DomainError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn duplicate_email(email: impl Into<String>) -> Self {
        Self::DuplicateEmail {
            email: email.into(),
        }
    }

    pub fn malformed_credential(message: impl Into<String>) -> Self {
        Self::MalformedCredential {
            message: message.into(),
        }
    }

    pub fn token_invalid(message: impl Into<String>) -> Self {
        Self::TokenInvalid {
            message: message.into(),
        }
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden {
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    pub fn storage_unavailable(message: impl Into<String>) -> Self {
        Self::StorageUnavailable {
            message: message.into(),
        }
    }

    pub fn crypto_failure(message: impl Into<String>) -> Self {
        Self::CryptoFailure {
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// True for the failures that mean "no authenticated identity"
    pub fn is_unauthenticated(&self) -> bool {
        matches!(
            self,
            Self::InvalidCredentials
                | Self::MissingCredential
                | Self::MalformedCredential { .. }
                | Self::TokenInvalid { .. }
                | Self::TokenExpired
        )
    }

    /// Stable machine-readable name of the error kind
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation { .. } => "validation_error",
            Self::DuplicateEmail { .. } => "duplicate_email",
            Self::InvalidCredentials => "invalid_credentials",
            Self::MissingCredential => "missing_credential",
            Self::MalformedCredential { .. } => "malformed_credential",
            Self::TokenInvalid { .. } => "token_invalid",
            Self::TokenExpired => "token_expired",
            Self::Forbidden { .. } => "forbidden",
            Self::NotFound { .. } => "not_found",
            Self::StorageUnavailable { .. } => "storage_unavailable",
            Self::CryptoFailure { .. } => "crypto_failure",
            Self::Configuration { .. } => "configuration_error",
            Self::Internal { .. } => "internal_error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_error() {
        let error = DomainError::not_found("User '7' not found");
        assert_eq!(error.to_string(), "Not found: User '7' not found");
    }

    #[test]
    fn test_validation_error() {
        let error = DomainError::validation("Invalid input");
        assert_eq!(error.to_string(), "Validation error: Invalid input");
    }

    #[test]
    fn test_duplicate_email_error() {
        let error = DomainError::duplicate_email("a@x.com");
        assert_eq!(error.to_string(), "Email 'a@x.com' is already registered");
        assert_eq!(error.kind(), "duplicate_email");
    }

    #[test]
    fn test_unauthenticated_kinds() {
        assert!(DomainError::InvalidCredentials.is_unauthenticated());
        assert!(DomainError::MissingCredential.is_unauthenticated());
        assert!(DomainError::malformed_credential("Basic").is_unauthenticated());
        assert!(DomainError::token_invalid("bad signature").is_unauthenticated());
        assert!(DomainError::TokenExpired.is_unauthenticated());

        assert!(!DomainError::forbidden("not yours").is_unauthenticated());
        assert!(!DomainError::storage_unavailable("down").is_unauthenticated());
    }
}
