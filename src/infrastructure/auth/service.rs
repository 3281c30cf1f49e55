//! Registration and login

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::user::{
    validate_age, validate_email, validate_name, validate_password, NewUser, PublicUser, User,
    UserRepository,
};
use crate::domain::DomainError;
use crate::infrastructure::observability::record_auth_event;

use super::jwt::JwtService;
use super::password::PasswordHasher;

/// Request for registering a new account
#[derive(Debug, Clone)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub age: i32,
    pub password: String,
}

/// Successful login: the account plus a bearer token
#[derive(Debug, Clone, Serialize)]
pub struct LoginResult {
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub user: PublicUser,
}

/// Auth flow service
#[derive(Debug)]
pub struct AuthService<R: UserRepository, H: PasswordHasher> {
    repository: Arc<R>,
    hasher: Arc<H>,
    tokens: Arc<JwtService>,
}

impl<R: UserRepository, H: PasswordHasher> AuthService<R, H> {
    pub fn new(repository: Arc<R>, hasher: Arc<H>, tokens: Arc<JwtService>) -> Self {
        Self {
            repository,
            hasher,
            tokens,
        }
    }

    /// Register a new account
    ///
    /// The email check runs before field validation; storage uniqueness still
    /// decides concurrent registrations of the same address.
    pub async fn register(&self, request: RegisterRequest) -> Result<PublicUser, DomainError> {
        let result = self.register_inner(request).await;
        observe("register", &result);
        result
    }

    async fn register_inner(&self, request: RegisterRequest) -> Result<PublicUser, DomainError> {
        if self.repository.find_by_email(&request.email).await?.is_some() {
            return Err(DomainError::duplicate_email(request.email));
        }

        validate_name(&request.name).map_err(|e| DomainError::validation(e.to_string()))?;
        validate_email(&request.email).map_err(|e| DomainError::validation(e.to_string()))?;
        validate_age(request.age).map_err(|e| DomainError::validation(e.to_string()))?;
        validate_password(&request.password)
            .map_err(|e| DomainError::validation(e.to_string()))?;

        let password_hash = self.hasher.hash(&request.password)?;
        let new_user = NewUser::new(request.name, request.email, request.age, password_hash);

        let id = self.repository.insert(new_user.clone()).await?;
        let user = User::from_new(id, new_user);

        tracing::info!(user_id = %id, "Registered account");

        Ok(user.to_public())
    }

    /// Authenticate by email and password and issue a token
    ///
    /// An unknown email and a wrong password fail identically.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResult, DomainError> {
        let result = self.login_inner(email, password).await;
        observe("login", &result);
        result
    }

    async fn login_inner(&self, email: &str, password: &str) -> Result<LoginResult, DomainError> {
        let user = match self.repository.find_by_email(email).await? {
            Some(u) => u,
            None => return Err(DomainError::InvalidCredentials),
        };

        if !self.hasher.verify(password, user.password_hash()) {
            return Err(DomainError::InvalidCredentials);
        }

        let issued = self.tokens.issue_default(user.id())?;

        tracing::debug!(user_id = %user.id(), "Issued token");

        Ok(LoginResult {
            token: issued.token,
            expires_at: issued.expires_at,
            user: user.to_public(),
        })
    }
}

fn observe<T>(event: &'static str, result: &Result<T, DomainError>) {
    match result {
        Ok(_) => record_auth_event(event, "success"),
        Err(e) => record_auth_event(event, e.kind()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::user::MockUserRepository;
    use crate::infrastructure::auth::jwt::JwtConfig;
    use crate::infrastructure::auth::password::Argon2Hasher;
    use crate::infrastructure::user::InMemoryUserRepository;

    fn tokens() -> Arc<JwtService> {
        Arc::new(JwtService::new(JwtConfig::new("test-secret", 24)))
    }

    fn create_service() -> (
        AuthService<InMemoryUserRepository, Argon2Hasher>,
        Arc<InMemoryUserRepository>,
    ) {
        let repo = Arc::new(InMemoryUserRepository::new());
        let service = AuthService::new(repo.clone(), Arc::new(Argon2Hasher::new()), tokens());
        (service, repo)
    }

    fn request(email: &str) -> RegisterRequest {
        RegisterRequest {
            name: "A".to_string(),
            email: email.to_string(),
            age: 30,
            password: "secret1".to_string(),
        }
    }

    #[tokio::test]
    async fn test_register_stores_hash_not_plaintext() {
        let (service, repo) = create_service();

        let a = service.register(request("a@x.com")).await.unwrap();
        let b = service.register(request("b@x.com")).await.unwrap();

        assert_ne!(a.id, b.id);

        let stored = repo.find_by_email("a@x.com").await.unwrap().unwrap();
        assert_ne!(stored.password_hash(), "secret1");
        assert!(Argon2Hasher::new().verify("secret1", stored.password_hash()));
    }

    #[tokio::test]
    async fn test_register_duplicate_email() {
        let (service, repo) = create_service();

        service.register(request("a@x.com")).await.unwrap();
        let result = service.register(request("a@x.com")).await;

        assert!(matches!(result, Err(DomainError::DuplicateEmail { .. })));
        assert_eq!(repo.count_active().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_check_precedes_validation() {
        let (service, _) = create_service();
        service.register(request("a@x.com")).await.unwrap();

        let mut again = request("a@x.com");
        again.age = 200;

        let result = service.register(again).await;
        assert!(matches!(result, Err(DomainError::DuplicateEmail { .. })));
    }

    #[tokio::test]
    async fn test_register_validation() {
        let (service, repo) = create_service();

        let mut bad_age = request("a@x.com");
        bad_age.age = 131;
        assert!(matches!(
            service.register(bad_age).await,
            Err(DomainError::Validation { .. })
        ));

        let mut blank_name = request("a@x.com");
        blank_name.name = "  ".to_string();
        assert!(matches!(
            service.register(blank_name).await,
            Err(DomainError::Validation { .. })
        ));

        let mut short_password = request("a@x.com");
        short_password.password = "12345".to_string();
        assert!(matches!(
            service.register(short_password).await,
            Err(DomainError::Validation { .. })
        ));

        assert!(matches!(
            service.register(request("not-an-email")).await,
            Err(DomainError::Validation { .. })
        ));

        assert_eq!(repo.count_active().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_login_issues_verifiable_token() {
        let (service, _) = create_service();
        let registered = service.register(request("a@x.com")).await.unwrap();

        let result = service.login("a@x.com", "secret1").await.unwrap();

        assert_eq!(result.user, registered);
        assert_eq!(tokens().verify(&result.token).unwrap(), registered.id);
    }

    #[tokio::test]
    async fn test_login_reports_the_signed_expiry() {
        let (service, _) = create_service();
        service.register(request("a@x.com")).await.unwrap();

        let result = service.login("a@x.com", "secret1").await.unwrap();

        let claims = jsonwebtoken::decode::<crate::infrastructure::auth::JwtClaims>(
            &result.token,
            &jsonwebtoken::DecodingKey::from_secret(b"test-secret"),
            &jsonwebtoken::Validation::new(jsonwebtoken::Algorithm::HS256),
        )
        .unwrap()
        .claims;

        assert_eq!(result.expires_at.timestamp(), claims.exp);
        assert!(result.expires_at > Utc::now());
    }

    #[tokio::test]
    async fn test_login_failures_are_indistinguishable() {
        let (service, _) = create_service();
        service.register(request("a@x.com")).await.unwrap();

        let wrong_password = service.login("a@x.com", "secret2").await.unwrap_err();
        let unknown_email = service.login("b@x.com", "secret1").await.unwrap_err();

        assert!(matches!(wrong_password, DomainError::InvalidCredentials));
        assert!(matches!(unknown_email, DomainError::InvalidCredentials));
        assert_eq!(wrong_password.to_string(), unknown_email.to_string());
    }

    #[tokio::test]
    async fn test_login_email_is_case_sensitive() {
        let (service, _) = create_service();
        service.register(request("a@x.com")).await.unwrap();

        let result = service.login("A@X.COM", "secret1").await;
        assert!(matches!(result, Err(DomainError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_storage_failure_propagates() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email()
            .returning(|_| Err(DomainError::storage_unavailable("connection refused")));
        repo.expect_insert().never();

        let service = AuthService::new(Arc::new(repo), Arc::new(Argon2Hasher::new()), tokens());

        assert!(matches!(
            service.register(request("a@x.com")).await,
            Err(DomainError::StorageUnavailable { .. })
        ));
        assert!(matches!(
            service.login("a@x.com", "secret1").await,
            Err(DomainError::StorageUnavailable { .. })
        ));
    }

    #[tokio::test]
    async fn test_lost_insert_race_reports_duplicate() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email().returning(|_| Ok(None));
        repo.expect_insert()
            .returning(|user| Err(DomainError::duplicate_email(user.email)));

        let service = AuthService::new(Arc::new(repo), Arc::new(Argon2Hasher::new()), tokens());
        let result = service.register(request("a@x.com")).await;

        assert!(matches!(result, Err(DomainError::DuplicateEmail { .. })));
    }
}
