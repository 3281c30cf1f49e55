//! User service for profile management

use std::sync::Arc;

use crate::domain::pagination::{Page, PageRequest};
use crate::domain::user::{
    validate_age, validate_email, validate_name, validate_password, PublicUser, User, UserId,
    UserPatch, UserRepository,
};
use crate::domain::DomainError;
use crate::infrastructure::auth::PasswordHasher;

/// User service for lookups, listing and self-service updates
#[derive(Debug)]
pub struct UserService<R: UserRepository, H: PasswordHasher> {
    repository: Arc<R>,
    hasher: Arc<H>,
}

impl<R: UserRepository, H: PasswordHasher> UserService<R, H> {
    /// Create a new user service
    pub fn new(repository: Arc<R>, hasher: Arc<H>) -> Self {
        Self { repository, hasher }
    }

    async fn load(&self, id: UserId) -> Result<User, DomainError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("User '{}' not found", id)))
    }

    /// Get an active user's public projection
    pub async fn get(&self, id: UserId) -> Result<PublicUser, DomainError> {
        Ok(self.load(id).await?.to_public())
    }

    /// List active users, optionally filtered by age
    pub async fn list(&self, request: &PageRequest) -> Result<Page<PublicUser>, DomainError> {
        request.validate()?;

        let page = self.repository.list(request).await?;
        Ok(page.map(|u| u.to_public()))
    }

    /// Apply a partial update to the caller's own account
    pub async fn update(
        &self,
        actor: UserId,
        id: UserId,
        patch: UserPatch,
    ) -> Result<PublicUser, DomainError> {
        ensure_self(actor, id, "update")?;

        let mut user = self.load(id).await?;

        if patch.is_empty() {
            return Ok(user.to_public());
        }

        let UserPatch {
            name,
            email,
            age,
            password,
        } = patch;

        if let Some(name) = name.required("name").map_err(DomainError::validation)? {
            validate_name(&name).map_err(|e| DomainError::validation(e.to_string()))?;
            user.set_name(name);
        }

        if let Some(email) = email.required("email").map_err(DomainError::validation)? {
            validate_email(&email).map_err(|e| DomainError::validation(e.to_string()))?;

            if email != user.email() {
                if let Some(other) = self.repository.find_by_email(&email).await? {
                    if other.id() != user.id() {
                        return Err(DomainError::duplicate_email(email));
                    }
                }
                user.set_email(email);
            }
        }

        if let Some(age) = age.required("age").map_err(DomainError::validation)? {
            validate_age(age).map_err(|e| DomainError::validation(e.to_string()))?;
            user.set_age(age);
        }

        if let Some(password) = password.required("password").map_err(DomainError::validation)? {
            validate_password(&password).map_err(|e| DomainError::validation(e.to_string()))?;
            user.set_password_hash(self.hasher.hash(&password)?);
        }

        self.repository.update(&user).await?;

        tracing::info!(user_id = %id, "Updated account");

        Ok(user.to_public())
    }

    /// Soft-delete the caller's own account
    pub async fn delete(&self, actor: UserId, id: UserId) -> Result<(), DomainError> {
        ensure_self(actor, id, "delete")?;

        self.repository.soft_delete(id).await?;

        tracing::info!(user_id = %id, "Deleted account");

        Ok(())
    }

    /// Cheap store probe for readiness checks
    pub async fn count_active(&self) -> Result<u64, DomainError> {
        self.repository.count_active().await
    }
}

fn ensure_self(actor: UserId, id: UserId, action: &str) -> Result<(), DomainError> {
    if actor != id {
        return Err(DomainError::forbidden(format!(
            "Cannot {} another user's account",
            action
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::user::{MockUserRepository, NewUser};
    use crate::domain::Patch;
    use crate::infrastructure::auth::Argon2Hasher;
    use crate::infrastructure::user::repository::InMemoryUserRepository;

    async fn create_service() -> (
        UserService<InMemoryUserRepository, Argon2Hasher>,
        UserId,
        UserId,
    ) {
        let repo = Arc::new(InMemoryUserRepository::new());
        let hasher = Arc::new(Argon2Hasher::new());

        let alice = repo
            .insert(NewUser::new("Alice", "alice@x.com", 30, hasher.hash("secret1").unwrap()))
            .await
            .unwrap();
        let bob = repo
            .insert(NewUser::new("Bob", "bob@x.com", 40, hasher.hash("secret2").unwrap()))
            .await
            .unwrap();

        (UserService::new(repo, hasher), alice, bob)
    }

    #[tokio::test]
    async fn test_get_missing_user() {
        let (service, _, _) = create_service().await;

        let result = service.get(UserId::new(999)).await;
        assert!(matches!(result, Err(DomainError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_list_validates_request() {
        let (service, _, _) = create_service().await;

        let bad = PageRequest::new(1, 101);
        assert!(matches!(
            service.list(&bad).await,
            Err(DomainError::Validation { .. })
        ));

        let page = service.list(&PageRequest::default()).await.unwrap();
        assert_eq!(page.total, 2);
    }

    #[tokio::test]
    async fn test_update_requires_self() {
        let (service, alice, bob) = create_service().await;

        let patch = UserPatch {
            age: Patch::Value(31),
            ..Default::default()
        };

        let result = service.update(bob, alice, patch).await;
        assert!(matches!(result, Err(DomainError::Forbidden { .. })));
    }

    #[tokio::test]
    async fn test_update_applies_present_fields_only() {
        let (service, alice, _) = create_service().await;

        let patch = UserPatch {
            age: Patch::Value(31),
            ..Default::default()
        };

        let updated = service.update(alice, alice, patch).await.unwrap();
        assert_eq!(updated.age, 31);
        assert_eq!(updated.name, "Alice");
        assert_eq!(updated.email, "alice@x.com");
    }

    #[tokio::test]
    async fn test_update_rejects_null_and_empty() {
        let (service, alice, _) = create_service().await;

        let null_name = UserPatch {
            name: Patch::Null,
            ..Default::default()
        };
        assert!(matches!(
            service.update(alice, alice, null_name).await,
            Err(DomainError::Validation { .. })
        ));

        let empty_email = UserPatch {
            email: Patch::Value(String::new()),
            ..Default::default()
        };
        assert!(matches!(
            service.update(alice, alice, empty_email).await,
            Err(DomainError::Validation { .. })
        ));

        assert_eq!(service.get(alice).await.unwrap().name, "Alice");
    }

    #[tokio::test]
    async fn test_update_email_uniqueness_excludes_self() {
        let (service, alice, _) = create_service().await;

        let taken = UserPatch {
            email: Patch::Value("bob@x.com".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            service.update(alice, alice, taken).await,
            Err(DomainError::DuplicateEmail { .. })
        ));

        let same = UserPatch {
            email: Patch::Value("alice@x.com".to_string()),
            name: Patch::Value("Alicia".to_string()),
            ..Default::default()
        };
        let updated = service.update(alice, alice, same).await.unwrap();
        assert_eq!(updated.name, "Alicia");
    }

    #[tokio::test]
    async fn test_update_password_rehashes() {
        let repo = Arc::new(InMemoryUserRepository::new());
        let hasher = Arc::new(Argon2Hasher::new());
        let id = repo
            .insert(NewUser::new("A", "a@x.com", 30, hasher.hash("secret1").unwrap()))
            .await
            .unwrap();
        let service = UserService::new(repo.clone(), hasher.clone());

        let patch = UserPatch {
            password: Patch::Value("new-secret".to_string()),
            ..Default::default()
        };
        service.update(id, id, patch).await.unwrap();

        let stored = repo.find_by_id(id).await.unwrap().unwrap();
        assert!(hasher.verify("new-secret", stored.password_hash()));
        assert!(!hasher.verify("secret1", stored.password_hash()));
    }

    #[tokio::test]
    async fn test_delete_is_soft_and_self_only() {
        let (service, alice, bob) = create_service().await;

        assert!(matches!(
            service.delete(bob, alice).await,
            Err(DomainError::Forbidden { .. })
        ));

        service.delete(alice, alice).await.unwrap();

        assert!(matches!(
            service.get(alice).await,
            Err(DomainError::NotFound { .. })
        ));
        assert_eq!(service.count_active().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_forbidden_checked_before_storage() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_id().never();
        repo.expect_soft_delete().never();

        let service = UserService::new(Arc::new(repo), Arc::new(Argon2Hasher::new()));

        let result = service.delete(UserId::new(1), UserId::new(2)).await;
        assert!(matches!(result, Err(DomainError::Forbidden { .. })));
    }
}
