//! User repository trait

use async_trait::async_trait;

#[cfg(test)]
use mockall::automock;

use super::entity::{NewUser, User, UserId};
use crate::domain::pagination::{Page, PageRequest};
use crate::domain::DomainError;

/// Credential store: persistence for user accounts
///
/// Every lookup only sees `Active` users. Email uniqueness among active users
/// is enforced by the implementation at write time (`insert` and `update`
/// fail with [`DomainError::DuplicateEmail`]), so concurrent registrations
/// cannot both succeed.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Get an active user by email (exact match)
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError>;

    /// Get an active user by id
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, DomainError>;

    /// Store a new user and return the assigned id
    async fn insert(&self, user: NewUser) -> Result<UserId, DomainError>;

    /// Persist changes to an active user
    async fn update(&self, user: &User) -> Result<(), DomainError>;

    /// Mark an active user as deleted
    async fn soft_delete(&self, id: UserId) -> Result<(), DomainError>;

    /// List active users, filtered by the request's age range
    async fn list(&self, request: &PageRequest) -> Result<Page<User>, DomainError>;

    /// Count active users
    async fn count_active(&self) -> Result<u64, DomainError>;
}
