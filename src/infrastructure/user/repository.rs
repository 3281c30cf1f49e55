//! In-memory user repository implementation

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::pagination::{Page, PageRequest};
use crate::domain::user::{NewUser, User, UserId, UserRepository};
use crate::domain::DomainError;

#[derive(Debug, Default)]
struct UserTable {
    users: BTreeMap<UserId, User>,
    last_id: i64,
}

impl UserTable {
    fn active_by_email(&self, email: &str) -> Option<&User> {
        self.users
            .values()
            .find(|u| u.is_active() && u.email() == email)
    }
}

/// In-memory implementation of UserRepository
///
/// Uniqueness checks and writes happen under one write lock, which gives the
/// same guarantee as the unique index in Postgres.
#[derive(Debug, Default, Clone)]
pub struct InMemoryUserRepository {
    table: Arc<RwLock<UserTable>>,
}

impl InMemoryUserRepository {
    /// Create a new empty repository
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        let table = self.table.read().await;
        Ok(table.active_by_email(email).cloned())
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, DomainError> {
        let table = self.table.read().await;
        Ok(table.users.get(&id).filter(|u| u.is_active()).cloned())
    }

    async fn insert(&self, user: NewUser) -> Result<UserId, DomainError> {
        let mut table = self.table.write().await;

        if table.active_by_email(&user.email).is_some() {
            return Err(DomainError::duplicate_email(user.email));
        }

        table.last_id += 1;
        let id = UserId::new(table.last_id);
        table.users.insert(id, User::from_new(id, user));

        Ok(id)
    }

    async fn update(&self, user: &User) -> Result<(), DomainError> {
        let mut table = self.table.write().await;

        let email_taken = table
            .active_by_email(user.email())
            .is_some_and(|other| other.id() != user.id());

        if email_taken {
            return Err(DomainError::duplicate_email(user.email()));
        }

        match table.users.get_mut(&user.id()) {
            Some(existing) if existing.is_active() => {
                *existing = user.clone();
                Ok(())
            }
            _ => Err(DomainError::not_found(format!("User '{}' not found", user.id()))),
        }
    }

    async fn soft_delete(&self, id: UserId) -> Result<(), DomainError> {
        let mut table = self.table.write().await;

        match table.users.get_mut(&id) {
            Some(existing) if existing.is_active() => {
                existing.mark_deleted();
                Ok(())
            }
            _ => Err(DomainError::not_found(format!("User '{}' not found", id))),
        }
    }

    async fn list(&self, request: &PageRequest) -> Result<Page<User>, DomainError> {
        let table = self.table.read().await;

        let matching: Vec<&User> = table
            .users
            .values()
            .filter(|u| u.is_active() && request.matches_age(u.age()))
            .collect();

        let total = matching.len() as u64;
        let items = matching
            .into_iter()
            .skip(request.offset() as usize)
            .take(request.limit as usize)
            .cloned()
            .collect();

        Ok(Page::new(items, request, total))
    }

    async fn count_active(&self) -> Result<u64, DomainError> {
        let table = self.table.read().await;
        Ok(table.users.values().filter(|u| u.is_active()).count() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user(name: &str, email: &str, age: i32) -> NewUser {
        NewUser::new(name, email, age, "hash")
    }

    #[tokio::test]
    async fn test_insert_assigns_unique_ids() {
        let repo = InMemoryUserRepository::new();

        let a = repo.insert(new_user("A", "a@x.com", 30)).await.unwrap();
        let b = repo.insert(new_user("B", "b@x.com", 31)).await.unwrap();

        assert_ne!(a, b);
        assert_eq!(repo.find_by_id(a).await.unwrap().unwrap().email(), "a@x.com");
    }

    #[tokio::test]
    async fn test_email_uniqueness() {
        let repo = InMemoryUserRepository::new();
        repo.insert(new_user("A", "a@x.com", 30)).await.unwrap();

        let result = repo.insert(new_user("A2", "a@x.com", 30)).await;
        assert!(matches!(result, Err(DomainError::DuplicateEmail { .. })));
        assert_eq!(repo.count_active().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_email_match_is_case_sensitive() {
        let repo = InMemoryUserRepository::new();
        repo.insert(new_user("A", "a@x.com", 30)).await.unwrap();

        assert!(repo.insert(new_user("A", "A@x.com", 30)).await.is_ok());
        assert!(repo.find_by_email("A@X.COM").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_soft_deleted_users_are_hidden_and_free_their_email() {
        let repo = InMemoryUserRepository::new();
        let id = repo.insert(new_user("A", "a@x.com", 30)).await.unwrap();

        repo.soft_delete(id).await.unwrap();

        assert!(repo.find_by_id(id).await.unwrap().is_none());
        assert!(repo.find_by_email("a@x.com").await.unwrap().is_none());
        assert!(repo.insert(new_user("A", "a@x.com", 30)).await.is_ok());

        let again = repo.soft_delete(id).await;
        assert!(matches!(again, Err(DomainError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_update_rejects_taken_email() {
        let repo = InMemoryUserRepository::new();
        repo.insert(new_user("A", "a@x.com", 30)).await.unwrap();
        let b = repo.insert(new_user("B", "b@x.com", 30)).await.unwrap();

        let mut user = repo.find_by_id(b).await.unwrap().unwrap();
        user.set_email("a@x.com");

        let result = repo.update(&user).await;
        assert!(matches!(result, Err(DomainError::DuplicateEmail { .. })));

        user.set_email("b@x.com");
        user.set_age(45);
        repo.update(&user).await.unwrap();
        assert_eq!(repo.find_by_id(b).await.unwrap().unwrap().age(), 45);
    }

    #[tokio::test]
    async fn test_list_paginates_and_filters() {
        let repo = InMemoryUserRepository::new();
        for i in 0..15 {
            repo.insert(new_user("U", &format!("u{}@x.com", i), 20 + i))
                .await
                .unwrap();
        }

        let page = repo.list(&PageRequest::new(2, 10)).await.unwrap();
        assert_eq!(page.total, 15);
        assert_eq!(page.total_pages, 2);
        assert_eq!(page.items.len(), 5);

        let filtered = repo
            .list(&PageRequest::new(1, 10).with_age_range(Some(30), Some(32)))
            .await
            .unwrap();
        assert_eq!(filtered.total, 3);
        assert!(filtered.items.iter().all(|u| (30..=32).contains(&u.age())));
    }
}
