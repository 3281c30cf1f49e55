//! User entity and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::patch::Patch;
use crate::domain::status::RecordStatus;

/// User identifier assigned by storage on insert
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(i64);

impl UserId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl From<i64> for UserId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl std::str::FromStr for UserId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<i64>().map(Self)
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A user account
///
/// The password hash is never serialized; use [`PublicUser`] for anything
/// that leaves the process.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    id: UserId,
    name: String,
    email: String,
    age: i32,
    password_hash: String,
    status: RecordStatus,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl User {
    /// Rebuild a stored user
    #[allow(clippy::too_many_arguments)]
    pub fn from_parts(
        id: UserId,
        name: String,
        email: String,
        age: i32,
        password_hash: String,
        status: RecordStatus,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name,
            email,
            age,
            password_hash,
            status,
            created_at,
            updated_at,
        }
    }

    /// Materialize a new user once storage has assigned its id
    pub fn from_new(id: UserId, new: NewUser) -> Self {
        Self {
            id,
            name: new.name,
            email: new.email,
            age: new.age,
            password_hash: new.password_hash,
            status: RecordStatus::Active,
            created_at: new.created_at,
            updated_at: new.created_at,
        }
    }

    // Getters

    pub fn id(&self) -> UserId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn age(&self) -> i32 {
        self.age
    }

    pub fn password_hash(&self) -> &str {
        &self.password_hash
    }

    pub fn status(&self) -> RecordStatus {
        self.status
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }

    // Mutators

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
        self.touch();
    }

    pub fn set_email(&mut self, email: impl Into<String>) {
        self.email = email.into();
        self.touch();
    }

    pub fn set_age(&mut self, age: i32) {
        self.age = age;
        self.touch();
    }

    pub fn set_password_hash(&mut self, password_hash: impl Into<String>) {
        self.password_hash = password_hash.into();
        self.touch();
    }

    pub fn mark_deleted(&mut self) {
        self.status = RecordStatus::Deleted;
        self.touch();
    }

    /// Projection that is safe to expose
    pub fn to_public(&self) -> PublicUser {
        PublicUser {
            id: self.id,
            name: self.name.clone(),
            email: self.email.clone(),
            age: self.age,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// A user that has not been stored yet
#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub age: i32,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl NewUser {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        age: i32,
        password_hash: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            age,
            password_hash: password_hash.into(),
            created_at: Utc::now(),
        }
    }
}

/// Public projection of a user, without the password hash
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublicUser {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub age: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Partial profile update; every field is tri-state
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UserPatch {
    #[serde(default)]
    pub name: Patch<String>,
    #[serde(default)]
    pub email: Patch<String>,
    #[serde(default)]
    pub age: Patch<i32>,
    #[serde(default)]
    pub password: Patch<String>,
}

impl UserPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_missing()
            && self.email.is_missing()
            && self.age.is_missing()
            && self.password.is_missing()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_user() -> User {
        User::from_new(
            UserId::new(1),
            NewUser::new("Alice", "alice@example.com", 30, "hashed_password"),
        )
    }

    #[test]
    fn test_user_id_parse() {
        assert_eq!("42".parse::<UserId>().unwrap(), UserId::new(42));
        assert!("abc".parse::<UserId>().is_err());
        assert_eq!(UserId::new(7).to_string(), "7");
    }

    #[test]
    fn test_user_creation() {
        let user = create_test_user();

        assert_eq!(user.id(), UserId::new(1));
        assert_eq!(user.name(), "Alice");
        assert_eq!(user.email(), "alice@example.com");
        assert_eq!(user.age(), 30);
        assert!(user.is_active());
        assert_eq!(user.created_at(), user.updated_at());
    }

    #[test]
    fn test_user_mutators_touch_updated_at() {
        let mut user = create_test_user();
        let original_updated = user.updated_at();

        std::thread::sleep(std::time::Duration::from_millis(10));

        user.set_email("alice@new.example.com");
        assert_eq!(user.email(), "alice@new.example.com");
        assert!(user.updated_at() > original_updated);
    }

    #[test]
    fn test_mark_deleted() {
        let mut user = create_test_user();
        user.mark_deleted();

        assert!(!user.is_active());
        assert_eq!(user.status(), RecordStatus::Deleted);
    }

    #[test]
    fn test_public_projection_excludes_password() {
        let user = create_test_user();

        let json = serde_json::to_string(&user.to_public()).unwrap();
        assert!(!json.contains("hashed_password"));
        assert!(!json.contains("password"));
        assert!(json.contains("\"id\":1"));
    }

    #[test]
    fn test_patch_rejects_unknown_fields() {
        let result: Result<UserPatch, _> = serde_json::from_str(r#"{"id": 5}"#);
        assert!(result.is_err());

        let patch: UserPatch = serde_json::from_str(r#"{"age": 31}"#).unwrap();
        assert_eq!(patch.age, Patch::Value(31));
        assert!(!patch.is_empty());
        assert!(UserPatch::default().is_empty());
    }
}
