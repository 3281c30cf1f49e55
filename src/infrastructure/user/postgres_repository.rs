//! PostgreSQL user repository

use std::time::Duration;

use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgRow};
use sqlx::Row;

use crate::domain::pagination::{Page, PageRequest};
use crate::domain::user::{NewUser, User, UserId, UserRepository};
use crate::domain::{DomainError, RecordStatus};
use crate::infrastructure::storage::{bounded, is_unique_violation, storage_error};

const USER_COLUMNS: &str =
    "id, name, email, age, password_hash, status, created_at, updated_at";

/// UserRepository backed by the `users` table
#[derive(Debug, Clone)]
pub struct PostgresUserRepository {
    pool: PgPool,
    query_timeout: Duration,
}

impl PostgresUserRepository {
    pub fn new(pool: PgPool, query_timeout: Duration) -> Self {
        Self {
            pool,
            query_timeout,
        }
    }

    async fn fetch_one_where(
        &self,
        operation: &str,
        predicate: &str,
        bind: UserKey<'_>,
    ) -> Result<Option<User>, DomainError> {
        let sql = format!(
            "SELECT {} FROM users WHERE {} AND status = 'active'",
            USER_COLUMNS, predicate
        );

        bounded(self.query_timeout, operation, async {
            let query = sqlx::query(&sql);
            let query = match bind {
                UserKey::Id(id) => query.bind(id.value()),
                UserKey::Email(email) => query.bind(email),
            };

            let row = query
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| storage_error(operation, e))?;

            row.map(|r| row_to_user(&r)).transpose()
        })
        .await
    }
}

#[derive(Clone, Copy)]
enum UserKey<'a> {
    Id(UserId),
    Email(&'a str),
}

fn row_to_user(row: &PgRow) -> Result<User, DomainError> {
    let decode = |e: sqlx::Error| storage_error("decode user row", e);

    let status: String = row.try_get("status").map_err(decode)?;

    Ok(User::from_parts(
        UserId::new(row.try_get("id").map_err(decode)?),
        row.try_get("name").map_err(decode)?,
        row.try_get("email").map_err(decode)?,
        row.try_get("age").map_err(decode)?,
        row.try_get("password_hash").map_err(decode)?,
        RecordStatus::from_stored(&status),
        row.try_get("created_at").map_err(decode)?,
        row.try_get("updated_at").map_err(decode)?,
    ))
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        self.fetch_one_where("find user by email", "email = $1", UserKey::Email(email))
            .await
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, DomainError> {
        self.fetch_one_where("find user by id", "id = $1", UserKey::Id(id))
            .await
    }

    async fn insert(&self, user: NewUser) -> Result<UserId, DomainError> {
        bounded(self.query_timeout, "insert user", async {
            let result = sqlx::query(
                r#"
                INSERT INTO users (name, email, age, password_hash, status, created_at, updated_at)
                VALUES ($1, $2, $3, $4, $5, $6, $6)
                RETURNING id
                "#,
            )
            .bind(&user.name)
            .bind(&user.email)
            .bind(user.age)
            .bind(&user.password_hash)
            .bind(RecordStatus::Active.as_str())
            .bind(user.created_at)
            .fetch_one(&self.pool)
            .await;

            match result {
                Ok(row) => row
                    .try_get::<i64, _>("id")
                    .map(UserId::new)
                    .map_err(|e| storage_error("insert user", e)),
                Err(e) if is_unique_violation(&e) => {
                    Err(DomainError::duplicate_email(user.email.clone()))
                }
                Err(e) => Err(storage_error("insert user", e)),
            }
        })
        .await
    }

    async fn update(&self, user: &User) -> Result<(), DomainError> {
        bounded(self.query_timeout, "update user", async {
            let result = sqlx::query(
                r#"
                UPDATE users
                SET name = $2, email = $3, age = $4, password_hash = $5, updated_at = $6
                WHERE id = $1 AND status = 'active'
                "#,
            )
            .bind(user.id().value())
            .bind(user.name())
            .bind(user.email())
            .bind(user.age())
            .bind(user.password_hash())
            .bind(user.updated_at())
            .execute(&self.pool)
            .await;

            match result {
                Ok(done) if done.rows_affected() == 0 => Err(DomainError::not_found(format!(
                    "User '{}' not found",
                    user.id()
                ))),
                Ok(_) => Ok(()),
                Err(e) if is_unique_violation(&e) => Err(DomainError::duplicate_email(user.email())),
                Err(e) => Err(storage_error("update user", e)),
            }
        })
        .await
    }

    async fn soft_delete(&self, id: UserId) -> Result<(), DomainError> {
        bounded(self.query_timeout, "delete user", async {
            let done = sqlx::query(
                "UPDATE users SET status = $2, updated_at = NOW() WHERE id = $1 AND status = 'active'",
            )
            .bind(id.value())
            .bind(RecordStatus::Deleted.as_str())
            .execute(&self.pool)
            .await
            .map_err(|e| storage_error("delete user", e))?;

            if done.rows_affected() == 0 {
                return Err(DomainError::not_found(format!("User '{}' not found", id)));
            }

            Ok(())
        })
        .await
    }

    async fn list(&self, request: &PageRequest) -> Result<Page<User>, DomainError> {
        bounded(self.query_timeout, "list users", async {
            let filter = "status = 'active' \
                 AND ($1::INTEGER IS NULL OR age >= $1) \
                 AND ($2::INTEGER IS NULL OR age <= $2)";

            let total: i64 = sqlx::query_scalar(&format!(
                "SELECT COUNT(*) FROM users WHERE {}",
                filter
            ))
            .bind(request.min_age)
            .bind(request.max_age)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| storage_error("count users", e))?;

            let rows = sqlx::query(&format!(
                "SELECT {} FROM users WHERE {} ORDER BY id LIMIT $3 OFFSET $4",
                USER_COLUMNS, filter
            ))
            .bind(request.min_age)
            .bind(request.max_age)
            .bind(i64::from(request.limit))
            .bind(request.offset() as i64)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| storage_error("list users", e))?;

            let items = rows
                .iter()
                .map(row_to_user)
                .collect::<Result<Vec<_>, _>>()?;

            Ok(Page::new(items, request, total.max(0) as u64))
        })
        .await
    }

    async fn count_active(&self) -> Result<u64, DomainError> {
        bounded(self.query_timeout, "count users", async {
            let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE status = 'active'")
                .fetch_one(&self.pool)
                .await
                .map_err(|e| storage_error("count users", e))?;

            Ok(count.max(0) as u64)
        })
        .await
    }
}
