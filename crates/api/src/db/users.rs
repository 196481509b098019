//! User repository for database operations.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use shopdex_core::{UserId, UserRole, UserStatus};

use super::RepositoryError;
use crate::models::User;

/// Raw `users` row.
#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: UserId,
    subject: String,
    display_name: Option<String>,
    email: Option<String>,
    role: UserRole,
    status: UserStatus,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            subject: row.subject,
            display_name: row.display_name,
            email: row.email,
            role: row.role,
            status: row.status,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

const USER_COLUMNS: &str =
    "id, subject, display_name, email, role, status, created_at, updated_at";

/// Repository for user database operations.
pub struct UserRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Register a new member account for an identity-provider subject.
    ///
    /// New accounts start as `member`/`pending`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the subject is already
    /// registered, `RepositoryError::Database` for other failures.
    pub async fn register(
        &self,
        subject: &str,
        display_name: Option<&str>,
        email: Option<&str>,
    ) -> Result<User, RepositoryError> {
        let sql = format!(
            "INSERT INTO users (subject, display_name, email) \
             VALUES ($1, $2, $3) \
             RETURNING {USER_COLUMNS}"
        );
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(subject)
            .bind(display_name)
            .bind(email)
            .fetch_one(self.pool)
            .await
            .map_err(|e| {
                if let sqlx::Error::Database(ref db_err) = e
                    && db_err.is_unique_violation()
                {
                    return RepositoryError::Conflict("account already registered".to_owned());
                }
                RepositoryError::Database(e)
            })?;

        Ok(row.into())
    }

    /// Get a user by the identity provider's subject identifier.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_subject(&self, subject: &str) -> Result<Option<User>, RepositoryError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE subject = $1");
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(subject)
            .fetch_optional(self.pool)
            .await?;

        Ok(row.map(Into::into))
    }

    /// Get a user by their ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(id)
            .fetch_optional(self.pool)
            .await?;

        Ok(row.map(Into::into))
    }

    /// List users for the admin moderation view, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(
        &self,
        status: Option<UserStatus>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<User>, RepositoryError> {
        let sql = format!(
            "SELECT {USER_COLUMNS} FROM users \
             WHERE ($1::user_status IS NULL OR status = $1) \
             ORDER BY created_at DESC, id DESC \
             LIMIT $2 OFFSET $3"
        );
        let rows = sqlx::query_as::<_, UserRow>(&sql)
            .bind(status)
            .bind(limit)
            .bind(offset)
            .fetch_all(self.pool)
            .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Change an account's moderation status (admin action).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no user matches the id,
    /// `RepositoryError::Database` for other failures.
    pub async fn set_status(
        &self,
        id: UserId,
        status: UserStatus,
    ) -> Result<User, RepositoryError> {
        let sql = format!(
            "UPDATE users SET status = $2, updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {USER_COLUMNS}"
        );
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(id)
            .bind(status)
            .fetch_optional(self.pool)
            .await?
            .ok_or(RepositoryError::NotFound)?;

        Ok(row.into())
    }

    /// Grant the admin role to an existing account by subject.
    ///
    /// Also approves the account: an admin stuck in `pending` would be
    /// unable to do anything useful.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the subject is unknown,
    /// `RepositoryError::Database` for other failures.
    pub async fn grant_admin(&self, subject: &str) -> Result<User, RepositoryError> {
        let sql = format!(
            "UPDATE users SET role = 'admin', status = 'approved', updated_at = NOW() \
             WHERE subject = $1 \
             RETURNING {USER_COLUMNS}"
        );
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(subject)
            .fetch_optional(self.pool)
            .await?
            .ok_or(RepositoryError::NotFound)?;

        Ok(row.into())
    }
}
