//! Accounts table access.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use sred_core::{Email, Role, UserId};

use super::{RepositoryError, conflict_on_unique};
use crate::models::User;

const USER_COLUMNS: &str = "id, username, email, password, role, reset_token, reset_token_expires";

/// Repository for admin-account database operations.
pub struct UserRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> UserRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all accounts, oldest first.
    ///
    /// # Errors
    ///
    /// Surfaces the underlying database failure.
    pub async fn list_all(&self) -> Result<Vec<User>, RepositoryError> {
        let users = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY id ASC"
        ))
        .fetch_all(self.pool)
        .await?;

        Ok(users)
    }

    /// Get an account by its ID.
    ///
    /// # Errors
    ///
    /// Surfaces the underlying database failure.
    pub async fn get_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(user)
    }

    /// Get an account by its unique username.
    ///
    /// # Errors
    ///
    /// Surfaces the underlying database failure.
    pub async fn get_by_username(&self, username: &str) -> Result<Option<User>, RepositoryError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE username = $1"
        ))
        .bind(username)
        .fetch_optional(self.pool)
        .await?;

        Ok(user)
    }

    /// Get an account by its unique email address.
    ///
    /// Takes a raw string because callers (login, password reset) receive
    /// untrusted identifiers and a non-email simply matches nothing.
    ///
    /// # Errors
    ///
    /// Surfaces the underlying database failure.
    pub async fn get_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(self.pool)
        .await?;

        Ok(user)
    }

    /// Count all accounts.
    ///
    /// # Errors
    ///
    /// Surfaces the underlying database failure.
    pub async fn count(&self) -> Result<i64, RepositoryError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
            .fetch_one(self.pool)
            .await?;

        Ok(count)
    }

    /// Count accounts holding the given role.
    ///
    /// # Errors
    ///
    /// Surfaces the underlying database failure.
    pub async fn count_by_role(&self, role: Role) -> Result<i64, RepositoryError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users WHERE role = $1")
            .bind(role)
            .fetch_one(self.pool)
            .await?;

        Ok(count)
    }

    /// Create a new account.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the username or email already
    /// exists, `RepositoryError::Database` for other database errors.
    pub async fn create(
        &self,
        username: &str,
        email: &Email,
        password_hash: &str,
        role: Role,
    ) -> Result<User, RepositoryError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (username, email, password, role)
             VALUES ($1, $2, $3, $4)
             RETURNING {USER_COLUMNS}"
        ))
        .bind(username)
        .bind(email)
        .bind(password_hash)
        .bind(role)
        .fetch_one(self.pool)
        .await
        .map_err(|e| conflict_on_unique(e, "username or email already exists"))?;

        Ok(user)
    }

    /// Replace an account's password hash.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the account doesn't exist,
    /// `RepositoryError::Database` for other database errors.
    pub async fn update_password(
        &self,
        id: UserId,
        password_hash: &str,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query("UPDATE users SET password = $1 WHERE id = $2")
            .bind(password_hash)
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    /// Set or clear the reset-code pair.
    ///
    /// The token and its expiry are written in one statement so they can
    /// never diverge: both set, or both null.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the account doesn't exist,
    /// `RepositoryError::Database` for other database errors.
    pub async fn set_reset_token(
        &self,
        id: UserId,
        token: Option<(&str, DateTime<Utc>)>,
    ) -> Result<(), RepositoryError> {
        let (token, expires) = match token {
            Some((token, expires)) => (Some(token), Some(expires)),
            None => (None, None),
        };

        let result = sqlx::query(
            "UPDATE users SET reset_token = $1, reset_token_expires = $2 WHERE id = $3",
        )
        .bind(token)
        .bind(expires)
        .bind(id)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    /// Commit a password reset: replace the hash and clear the reset-code
    /// pair in a single row update, so a failure leaves both untouched.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the account doesn't exist,
    /// `RepositoryError::Database` for other database errors.
    pub async fn update_password_and_clear_token(
        &self,
        id: UserId,
        password_hash: &str,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "UPDATE users
             SET password = $1, reset_token = NULL, reset_token_expires = NULL
             WHERE id = $2",
        )
        .bind(password_hash)
        .bind(id)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    /// Delete an account by its ID.
    ///
    /// Returns `true` if a row was deleted, `false` if it didn't exist.
    ///
    /// # Errors
    ///
    /// Surfaces the underlying database failure.
    pub async fn delete(&self, id: UserId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
