//! Contact-message repository for database operations.

use sqlx::PgPool;

use sred_core::MessageId;

use super::RepositoryError;
use crate::models::Message;

const MESSAGE_COLUMNS: &str = "id, name, phone, message, selected_items, read, created_at";

/// Fields accepted when storing a contact-form submission.
#[derive(Debug)]
pub struct NewMessage<'a> {
    pub name: &'a str,
    pub phone: &'a str,
    pub message: &'a str,
    pub selected_items: Option<&'a str>,
}

/// Repository for contact-message database operations.
pub struct MessageRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> MessageRepository<'a> {
    /// Create a new message repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all messages, newest first.
    ///
    /// # Errors
    ///
    /// Surfaces the underlying database failure.
    pub async fn list_all(&self) -> Result<Vec<Message>, RepositoryError> {
        let messages = sqlx::query_as::<_, Message>(&format!(
            "SELECT {MESSAGE_COLUMNS} FROM messages ORDER BY created_at DESC"
        ))
        .fetch_all(self.pool)
        .await?;

        Ok(messages)
    }

    /// Store a new contact-form submission.
    ///
    /// # Errors
    ///
    /// Surfaces the underlying database failure.
    pub async fn create(&self, new: &NewMessage<'_>) -> Result<Message, RepositoryError> {
        let message = sqlx::query_as::<_, Message>(&format!(
            "INSERT INTO messages (name, phone, message, selected_items)
             VALUES ($1, $2, $3, $4)
             RETURNING {MESSAGE_COLUMNS}"
        ))
        .bind(new.name)
        .bind(new.phone)
        .bind(new.message)
        .bind(new.selected_items)
        .fetch_one(self.pool)
        .await?;

        Ok(message)
    }

    /// Delete a message by its ID.
    ///
    /// Returns `true` if a row was deleted, `false` if it didn't exist.
    ///
    /// # Errors
    ///
    /// Surfaces the underlying database failure.
    pub async fn delete(&self, id: MessageId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM messages WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
