//! Sticker-catalog repository for database operations.

use sqlx::PgPool;

use sred_core::StickerCatalogId;

use super::RepositoryError;
use crate::models::StickerCatalog;

/// Fields accepted when creating a sticker catalog page.
#[derive(Debug)]
pub struct NewStickerCatalog<'a> {
    pub title: &'a str,
    pub description: &'a str,
    pub image_url: &'a str,
}

/// Partial update of a sticker catalog page; `None` fields are left unchanged.
#[derive(Debug, Default)]
pub struct StickerCatalogPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
}

/// Repository for sticker-catalog database operations.
pub struct StickerCatalogRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> StickerCatalogRepository<'a> {
    /// Create a new sticker-catalog repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all sticker catalog pages.
    ///
    /// # Errors
    ///
    /// Database failures come back as `RepositoryError::Database`.
    pub async fn list_all(&self) -> Result<Vec<StickerCatalog>, RepositoryError> {
        let catalogs = sqlx::query_as::<_, StickerCatalog>(
            "SELECT id, title, description, image_url FROM sticker_catalogs ORDER BY id ASC",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(catalogs)
    }

    /// Create a new sticker catalog page.
    ///
    /// # Errors
    ///
    /// Database failures come back as `RepositoryError::Database`.
    pub async fn create(
        &self,
        new: &NewStickerCatalog<'_>,
    ) -> Result<StickerCatalog, RepositoryError> {
        let catalog = sqlx::query_as::<_, StickerCatalog>(
            "INSERT INTO sticker_catalogs (title, description, image_url)
             VALUES ($1, $2, $3)
             RETURNING id, title, description, image_url",
        )
        .bind(new.title)
        .bind(new.description)
        .bind(new.image_url)
        .fetch_one(self.pool)
        .await?;

        Ok(catalog)
    }

    /// Apply a partial update, returning the updated page or `None` when
    /// the ID doesn't exist.
    ///
    /// # Errors
    ///
    /// Database failures come back as `RepositoryError::Database`.
    pub async fn update(
        &self,
        id: StickerCatalogId,
        patch: &StickerCatalogPatch,
    ) -> Result<Option<StickerCatalog>, RepositoryError> {
        let catalog = sqlx::query_as::<_, StickerCatalog>(
            "UPDATE sticker_catalogs
             SET title = COALESCE($2, title),
                 description = COALESCE($3, description),
                 image_url = COALESCE($4, image_url)
             WHERE id = $1
             RETURNING id, title, description, image_url",
        )
        .bind(id)
        .bind(patch.title.as_deref())
        .bind(patch.description.as_deref())
        .bind(patch.image_url.as_deref())
        .fetch_optional(self.pool)
        .await?;

        Ok(catalog)
    }

    /// Delete a sticker catalog page by its ID.
    ///
    /// Returns `true` if a row was deleted, `false` if it didn't exist.
    ///
    /// # Errors
    ///
    /// Database failures come back as `RepositoryError::Database`.
    pub async fn delete(&self, id: StickerCatalogId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM sticker_catalogs WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
