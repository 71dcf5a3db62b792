//! Promo repository for database operations.

use sqlx::PgPool;

use sred_core::PromoId;

use super::RepositoryError;
use crate::models::Promo;

const PROMO_COLUMNS: &str = "id, product_name, category, description, image_url, created_at";

/// Fields accepted when creating a promo.
#[derive(Debug)]
pub struct NewPromo<'a> {
    pub product_name: Option<&'a str>,
    pub category: Option<&'a str>,
    pub description: Option<&'a str>,
    pub image_url: &'a str,
}

/// Partial update of a promo; `None` fields are left unchanged.
#[derive(Debug, Default)]
pub struct PromoPatch {
    pub product_name: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
}

/// Repository for promo database operations.
pub struct PromoRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> PromoRepository<'a> {
    /// Create a new promo repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all promos, newest first.
    ///
    /// # Errors
    ///
    /// Surfaces the underlying database failure.
    pub async fn list_all(&self) -> Result<Vec<Promo>, RepositoryError> {
        let promos = sqlx::query_as::<_, Promo>(&format!(
            "SELECT {PROMO_COLUMNS} FROM promos ORDER BY created_at DESC"
        ))
        .fetch_all(self.pool)
        .await?;

        Ok(promos)
    }

    /// Create a new promo.
    ///
    /// # Errors
    ///
    /// Surfaces the underlying database failure.
    pub async fn create(&self, new: &NewPromo<'_>) -> Result<Promo, RepositoryError> {
        let promo = sqlx::query_as::<_, Promo>(&format!(
            "INSERT INTO promos (product_name, category, description, image_url)
             VALUES ($1, $2, $3, $4)
             RETURNING {PROMO_COLUMNS}"
        ))
        .bind(new.product_name)
        .bind(new.category)
        .bind(new.description)
        .bind(new.image_url)
        .fetch_one(self.pool)
        .await?;

        Ok(promo)
    }

    /// Apply a partial update, returning the updated promo or `None` when
    /// the ID doesn't exist.
    ///
    /// # Errors
    ///
    /// Surfaces the underlying database failure.
    pub async fn update(
        &self,
        id: PromoId,
        patch: &PromoPatch,
    ) -> Result<Option<Promo>, RepositoryError> {
        let promo = sqlx::query_as::<_, Promo>(&format!(
            "UPDATE promos
             SET product_name = COALESCE($2, product_name),
                 category = COALESCE($3, category),
                 description = COALESCE($4, description),
                 image_url = COALESCE($5, image_url)
             WHERE id = $1
             RETURNING {PROMO_COLUMNS}"
        ))
        .bind(id)
        .bind(patch.product_name.as_deref())
        .bind(patch.category.as_deref())
        .bind(patch.description.as_deref())
        .bind(patch.image_url.as_deref())
        .fetch_optional(self.pool)
        .await?;

        Ok(promo)
    }

    /// Delete a promo by its ID.
    ///
    /// Returns `true` if a row was deleted, `false` if it didn't exist.
    ///
    /// # Errors
    ///
    /// Surfaces the underlying database failure.
    pub async fn delete(&self, id: PromoId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM promos WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
