//! Product repository for database operations.

use sqlx::PgPool;

use sred_core::ProductId;

use super::RepositoryError;
use crate::models::Product;

/// Fields accepted when creating a product.
#[derive(Debug)]
pub struct NewProduct<'a> {
    pub name: &'a str,
    pub description: &'a str,
    pub image_url: &'a str,
    pub category: &'a str,
}

/// Partial update of a product; `None` fields are left unchanged.
#[derive(Debug, Default)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub category: Option<String>,
}

/// Repository for product database operations.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all products.
    ///
    /// # Errors
    ///
    /// Database failures come back as `RepositoryError::Database`.
    pub async fn list_all(&self) -> Result<Vec<Product>, RepositoryError> {
        let products = sqlx::query_as::<_, Product>(
            "SELECT id, name, description, image_url, category FROM products ORDER BY id ASC",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(products)
    }

    /// Get a product by its ID.
    ///
    /// # Errors
    ///
    /// Database failures come back as `RepositoryError::Database`.
    pub async fn get_by_id(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let product = sqlx::query_as::<_, Product>(
            "SELECT id, name, description, image_url, category FROM products WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(product)
    }

    /// Insert a product.
    ///
    /// # Errors
    ///
    /// Database failures come back as `RepositoryError::Database`.
    pub async fn create(&self, new: &NewProduct<'_>) -> Result<Product, RepositoryError> {
        let product = sqlx::query_as::<_, Product>(
            "INSERT INTO products (name, description, image_url, category)
             VALUES ($1, $2, $3, $4)
             RETURNING id, name, description, image_url, category",
        )
        .bind(new.name)
        .bind(new.description)
        .bind(new.image_url)
        .bind(new.category)
        .fetch_one(self.pool)
        .await?;

        Ok(product)
    }

    /// Apply a partial update, returning the updated product or `None`
    /// when the ID doesn't exist.
    ///
    /// # Errors
    ///
    /// Database failures come back as `RepositoryError::Database`.
    pub async fn update(
        &self,
        id: ProductId,
        patch: &ProductPatch,
    ) -> Result<Option<Product>, RepositoryError> {
        let product = sqlx::query_as::<_, Product>(
            "UPDATE products
             SET name = COALESCE($2, name),
                 description = COALESCE($3, description),
                 image_url = COALESCE($4, image_url),
                 category = COALESCE($5, category)
             WHERE id = $1
             RETURNING id, name, description, image_url, category",
        )
        .bind(id)
        .bind(patch.name.as_deref())
        .bind(patch.description.as_deref())
        .bind(patch.image_url.as_deref())
        .bind(patch.category.as_deref())
        .fetch_optional(self.pool)
        .await?;

        Ok(product)
    }

    /// Delete a product by its ID.
    ///
    /// Returns `true` if a row was deleted, `false` if it didn't exist.
    ///
    /// # Errors
    ///
    /// Database failures come back as `RepositoryError::Database`.
    pub async fn delete(&self, id: ProductId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
