//! Site-settings repository for database operations.

use sqlx::PgPool;

use super::RepositoryError;
use crate::models::Settings;

const SETTINGS_COLUMNS: &str =
    "id, instagram_reel, facebook_reel, tiktok_reel, stickers_image_url, updated_at";

/// Partial update of the settings row; `None` fields are left unchanged.
#[derive(Debug, Default)]
pub struct SettingsPatch {
    pub instagram_reel: Option<String>,
    pub facebook_reel: Option<String>,
    pub tiktok_reel: Option<String>,
    pub stickers_image_url: Option<String>,
}

/// Repository for the settings singleton.
pub struct SettingsRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> SettingsRepository<'a> {
    /// Create a new settings repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Fetch the settings row, creating the default row on first access.
    ///
    /// # Errors
    ///
    /// Database failures come back as `RepositoryError::Database`.
    pub async fn get_or_create(&self) -> Result<Settings, RepositoryError> {
        let existing = sqlx::query_as::<_, Settings>(&format!(
            "SELECT {SETTINGS_COLUMNS} FROM settings ORDER BY id ASC LIMIT 1"
        ))
        .fetch_optional(self.pool)
        .await?;

        if let Some(settings) = existing {
            return Ok(settings);
        }

        let created = sqlx::query_as::<_, Settings>(&format!(
            "INSERT INTO settings (instagram_reel, facebook_reel, tiktok_reel)
             VALUES ('', '', '')
             RETURNING {SETTINGS_COLUMNS}"
        ))
        .fetch_one(self.pool)
        .await?;

        Ok(created)
    }

    /// Merge the provided fields into the settings row and bump `updated_at`.
    ///
    /// # Errors
    ///
    /// Database failures come back as `RepositoryError::Database`.
    pub async fn update(&self, patch: &SettingsPatch) -> Result<Settings, RepositoryError> {
        let current = self.get_or_create().await?;

        let settings = sqlx::query_as::<_, Settings>(&format!(
            "UPDATE settings
             SET instagram_reel = COALESCE($2, instagram_reel),
                 facebook_reel = COALESCE($3, facebook_reel),
                 tiktok_reel = COALESCE($4, tiktok_reel),
                 stickers_image_url = COALESCE($5, stickers_image_url),
                 updated_at = now()
             WHERE id = $1
             RETURNING {SETTINGS_COLUMNS}"
        ))
        .bind(current.id)
        .bind(patch.instagram_reel.as_deref())
        .bind(patch.facebook_reel.as_deref())
        .bind(patch.tiktok_reel.as_deref())
        .bind(patch.stickers_image_url.as_deref())
        .fetch_one(self.pool)
        .await?;

        Ok(settings)
    }
}
