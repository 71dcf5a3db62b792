//! Site-settings route handlers.

use axum::{Json, Router, extract::State, routing::get};
use serde::Deserialize;
use tracing::instrument;

use crate::db::SettingsRepository;
use crate::db::settings::SettingsPatch;
use crate::error::AppError;
use crate::middleware::RequireAuth;
use crate::models::Settings;
use crate::state::AppState;

/// Partial settings update request body.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateSettingsRequest {
    pub instagram_reel: Option<String>,
    pub facebook_reel: Option<String>,
    pub tiktok_reel: Option<String>,
    pub stickers_image_url: Option<String>,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/api/settings", get(show).patch(update))
}

/// Fetch the settings singleton, creating the default row on first read.
///
/// GET /api/settings
#[instrument(skip_all)]
async fn show(State(state): State<AppState>) -> Result<Json<Settings>, AppError> {
    let settings = SettingsRepository::new(state.pool()).get_or_create().await?;
    Ok(Json(settings))
}

/// Merge the provided fields into the settings singleton.
///
/// PATCH /api/settings
#[instrument(skip_all, fields(user = %user.username))]
async fn update(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Json(req): Json<UpdateSettingsRequest>,
) -> Result<Json<Settings>, AppError> {
    let patch = SettingsPatch {
        instagram_reel: req.instagram_reel,
        facebook_reel: req.facebook_reel,
        tiktok_reel: req.tiktok_reel,
        stickers_image_url: req.stickers_image_url,
    };

    let settings = SettingsRepository::new(state.pool()).update(&patch).await?;

    tracing::info!(user = %user.username, "settings updated");
    Ok(Json(settings))
}
