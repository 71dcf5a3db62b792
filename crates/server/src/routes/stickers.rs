//! Sticker-catalog route handlers.
//!
//! Reads are public; every mutation requires a logged-in account.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, patch},
};
use serde::Deserialize;
use tracing::instrument;

use sred_core::StickerCatalogId;

use crate::db::StickerCatalogRepository;
use crate::db::stickers::{NewStickerCatalog, StickerCatalogPatch};
use crate::error::AppError;
use crate::middleware::RequireAuth;
use crate::models::StickerCatalog;
use crate::routes::require_non_empty;
use crate::state::AppState;

/// Sticker catalog creation request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateStickerCatalogRequest {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub image_url: String,
}

/// Partial sticker catalog update request body.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateStickerCatalogRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
}

/// Build the sticker-catalog router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/stickers", get(list).post(create))
        .route("/api/stickers/{id}", patch(update).delete(remove))
}

/// List all sticker catalog pages.
///
/// GET /api/stickers
#[instrument(skip_all)]
async fn list(State(state): State<AppState>) -> Result<Json<Vec<StickerCatalog>>, AppError> {
    let catalogs = StickerCatalogRepository::new(state.pool()).list_all().await?;
    Ok(Json(catalogs))
}

/// Create a sticker catalog page.
///
/// POST /api/stickers
#[instrument(skip_all, fields(user = %user.username))]
async fn create(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Json(req): Json<CreateStickerCatalogRequest>,
) -> Result<(StatusCode, Json<StickerCatalog>), AppError> {
    require_non_empty(&req.title, "title")?;
    require_non_empty(&req.image_url, "imageUrl")?;

    let catalog = StickerCatalogRepository::new(state.pool())
        .create(&NewStickerCatalog {
            title: req.title.trim(),
            description: req.description.as_deref().unwrap_or(""),
            image_url: req.image_url.trim(),
        })
        .await?;

    tracing::info!(catalog = %catalog.title, "sticker catalog created");
    Ok((StatusCode::CREATED, Json(catalog)))
}

/// Apply a partial update to a sticker catalog page.
///
/// PATCH /api/stickers/{id}
#[instrument(skip(user, state, req), fields(user = %user.username))]
async fn update(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(req): Json<UpdateStickerCatalogRequest>,
) -> Result<Json<StickerCatalog>, AppError> {
    let patch = StickerCatalogPatch {
        title: req.title,
        description: req.description,
        image_url: req.image_url,
    };

    let catalog = StickerCatalogRepository::new(state.pool())
        .update(StickerCatalogId::new(id), &patch)
        .await?
        .ok_or_else(|| AppError::NotFound("catalog not found".to_owned()))?;

    Ok(Json(catalog))
}

/// Delete a sticker catalog page.
///
/// DELETE /api/stickers/{id}
#[instrument(skip(user, state), fields(user = %user.username))]
async fn remove(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, AppError> {
    let deleted = StickerCatalogRepository::new(state.pool())
        .delete(StickerCatalogId::new(id))
        .await?;

    if !deleted {
        return Err(AppError::NotFound("catalog not found".to_owned()));
    }

    Ok(StatusCode::NO_CONTENT)
}
