//! Promo route handlers.
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

use sred_core::PromoId;

use crate::db::PromoRepository;
use crate::db::promos::{NewPromo, PromoPatch};
use crate::error::AppError;
use crate::middleware::RequireAuth;
use crate::models::Promo;
use crate::routes::require_non_empty;
use crate::state::AppState;

/// Promo creation request body. Only the image is mandatory.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePromoRequest {
    pub product_name: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub image_url: String,
}

/// Partial promo update request body.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdatePromoRequest {
    pub product_name: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
}

/// Build the promos router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/promos", get(list).post(create))
        .route("/api/promos/{id}", patch(update).delete(remove))
}

/// List all promos, newest first.
///
/// GET /api/promos
#[instrument(skip_all)]
async fn list(State(state): State<AppState>) -> Result<Json<Vec<Promo>>, AppError> {
    let promos = PromoRepository::new(state.pool()).list_all().await?;
    Ok(Json(promos))
}

/// Create a promo.
///
/// POST /api/promos
#[instrument(skip_all, fields(user = %user.username))]
async fn create(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Json(req): Json<CreatePromoRequest>,
) -> Result<(StatusCode, Json<Promo>), AppError> {
    require_non_empty(&req.image_url, "imageUrl")?;

    let promo = PromoRepository::new(state.pool())
        .create(&NewPromo {
            product_name: req.product_name.as_deref(),
            category: req.category.as_deref(),
            description: req.description.as_deref(),
            image_url: req.image_url.trim(),
        })
        .await?;

    tracing::info!(promo = %promo.id, "promo created");
    Ok((StatusCode::CREATED, Json(promo)))
}

/// Apply a partial update to a promo.
///
/// PATCH /api/promos/{id}
#[instrument(skip(user, state, req), fields(user = %user.username))]
async fn update(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(req): Json<UpdatePromoRequest>,
) -> Result<Json<Promo>, AppError> {
    let patch = PromoPatch {
        product_name: req.product_name,
        category: req.category,
        description: req.description,
        image_url: req.image_url,
    };

    let promo = PromoRepository::new(state.pool())
        .update(PromoId::new(id), &patch)
        .await?
        .ok_or_else(|| AppError::NotFound("promo not found".to_owned()))?;

    Ok(Json(promo))
}

/// Delete a promo.
///
/// DELETE /api/promos/{id}
#[instrument(skip(user, state), fields(user = %user.username))]
async fn remove(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, AppError> {
    let deleted = PromoRepository::new(state.pool())
        .delete(PromoId::new(id))
        .await?;

    if !deleted {
        return Err(AppError::NotFound("promo not found".to_owned()));
    }

    Ok(StatusCode::NO_CONTENT)
}
