//! Product endpoints.
//!
//! Reads are public; every mutation requires a logged-in account.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
};
use serde::Deserialize;
use tracing::instrument;

use sred_core::ProductId;

use crate::db::ProductRepository;
use crate::db::products::{NewProduct, ProductPatch};
use crate::error::AppError;
use crate::middleware::RequireAuth;
use crate::models::Product;
use crate::routes::require_non_empty;
use crate::state::AppState;

/// Product creation request body. The image is hosted externally; only
/// its URL is stored.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductRequest {
    pub name: String,
    pub description: String,
    pub image_url: String,
    pub category: String,
}

/// Partial product update request body.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateProductRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub category: Option<String>,
}

/// Build the products router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/products", get(list).post(create))
        .route(
            "/api/products/{id}",
            get(show).patch(update).delete(remove),
        )
}

/// List all products.
///
/// GET /api/products
#[instrument(skip_all)]
async fn list(State(state): State<AppState>) -> Result<Json<Vec<Product>>, AppError> {
    let products = ProductRepository::new(state.pool()).list_all().await?;
    Ok(Json(products))
}

/// Fetch a single product.
///
/// GET /api/products/{id}
#[instrument(skip(state))]
async fn show(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Product>, AppError> {
    let product = ProductRepository::new(state.pool())
        .get_by_id(ProductId::new(id))
        .await?
        .ok_or_else(|| AppError::NotFound("product not found".to_owned()))?;

    Ok(Json(product))
}

/// Create a product.
///
/// POST /api/products
#[instrument(skip_all, fields(user = %user.username))]
async fn create(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Json(req): Json<CreateProductRequest>,
) -> Result<(StatusCode, Json<Product>), AppError> {
    require_non_empty(&req.name, "name")?;
    require_non_empty(&req.description, "description")?;
    require_non_empty(&req.image_url, "imageUrl")?;
    require_non_empty(&req.category, "category")?;

    let product = ProductRepository::new(state.pool())
        .create(&NewProduct {
            name: req.name.trim(),
            description: req.description.trim(),
            image_url: req.image_url.trim(),
            category: req.category.trim(),
        })
        .await?;

    tracing::info!(product = %product.name, "product created");
    Ok((StatusCode::CREATED, Json(product)))
}

/// Apply a partial update to a product.
///
/// PATCH /api/products/{id}
#[instrument(skip(user, state, req), fields(user = %user.username))]
async fn update(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(req): Json<UpdateProductRequest>,
) -> Result<Json<Product>, AppError> {
    let patch = ProductPatch {
        name: req.name,
        description: req.description,
        image_url: req.image_url,
        category: req.category,
    };

    let product = ProductRepository::new(state.pool())
        .update(ProductId::new(id), &patch)
        .await?
        .ok_or_else(|| AppError::NotFound("product not found".to_owned()))?;

    Ok(Json(product))
}

/// Remove a product.
///
/// DELETE /api/products/{id}
#[instrument(skip(user, state), fields(user = %user.username))]
async fn remove(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, AppError> {
    let deleted = ProductRepository::new(state.pool())
        .delete(ProductId::new(id))
        .await?;

    if !deleted {
        return Err(AppError::NotFound("product not found".to_owned()));
    }

    Ok(StatusCode::NO_CONTENT)
}
