//! Contact-message route handlers.
//!
//! Submissions are public; the inbox is for logged-in accounts only.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get},
};
use serde::Deserialize;
use tracing::instrument;

use sred_core::MessageId;

use crate::db::MessageRepository;
use crate::db::messages::NewMessage;
use crate::error::AppError;
use crate::middleware::RequireAuth;
use crate::models::Message;
use crate::routes::{StatusMessage, require_non_empty};
use crate::state::AppState;

/// Minimum digits for a plausible phone number.
const MIN_PHONE_LENGTH: usize = 8;

/// Contact-form submission body. `selected_items` carries the serialized
/// selection snapshot when the visitor submits an order.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMessageRequest {
    pub name: String,
    pub phone: String,
    pub message: String,
    #[serde(default)]
    pub selected_items: Option<String>,
}

/// Build the messages router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/messages", get(list).post(create))
        .route("/api/messages/{id}", delete(remove))
}

/// Store a contact-form submission.
///
/// POST /api/messages
#[instrument(skip_all)]
async fn create(
    State(state): State<AppState>,
    Json(req): Json<CreateMessageRequest>,
) -> Result<(StatusCode, Json<Message>), AppError> {
    require_non_empty(&req.name, "name")?;
    require_non_empty(&req.message, "message")?;
    if req.phone.trim().len() < MIN_PHONE_LENGTH {
        return Err(AppError::Validation(format!(
            "phone number must be at least {MIN_PHONE_LENGTH} characters"
        )));
    }

    let message = MessageRepository::new(state.pool())
        .create(&NewMessage {
            name: req.name.trim(),
            phone: req.phone.trim(),
            message: req.message.trim(),
            selected_items: req.selected_items.as_deref(),
        })
        .await?;

    tracing::info!(message = %message.id, "contact message received");
    Ok((StatusCode::CREATED, Json(message)))
}

/// List the inbox, newest first.
///
/// GET /api/messages
#[instrument(skip_all, fields(user = %user.username))]
async fn list(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
) -> Result<Json<Vec<Message>>, AppError> {
    let messages = MessageRepository::new(state.pool()).list_all().await?;
    Ok(Json(messages))
}

/// Delete a message from the inbox.
///
/// DELETE /api/messages/{id}
#[instrument(skip(user, state), fields(user = %user.username))]
async fn remove(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<StatusMessage>, AppError> {
    let deleted = MessageRepository::new(state.pool())
        .delete(MessageId::new(id))
        .await?;

    if !deleted {
        return Err(AppError::NotFound("message not found".to_owned()));
    }

    Ok(Json(StatusMessage::new("message deleted")))
}
