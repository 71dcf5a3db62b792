//! Password-reset route handlers.
//!
//! Three unauthenticated steps gated by a time-limited code:
//! request the code, verify it, commit the new password. None of them
//! reveal whether an email belongs to an account.

use axum::{Json, Router, extract::State, routing::post};
use serde::Deserialize;
use tracing::instrument;

use crate::error::AppError;
use crate::routes::StatusMessage;
use crate::services::PasswordResetService;
use crate::state::AppState;

/// Acknowledgement sent whether or not the email matched an account.
const RESET_REQUESTED_MESSAGE: &str = "If an account exists, a reset code has been sent.";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForgotPasswordRequest {
    pub email: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyCodeRequest {
    pub email: Option<String>,
    pub code: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    pub email: Option<String>,
    pub code: Option<String>,
    pub new_password: Option<String>,
}

/// Build the password-reset router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/forgot-password", post(forgot_password))
        .route("/api/verify-code", post(verify_code))
        .route("/api/reset-password", post(reset_password))
}

/// Issue a reset code to the account behind the email, if any.
///
/// POST /api/forgot-password
#[instrument(skip_all)]
async fn forgot_password(
    State(state): State<AppState>,
    Json(req): Json<ForgotPasswordRequest>,
) -> Result<Json<StatusMessage>, AppError> {
    let email = require_field(req.email, "email")?;

    let service = PasswordResetService::new(state.pool(), state.email());
    service.request(email.trim()).await?;

    Ok(Json(StatusMessage::new(RESET_REQUESTED_MESSAGE)))
}

/// Check a code without consuming it.
///
/// POST /api/verify-code
#[instrument(skip_all)]
async fn verify_code(
    State(state): State<AppState>,
    Json(req): Json<VerifyCodeRequest>,
) -> Result<Json<StatusMessage>, AppError> {
    let email = require_field(req.email, "email")?;
    let code = require_field(req.code, "code")?;

    let service = PasswordResetService::new(state.pool(), state.email());
    service.verify(email.trim(), &code).await?;

    Ok(Json(StatusMessage::new("Code valid.")))
}

/// Commit the new password.
///
/// POST /api/reset-password
#[instrument(skip_all)]
async fn reset_password(
    State(state): State<AppState>,
    Json(req): Json<ResetPasswordRequest>,
) -> Result<Json<StatusMessage>, AppError> {
    let email = require_field(req.email, "email")?;
    let code = require_field(req.code, "code")?;
    let new_password = require_field(req.new_password, "newPassword")?;

    let service = PasswordResetService::new(state.pool(), state.email());
    service.commit(email.trim(), &code, &new_password).await?;

    Ok(Json(StatusMessage::new(
        "Your password has been reset successfully. You can now log in with your username or email.",
    )))
}

/// Field-level presence check, rejected before any lookup.
fn require_field(value: Option<String>, name: &str) -> Result<String, AppError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(AppError::Validation(format!("{name} is required"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_field() {
        assert_eq!(
            require_field(Some("x".to_owned()), "email").ok(),
            Some("x".to_owned())
        );
        assert!(require_field(Some("  ".to_owned()), "email").is_err());
        assert!(require_field(None, "email").is_err());
    }
}
