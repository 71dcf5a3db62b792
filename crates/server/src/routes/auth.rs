//! Login, logout, registration and password-change endpoints.
//!
//! Login accepts a username or an email in the same field. Every
//! user-shaped response is a sanitized [`UserView`]; credential and
//! reset fields never reach the wire.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::AppError;
use crate::middleware::{OptionalAuth, RequireAuth, clear_current_user, set_current_user};
use crate::models::{CurrentUser, UserView};
use crate::routes::StatusMessage;
use crate::services::AuthService;
use crate::state::AppState;

/// Login request body. `username` may be a username or an email.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Bootstrap registration request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Password change request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub old_password: String,
    pub new_password: String,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/login", post(login))
        .route("/api/logout", post(logout))
        .route("/api/user", get(current_user))
        .route("/api/register", post(register))
        .route("/api/user/change-password", post(change_password))
}

/// Log in and bind the session to the account.
///
/// POST /api/login
#[instrument(skip_all, fields(identifier = %req.username))]
async fn login(
    State(state): State<AppState>,
    session: Session,
    Json(req): Json<LoginRequest>,
) -> Result<Json<UserView>, AppError> {
    let auth = AuthService::new(state.pool());
    let user = auth.login(req.username.trim(), &req.password).await?;

    let current = CurrentUser::from(&user);
    set_current_user(&session, &current)
        .await
        .map_err(|e| AppError::Internal(format!("session error: {e}")))?;

    tracing::info!(user = %user.username, "login successful");
    Ok(Json(UserView::from(user)))
}

/// Unbind the account from the session.
///
/// Always answers 200, logged in or not.
///
/// POST /api/logout
#[instrument(skip_all)]
async fn logout(session: Session) -> Result<StatusCode, AppError> {
    clear_current_user(&session)
        .await
        .map_err(|e| AppError::Internal(format!("session error: {e}")))?;

    Ok(StatusCode::OK)
}

/// The sanitized current account, or null when anonymous.
///
/// GET /api/user
#[instrument(skip_all)]
async fn current_user(OptionalAuth(user): OptionalAuth) -> Json<Option<UserView>> {
    Json(user.as_ref().map(UserView::from))
}

/// Bootstrap registration: only while zero accounts exist; the first
/// registrant becomes a superadmin and is logged in.
///
/// POST /api/register
#[instrument(skip_all, fields(username = %req.username))]
async fn register(
    State(state): State<AppState>,
    session: Session,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<UserView>), AppError> {
    let auth = AuthService::new(state.pool());
    let user = auth
        .register_first(req.username.trim(), req.email.trim(), &req.password)
        .await?;

    // Welcome email is best-effort; a failed send must not fail signup.
    if let Some(email) = state.email()
        && let Err(e) = email.send_welcome(user.email.as_str(), &user.username).await
    {
        tracing::warn!(error = %e, "failed to send welcome email");
    }

    let current = CurrentUser::from(&user);
    set_current_user(&session, &current)
        .await
        .map_err(|e| AppError::Internal(format!("session error: {e}")))?;

    tracing::info!(user = %user.username, "bootstrap account registered");
    Ok((StatusCode::CREATED, Json(UserView::from(user))))
}

/// Change the password of the logged-in account.
///
/// POST /api/user/change-password
#[instrument(skip_all, fields(user = %current.username))]
async fn change_password(
    RequireAuth(current): RequireAuth,
    State(state): State<AppState>,
    Json(req): Json<ChangePasswordRequest>,
) -> Result<Json<StatusMessage>, AppError> {
    let auth = AuthService::new(state.pool());
    auth.change_password(current.id, &req.old_password, &req.new_password)
        .await?;

    tracing::info!(user = %current.username, "password changed");
    Ok(Json(StatusMessage::new("password updated successfully")))
}
