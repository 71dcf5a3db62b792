//! Team management route handlers (superadmin only).

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get},
};
use serde::Deserialize;
use tracing::instrument;

use sred_core::{Role, UserId};

use crate::db::UserRepository;
use crate::error::AppError;
use crate::middleware::RequireSuperAdmin;
use crate::models::{CurrentUser, User, UserView};
use crate::services::AuthService;
use crate::state::AppState;

/// Account creation request body. Role defaults to `admin`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub role: Option<Role>,
}

/// Build the team-management router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/admin/users", get(list).post(create))
        .route("/api/admin/users/{id}", delete(remove))
}

/// List all accounts, sanitized.
///
/// GET /api/admin/users
#[instrument(skip_all, fields(user = %current.username))]
async fn list(
    RequireSuperAdmin(current): RequireSuperAdmin,
    State(state): State<AppState>,
) -> Result<Json<Vec<UserView>>, AppError> {
    let users = UserRepository::new(state.pool()).list_all().await?;
    Ok(Json(users.iter().map(UserView::from).collect()))
}

/// Create an account.
///
/// Duplicate-field errors name the offending field here - the caller is
/// already a superadmin, so revealing existence is intended.
///
/// POST /api/admin/users
#[instrument(skip_all, fields(user = %current.username, new_account = %req.username))]
async fn create(
    RequireSuperAdmin(current): RequireSuperAdmin,
    State(state): State<AppState>,
    Json(req): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserView>), AppError> {
    let auth = AuthService::new(state.pool());
    let user = auth
        .create_account(
            req.username.trim(),
            req.email.trim(),
            &req.password,
            req.role.unwrap_or_default(),
        )
        .await?;

    // Welcome email is best-effort; a failed send must not fail creation.
    if let Some(email) = state.email()
        && let Err(e) = email.send_welcome(user.email.as_str(), &user.username).await
    {
        tracing::warn!(error = %e, "failed to send welcome email");
    }

    tracing::info!(account = %user.username, role = %user.role, "account created");
    Ok((StatusCode::CREATED, Json(UserView::from(user))))
}

/// Delete an account, subject to the safety guards.
///
/// DELETE /api/admin/users/{id}
#[instrument(skip(current, state), fields(user = %current.username))]
async fn remove(
    RequireSuperAdmin(current): RequireSuperAdmin,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, AppError> {
    let users = UserRepository::new(state.pool());

    let target = users
        .get_by_id(UserId::new(id))
        .await?
        .ok_or_else(|| AppError::NotFound("user not found".to_owned()))?;

    let superadmin_count = users.count_by_role(Role::Superadmin).await?;

    check_deletion(
        &target,
        &current,
        superadmin_count,
        state.config().protected_username.as_deref(),
    )?;

    users.delete(target.id).await?;

    tracing::info!(deleted = %target.username, "account deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// Deletion guards: no self-deletion, the protected account is untouchable,
/// and the last superadmin must survive.
fn check_deletion(
    target: &User,
    current: &CurrentUser,
    superadmin_count: i64,
    protected_username: Option<&str>,
) -> Result<(), AppError> {
    if target.id == current.id {
        return Err(AppError::Validation(
            "you cannot delete your own account".to_owned(),
        ));
    }

    if protected_username.is_some_and(|name| name == target.username) {
        return Err(AppError::Authorization(
            "this account is protected and cannot be deleted".to_owned(),
        ));
    }

    if target.role == Role::Superadmin && superadmin_count <= 1 {
        return Err(AppError::Validation(
            "cannot delete the last superadmin".to_owned(),
        ));
    }

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sred_core::Email;

    fn account(id: i32, username: &str, role: Role) -> User {
        User {
            id: UserId::new(id),
            username: username.to_owned(),
            email: Email::parse(&format!("{username}@example.com")).unwrap(),
            password_hash: "aa.bb".to_owned(),
            role,
            reset_token: None,
            reset_token_expires: None,
        }
    }

    fn caller(id: i32, username: &str) -> CurrentUser {
        CurrentUser::from(&account(id, username, Role::Superadmin))
    }

    #[test]
    fn test_self_deletion_is_rejected() {
        let target = account(1, "amira", Role::Superadmin);
        let current = caller(1, "amira");

        assert!(matches!(
            check_deletion(&target, &current, 2, None),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_protected_account_is_rejected_regardless_of_role() {
        let target = account(2, "mohamed", Role::Admin);
        let current = caller(1, "amira");

        assert!(matches!(
            check_deletion(&target, &current, 2, Some("mohamed")),
            Err(AppError::Authorization(_))
        ));
    }

    #[test]
    fn test_last_superadmin_is_rejected() {
        let target = account(2, "omar", Role::Superadmin);
        let current = caller(1, "amira");

        assert!(matches!(
            check_deletion(&target, &current, 1, None),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_regular_deletion_is_allowed() {
        let target = account(2, "omar", Role::Admin);
        let current = caller(1, "amira");

        assert!(check_deletion(&target, &current, 1, Some("mohamed")).is_ok());
    }

    #[test]
    fn test_superadmin_deletion_allowed_when_another_remains() {
        let target = account(2, "omar", Role::Superadmin);
        let current = caller(1, "amira");

        assert!(check_deletion(&target, &current, 2, None).is_ok());
    }
}
