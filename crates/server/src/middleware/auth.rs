//! Authentication extractors for route guards.
//!
//! Every state-mutating admin handler takes one of these extractors, so
//! the session check runs before the handler body ever touches storage.

use axum::{extract::FromRequestParts, http::request::Parts};
use tower_sessions::Session;

use sred_core::Role;

use crate::error::AppError;
use crate::models::{CurrentUser, session_keys};

/// Extractor that requires a logged-in account: a handler taking
/// `RequireAuth(user)` rejects with 401 before its body runs when no
/// session is bound.
pub struct RequireAuth(pub CurrentUser);

impl<S> FromRequestParts<S> for RequireAuth
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = current_user_from_parts(parts)
            .await
            .ok_or_else(unauthenticated)?;

        Ok(Self(user))
    }
}

/// Extractor that requires a logged-in superadmin.
///
/// A missing session rejects with 401; a bound session with the wrong
/// role rejects with 403, deliberately distinct.
pub struct RequireSuperAdmin(pub CurrentUser);

impl<S> FromRequestParts<S> for RequireSuperAdmin
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = current_user_from_parts(parts)
            .await
            .ok_or_else(unauthenticated)?;

        if user.role != Role::Superadmin {
            return Err(AppError::Authorization(
                "restricted to superadmins".to_owned(),
            ));
        }

        Ok(Self(user))
    }
}

/// Extractor that optionally gets the current account.
///
/// Unlike [`RequireAuth`], this never rejects.
pub struct OptionalAuth(pub Option<CurrentUser>);

impl<S> FromRequestParts<S> for OptionalAuth
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(current_user_from_parts(parts).await))
    }
}

/// Read the current account from the request's session, if any.
async fn current_user_from_parts(parts: &Parts) -> Option<CurrentUser> {
    let session = parts.extensions.get::<Session>()?;
    session
        .get::<CurrentUser>(session_keys::CURRENT_USER)
        .await
        .ok()
        .flatten()
}

fn unauthenticated() -> AppError {
    AppError::Authentication("authentication required".to_owned())
}

/// Bind the account to the session (login).
///
/// # Errors
///
/// Session-store write failures.
pub async fn set_current_user(
    session: &Session,
    user: &CurrentUser,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(session_keys::CURRENT_USER, user).await
}

/// Remove the account from the session.
///
/// # Errors
///
/// Session-store write failures.
pub async fn clear_current_user(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session
        .remove::<CurrentUser>(session_keys::CURRENT_USER)
        .await?;
    Ok(())
}
