//! Unified error handling.
//!
//! Every endpoint failure is rendered as the same structured body
//! `{ "kind": ..., "message": ... }` with a status from the taxonomy below.
//! Server-side failures are logged (and sent to Sentry when configured)
//! with their real cause; clients only ever see the generic message.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::db::RepositoryError;
use crate::services::{AuthError, ResetError};

/// Application-level error type for the showcase API.
#[derive(Debug, Error)]
pub enum AppError {
    /// Malformed or rejected input.
    #[error("{0}")]
    Validation(String),

    /// Missing or failed authentication.
    #[error("{0}")]
    Authentication(String),

    /// Authenticated but not allowed.
    #[error("{0}")]
    Authorization(String),

    /// No such entity.
    #[error("{0}")]
    NotFound(String),

    /// Duplicate username/email on create.
    #[error("{0}")]
    Conflict(String),

    /// A repository call failed.
    #[error("database error: {0}")]
    Database(#[from] RepositoryError),

    /// Anything else that went wrong server-side.
    #[error("internal error: {0}")]
    Internal(String),
}

/// Normalized error body shared by every endpoint.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub kind: &'static str,
    pub message: String,
}

impl AppError {
    /// Stable machine-readable discriminant for the error body.
    const fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::Authentication(_) => "authentication",
            Self::Authorization(_) => "authorization",
            Self::NotFound(_) => "not_found",
            Self::Conflict(_) => "conflict",
            Self::Database(_) | Self::Internal(_) => "internal",
        }
    }

    const fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::Conflict(_) => StatusCode::BAD_REQUEST,
            Self::Authentication(_) => StatusCode::UNAUTHORIZED,
            Self::Authorization(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Database(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // 500-class failures carry their real cause to the log and Sentry.
        if matches!(self, Self::Database(_) | Self::Internal(_)) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "request error"
            );
        }

        // The client body never carries internal detail.
        let message = match &self {
            Self::Database(_) | Self::Internal(_) => "internal server error".to_owned(),
            _ => self.to_string(),
        };

        (
            self.status(),
            Json(ErrorBody {
                kind: self.kind(),
                message,
            }),
        )
            .into_response()
    }
}

impl From<AuthError> for AppError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::Repository(err) => Self::Database(err),
            AuthError::Hash(err) => Self::Internal(err.to_string()),
            other @ AuthError::InvalidCredentials => Self::Authentication(other.to_string()),
            other @ AuthError::RegistrationClosed => Self::Authorization(other.to_string()),
            other @ (AuthError::MissingUsername
            | AuthError::WeakPassword
            | AuthError::InvalidEmail(_)
            | AuthError::WrongOldPassword) => Self::Validation(other.to_string()),
            other @ (AuthError::UsernameTaken | AuthError::EmailTaken) => {
                Self::Conflict(other.to_string())
            }
            other @ AuthError::UserNotFound => Self::NotFound(other.to_string()),
        }
    }
}

impl From<ResetError> for AppError {
    fn from(e: ResetError) -> Self {
        match e {
            ResetError::Repository(err) => Self::Database(err),
            ResetError::Hash(err) => Self::Internal(err.to_string()),
            ResetError::Dispatch(err) => {
                Self::Internal(format!("failed to send the reset email: {err}"))
            }
            other @ (ResetError::InvalidCode
            | ResetError::CodeLength
            | ResetError::WeakPassword) => Self::Validation(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn get_status(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            get_status(AppError::Validation("bad input".to_owned())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::Authentication("nope".to_owned())),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            get_status(AppError::Authorization("nope".to_owned())),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            get_status(AppError::NotFound("missing".to_owned())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::Conflict("duplicate".to_owned())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::Internal("boom".to_owned())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_kinds() {
        assert_eq!(AppError::Validation(String::new()).kind(), "validation");
        assert_eq!(AppError::Conflict(String::new()).kind(), "conflict");
        assert_eq!(AppError::Internal(String::new()).kind(), "internal");
    }

    #[test]
    fn test_login_failures_map_to_one_shape() {
        // Unknown user and wrong password both arrive as InvalidCredentials;
        // the mapped error carries the single uniform message.
        let err = AppError::from(AuthError::InvalidCredentials);
        assert!(matches!(
            &err,
            AppError::Authentication(msg) if msg == "invalid username or password"
        ));
    }

    #[test]
    fn test_expired_and_mismatched_codes_are_indistinguishable() {
        let err = AppError::from(ResetError::InvalidCode);
        assert!(matches!(&err, AppError::Validation(msg) if msg == "invalid or expired reset code"));
    }
}
