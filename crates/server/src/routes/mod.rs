//! HTTP route handlers.
//!
//! # Route table
//!
//! ```text
//! # Auth
//! POST /api/login                  - Log in (username or email + password)
//! POST /api/logout                 - Log out
//! GET  /api/user                   - Sanitized current account or null
//! POST /api/register               - Bootstrap registration (first account only)
//! POST /api/user/change-password   - Change own password
//!
//! # Password reset
//! POST /api/forgot-password        - Request a reset code by email
//! POST /api/verify-code            - Check a code without consuming it
//! POST /api/reset-password         - Commit a new password
//!
//! # Catalog (reads public, writes authenticated)
//! GET    /api/products             - Product listing
//! GET    /api/products/{id}        - Product detail
//! POST   /api/products             - Create product
//! PATCH  /api/products/{id}        - Update product
//! DELETE /api/products/{id}        - Delete product
//! GET/POST /api/promos, PATCH/DELETE /api/promos/{id}
//! GET/POST /api/stickers, PATCH/DELETE /api/stickers/{id}
//! GET  /api/settings               - Site settings
//! PATCH /api/settings              - Update site settings
//!
//! # Messages
//! POST   /api/messages             - Submit contact form (public)
//! GET    /api/messages             - Inbox, newest first (authenticated)
//! DELETE /api/messages/{id}        - Delete message (authenticated)
//!
//! # Team (superadmin only)
//! GET    /api/admin/users          - List accounts
//! POST   /api/admin/users          - Create account
//! DELETE /api/admin/users/{id}     - Delete account (guarded)
//! ```

pub mod admin_users;
pub mod auth;
pub mod messages;
pub mod password_reset;
pub mod products;
pub mod promos;
pub mod settings;
pub mod stickers;

use axum::Router;
use serde::Serialize;

use crate::error::AppError;
use crate::state::AppState;

/// Plain success acknowledgement body.
#[derive(Debug, Serialize)]
pub struct StatusMessage {
    pub message: String,
}

impl StatusMessage {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Reject empty (or whitespace-only) required text fields.
fn require_non_empty(value: &str, field: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{field} is required")));
    }
    Ok(())
}

/// Build the full application router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(auth::router())
        .merge(password_reset::router())
        .merge(products::router())
        .merge(promos::router())
        .merge(stickers::router())
        .merge(settings::router())
        .merge(messages::router())
        .merge(admin_users::router())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_non_empty() {
        assert!(require_non_empty("value", "name").is_ok());
        assert!(require_non_empty("", "name").is_err());
        assert!(require_non_empty("   ", "name").is_err());
    }
}
