//! Session-related types for authentication.

use serde::{Deserialize, Serialize};

use sred_core::{Email, Role, UserId};

use super::user::{User, UserView};

/// Session-stored identity of the logged-in account.
///
/// Minimal data bound to the session on login; reads of `/api/user` are
/// served from this without touching the database.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    pub id: UserId,
    pub username: String,
    pub email: Email,
    pub role: Role,
}

impl From<&User> for CurrentUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            role: user.role,
        }
    }
}

impl From<&CurrentUser> for UserView {
    fn from(current: &CurrentUser) -> Self {
        Self {
            id: current.id,
            username: current.username.clone(),
            email: current.email.clone(),
            role: current.role,
        }
    }
}

/// Keys under which auth data lives in the session.
pub mod session_keys {
    pub const CURRENT_USER: &str = "current_user";
}
