//! Admin account domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use sred_core::{Email, Role, UserId};

/// An admin account as stored, including the credential record.
///
/// Never serialized to a client. `reset_token` and `reset_token_expires`
/// are both `None` or both `Some` - they are only ever written as a pair.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub email: Email,
    /// Encoded as `<derivedKeyHex>.<saltHex>`, see `services::password`.
    #[sqlx(rename = "password")]
    pub password_hash: String,
    pub role: Role,
    pub reset_token: Option<String>,
    pub reset_token_expires: Option<DateTime<Utc>>,
}

/// Client-facing shape of an account.
///
/// The credential and reset fields never leave the server; every
/// user-shaped response goes through this type.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserView {
    pub id: UserId,
    pub username: String,
    pub email: Email,
    pub role: Role,
}

impl From<&User> for UserView {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            role: user.role,
        }
    }
}

impl From<User> for UserView {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            role: user.role,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_user_view_never_carries_credentials() {
        let user = User {
            id: UserId::new(1),
            username: "amira".to_owned(),
            email: Email::parse("amira@example.com").unwrap(),
            password_hash: "deadbeef.cafe".to_owned(),
            role: Role::Admin,
            reset_token: Some("a1b2c3d4".to_owned()),
            reset_token_expires: Some(Utc::now()),
        };

        let json = serde_json::to_string(&UserView::from(&user)).unwrap();
        assert!(!json.contains("deadbeef"));
        assert!(!json.contains("a1b2c3d4"));
        assert!(!json.contains("password"));
        assert!(!json.contains("resetToken"));
        assert!(json.contains(r#""username":"amira""#));
        assert!(json.contains(r#""role":"admin""#));
    }
}
