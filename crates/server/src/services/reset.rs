//! Password-reset flow: request a code, verify it, commit a new password.
//!
//! The flow is a three-step state machine driven entirely by the
//! `(reset_token, reset_token_expires)` pair on the user row:
//!
//! 1. `request` issues an 8-hex-char code with a 10-minute expiry and
//!    dispatches it by email. The acknowledgement never reveals whether the
//!    address matched an account.
//! 2. `verify` checks a supplied code without consuming it - the client
//!    can re-verify and still use the same code for the final step.
//! 3. `commit` re-validates input shape and the code, then replaces the
//!    password and clears the pair in a single row update.

use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use sqlx::PgPool;

use crate::db::{RepositoryError, UserRepository};
use crate::models::User;
use crate::services::auth::MIN_PASSWORD_LENGTH;
use crate::services::email::{EmailError, EmailService};
use crate::services::password::{PasswordHashError, hash_password};

/// Reset codes are 4 random bytes, hex-encoded.
pub const RESET_CODE_LENGTH: usize = 8;

/// How long an issued code stays valid.
pub const RESET_CODE_TTL_MINUTES: i64 = 10;

/// Errors that can occur during the reset flow.
#[derive(Debug, thiserror::Error)]
pub enum ResetError {
    /// The code doesn't match, has expired, or the email resolves to
    /// nothing - one message for all three so the flow reveals neither
    /// account existence nor which check failed.
    #[error("invalid or expired reset code")]
    InvalidCode,

    /// Shape check on the final step, before any lookup.
    #[error("the confirmation code must be exactly {RESET_CODE_LENGTH} characters")]
    CodeLength,

    /// Shape check on the final step, before any lookup.
    #[error("the new password must be at least {MIN_PASSWORD_LENGTH} characters")]
    WeakPassword,

    /// The email channel failed; surfaced, unlike an unmatched address.
    #[error("failed to send the reset email")]
    Dispatch(#[source] EmailError),

    /// Password hashing failed.
    #[error(transparent)]
    Hash(#[from] PasswordHashError),

    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Password-reset service over the user repository and email channel.
pub struct PasswordResetService<'a> {
    users: UserRepository<'a>,
    email: Option<&'a EmailService>,
}

impl<'a> PasswordResetService<'a> {
    /// Create a new reset service. `email` is `None` in dev setups without
    /// SMTP, in which case issued codes are logged instead of sent.
    #[must_use]
    pub const fn new(pool: &'a PgPool, email: Option<&'a EmailService>) -> Self {
        Self {
            users: UserRepository::new(pool),
            email,
        }
    }

    /// Issue a reset code for the account behind `email`, if any.
    ///
    /// Succeeds silently when the address matches nothing. The code is
    /// dispatched before the token is persisted, so a failed send leaves
    /// no dangling token behind.
    ///
    /// # Errors
    ///
    /// Returns `ResetError::Dispatch` when the email channel fails,
    /// `ResetError::Repository` when persisting the pair fails.
    pub async fn request(&self, email: &str) -> Result<(), ResetError> {
        let Some(user) = self.users.get_by_email(email).await? else {
            tracing::debug!("reset requested for unknown email");
            return Ok(());
        };

        let code = generate_reset_code();
        let expires = Utc::now() + Duration::minutes(RESET_CODE_TTL_MINUTES);

        match self.email {
            Some(service) => service
                .send_reset_code(user.email.as_str(), &code)
                .await
                .map_err(ResetError::Dispatch)?,
            None => {
                tracing::warn!(
                    email = %user.email,
                    code = %code,
                    "SMTP not configured - reset code logged (dev mode)"
                );
            }
        }

        self.users
            .set_reset_token(user.id, Some((&code, expires)))
            .await?;

        tracing::info!(user = %user.username, "reset code issued");
        Ok(())
    }

    /// Check a supplied code without consuming it.
    ///
    /// # Errors
    ///
    /// Returns `ResetError::InvalidCode` when the email matches nothing,
    /// no code is stored, the code mismatches, or it has expired.
    pub async fn verify(&self, email: &str, code: &str) -> Result<(), ResetError> {
        let Some(user) = self.users.get_by_email(email).await? else {
            return Err(ResetError::InvalidCode);
        };

        check_code(&user, code, Utc::now())
    }

    /// Commit a new password after re-checking the code.
    ///
    /// # Errors
    ///
    /// Returns shape errors (`CodeLength`, `WeakPassword`) before any
    /// lookup, `InvalidCode` on a failed re-check, `Repository` when the
    /// combined password-write/token-clear fails (in which case the stored
    /// state is unchanged).
    pub async fn commit(
        &self,
        email: &str,
        code: &str,
        new_password: &str,
    ) -> Result<(), ResetError> {
        validate_commit_inputs(code, new_password)?;

        let Some(user) = self.users.get_by_email(email).await? else {
            return Err(ResetError::InvalidCode);
        };

        check_code(&user, code, Utc::now())?;

        let password_hash = hash_password(new_password)?;
        self.users
            .update_password_and_clear_token(user.id, &password_hash)
            .await?;

        tracing::info!(user = %user.username, "password reset committed");
        Ok(())
    }
}

/// Generate a fresh reset code: 4 random bytes as lowercase hex.
#[must_use]
pub fn generate_reset_code() -> String {
    let bytes: [u8; 4] = rand::rng().random();
    hex::encode(bytes)
}

/// Normalize a code for comparison: lowercase, whitespace stripped.
fn normalize_code(code: &str) -> String {
    code.to_lowercase()
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect()
}

/// Shape validation for the final step. Runs before any lookup.
fn validate_commit_inputs(code: &str, new_password: &str) -> Result<(), ResetError> {
    if code.len() != RESET_CODE_LENGTH {
        return Err(ResetError::CodeLength);
    }
    if new_password.len() < MIN_PASSWORD_LENGTH {
        return Err(ResetError::WeakPassword);
    }
    Ok(())
}

/// Compare a supplied code against the stored pair at time `now`.
///
/// Comparison is case-insensitive over the hex digits and ignores
/// whitespace. Succeeding leaves the stored pair untouched.
fn check_code(user: &User, supplied: &str, now: DateTime<Utc>) -> Result<(), ResetError> {
    let Some(stored) = user.reset_token.as_deref() else {
        return Err(ResetError::InvalidCode);
    };

    if normalize_code(stored) != normalize_code(supplied) {
        return Err(ResetError::InvalidCode);
    }

    if user.reset_token_expires.is_some_and(|expires| now > expires) {
        return Err(ResetError::InvalidCode);
    }

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sred_core::{Email, Role, UserId};

    fn user_with_code(code: Option<&str>, expires: Option<DateTime<Utc>>) -> User {
        User {
            id: UserId::new(1),
            username: "amira".to_owned(),
            email: Email::parse("amira@example.com").unwrap(),
            password_hash: "aa.bb".to_owned(),
            role: Role::Admin,
            reset_token: code.map(str::to_owned),
            reset_token_expires: expires,
        }
    }

    #[test]
    fn test_generated_code_is_eight_lowercase_hex_chars() {
        for _ in 0..32 {
            let code = generate_reset_code();
            assert_eq!(code.len(), RESET_CODE_LENGTH);
            assert!(code.chars().all(|c| c.is_ascii_hexdigit()));
            assert_eq!(code, code.to_lowercase());
        }
    }

    #[test]
    fn test_check_code_accepts_case_and_whitespace_variants() {
        let now = Utc::now();
        let user = user_with_code(Some("a1b2c3d4"), Some(now + Duration::minutes(10)));

        assert!(check_code(&user, "a1b2c3d4", now).is_ok());
        assert!(check_code(&user, "A1B2C3D4", now).is_ok());
        assert!(check_code(&user, " a1b2 c3d4 ", now).is_ok());
    }

    #[test]
    fn test_check_code_is_idempotent() {
        let now = Utc::now();
        let user = user_with_code(Some("a1b2c3d4"), Some(now + Duration::minutes(10)));

        assert!(check_code(&user, "a1b2c3d4", now).is_ok());
        // The stored pair is untouched; checking again still succeeds.
        assert!(check_code(&user, "a1b2c3d4", now).is_ok());
    }

    #[test]
    fn test_check_code_rejects_mismatch_and_missing_token() {
        let now = Utc::now();
        let with_code = user_with_code(Some("a1b2c3d4"), Some(now + Duration::minutes(10)));
        let without_code = user_with_code(None, None);

        assert!(matches!(
            check_code(&with_code, "ffffffff", now),
            Err(ResetError::InvalidCode)
        ));
        assert!(matches!(
            check_code(&without_code, "a1b2c3d4", now),
            Err(ResetError::InvalidCode)
        ));
    }

    #[test]
    fn test_check_code_rejects_after_expiry() {
        let issued = Utc::now();
        let user = user_with_code(Some("a1b2c3d4"), Some(issued + Duration::minutes(10)));

        let just_before = issued + Duration::minutes(9);
        let just_after = issued + Duration::minutes(11);

        assert!(check_code(&user, "a1b2c3d4", just_before).is_ok());
        assert!(matches!(
            check_code(&user, "a1b2c3d4", just_after),
            Err(ResetError::InvalidCode)
        ));
    }

    #[test]
    fn test_commit_shape_checks_run_before_any_lookup() {
        assert!(matches!(
            validate_commit_inputs("short", "longenough"),
            Err(ResetError::CodeLength)
        ));
        assert!(matches!(
            validate_commit_inputs("a1b2c3d4e5", "longenough"),
            Err(ResetError::CodeLength)
        ));
        assert!(matches!(
            validate_commit_inputs("a1b2c3d4", "tiny"),
            Err(ResetError::WeakPassword)
        ));
        assert!(validate_commit_inputs("a1b2c3d4", "longenough").is_ok());
    }
}
