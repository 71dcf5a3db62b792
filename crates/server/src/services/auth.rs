//! Login, registration and password changes over the accounts table.

use sqlx::PgPool;

use sred_core::{Email, EmailError, Role, UserId};

use crate::db::{RepositoryError, UserRepository};
use crate::models::User;
use crate::services::password::{PasswordHashError, hash_password, verify_password};

/// Shortest password accepted anywhere a password is set.
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Ways an authentication operation can fail.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Login failed. Deliberately identical for unknown identifiers and
    /// wrong passwords so the error cannot be used to enumerate accounts.
    #[error("invalid username or password")]
    InvalidCredentials,

    /// Public registration is closed once any account exists.
    #[error("public registration is disabled, contact a superadmin")]
    RegistrationClosed,

    /// The username is empty.
    #[error("username is required")]
    MissingUsername,

    /// The username is already in use.
    #[error("this username is already taken")]
    UsernameTaken,

    /// The email is already in use.
    #[error("this email is already in use")]
    EmailTaken,

    /// The password fails the length requirement.
    #[error("password must be at least {MIN_PASSWORD_LENGTH} characters")]
    WeakPassword,

    /// The email address is malformed.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    /// Password change with a wrong current password.
    #[error("the old password is incorrect")]
    WrongOldPassword,

    /// The account no longer exists.
    #[error("user not found")]
    UserNotFound,

    /// Password hashing failed.
    #[error(transparent)]
    Hash(#[from] PasswordHashError),

    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Authentication service over the user repository.
pub struct AuthService<'a> {
    users: UserRepository<'a>,
}

impl<'a> AuthService<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            users: UserRepository::new(pool),
        }
    }

    /// Log in with a username-or-email identifier and a password.
    ///
    /// The identifier is resolved as a username first, then as an email.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` when the identifier resolves
    /// to nothing or the password doesn't verify - the two cases are not
    /// distinguishable from the outside.
    pub async fn login(&self, identifier: &str, password: &str) -> Result<User, AuthError> {
        let user = match self.users.get_by_username(identifier).await? {
            Some(user) => Some(user),
            None => self.users.get_by_email(identifier).await?,
        };

        let Some(user) = user else {
            return Err(AuthError::InvalidCredentials);
        };

        if !verify_password(password, &user.password_hash) {
            return Err(AuthError::InvalidCredentials);
        }

        Ok(user)
    }

    /// Bootstrap registration: only allowed while no account exists, and
    /// the first registrant becomes a superadmin.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::RegistrationClosed` once any account exists,
    /// or any validation/conflict error from account creation.
    pub async fn register_first(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<User, AuthError> {
        if self.users.count().await? > 0 {
            return Err(AuthError::RegistrationClosed);
        }

        self.create_account(username, email, password, Role::Superadmin)
            .await
    }

    /// Create an account with the given role.
    ///
    /// Duplicate checks deliberately name the offending field - callers of
    /// this path are either the bootstrap registrant or a superadmin.
    ///
    /// # Errors
    ///
    /// Returns a validation error for an empty username, malformed email or
    /// short password; `UsernameTaken`/`EmailTaken` on duplicates.
    pub async fn create_account(
        &self,
        username: &str,
        email: &str,
        password: &str,
        role: Role,
    ) -> Result<User, AuthError> {
        let username = username.trim();
        if username.is_empty() {
            return Err(AuthError::MissingUsername);
        }

        let email = Email::parse(email)?;
        validate_password(password)?;

        if self.users.get_by_username(username).await?.is_some() {
            return Err(AuthError::UsernameTaken);
        }
        if self.users.get_by_email(email.as_str()).await?.is_some() {
            return Err(AuthError::EmailTaken);
        }

        let password_hash = hash_password(password)?;
        let user = self
            .users
            .create(username, &email, &password_hash, role)
            .await?;

        Ok(user)
    }

    /// Change the password of an authenticated account.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::WrongOldPassword` when the current password
    /// doesn't verify, `AuthError::WeakPassword` when the new one is too
    /// short.
    pub async fn change_password(
        &self,
        id: UserId,
        old_password: &str,
        new_password: &str,
    ) -> Result<(), AuthError> {
        let user = self
            .users
            .get_by_id(id)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        if !verify_password(old_password, &user.password_hash) {
            return Err(AuthError::WrongOldPassword);
        }

        validate_password(new_password)?;

        let password_hash = hash_password(new_password)?;
        self.users.update_password(id, &password_hash).await?;

        Ok(())
    }
}

/// Validate password meets the length requirement.
fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_password_boundary() {
        assert!(validate_password("12345").is_err());
        assert!(validate_password("123456").is_ok());
    }
}
