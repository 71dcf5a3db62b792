//! Direct account creation for operators:
//! `sred admin create -u amira -e amira@example.com -p <password> -r superadmin`.

use sred_core::{Email, Role};
use sred_server::db::UserRepository;
use sred_server::services::password::hash_password;

use super::CliError;

/// Create a new account.
///
/// # Errors
///
/// Returns `CliError` for an invalid role or email, an already-taken
/// username/email, or a database failure.
pub async fn create_user(
    username: &str,
    email: &str,
    password: &str,
    role: &str,
) -> Result<(), CliError> {
    let role: Role = role
        .parse()
        .map_err(|_| CliError::InvalidRole(role.to_owned()))?;

    let email = Email::parse(email).map_err(|e| CliError::InvalidEmail(e.to_string()))?;

    let pool = super::connect().await?;
    let users = UserRepository::new(&pool);

    if users.get_by_username(username).await?.is_some() {
        return Err(CliError::AccountExists(username.to_owned()));
    }
    if users.get_by_email(email.as_str()).await?.is_some() {
        return Err(CliError::AccountExists(email.to_string()));
    }

    let password_hash = hash_password(password)?;
    let user = users.create(username, &email, &password_hash, role).await?;

    tracing::info!(
        "Account created successfully! ID: {}, Username: {}, Role: {}",
        user.id,
        user.username,
        user.role
    );

    Ok(())
}
