//! CLI command implementations.

pub mod admin;
pub mod migrate;
pub mod seed;

use sqlx::PgPool;
use thiserror::Error;

/// Everything a CLI command can fail with.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("missing environment variable {0}")]
    MissingEnvVar(&'static str),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("unknown role {0:?}; expected superadmin or admin")]
    InvalidRole(String),

    #[error("invalid email: {0}")]
    InvalidEmail(String),

    #[error("account already exists: {0}")]
    AccountExists(String),

    #[error("repository error: {0}")]
    Repository(#[from] sred_server::db::RepositoryError),

    #[error("password hashing error: {0}")]
    Hash(#[from] sred_server::services::password::PasswordHashError),
}

/// Connect to the database named by `SRED_DATABASE_URL` (or `DATABASE_URL`).
async fn connect() -> Result<PgPool, CliError> {
    dotenvy::dotenv().ok();

    let database_url = std::env::var("SRED_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map_err(|_| CliError::MissingEnvVar("SRED_DATABASE_URL"))?;

    tracing::info!("Connecting to database...");
    Ok(PgPool::connect(&database_url).await?)
}
