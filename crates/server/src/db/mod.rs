//! Repositories over the showcase `PostgreSQL` schema.
//!
//! One repository struct per table: `users`, `products`, `promos`,
//! `sticker_catalogs`, `messages`, and the `settings` singleton (the
//! session table in the `tower_sessions` schema belongs to the session
//! store). Queries go through the runtime `query_as`/`FromRow` API so the
//! workspace builds without a live database; schema changes live in
//! `crates/server/migrations/` and are applied with
//! `cargo run -p sred-cli -- migrate`.

pub mod messages;
pub mod products;
pub mod promos;
pub mod settings;
pub mod stickers;
pub mod users;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use messages::MessageRepository;
pub use products::ProductRepository;
pub use promos::PromoRepository;
pub use settings::SettingsRepository;
pub use stickers::StickerCatalogRepository;
pub use users::UserRepository;

/// Failure modes shared by every repository.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// The targeted row does not exist.
    #[error("not found")]
    NotFound,

    /// A unique constraint (username, email) rejected the write.
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Open the connection pool the whole server shares.
///
/// # Errors
///
/// Returns `sqlx::Error` when the database is unreachable.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

/// Map a unique-constraint violation to [`RepositoryError::Conflict`].
fn conflict_on_unique(e: sqlx::Error, message: &str) -> RepositoryError {
    if let sqlx::Error::Database(ref db_err) = e
        && db_err.is_unique_violation()
    {
        return RepositoryError::Conflict(message.to_owned());
    }
    RepositoryError::Database(e)
}
