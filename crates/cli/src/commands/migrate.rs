//! Database migration command.
//!
//! Runs the application migrations from `crates/server/migrations/` and
//! the tower-sessions store migration in one go.

use tower_sessions_sqlx_store::PostgresStore;

use super::CliError;

/// Run all database migrations.
///
/// # Errors
///
/// Returns `CliError` if the database is unreachable or a migration fails.
pub async fn run() -> Result<(), CliError> {
    let pool = super::connect().await?;

    tracing::info!("Running server migrations...");
    sqlx::migrate!("../server/migrations").run(&pool).await?;

    tracing::info!("Running session-store migration...");
    PostgresStore::new(pool.clone())
        .migrate()
        .await
        .map_err(CliError::Database)?;

    tracing::info!("Migrations complete!");
    Ok(())
}
