//! Cookie-session layer over the `PostgreSQL` store.

use secrecy::ExposeSecret;
use sqlx::PgPool;
use tower_sessions::cookie::Key;
use tower_sessions::service::SignedCookie;
use tower_sessions::{Expiry, SessionManagerLayer};
use tower_sessions_sqlx_store::PostgresStore;

use crate::config::AppConfig;

/// Name of the session cookie.
pub const SESSION_COOKIE_NAME: &str = "sred_session";

/// Session expiry in days of inactivity.
const SESSION_EXPIRY_DAYS: i64 = 30;

/// Build the session layer: signed cookie, 30-day inactivity window,
/// `Secure` only when the site is served over HTTPS. The backing table is
/// created by `sred-cli migrate`, which runs the store's own migration.
///
/// # Panics
///
/// Panics if the session secret is shorter than 32 bytes; configuration
/// loading enforces that before this is reached.
#[must_use]
pub fn create_session_layer(
    pool: &PgPool,
    config: &AppConfig,
) -> SessionManagerLayer<PostgresStore, SignedCookie> {
    let store = PostgresStore::new(pool.clone());
    let over_https = config.base_url.starts_with("https://");
    let key = Key::derive_from(config.session_secret.expose_secret().as_bytes());

    SessionManagerLayer::new(store)
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::days(SESSION_EXPIRY_DAYS),
        ))
        .with_secure(over_https)
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
        .with_signed(key)
}
