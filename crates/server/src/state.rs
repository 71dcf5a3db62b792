//! Shared application state.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::AppConfig;
use crate::services::EmailService;

/// Handle to everything a request handler needs: configuration, the
/// connection pool, and the optional mail transport. Cloning is an `Arc`
/// bump.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<Inner>,
}

struct Inner {
    config: AppConfig,
    pool: PgPool,
    email: Option<EmailService>,
}

impl AppState {
    /// Wire up the state. Without SMTP settings the mail transport stays
    /// `None` and anything that would have been sent is logged instead.
    ///
    /// # Errors
    ///
    /// Returns the transport error when SMTP is configured but unusable.
    pub fn new(config: AppConfig, pool: PgPool) -> Result<Self, lettre::transport::smtp::Error> {
        let email = match &config.email {
            Some(settings) => Some(EmailService::new(settings, &config.base_url)?),
            None => {
                tracing::warn!("SMTP not configured; outgoing mail will be logged, not sent");
                None
            }
        };

        Ok(Self {
            inner: Arc::new(Inner {
                config,
                pool,
                email,
            }),
        })
    }

    #[must_use]
    pub fn config(&self) -> &AppConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// The mail transport, when SMTP is configured.
    #[must_use]
    pub fn email(&self) -> Option<&EmailService> {
        self.inner.email.as_ref()
    }
}
