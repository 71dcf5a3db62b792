//! Environment-driven server configuration.
//!
//! Required: `SRED_DATABASE_URL` (or plain `DATABASE_URL`), `SRED_BASE_URL`,
//! and `SRED_SESSION_SECRET` (32+ characters, validated against placeholder
//! patterns and an entropy floor, so a copy-pasted example value refuses to
//! boot).
//!
//! Optional: `SRED_HOST`/`SRED_PORT` (bind address, default 127.0.0.1:3000),
//! `SMTP_HOST`/`SMTP_PORT`/`SMTP_USERNAME`/`SMTP_PASSWORD`/`SMTP_FROM`
//! (outgoing mail; leaving `SMTP_HOST` unset switches reset codes to log
//! output), `PROTECTED_ADMIN_USERNAME` (account the delete endpoint refuses
//! to touch), and `SENTRY_DSN`/`SENTRY_ENVIRONMENT`.

use std::collections::HashMap;
use std::env;
use std::net::{IpAddr, SocketAddr};

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

const SECRET_MIN_LEN: usize = 32;
const SECRET_MIN_ENTROPY: f64 = 3.3;

/// Substrings that mark a secret as a template leftover rather than a real
/// generated value.
const PLACEHOLDER_MARKS: [&str; 14] = [
    "your-", "changeme", "replace", "placeholder", "example", "secret", "password", "xxx", "todo",
    "fixme", "insert", "enter-", "put-your", "add-your",
];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing environment variable {0}")]
    Missing(&'static str),
    #[error("environment variable {0} is invalid: {1}")]
    Invalid(&'static str, String),
    #[error("refusing insecure value for {0}: {1}")]
    InsecureSecret(&'static str, String),
}

/// Everything the server binary needs from its environment.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: SecretString,
    pub host: IpAddr,
    pub port: u16,
    /// Public base URL; its scheme decides the cookie `Secure` flag.
    pub base_url: String,
    /// Signing secret for the session cookie.
    pub session_secret: SecretString,
    /// `None` when SMTP is unconfigured (dev mode, codes go to the log).
    pub email: Option<EmailConfig>,
    /// Account the team-management delete endpoint refuses to remove.
    pub protected_username: Option<String>,
    pub sentry_dsn: Option<String>,
    pub sentry_environment: Option<String>,
}

/// Outgoing-mail settings. `Debug` keeps the password out of log output.
#[derive(Clone)]
pub struct EmailConfig {
    pub smtp_host: String,
    pub smtp_port: u16,
    pub smtp_username: String,
    pub smtp_password: SecretString,
    pub from_address: String,
}

impl std::fmt::Debug for EmailConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmailConfig")
            .field("smtp_host", &self.smtp_host)
            .field("smtp_port", &self.smtp_port)
            .field("smtp_username", &self.smtp_username)
            .field("smtp_password", &"<redacted>")
            .field("from_address", &self.from_address)
            .finish()
    }
}

impl AppConfig {
    /// Read and validate the full configuration, loading `.env` first when
    /// one is present.
    ///
    /// # Errors
    ///
    /// Returns the first missing, unparseable, or insecure variable.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let session_secret = SecretString::from(require("SRED_SESSION_SECRET")?);
        vet_secret(&session_secret, "SRED_SESSION_SECRET")?;

        Ok(Self {
            database_url: database_url()?,
            host: parse_var("SRED_HOST", "127.0.0.1")?,
            port: parse_var("SRED_PORT", "3000")?,
            base_url: require("SRED_BASE_URL")?,
            session_secret,
            email: EmailConfig::from_env()?,
            protected_username: env::var("PROTECTED_ADMIN_USERNAME").ok(),
            sentry_dsn: env::var("SENTRY_DSN").ok(),
            sentry_environment: env::var("SENTRY_ENVIRONMENT").ok(),
        })
    }

    /// The address the listener binds to.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl EmailConfig {
    /// SMTP is opted into by setting `SMTP_HOST`; once it is set, the
    /// credentials and sender address stop being optional.
    fn from_env() -> Result<Option<Self>, ConfigError> {
        let Ok(smtp_host) = env::var("SMTP_HOST") else {
            return Ok(None);
        };

        Ok(Some(Self {
            smtp_host,
            smtp_port: parse_var("SMTP_PORT", "587")?,
            smtp_username: require("SMTP_USERNAME")?,
            smtp_password: SecretString::from(require("SMTP_PASSWORD")?),
            from_address: require("SMTP_FROM")?,
        }))
    }
}

fn require(key: &'static str) -> Result<String, ConfigError> {
    env::var(key).map_err(|_| ConfigError::Missing(key))
}

/// The database URL accepts the conventional `DATABASE_URL` spelling as a
/// fallback so hosted-Postgres defaults work unchanged.
fn database_url() -> Result<SecretString, ConfigError> {
    env::var("SRED_DATABASE_URL")
        .or_else(|_| env::var("DATABASE_URL"))
        .map(SecretString::from)
        .map_err(|_| ConfigError::Missing("SRED_DATABASE_URL"))
}

fn parse_var<T>(key: &'static str, default: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    env::var(key)
        .unwrap_or_else(|_| default.to_owned())
        .parse()
        .map_err(|e: T::Err| ConfigError::Invalid(key, e.to_string()))
}

/// Reject secrets that are short, recognizably a placeholder, or too
/// uniform to have come out of a generator.
fn vet_secret(secret: &SecretString, key: &'static str) -> Result<(), ConfigError> {
    let value = secret.expose_secret();

    if value.len() < SECRET_MIN_LEN {
        return Err(ConfigError::InsecureSecret(
            key,
            format!("need at least {SECRET_MIN_LEN} characters, got {}", value.len()),
        ));
    }

    let lowered = value.to_lowercase();
    if let Some(mark) = PLACEHOLDER_MARKS.iter().find(|m| lowered.contains(**m)) {
        return Err(ConfigError::InsecureSecret(
            key,
            format!("looks like a placeholder (contains \"{mark}\")"),
        ));
    }

    let entropy = bits_per_char(value);
    if entropy < SECRET_MIN_ENTROPY {
        return Err(ConfigError::InsecureSecret(
            key,
            format!(
                "entropy {entropy:.2} bits/char is under the {SECRET_MIN_ENTROPY} floor; \
                 generate a random value"
            ),
        ));
    }

    Ok(())
}

/// Shannon entropy of the character distribution, in bits per character.
fn bits_per_char(s: &str) -> f64 {
    let mut counts: HashMap<char, usize> = HashMap::new();
    let mut len = 0usize;
    for c in s.chars() {
        *counts.entry(c).or_default() += 1;
        len += 1;
    }
    if len == 0 {
        return 0.0;
    }

    #[allow(clippy::cast_precision_loss)]
    let len = len as f64;
    counts
        .values()
        .map(|&n| {
            #[allow(clippy::cast_precision_loss)]
            let p = n as f64 / len;
            -p * p.log2()
        })
        .sum()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn secret(value: &str) -> SecretString {
        SecretString::from(value)
    }

    #[test]
    fn test_entropy_of_degenerate_strings() {
        assert!(bits_per_char("").abs() < f64::EPSILON);
        assert!(bits_per_char("zzzzzzzz").abs() < f64::EPSILON);
    }

    #[test]
    fn test_entropy_of_a_uniform_pair() {
        assert!((bits_per_char("abababab") - 1.0).abs() < 0.01);
    }

    #[test]
    fn test_vet_secret_rejects_short_values() {
        assert!(matches!(
            vet_secret(&secret("too-short"), "K"),
            Err(ConfigError::InsecureSecret(..))
        ));
    }

    #[test]
    fn test_vet_secret_rejects_placeholders() {
        let err = vet_secret(&secret("replace-this-with-a-real-value-ok"), "K");
        assert!(matches!(err, Err(ConfigError::InsecureSecret(..))));
    }

    #[test]
    fn test_vet_secret_rejects_repetitive_values() {
        let err = vet_secret(&secret(&"ab".repeat(20)), "K");
        assert!(matches!(err, Err(ConfigError::InsecureSecret(..))));
    }

    #[test]
    fn test_vet_secret_accepts_generated_values() {
        assert!(vet_secret(&secret("kR8#mW2pQ!zX5vN9@jL4cT7&bY1dF6gH"), "K").is_ok());
    }

    #[test]
    fn test_socket_addr_combines_host_and_port() {
        let config = AppConfig {
            database_url: secret("postgres://localhost/sred"),
            host: "0.0.0.0".parse().unwrap(),
            port: 8080,
            base_url: "http://localhost:8080".to_owned(),
            session_secret: secret(&"k".repeat(32)),
            email: None,
            protected_username: None,
            sentry_dsn: None,
            sentry_environment: None,
        };

        assert_eq!(config.socket_addr().to_string(), "0.0.0.0:8080");
    }

    #[test]
    fn test_email_config_debug_hides_the_password() {
        let config = EmailConfig {
            smtp_host: "smtp.example.com".to_owned(),
            smtp_port: 587,
            smtp_username: "mailer".to_owned(),
            smtp_password: secret("hunter2hunter2"),
            from_address: "noreply@sred-emballages.tn".to_owned(),
        };

        let printed = format!("{config:?}");
        assert!(printed.contains("<redacted>"));
        assert!(!printed.contains("hunter2"));
    }
}
