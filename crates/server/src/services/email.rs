//! Outgoing mail: reset codes and welcome notes over SMTP.
//!
//! Bodies are rendered twice (plain text and HTML) from askama templates
//! under `templates/email/` and sent as a multipart alternative, so clients
//! that strip HTML still show the code.

use askama::Template;
use lettre::message::header::ContentType;
use lettre::message::{Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use secrecy::ExposeSecret;
use thiserror::Error;

use crate::config::EmailConfig;

#[derive(Template)]
#[template(path = "email/reset_code.html")]
struct ResetCodeHtml<'a> {
    code: &'a str,
    admin_url: &'a str,
}

#[derive(Template)]
#[template(path = "email/reset_code.txt")]
struct ResetCodeText<'a> {
    code: &'a str,
}

#[derive(Template)]
#[template(path = "email/welcome.html")]
struct WelcomeHtml<'a> {
    username: &'a str,
    admin_url: &'a str,
}

#[derive(Template)]
#[template(path = "email/welcome.txt")]
struct WelcomeText<'a> {
    username: &'a str,
    admin_url: &'a str,
}

#[derive(Debug, Error)]
pub enum EmailError {
    #[error("SMTP transport failed: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),

    #[error("could not assemble the message: {0}")]
    MessageBuild(#[from] lettre::error::Error),

    #[error("\"{0}\" is not a usable mailbox address")]
    InvalidAddress(String),

    #[error("template rendering failed: {0}")]
    Template(#[from] askama::Error),
}

/// SMTP-backed sender for the two transactional mails this system sends.
#[derive(Clone)]
pub struct EmailService {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    from_address: String,
    admin_url: String,
}

impl EmailService {
    /// Build the STARTTLS transport from the SMTP settings.
    ///
    /// # Errors
    ///
    /// Returns the transport error when the relay name is unusable.
    pub fn new(
        config: &EmailConfig,
        base_url: &str,
    ) -> Result<Self, lettre::transport::smtp::Error> {
        let mailer = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)?
            .port(config.smtp_port)
            .credentials(Credentials::new(
                config.smtp_username.clone(),
                config.smtp_password.expose_secret().to_owned(),
            ))
            .build();

        Ok(Self {
            mailer,
            from_address: config.from_address.clone(),
            admin_url: format!("{}/admin", base_url.trim_end_matches('/')),
        })
    }

    /// Mail a password-reset code.
    ///
    /// # Errors
    ///
    /// Returns `EmailError` when rendering or delivery fails.
    pub async fn send_reset_code(&self, to: &str, code: &str) -> Result<(), EmailError> {
        let admin_url = self.admin_url.as_str();
        self.dispatch(
            to,
            "Code de réinitialisation - SRED",
            &ResetCodeText { code }.render()?,
            &ResetCodeHtml { code, admin_url }.render()?,
        )
        .await
    }

    /// Mail a welcome note to a freshly created account.
    ///
    /// # Errors
    ///
    /// Returns `EmailError` when rendering or delivery fails.
    pub async fn send_welcome(&self, to: &str, username: &str) -> Result<(), EmailError> {
        let admin_url = self.admin_url.as_str();
        self.dispatch(
            to,
            "Bienvenue chez SRED - Votre compte est prêt !",
            &WelcomeText { username, admin_url }.render()?,
            &WelcomeHtml { username, admin_url }.render()?,
        )
        .await
    }

    async fn dispatch(
        &self,
        to: &str,
        subject: &str,
        text_body: &str,
        html_body: &str,
    ) -> Result<(), EmailError> {
        let from: Mailbox = self
            .from_address
            .parse()
            .map_err(|_| EmailError::InvalidAddress(self.from_address.clone()))?;
        let to_mailbox: Mailbox = to
            .parse()
            .map_err(|_| EmailError::InvalidAddress(to.to_owned()))?;

        let message = Message::builder()
            .from(from)
            .to(to_mailbox)
            .subject(subject)
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_PLAIN)
                            .body(text_body.to_owned()),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_HTML)
                            .body(html_body.to_owned()),
                    ),
            )?;

        self.mailer.send(message).await?;
        tracing::info!(to, subject, "email dispatched");
        Ok(())
    }
}
