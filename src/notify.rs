//! Best-effort email notification for new feedback.
//!
//! Whether SMTP is usable is decided once, from configuration, into an
//! [`SmtpSetup`]. Sending never returns an error to the caller: every failure
//! is logged and reported as `false`.

use std::fmt;

use lettre::address::AddressError;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Address, Message, SmtpTransport, Transport};
use thiserror::Error;

use crate::logging::mask_email;

pub const DEFAULT_SMTP_PORT: u16 = 587;
pub const DEFAULT_FROM: &str = "no-reply@localhost";
pub const DEFAULT_NOTIFY_EMAIL: &str = "feedback@counsel.example";
pub const SENDER_NAME: &str = "Counseling Website";
pub const SUBJECT: &str = "New Feedback Submission";

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("invalid address: {0}")]
    Address(#[from] AddressError),

    #[error("failed to build message: {0}")]
    Message(#[from] lettre::error::Error),

    #[error("smtp transport error: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Raw mail settings as read from the environment. Empty values are already
/// normalised to `None` by the config loader.
#[derive(Clone, Default)]
pub struct MailConfig {
    pub host: Option<String>,
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
    pub from: Option<String>,
    pub recipient: Option<String>,
}

impl fmt::Debug for MailConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MailConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("from", &self.from)
            .field("recipient", &self.recipient)
            .finish()
    }
}

/// Everything needed to hand a message to the relay.
#[derive(Clone)]
pub struct SmtpSettings {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub from: String,
    pub recipient: String,
}

impl fmt::Debug for SmtpSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SmtpSettings")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("from", &self.from)
            .field("recipient", &self.recipient)
            .finish_non_exhaustive()
    }
}

/// Result of the configuration presence check.
#[derive(Debug, Clone)]
pub enum SmtpSetup {
    Configured(SmtpSettings),
    Unconfigured { missing: Vec<&'static str> },
}

impl SmtpSetup {
    pub fn from_config(cfg: &MailConfig) -> Self {
        let mut missing = Vec::new();
        let mut require = |value: &Option<String>, key: &'static str| match value {
            Some(v) if !v.is_empty() => Some(v.clone()),
            _ => {
                missing.push(key);
                None
            }
        };

        let host = require(&cfg.host, "SMTP_HOST");
        let username = require(&cfg.username, "SMTP_USER");
        let password = require(&cfg.password, "SMTP_PASS");
        let recipient = require(&cfg.recipient, "FEEDBACK_NOTIFY_EMAIL");

        match (host, username, password, recipient) {
            (Some(host), Some(username), Some(password), Some(recipient)) => {
                let from = cfg.from.clone().unwrap_or_else(|| username.clone());
                SmtpSetup::Configured(SmtpSettings {
                    host,
                    port: cfg.port,
                    username,
                    password,
                    from,
                    recipient,
                })
            }
            _ => SmtpSetup::Unconfigured { missing },
        }
    }

    pub fn is_configured(&self) -> bool {
        matches!(self, SmtpSetup::Configured(_))
    }
}

// ---------------------------------------------------------------------------
// Notifier
// ---------------------------------------------------------------------------

/// Something that can tell the site owner about a new submission.
pub trait Notifier: Send + Sync {
    /// Returns `true` only if the notification was handed off successfully.
    fn send_feedback_email(&self, name: &str, email: &str, message: &str) -> bool;

    /// Whether a send could possibly succeed.
    fn is_configured(&self) -> bool;
}

/// Plain-text body of the notification.
pub fn compose_body(name: &str, email: &str, message: &str) -> String {
    format!("New feedback submission\n\nName: {name}\nEmail: {email}\n\nMessage:\n{message}\n")
}

/// Build the notification message. The submitter becomes the Reply-To when
/// their address parses; otherwise the header is left out.
pub fn build_message(
    settings: &SmtpSettings,
    name: &str,
    email: &str,
    message: &str,
) -> Result<Message, NotifyError> {
    let from = Mailbox::new(Some(SENDER_NAME.to_string()), settings.from.parse::<Address>()?);
    let to: Mailbox = settings.recipient.parse()?;

    let mut builder = Message::builder()
        .from(from)
        .to(to)
        .subject(SUBJECT)
        .header(ContentType::TEXT_PLAIN);
    if let Ok(reply_to) = email.parse::<Mailbox>() {
        builder = builder.reply_to(reply_to);
    }

    Ok(builder.body(compose_body(name, email, message))?)
}

/// SMTP notifier using STARTTLS and username/password authentication.
pub struct SmtpNotifier {
    setup: SmtpSetup,
}

impl SmtpNotifier {
    pub fn new(setup: SmtpSetup) -> Self {
        Self { setup }
    }

    fn deliver(
        settings: &SmtpSettings,
        name: &str,
        email: &str,
        message: &str,
    ) -> Result<(), NotifyError> {
        let msg = build_message(settings, name, email, message)?;
        let transport = SmtpTransport::starttls_relay(&settings.host)?
            .port(settings.port)
            .credentials(Credentials::new(
                settings.username.clone(),
                settings.password.clone(),
            ))
            .build();
        transport.send(&msg)?;
        Ok(())
    }
}

impl Notifier for SmtpNotifier {
    fn send_feedback_email(&self, name: &str, email: &str, message: &str) -> bool {
        let settings = match &self.setup {
            SmtpSetup::Configured(settings) => settings,
            SmtpSetup::Unconfigured { missing } => {
                tracing::info!(
                    "email not configured; skipping send (missing: {})",
                    missing.join(", ")
                );
                return false;
            }
        };

        match Self::deliver(settings, name, email, message) {
            Ok(()) => {
                tracing::info!(
                    "feedback notification from {} sent to {}",
                    mask_email(email),
                    mask_email(&settings.recipient)
                );
                true
            }
            Err(e) => {
                tracing::warn!("error sending feedback email: {e}");
                false
            }
        }
    }

    fn is_configured(&self) -> bool {
        self.setup.is_configured()
    }
}
