//! The feedback submission flow.
//!
//! Order matters and is fixed: validate, insert, notify, purge. Validation
//! failures touch nothing. Once the insert has committed, a failed
//! notification only changes the wording of the success message.

use std::path::Path;

use thiserror::Error;

use crate::logging::mask_email;
use crate::notify::Notifier;
use crate::storage::{Storage, StorageError};

pub const MSG_FILL_ALL_FIELDS: &str = "Please fill out all fields";
pub const MSG_SENT_NOTIFIED: &str = "Message sent successfully! Notification email sent.";
pub const MSG_SENT_UNNOTIFIED: &str =
    "Message sent successfully! (Notification email not configured.)";

/// Raw form body of `POST /feedback`. Every field is optional; `name` is the
/// legacy single-field variant kept for older copies of the form.
#[derive(Debug, Clone, Default)]
pub struct FeedbackForm {
    pub first_name: String,
    pub last_name: String,
    pub name: String,
    pub email: String,
    pub message: String,
}

/// A submission that passed validation. All fields are trimmed and non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub name: String,
    pub email: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("missing required field(s): {}", .missing.join(", "))]
pub struct ValidationError {
    pub missing: Vec<&'static str>,
}

impl FeedbackForm {
    /// Collect the known fields from decoded body pairs. A repeated key keeps
    /// its first value and unknown keys are ignored.
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut first_name = None;
        let mut last_name = None;
        let mut name = None;
        let mut email = None;
        let mut message = None;

        for (key, value) in pairs {
            let slot = match key.as_str() {
                "first_name" => &mut first_name,
                "last_name" => &mut last_name,
                "name" => &mut name,
                "email" => &mut email,
                "message" => &mut message,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value);
            }
        }

        Self {
            first_name: first_name.unwrap_or_default(),
            last_name: last_name.unwrap_or_default(),
            name: name.unwrap_or_default(),
            email: email.unwrap_or_default(),
            message: message.unwrap_or_default(),
        }
    }

    /// Display name for the submission. First and last name win when either
    /// is present; otherwise the legacy `name` field is used.
    pub fn full_name(&self) -> String {
        let first = self.first_name.trim();
        let last = self.last_name.trim();
        if !first.is_empty() || !last.is_empty() {
            format!("{first} {last}").trim().to_string()
        } else {
            self.name.trim().to_string()
        }
    }

    pub fn validate(&self) -> Result<Submission, ValidationError> {
        let name = self.full_name();
        let email = self.email.trim().to_string();
        let message = self.message.trim().to_string();

        let missing: Vec<&'static str> = [("name", &name), ("email", &email), ("message", &message)]
            .into_iter()
            .filter(|(_, v)| v.is_empty())
            .map(|(k, _)| k)
            .collect();
        if !missing.is_empty() {
            return Err(ValidationError { missing });
        }

        Ok(Submission {
            name,
            email,
            message,
        })
    }
}

/// How a submission ended, as far as the visitor is concerned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Invalid(ValidationError),
    Saved { notified: bool, purged: usize },
}

impl Outcome {
    /// The literal message shown above the form.
    pub fn user_message(&self) -> &'static str {
        match self {
            Outcome::Invalid(_) => MSG_FILL_ALL_FIELDS,
            Outcome::Saved { notified: true, .. } => MSG_SENT_NOTIFIED,
            Outcome::Saved { notified: false, .. } => MSG_SENT_UNNOTIFIED,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Outcome::Invalid(_))
    }
}

/// Run one submission against the database at `db_path`.
///
/// Opens its own connection and closes it on return. Blocking: SQLite and
/// SMTP are both synchronous, so async callers should run this on the
/// blocking pool.
pub fn submit(
    db_path: &Path,
    notifier: &dyn Notifier,
    form: &FeedbackForm,
) -> Result<Outcome, StorageError> {
    let submission = match form.validate() {
        Ok(s) => s,
        Err(e) => {
            tracing::info!("feedback rejected: {e}");
            return Ok(Outcome::Invalid(e));
        }
    };

    let storage = Storage::open(db_path)?;
    process(&storage, notifier, &submission)
}

/// Insert, notify, purge, in that order, on an already open store.
pub fn process(
    storage: &Storage,
    notifier: &dyn Notifier,
    submission: &Submission,
) -> Result<Outcome, StorageError> {
    storage.insert_feedback(&submission.name, &submission.email, &submission.message)?;
    tracing::info!("feedback stored from {}", mask_email(&submission.email));

    let notified =
        notifier.send_feedback_email(&submission.name, &submission.email, &submission.message);

    let purged = storage.purge_expired()?;
    if purged > 0 {
        tracing::info!("retention sweep removed {purged} old submission(s)");
    }

    Ok(Outcome::Saved { notified, purged })
}
