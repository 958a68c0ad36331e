//! Outgoing mail.
//!
//! Account flows send two messages: the confirmation link after
//! registration and the password-reset link. Sending goes through the
//! [`Mailer`] port; the services report the outcome to their callers as a
//! [`MailDelivery`] instead of failing the whole operation.
//!
//! Adapters:
//! - [`http::HttpMailer`]: posts JSON to a transactional mail relay
//! - [`log::LogMailer`]: writes the message to the log (development)
//! - [`memory::MemoryMailer`]: keeps messages in memory (tests)

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

pub mod http;
pub mod log;
pub mod memory;
pub mod templates;

/// A rendered message
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Email {
    pub to: String,
    pub subject: String,
    pub text: String,
    pub html: String,
}

/// Errors returned by mailers
#[derive(Debug, Error)]
pub enum MailError {
    /// The relay could not be reached
    #[error("mail transport failed: {0}")]
    Transport(String),

    /// The relay answered with an error
    #[error("mail relay rejected message: {0}")]
    Rejected(String),
}

/// Mail delivery port
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: &Email) -> Result<(), MailError>;
}

/// Outcome of a send attempt as reported to API clients
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MailDelivery {
    Sent,
    Failed,
}

/// Sends `email` and converts the result into a [`MailDelivery`]
///
/// Failures are logged here; the caller decides what to tell the client.
pub async fn deliver(mailer: &dyn Mailer, email: &Email) -> MailDelivery {
    match mailer.send(email).await {
        Ok(()) => {
            info!(to = %email.to, subject = %email.subject, "Mail sent");
            MailDelivery::Sent
        }
        Err(e) => {
            warn!(to = %email.to, subject = %email.subject, error = %e, "Mail delivery failed");
            MailDelivery::Failed
        }
    }
}
