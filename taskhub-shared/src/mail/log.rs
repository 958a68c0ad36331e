//! Development mailer that logs instead of sending.

use async_trait::async_trait;
use tracing::info;

use super::{Email, MailError, Mailer};

/// [`Mailer`] that writes each message to the log
#[derive(Debug, Clone, Default)]
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, email: &Email) -> Result<(), MailError> {
        info!(to = %email.to, subject = %email.subject, body = %email.text, "Mail (not sent)");
        Ok(())
    }
}
