//! Mail relay over HTTP.
//!
//! Posts `{from, to, subject, text, html}` as JSON to the configured endpoint
//! with a bearer key. Any non-2xx answer is a [`MailError::Rejected`].

use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;

use super::{Email, MailError, Mailer};

#[derive(Serialize)]
struct RelayMessage<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    text: &'a str,
    html: &'a str,
}

/// [`Mailer`] backed by an HTTP mail relay
#[derive(Debug, Clone)]
pub struct HttpMailer {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    from: String,
}

impl HttpMailer {
    /// Creates a mailer posting to `endpoint`
    ///
    /// # Errors
    ///
    /// Returns [`MailError::Transport`] when the HTTP client cannot be built.
    pub fn new(
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        from: impl Into<String>,
    ) -> Result<Self, MailError> {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| MailError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
            api_key: api_key.into(),
            from: from.into(),
        })
    }
}

#[async_trait]
impl Mailer for HttpMailer {
    async fn send(&self, email: &Email) -> Result<(), MailError> {
        let message = RelayMessage {
            from: &self.from,
            to: &email.to,
            subject: &email.subject,
            text: &email.text,
            html: &email.html,
        };

        self.client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&message)
            .send()
            .await
            .map_err(|e| MailError::Transport(e.to_string()))?
            .error_for_status()
            .map_err(|e| MailError::Rejected(e.to_string()))?;

        Ok(())
    }
}
