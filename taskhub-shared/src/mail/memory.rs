//! In-memory mailer for tests.

use async_trait::async_trait;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc, Mutex,
};

use super::{Email, MailError, Mailer};

/// [`Mailer`] that records every accepted message
///
/// Clones share the same outbox.
#[derive(Debug, Clone, Default)]
pub struct MemoryMailer {
    outbox: Arc<Mutex<Vec<Email>>>,
    failing: Arc<AtomicBool>,
}

impl MemoryMailer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes subsequent sends fail (or succeed again)
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Messages accepted so far, oldest first
    pub fn sent(&self) -> Vec<Email> {
        self.outbox
            .lock()
            .map(|outbox| outbox.clone())
            .unwrap_or_default()
    }

    /// Most recent message sent to `to`
    pub fn last_to(&self, to: &str) -> Option<Email> {
        self.sent().into_iter().rev().find(|e| e.to == to)
    }
}

#[async_trait]
impl Mailer for MemoryMailer {
    async fn send(&self, email: &Email) -> Result<(), MailError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(MailError::Transport("mailer is set to fail".to_string()));
        }

        self.outbox
            .lock()
            .map_err(|e| MailError::Transport(e.to_string()))?
            .push(email.clone());

        Ok(())
    }
}
