use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use color_eyre::eyre::{eyre, Result};
use secrecy::ExposeSecret;
use tokio::sync::RwLock;

use crate::domain::{Email, EmailClient};

/// Recording email client for the test harness. Captured messages are the
/// only place a plaintext code or token exists outside the HTTP response
/// path, since the stores keep digests only.
#[derive(Default)]
pub struct MockEmailClient {
    sent: Arc<RwLock<Vec<SentEmail>>>,
    failing: AtomicBool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SentEmail {
    pub recipient: String,
    pub subject: String,
    pub content: String,
}

impl MockEmailClient {
    /// Make every subsequent send fail until reset.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub async fn sent_emails(&self) -> Vec<SentEmail> {
        self.sent.read().await.clone()
    }

    pub async fn last_email_to(&self, recipient: &str) -> Option<SentEmail> {
        self.sent
            .read()
            .await
            .iter()
            .rev()
            .find(|message| message.recipient == recipient)
            .cloned()
    }
}

#[async_trait::async_trait]
impl EmailClient for MockEmailClient {
    async fn send_email(
        &self,
        recipient: &Email,
        subject: &str,
        content: &str,
    ) -> Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(eyre!("mail transport unavailable"));
        }

        self.sent.write().await.push(SentEmail {
            recipient: recipient.as_ref().expose_secret().clone(),
            subject: subject.to_owned(),
            content: content.to_owned(),
        });

        Ok(())
    }
}
