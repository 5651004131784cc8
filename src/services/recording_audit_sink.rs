use std::net::IpAddr;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::domain::{AuditAction, AuditSink, UserId};

/// In-memory audit sink for the test harness.
#[derive(Default)]
pub struct RecordingAuditSink {
    events: Arc<RwLock<Vec<AuditEvent>>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AuditEvent {
    pub user_id: UserId,
    pub action: AuditAction,
    pub description: String,
    pub source_ip: Option<IpAddr>,
}

impl RecordingAuditSink {
    pub async fn events(&self) -> Vec<AuditEvent> {
        self.events.read().await.clone()
    }

    pub async fn actions(&self) -> Vec<AuditAction> {
        self.events
            .read()
            .await
            .iter()
            .map(|event| event.action)
            .collect()
    }
}

#[async_trait::async_trait]
impl AuditSink for RecordingAuditSink {
    async fn record(
        &self,
        user_id: &UserId,
        action: AuditAction,
        description: &str,
        source_ip: Option<IpAddr>,
    ) {
        self.events.write().await.push(AuditEvent {
            user_id: *user_id,
            action,
            description: description.to_owned(),
            source_ip,
        });
    }
}
