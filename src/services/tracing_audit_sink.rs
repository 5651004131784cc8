use std::net::IpAddr;

use crate::domain::{AuditAction, AuditSink, UserId};

/// Production audit sink: structured log events. Cannot fail, so the
/// fire-and-forget contract holds trivially.
#[derive(Default)]
pub struct TracingAuditSink;

#[async_trait::async_trait]
impl AuditSink for TracingAuditSink {
    async fn record(
        &self,
        user_id: &UserId,
        action: AuditAction,
        description: &str,
        source_ip: Option<IpAddr>,
    ) {
        tracing::info!(
            user_id = %user_id,
            action = action.as_str(),
            source_ip = ?source_ip,
            "{}",
            description
        );
    }
}
