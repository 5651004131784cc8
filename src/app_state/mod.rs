use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::{AuditSink, EmailClient, UserStore};

pub type UserStoreType = Arc<RwLock<dyn UserStore + Send + Sync>>;
pub type EmailClientType = Arc<dyn EmailClient + Send + Sync>;
pub type AuditSinkType = Arc<dyn AuditSink + Send + Sync>;

#[derive(Clone)]
pub struct AppState {
    pub user_store: UserStoreType,
    pub email_client: EmailClientType,
    pub audit_sink: AuditSinkType,
}

impl AppState {
    pub fn new(
        user_store: UserStoreType,
        email_client: EmailClientType,
        audit_sink: AuditSinkType,
    ) -> Self {
        Self {
            user_store,
            email_client,
            audit_sink,
        }
    }
}
