use std::net::IpAddr;

use super::UserId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditAction {
    UserRegistered,
    UserLoggedIn,
    UserVerified,
    OtpResent,
    PasswordResetRequested,
    PasswordResetCompleted,
}

impl AuditAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UserRegistered => "USER_REGISTERED",
            Self::UserLoggedIn => "USER_LOGGED_IN",
            Self::UserVerified => "USER_VERIFIED",
            Self::OtpResent => "OTP_RESENT",
            Self::PasswordResetRequested => "PASSWORD_RESET_REQUESTED",
            Self::PasswordResetCompleted => "PASSWORD_RESET_COMPLETED",
        }
    }
}

/// Best-effort trail of auth state transitions. Implementations swallow
/// their own failures: recording never blocks or fails the operation that
/// triggered it.
#[async_trait::async_trait]
pub trait AuditSink {
    async fn record(
        &self,
        user_id: &UserId,
        action: AuditAction,
        description: &str,
        source_ip: Option<IpAddr>,
    );
}
