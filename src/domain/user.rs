use chrono::{DateTime, Duration, Utc};
use color_eyre::eyre::Result;
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{
    Email, OtpCode, Password, PendingSecret, ResetToken, Role, UserId,
    UserPasswordHash,
};

#[derive(Debug, Error, PartialEq)]
pub enum VerificationError {
    #[error("No verification code is pending")]
    CodeMissing,
    #[error("Code invalid or expired")]
    CodeInvalidOrExpired,
}

/// Credential projection of an account: everything the auth flows need,
/// secrets included. Never serialized — responses go through
/// [`User::profile`].
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: Email,
    pub role: Role,
    pub password_hash: UserPasswordHash,
    pub is_verified: bool,
    pub verification: Option<PendingSecret>,
    pub reset: Option<PendingSecret>,
    pub last_login_at: Option<DateTime<Utc>>,
}

impl User {
    /// New unverified account. The caller issues the first verification code
    /// and delivers it out-of-band before the record is of any use.
    pub async fn create(
        name: String,
        email: Email,
        role: Role,
        password: &Password,
    ) -> Result<Self> {
        let password_hash = UserPasswordHash::from_password(password).await?;
        Ok(Self {
            id: UserId::default(),
            name,
            email,
            role,
            password_hash,
            is_verified: false,
            verification: None,
            reset: None,
            last_login_at: None,
        })
    }

    /// Every password change re-hashes with a fresh salt and invalidates any
    /// pending reset secret. This is the only way a password value is set.
    pub async fn set_password(&mut self, password: &Password) -> Result<()> {
        self.password_hash = UserPasswordHash::from_password(password).await?;
        self.reset = None;
        Ok(())
    }

    /// Mint a verification code, keeping only its digest and expiry on the
    /// record. Overwrites any prior pending code.
    pub fn issue_verification_code(&mut self, ttl: Duration) -> OtpCode {
        let code = OtpCode::generate();
        self.verification = Some(PendingSecret::new(code.as_ref(), ttl));
        code
    }

    /// Verification is monotonic: once verified, submitting any code again
    /// succeeds without a check. A mismatch and an expired code are
    /// indistinguishable to the caller.
    pub fn verify_code(
        &mut self,
        code: &OtpCode,
    ) -> Result<(), VerificationError> {
        if self.is_verified {
            return Ok(());
        }

        let pending = self
            .verification
            .as_ref()
            .ok_or(VerificationError::CodeMissing)?;

        if !pending.matches(code.as_ref()) || pending.is_expired() {
            return Err(VerificationError::CodeInvalidOrExpired);
        }

        self.verification = None;
        self.is_verified = true;
        Ok(())
    }

    /// Mint a reset token, keeping only its digest and expiry on the record.
    /// Overwrites any prior pending token.
    pub fn issue_reset_token(&mut self, ttl: Duration) -> ResetToken {
        let token = ResetToken::generate();
        self.reset = Some(PendingSecret::new(token.as_ref(), ttl));
        token
    }

    /// Only called after a fully successful login: verified and password
    /// matched.
    pub fn record_login(&mut self) {
        self.last_login_at = Some(Utc::now());
    }

    /// Public projection: what API responses carry. No secret material.
    pub fn profile(&self) -> UserProfile {
        UserProfile {
            id: *self.id.as_ref(),
            name: self.name.clone(),
            email: self.email.as_ref().expose_secret().clone(),
            role: self.role,
            is_verified: self.is_verified,
            last_login_at: self.last_login_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: uuid::Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub is_verified: bool,
    pub last_login_at: Option<DateTime<Utc>>,
}
