use chrono::{DateTime, Duration, Utc};
use secrecy::{ExposeSecret, Secret};
use sha2::{Digest, Sha256};

/// A single-use secret held against a user record: the SHA-256 digest of a
/// verification code or reset token, paired with its expiry. Only the digest
/// is ever at rest; the plaintext leaves the process exactly once, in the
/// outbound email. Digest and expiry are always set together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingSecret {
    digest: String,
    expires_at: DateTime<Utc>,
}

impl PendingSecret {
    pub fn new(plaintext: &Secret<String>, ttl: Duration) -> Self {
        Self {
            digest: sha256_hex(plaintext.expose_secret()),
            expires_at: Utc::now() + ttl,
        }
    }

    /// Rebuild from stored columns. Callers own the both-or-neither pairing.
    pub fn from_parts(digest: String, expires_at: DateTime<Utc>) -> Self {
        Self { digest, expires_at }
    }

    pub fn matches(&self, candidate: &Secret<String>) -> bool {
        self.digest == sha256_hex(candidate.expose_secret())
    }

    pub fn is_expired(&self) -> bool {
        Utc::now() > self.expires_at
    }

    pub fn digest(&self) -> &str {
        &self.digest
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }
}

pub fn sha256_hex(value: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(value.as_bytes());
    hex::encode(hasher.finalize())
}
