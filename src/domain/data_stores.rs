use super::{Email, User, UserId};
use color_eyre::eyre::Report;
use thiserror::Error;

/// Credential store for user records. Every read returns the credential
/// projection ([`User`], secrets included); callers derive the public
/// projection explicitly via [`User::profile`] before anything leaves the
/// process.
#[async_trait::async_trait]
pub trait UserStore {
    async fn add_user(&mut self, user: User) -> Result<(), UserStoreError>;
    async fn get_user(&self, email: &Email) -> Result<User, UserStoreError>;
    async fn get_user_by_id(
        &self,
        id: &UserId,
    ) -> Result<User, UserStoreError>;
    /// Look up by the SHA-256 digest of a reset token. Only records whose
    /// reset secret is still unexpired match.
    async fn get_user_by_reset_token(
        &self,
        token_digest: &str,
    ) -> Result<User, UserStoreError>;
    async fn update_user(&mut self, user: &User)
        -> Result<(), UserStoreError>;
    async fn delete_user(&mut self, id: &UserId)
        -> Result<(), UserStoreError>;
}

#[derive(Debug, Error)]
pub enum UserStoreError {
    #[error("User already exists")]
    UserAlreadyExists,
    #[error("User not found")]
    UserNotFound,
    #[error("Unexpected error")]
    UnexpectedError(#[source] Report),
}

impl PartialEq for UserStoreError {
    fn eq(&self, other: &Self) -> bool {
        matches!(
            (self, other),
            (Self::UserAlreadyExists, Self::UserAlreadyExists)
                | (Self::UserNotFound, Self::UserNotFound)
                | (Self::UnexpectedError(_), Self::UnexpectedError(_))
        )
    }
}
