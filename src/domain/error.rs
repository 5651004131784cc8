use color_eyre::eyre::Report;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthAPIError {
    #[error("Account not found")]
    AccountNotFound,
    #[error("Account already verified")]
    AlreadyVerified,
    #[error("Code invalid or expired")]
    CodeInvalidOrExpired,
    #[error("Email already in use")]
    EmailTaken,
    #[error("Invalid credentials")]
    IncorrectCredentials,
    #[error("Invalid token")]
    InvalidToken,
    #[error("Missing token")]
    MissingToken,
    #[error("Token invalid or expired")]
    ResetTokenInvalidOrExpired,
    #[error("Service unavailable")]
    Unavailable(#[source] Report),
    #[error("Unexpected error")]
    UnexpectedError(#[source] Report),
    #[error("Validation error")]
    ValidationError(#[from] ValidationError),
    #[error("Email verification required")]
    VerificationRequired,
}

#[derive(Debug, Error)]
#[error("Validation error: {0}")]
pub struct ValidationError(String);

impl ValidationError {
    pub fn new(message: String) -> Self {
        Self(message)
    }

    pub fn as_ref(&self) -> &String {
        &self.0
    }
}
