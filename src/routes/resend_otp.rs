use askama::Template;
use axum::{
    extract::{ConnectInfo, State},
    http::StatusCode,
    Json,
};
use color_eyre::eyre::eyre;
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;

use crate::{
    app_state::AppState,
    domain::{
        AuditAction, AuthAPIError, Email, UserStoreError, ValidationError,
        VerificationEmail, VERIFICATION_EMAIL_SUBJECT,
    },
    utils::constants::OTP_TTL,
};

// Resend intentionally reveals whether the account exists: the requester
// already holds the address, having just registered with it.
#[tracing::instrument(name = "Resend OTP", skip_all)]
pub async fn resend_otp(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    Json(request): Json<ResendOtpRequest>,
) -> Result<(StatusCode, Json<ResendOtpResponse>), AuthAPIError> {
    let email = Email::parse(Secret::new(request.email)).map_err(|_| {
        ValidationError::new("Valid email required".to_string())
    })?;

    let mut user = match state.user_store.read().await.get_user(&email).await
    {
        Ok(user) => user,
        Err(UserStoreError::UserNotFound) => {
            return Err(AuthAPIError::AccountNotFound)
        }
        Err(e) => return Err(AuthAPIError::UnexpectedError(eyre!(e))),
    };

    if user.is_verified {
        return Err(AuthAPIError::AlreadyVerified);
    }

    // Overwrites the pending code; the old one stops validating
    let code = user.issue_verification_code(*OTP_TTL);

    let body = VerificationEmail {
        name: &user.name,
        code: code.as_ref().expose_secret(),
        ttl_minutes: OTP_TTL.num_minutes(),
    }
    .render()
    .map_err(|e| AuthAPIError::UnexpectedError(eyre!(e)))?;

    {
        let mut user_store = state.user_store.write().await;
        user_store
            .update_user(&user)
            .await
            .map_err(|e| AuthAPIError::UnexpectedError(eyre!(e)))?;
    }

    state
        .email_client
        .send_email(&user.email, VERIFICATION_EMAIL_SUBJECT, &body)
        .await
        .map_err(AuthAPIError::Unavailable)?;

    state
        .audit_sink
        .record(
            &user.id,
            AuditAction::OtpResent,
            &format!("{} requested a new verification code", user.name),
            Some(addr.ip()),
        )
        .await;

    Ok((
        StatusCode::OK,
        Json(ResendOtpResponse {
            message: "A new verification code has been sent.".to_string(),
        }),
    ))
}

#[derive(Deserialize)]
pub struct ResendOtpRequest {
    pub email: String,
}

#[derive(Debug, Deserialize, PartialEq, Serialize)]
pub struct ResendOtpResponse {
    pub message: String,
}
