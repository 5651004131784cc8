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
        AuditAction, AuthAPIError, Email, OtpCode, UserProfile,
        UserStoreError, ValidationError, VerificationError,
    },
    utils::auth::generate_auth_token,
};

#[tracing::instrument(name = "Verify OTP", skip_all)]
pub async fn verify_otp(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    Json(request): Json<VerifyOtpRequest>,
) -> Result<(StatusCode, Json<VerifyOtpResponse>), AuthAPIError> {
    let email = Email::parse(Secret::new(request.email)).map_err(|_| {
        ValidationError::new("Valid email required".to_string())
    })?;
    let code = OtpCode::parse(Secret::new(request.code)).map_err(|_| {
        ValidationError::new("Code must be 6 digits".to_string())
    })?;

    // An unknown address gets the same answer as a bad code
    let mut user = match state.user_store.read().await.get_user(&email).await
    {
        Ok(user) => user,
        Err(UserStoreError::UserNotFound) => {
            return Err(AuthAPIError::CodeInvalidOrExpired)
        }
        Err(e) => return Err(AuthAPIError::UnexpectedError(eyre!(e))),
    };

    let was_verified = user.is_verified;

    user.verify_code(&code).map_err(|e| match e {
        VerificationError::CodeMissing
        | VerificationError::CodeInvalidOrExpired => {
            AuthAPIError::CodeInvalidOrExpired
        }
    })?;

    if !was_verified {
        {
            let mut user_store = state.user_store.write().await;
            user_store
                .update_user(&user)
                .await
                .map_err(|e| AuthAPIError::UnexpectedError(eyre!(e)))?;
        }

        state
            .audit_sink
            .record(
                &user.id,
                AuditAction::UserVerified,
                &format!("{} verified their email", user.name),
                Some(addr.ip()),
            )
            .await;
    }

    let token = generate_auth_token(&user.id, user.role)
        .map_err(AuthAPIError::UnexpectedError)?;

    Ok((
        StatusCode::OK,
        Json(VerifyOtpResponse {
            token: token.expose_secret().to_owned(),
            user: user.profile(),
        }),
    ))
}

#[derive(Deserialize)]
pub struct VerifyOtpRequest {
    pub email: String,
    pub code: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct VerifyOtpResponse {
    pub token: String,
    pub user: UserProfile,
}
