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
        sha256_hex, AuditAction, AuthAPIError, Password, ResetToken,
        UserStoreError,
    },
};

#[tracing::instrument(name = "Reset password", skip_all)]
pub async fn reset_password(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    Json(request): Json<ResetPasswordRequest>,
) -> Result<(StatusCode, Json<ResetPasswordResponse>), AuthAPIError> {
    // A malformed token gets the same generic answer as an expired one
    let token = ResetToken::parse(Secret::new(request.token))
        .map_err(|_| AuthAPIError::ResetTokenInvalidOrExpired)?;
    let password = Password::parse(request.password)?;

    let digest = sha256_hex(token.as_ref().expose_secret());

    let mut user = match state
        .user_store
        .read()
        .await
        .get_user_by_reset_token(&digest)
        .await
    {
        Ok(user) => user,
        Err(UserStoreError::UserNotFound) => {
            return Err(AuthAPIError::ResetTokenInvalidOrExpired)
        }
        Err(e) => return Err(AuthAPIError::UnexpectedError(eyre!(e))),
    };

    // Re-hashes and clears the reset secret; the token is spent
    user.set_password(&password)
        .await
        .map_err(AuthAPIError::UnexpectedError)?;

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
            AuditAction::PasswordResetCompleted,
            &format!("{} reset their password", user.name),
            Some(addr.ip()),
        )
        .await;

    // No session is issued; the holder logs in with the new password
    Ok((
        StatusCode::OK,
        Json(ResetPasswordResponse {
            message: "Password reset successful".to_string(),
        }),
    ))
}

#[derive(Deserialize)]
pub struct ResetPasswordRequest {
    pub token: String,
    pub password: Secret<String>,
}

#[derive(Debug, Deserialize, PartialEq, Serialize)]
pub struct ResetPasswordResponse {
    pub message: String,
}
