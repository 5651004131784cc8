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
        AuditAction, AuthAPIError, Email, PasswordResetEmail, UserStoreError,
        ValidationError, PASSWORD_RESET_EMAIL_SUBJECT,
    },
    utils::constants::RESET_TOKEN_TTL,
};

// The response is identical whether or not the address has an account, so
// this endpoint cannot be used to enumerate emails.
const RESET_REQUESTED_MESSAGE: &str =
    "If the email exists, reset instructions were sent.";

#[tracing::instrument(name = "Request password reset", skip_all)]
pub async fn request_reset(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    Json(request): Json<RequestResetRequest>,
) -> Result<(StatusCode, Json<RequestResetResponse>), AuthAPIError> {
    let email = Email::parse(Secret::new(request.email)).map_err(|_| {
        ValidationError::new("Valid email required".to_string())
    })?;

    let mut user = match state.user_store.read().await.get_user(&email).await
    {
        Ok(user) => user,
        Err(UserStoreError::UserNotFound) => {
            return Ok((
                StatusCode::OK,
                Json(RequestResetResponse {
                    message: RESET_REQUESTED_MESSAGE.to_string(),
                }),
            ))
        }
        Err(e) => return Err(AuthAPIError::UnexpectedError(eyre!(e))),
    };

    let token = user.issue_reset_token(*RESET_TOKEN_TTL);

    let body = PasswordResetEmail {
        name: &user.name,
        token: token.as_ref().expose_secret(),
        ttl_minutes: RESET_TOKEN_TTL.num_minutes(),
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
        .send_email(&user.email, PASSWORD_RESET_EMAIL_SUBJECT, &body)
        .await
        .map_err(AuthAPIError::Unavailable)?;

    state
        .audit_sink
        .record(
            &user.id,
            AuditAction::PasswordResetRequested,
            &format!("{} requested a password reset", user.name),
            Some(addr.ip()),
        )
        .await;

    Ok((
        StatusCode::OK,
        Json(RequestResetResponse {
            message: RESET_REQUESTED_MESSAGE.to_string(),
        }),
    ))
}

#[derive(Deserialize)]
pub struct RequestResetRequest {
    pub email: String,
}

#[derive(Debug, Deserialize, PartialEq, Serialize)]
pub struct RequestResetResponse {
    pub message: String,
}
