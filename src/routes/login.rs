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
        decoy_password_hash, verify_password_hash, AuditAction, AuthAPIError,
        Email, User, UserProfile, UserStoreError, ValidationError,
        VerificationEmail, VERIFICATION_EMAIL_SUBJECT,
    },
    utils::{auth::generate_auth_token, constants::OTP_TTL},
};

#[tracing::instrument(name = "Login", skip_all)]
pub async fn login(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    Json(request): Json<LoginRequest>,
) -> Result<(StatusCode, Json<LoginResponse>), AuthAPIError> {
    let email = Email::parse(Secret::new(request.email)).map_err(|_| {
        ValidationError::new("Valid email required".to_string())
    })?;
    // The submitted value is a credential candidate, not a new password:
    // only presence is validated, and a too-short guess earns the same 401
    // as any other wrong guess
    if request.password.expose_secret().is_empty() {
        return Err(
            ValidationError::new("Password is required".to_string()).into()
        );
    }
    let password = request.password;

    let mut user = match state.user_store.read().await.get_user(&email).await
    {
        Ok(user) => user,
        Err(UserStoreError::UserNotFound) => {
            // An unknown address burns the same CPU as a real check, keeping
            // the 401 indistinguishable from a wrong password by timing
            decoy_password_hash(password).await;
            return Err(AuthAPIError::IncorrectCredentials);
        }
        Err(e) => return Err(AuthAPIError::UnexpectedError(eyre!(e))),
    };

    verify_password_hash(user.password_hash.as_ref().to_owned(), password)
        .await
        .map_err(|_| AuthAPIError::IncorrectCredentials)?;

    if !user.is_verified {
        return handle_unverified(&state, user, addr).await;
    }

    user.record_login();
    {
        let mut user_store = state.user_store.write().await;
        user_store
            .update_user(&user)
            .await
            .map_err(|e| AuthAPIError::UnexpectedError(eyre!(e)))?;
    }

    let token = generate_auth_token(&user.id, user.role)
        .map_err(AuthAPIError::UnexpectedError)?;

    state
        .audit_sink
        .record(
            &user.id,
            AuditAction::UserLoggedIn,
            &format!("{} signed in", user.name),
            Some(addr.ip()),
        )
        .await;

    Ok((
        StatusCode::OK,
        Json(LoginResponse {
            token: token.expose_secret().to_owned(),
            user: user.profile(),
        }),
    ))
}

// A correct password against an unverified account never yields a session;
// it re-issues the verification code instead.
#[tracing::instrument(name = "Handling unverified login", skip_all)]
async fn handle_unverified(
    state: &AppState,
    mut user: User,
    addr: SocketAddr,
) -> Result<(StatusCode, Json<LoginResponse>), AuthAPIError> {
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
            &format!("{} attempted to sign in before verifying", user.name),
            Some(addr.ip()),
        )
        .await;

    Err(AuthAPIError::VerificationRequired)
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: Secret<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserProfile,
}
