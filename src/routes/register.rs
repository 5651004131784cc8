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
        AuditAction, AuthAPIError, Email, Password, Role, User,
        UserStoreError, ValidationError, VerificationEmail,
        VERIFICATION_EMAIL_SUBJECT,
    },
    utils::constants::OTP_TTL,
};

#[tracing::instrument(name = "Register", skip_all)]
pub async fn register(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), AuthAPIError> {
    let name = request.name.trim().to_owned();
    if name.is_empty() {
        return Err(
            ValidationError::new("Name is required".to_string()).into()
        );
    }
    if name.chars().count() > 80 {
        return Err(ValidationError::new(
            "Name too long. Maximum is 80 characters.".to_string(),
        )
        .into());
    }

    let email = Email::parse(Secret::new(request.email)).map_err(|_| {
        ValidationError::new("Valid email required".to_string())
    })?;
    let password = Password::parse(request.password)?;
    let role = Role::parse(request.role.as_deref().unwrap_or("user"));

    let mut user = User::create(name, email, role, &password)
        .await
        .map_err(AuthAPIError::UnexpectedError)?;
    let code = user.issue_verification_code(*OTP_TTL);

    let user_id = user.id;
    let user_name = user.name.clone();
    let recipient = user.email.clone();

    let body = VerificationEmail {
        name: &user_name,
        code: code.as_ref().expose_secret(),
        ttl_minutes: OTP_TTL.num_minutes(),
    }
    .render()
    .map_err(|e| AuthAPIError::UnexpectedError(eyre!(e)))?;

    {
        let mut user_store = state.user_store.write().await;
        user_store.add_user(user).await.map_err(|e| match e {
            UserStoreError::UserAlreadyExists => AuthAPIError::EmailTaken,
            err => AuthAPIError::UnexpectedError(eyre!(err)),
        })?;
    }

    // Two-phase create: an account whose code was never delivered would be
    // unreachable, so roll the record back and surface the failure.
    if let Err(e) = state
        .email_client
        .send_email(&recipient, VERIFICATION_EMAIL_SUBJECT, &body)
        .await
    {
        let mut user_store = state.user_store.write().await;
        if let Err(delete_err) = user_store.delete_user(&user_id).await {
            tracing::warn!(
                "failed to roll back user after mail failure: {delete_err}"
            );
        }
        return Err(AuthAPIError::Unavailable(e));
    }

    state
        .audit_sink
        .record(
            &user_id,
            AuditAction::UserRegistered,
            &format!("{user_name} created an account"),
            Some(addr.ip()),
        )
        .await;

    let response = Json(RegisterResponse {
        message: "Account created. Check your email for a verification code."
            .to_string(),
    });

    Ok((StatusCode::CREATED, response))
}

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: Secret<String>,
    #[serde(default)]
    pub role: Option<String>,
}

#[derive(Debug, Deserialize, PartialEq, Serialize)]
pub struct RegisterResponse {
    pub message: String,
}
