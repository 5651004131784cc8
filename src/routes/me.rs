use axum::{extract::State, Json};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use color_eyre::eyre::eyre;
use secrecy::Secret;
use serde::{Deserialize, Serialize};

use crate::{
    app_state::AppState,
    domain::{AuthAPIError, UserId, UserProfile, UserStoreError},
    utils::auth::validate_token,
};

#[tracing::instrument(name = "Me", skip_all)]
pub async fn me(
    State(state): State<AppState>,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
) -> Result<Json<MeResponse>, AuthAPIError> {
    let TypedHeader(Authorization(bearer)) =
        bearer.ok_or(AuthAPIError::MissingToken)?;

    let claims = validate_token(&Secret::new(bearer.token().to_owned()))
        .map_err(|_| AuthAPIError::InvalidToken)?;

    let user_id = UserId::parse(&claims.sub)
        .map_err(|_| AuthAPIError::InvalidToken)?;

    // A valid signature over an account that no longer exists is still a
    // dead token
    let user = state
        .user_store
        .read()
        .await
        .get_user_by_id(&user_id)
        .await
        .map_err(|e| match e {
            UserStoreError::UserNotFound => AuthAPIError::InvalidToken,
            err => AuthAPIError::UnexpectedError(eyre!(err)),
        })?;

    Ok(Json(MeResponse {
        user: user.profile(),
    }))
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MeResponse {
    pub user: UserProfile,
}
