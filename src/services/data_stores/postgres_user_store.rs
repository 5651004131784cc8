use chrono::{DateTime, Utc};
use color_eyre::eyre::eyre;
use secrecy::{ExposeSecret, Secret};
use sqlx::{postgres::PgRow, PgPool, Row};
use uuid::Uuid;

use crate::domain::{
    Email, PendingSecret, Role, User, UserId, UserPasswordHash, UserStore,
    UserStoreError,
};

pub struct PostgresUserStore {
    pool: PgPool,
}

impl PostgresUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const USER_COLUMNS: &str = "id, name, email, password_hash, role, \
     is_verified, verification_code_hash, verification_expires_at, \
     reset_token_hash, reset_expires_at, last_login_at";

fn row_to_user(row: &PgRow) -> Result<User, UserStoreError> {
    let unexpected =
        |e: sqlx::Error| UserStoreError::UnexpectedError(eyre!(e));

    let verification_code_hash: Option<String> =
        row.try_get("verification_code_hash").map_err(unexpected)?;
    let verification_expires_at: Option<DateTime<Utc>> =
        row.try_get("verification_expires_at").map_err(unexpected)?;
    let reset_token_hash: Option<String> =
        row.try_get("reset_token_hash").map_err(unexpected)?;
    let reset_expires_at: Option<DateTime<Utc>> =
        row.try_get("reset_expires_at").map_err(unexpected)?;

    Ok(User {
        id: UserId::new(row.try_get::<Uuid, _>("id").map_err(unexpected)?),
        name: row.try_get("name").map_err(unexpected)?,
        email: Email::parse(Secret::new(
            row.try_get("email").map_err(unexpected)?,
        ))
        .map_err(UserStoreError::UnexpectedError)?,
        role: Role::parse(
            &row.try_get::<String, _>("role").map_err(unexpected)?,
        ),
        password_hash: UserPasswordHash::parse(Secret::new(
            row.try_get("password_hash").map_err(unexpected)?,
        ))
        .map_err(UserStoreError::UnexpectedError)?,
        is_verified: row.try_get("is_verified").map_err(unexpected)?,
        // The schema CHECK keeps digest and expiry paired
        verification: verification_code_hash
            .zip(verification_expires_at)
            .map(|(digest, expires_at)| {
                PendingSecret::from_parts(digest, expires_at)
            }),
        reset: reset_token_hash.zip(reset_expires_at).map(
            |(digest, expires_at)| {
                PendingSecret::from_parts(digest, expires_at)
            },
        ),
        last_login_at: row.try_get("last_login_at").map_err(unexpected)?,
    })
}

#[async_trait::async_trait]
impl UserStore for PostgresUserStore {
    #[tracing::instrument(name = "Adding user to PostgreSQL", skip_all)]
    async fn add_user(&mut self, user: User) -> Result<(), UserStoreError> {
        sqlx::query(
            r#"
            INSERT INTO users (id, name, email, password_hash, role,
                is_verified, verification_code_hash, verification_expires_at,
                reset_token_hash, reset_expires_at, last_login_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(user.id.as_ref())
        .bind(&user.name)
        .bind(user.email.as_ref().expose_secret())
        .bind(user.password_hash.as_ref().expose_secret())
        .bind(user.role.as_str())
        .bind(user.is_verified)
        .bind(user.verification.as_ref().map(|p| p.digest().to_owned()))
        .bind(user.verification.as_ref().map(|p| p.expires_at()))
        .bind(user.reset.as_ref().map(|p| p.digest().to_owned()))
        .bind(user.reset.as_ref().map(|p| p.expires_at()))
        .bind(user.last_login_at)
        .execute(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                UserStoreError::UserAlreadyExists
            }
            err => UserStoreError::UnexpectedError(eyre!(err)),
        })?;
        Ok(())
    }

    #[tracing::instrument(name = "Retrieving user from PostgreSQL", skip_all)]
    async fn get_user(&self, email: &Email) -> Result<User, UserStoreError> {
        let row = sqlx::query(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email.as_ref().expose_secret())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::RowNotFound => UserStoreError::UserNotFound,
            err => UserStoreError::UnexpectedError(eyre!(err)),
        })?;

        row_to_user(&row)
    }

    #[tracing::instrument(
        name = "Retrieving user by ID from PostgreSQL",
        skip_all
    )]
    async fn get_user_by_id(
        &self,
        id: &UserId,
    ) -> Result<User, UserStoreError> {
        let row = sqlx::query(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id.as_ref())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::RowNotFound => UserStoreError::UserNotFound,
            err => UserStoreError::UnexpectedError(eyre!(err)),
        })?;

        row_to_user(&row)
    }

    #[tracing::instrument(
        name = "Retrieving user by reset token from PostgreSQL",
        skip_all
    )]
    async fn get_user_by_reset_token(
        &self,
        token_digest: &str,
    ) -> Result<User, UserStoreError> {
        let row = sqlx::query(&format!(
            "SELECT {USER_COLUMNS} FROM users \
             WHERE reset_token_hash = $1 AND reset_expires_at > now()"
        ))
        .bind(token_digest)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::RowNotFound => UserStoreError::UserNotFound,
            err => UserStoreError::UnexpectedError(eyre!(err)),
        })?;

        row_to_user(&row)
    }

    #[tracing::instrument(name = "Updating user in PostgreSQL", skip_all)]
    async fn update_user(
        &mut self,
        user: &User,
    ) -> Result<(), UserStoreError> {
        let result = sqlx::query(
            r#"
            UPDATE users SET
                name = $2,
                password_hash = $3,
                role = $4,
                is_verified = $5,
                verification_code_hash = $6,
                verification_expires_at = $7,
                reset_token_hash = $8,
                reset_expires_at = $9,
                last_login_at = $10
            WHERE id = $1
            "#,
        )
        .bind(user.id.as_ref())
        .bind(&user.name)
        .bind(user.password_hash.as_ref().expose_secret())
        .bind(user.role.as_str())
        .bind(user.is_verified)
        .bind(user.verification.as_ref().map(|p| p.digest().to_owned()))
        .bind(user.verification.as_ref().map(|p| p.expires_at()))
        .bind(user.reset.as_ref().map(|p| p.digest().to_owned()))
        .bind(user.reset.as_ref().map(|p| p.expires_at()))
        .bind(user.last_login_at)
        .execute(&self.pool)
        .await
        .map_err(|e| UserStoreError::UnexpectedError(eyre!(e)))?;

        if result.rows_affected() == 0 {
            return Err(UserStoreError::UserNotFound);
        }

        Ok(())
    }

    #[tracing::instrument(name = "Deleting user from PostgreSQL", skip_all)]
    async fn delete_user(
        &mut self,
        id: &UserId,
    ) -> Result<(), UserStoreError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id.as_ref())
            .execute(&self.pool)
            .await
            .map_err(|e| UserStoreError::UnexpectedError(eyre!(e)))?;

        if result.rows_affected() == 0 {
            return Err(UserStoreError::UserNotFound);
        }

        Ok(())
    }
}
