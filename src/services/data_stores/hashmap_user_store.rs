use crate::domain::{Email, User, UserId, UserStore, UserStoreError};
use std::collections::HashMap;

/// In-memory store used by the test harness and local development. Mirrors
/// the PostgreSQL store's semantics, including the expiry filter on reset
/// token lookups.
#[derive(Default)]
pub struct HashmapUserStore {
    users: HashMap<Email, User>,
}

#[async_trait::async_trait]
impl UserStore for HashmapUserStore {
    async fn add_user(&mut self, user: User) -> Result<(), UserStoreError> {
        let email = &user.email;

        if self.users.contains_key(email) {
            return Err(UserStoreError::UserAlreadyExists);
        }

        self.users.insert(email.clone(), user);
        Ok(())
    }

    async fn get_user(&self, email: &Email) -> Result<User, UserStoreError> {
        match self.users.get(email) {
            Some(user) => Ok(user.clone()),
            None => Err(UserStoreError::UserNotFound),
        }
    }

    async fn get_user_by_id(
        &self,
        id: &UserId,
    ) -> Result<User, UserStoreError> {
        self.users
            .values()
            .find(|user| &user.id == id)
            .cloned()
            .ok_or(UserStoreError::UserNotFound)
    }

    async fn get_user_by_reset_token(
        &self,
        token_digest: &str,
    ) -> Result<User, UserStoreError> {
        self.users
            .values()
            .find(|user| {
                user.reset.as_ref().is_some_and(|pending| {
                    pending.digest() == token_digest && !pending.is_expired()
                })
            })
            .cloned()
            .ok_or(UserStoreError::UserNotFound)
    }

    async fn update_user(
        &mut self,
        user: &User,
    ) -> Result<(), UserStoreError> {
        match self.users.get_mut(&user.email) {
            Some(existing) => {
                *existing = user.clone();
                Ok(())
            }
            None => Err(UserStoreError::UserNotFound),
        }
    }

    async fn delete_user(
        &mut self,
        id: &UserId,
    ) -> Result<(), UserStoreError> {
        let email = self
            .users
            .values()
            .find(|user| &user.id == id)
            .map(|user| user.email.clone())
            .ok_or(UserStoreError::UserNotFound)?;

        self.users.remove(&email);
        Ok(())
    }
}
