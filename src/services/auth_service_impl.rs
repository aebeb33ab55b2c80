//! `SeaORM` implementation of the `AuthService` trait.

use crate::config::SecurityConfig;
use crate::db::{Store, User, repositories::user::verify_password_blocking};
use crate::services::auth_service::{AuthError, AuthService};
use async_trait::async_trait;

pub struct SeaOrmAuthService {
    store: Store,
    security: SecurityConfig,
}

impl SeaOrmAuthService {
    #[must_use]
    pub const fn new(store: Store, security: SecurityConfig) -> Self {
        Self { store, security }
    }

    async fn check_owner(&self, username: &str, password: &str) -> Result<Option<User>, AuthError> {
        let Some((owner, password_hash)) = self.store.get_owner_with_password().await? else {
            return Ok(None);
        };

        if owner.username.as_deref() != Some(username) {
            return Ok(None);
        }

        // The owner may exist without credentials (demo data before `admin`)
        let Some(password_hash) = password_hash else {
            return Ok(None);
        };

        if verify_password_blocking(&password_hash, password).await? {
            Ok(Some(owner))
        } else {
            Ok(None)
        }
    }
}

#[async_trait]
impl AuthService for SeaOrmAuthService {
    async fn verify(&self, username: &str, password: &str) -> Result<bool, AuthError> {
        Ok(self.check_owner(username, password).await?.is_some())
    }

    async fn login(&self, username: &str, password: &str) -> Result<User, AuthError> {
        self.check_owner(username, password)
            .await?
            .ok_or(AuthError::InvalidCredentials)
    }

    async fn load_user(&self, user_id: i32) -> Result<Option<User>, AuthError> {
        Ok(self.store.get_user(user_id).await?)
    }

    async fn owner(&self) -> Result<Option<User>, AuthError> {
        Ok(self.store.get_owner().await?)
    }

    async fn set_password(&self, user_id: i32, new_password: &str) -> Result<(), AuthError> {
        if new_password.is_empty() {
            return Err(AuthError::Validation("Password cannot be empty".to_string()));
        }

        self.store
            .get_user(user_id)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        self.store
            .update_user_password(user_id, new_password, &self.security)
            .await?;

        Ok(())
    }

    async fn update_name(&self, user_id: i32, name: &str) -> Result<(), AuthError> {
        if self.store.update_user_name(user_id, name).await? {
            Ok(())
        } else {
            Err(AuthError::UserNotFound)
        }
    }
}
