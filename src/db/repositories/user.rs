use anyhow::{Context, Result};
use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryOrder, Set};
use tokio::task;

use crate::config::SecurityConfig;
use crate::entities::users;

/// User data returned from repository (without sensitive password hash)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: i32,
    pub name: String,
    pub username: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<users::Model> for User {
    fn from(model: users::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            username: model.username,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

/// Whether an owner upsert inserted a fresh row or rewrote the existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OwnerWrite {
    Created,
    Updated,
}

pub struct UserRepository {
    conn: DatabaseConnection,
}

impl UserRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    async fn find_owner(&self) -> Result<Option<users::Model>> {
        users::Entity::find()
            .order_by_asc(users::Column::Id)
            .one(&self.conn)
            .await
            .context("Failed to query site owner")
    }

    /// The site owner is the lowest-id user row. Every write path in the
    /// application keeps that row the only one.
    pub async fn get_owner(&self) -> Result<Option<User>> {
        Ok(self.find_owner().await?.map(User::from))
    }

    /// Owner together with its password hash, for credential checks
    pub async fn get_owner_with_password(&self) -> Result<Option<(User, Option<String>)>> {
        Ok(self.find_owner().await?.map(|u| {
            let password_hash = u.password_hash.clone();
            (User::from(u), password_hash)
        }))
    }

    /// Get user by ID
    pub async fn get_by_id(&self, id: i32) -> Result<Option<User>> {
        let user = users::Entity::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query user by ID")?;

        Ok(user.map(User::from))
    }

    pub async fn count(&self) -> Result<u64> {
        users::Entity::find()
            .count(&self.conn)
            .await
            .context("Failed to count users")
    }

    /// Update the display name. Returns `false` when the user does not exist.
    pub async fn update_name(&self, id: i32, name: &str) -> Result<bool> {
        let Some(user) = users::Entity::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query user for name update")?
        else {
            return Ok(false);
        };

        let mut active: users::ActiveModel = user.into();
        active.name = Set(name.to_string());
        active.updated_at = Set(chrono::Utc::now().to_rfc3339());
        active.update(&self.conn).await?;

        Ok(true)
    }

    /// Store an already-hashed password for a user
    pub async fn update_password_hash(&self, id: i32, password_hash: String) -> Result<()> {
        let user = users::Entity::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query user for password update")?
            .ok_or_else(|| anyhow::anyhow!("User not found: {id}"))?;

        let mut active: users::ActiveModel = user.into();
        active.password_hash = Set(Some(password_hash));
        active.updated_at = Set(chrono::Utc::now().to_rfc3339());
        active.update(&self.conn).await?;

        Ok(())
    }

    /// Assign login credentials to the owner, creating the owner row with
    /// `default_name` when none exists yet.
    pub async fn upsert_owner_credentials(
        &self,
        username: &str,
        password_hash: String,
        default_name: &str,
    ) -> Result<OwnerWrite> {
        let now = chrono::Utc::now().to_rfc3339();

        if let Some(owner) = self.find_owner().await? {
            let mut active: users::ActiveModel = owner.into();
            active.username = Set(Some(username.to_string()));
            active.password_hash = Set(Some(password_hash));
            active.updated_at = Set(now);
            active.update(&self.conn).await?;
            return Ok(OwnerWrite::Updated);
        }

        users::ActiveModel {
            name: Set(default_name.to_string()),
            username: Set(Some(username.to_string())),
            password_hash: Set(Some(password_hash)),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.conn)
        .await
        .context("Failed to create owner")?;

        Ok(OwnerWrite::Created)
    }

    /// Set the owner's display name, creating a credential-less owner when
    /// the table is empty.
    pub async fn upsert_owner_name(&self, name: &str) -> Result<OwnerWrite> {
        if let Some(owner) = self.find_owner().await? {
            self.update_name(owner.id, name).await?;
            return Ok(OwnerWrite::Updated);
        }

        let now = chrono::Utc::now().to_rfc3339();
        users::ActiveModel {
            name: Set(name.to_string()),
            username: Set(None),
            password_hash: Set(None),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.conn)
        .await
        .context("Failed to create owner")?;

        Ok(OwnerWrite::Created)
    }
}

/// Hash a password using Argon2id with optional custom params.
/// If config is None, uses the argon2 crate defaults.
pub fn hash_password(password: &str, config: Option<&SecurityConfig>) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);

    let argon2 = if let Some(cfg) = config {
        let params = Params::new(
            cfg.argon2_memory_cost_kib,
            cfg.argon2_time_cost,
            cfg.argon2_parallelism,
            None, // output length (use default)
        )
        .map_err(|e| anyhow::anyhow!("Invalid Argon2 params: {e}"))?;
        Argon2::new(Algorithm::Argon2id, Version::V0x13, params)
    } else {
        Argon2::default()
    };

    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {e}"))?;

    Ok(hash.to_string())
}

/// Check a password against a PHC hash string. Parameters are read from the
/// hash itself, so hashes made with any `SecurityConfig` verify here.
pub fn verify_password_hash(password_hash: &str, password: &str) -> Result<bool> {
    let parsed_hash = PasswordHash::new(password_hash)
        .map_err(|e| anyhow::anyhow!("Invalid password hash format: {e}"))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

/// Hash on the blocking pool; Argon2 would otherwise stall the async runtime.
pub async fn hash_password_blocking(password: &str, config: &SecurityConfig) -> Result<String> {
    let password = password.to_string();
    let config = config.clone();
    task::spawn_blocking(move || hash_password(&password, Some(&config)))
        .await
        .context("Password hashing task panicked")?
}

pub async fn verify_password_blocking(password_hash: &str, password: &str) -> Result<bool> {
    let password_hash = password_hash.to_string();
    let password = password.to_string();
    task::spawn_blocking(move || verify_password_hash(&password_hash, &password))
        .await
        .context("Password verification task panicked")?
}
