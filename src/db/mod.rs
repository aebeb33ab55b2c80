use anyhow::Result;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;
use std::path::Path;
use std::time::Duration;
use tracing::info;

use crate::config::SecurityConfig;

pub mod migrator;
pub mod repositories;

pub use repositories::movie::Movie;
pub use repositories::user::{OwnerWrite, User};

#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        if !db_url.contains(":memory:") {
            let path_str = db_url.trim_start_matches("sqlite://").trim_start_matches("sqlite:");
            let path_str = path_str.split('?').next().unwrap_or(path_str);
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600))
            .sqlx_logging(false);

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    /// Drop every table and re-create the schema from scratch.
    pub async fn reset(&self) -> Result<()> {
        migrator::Migrator::fresh(&self.conn).await?;
        info!("Database schema dropped and re-created");
        Ok(())
    }

    fn movie_repo(&self) -> repositories::movie::MovieRepository {
        repositories::movie::MovieRepository::new(self.conn.clone())
    }

    pub fn user_repo(&self) -> repositories::user::UserRepository {
        repositories::user::UserRepository::new(self.conn.clone())
    }

    // Catalog

    pub async fn list_movies(&self) -> Result<Vec<Movie>> {
        self.movie_repo().list_all().await
    }

    pub async fn get_movie(&self, id: i32) -> Result<Option<Movie>> {
        self.movie_repo().get(id).await
    }

    pub async fn count_movies(&self) -> Result<u64> {
        self.movie_repo().count().await
    }

    pub async fn add_movie(&self, title: &str, year: &str) -> Result<Movie> {
        self.movie_repo().create(title, year).await
    }

    pub async fn add_movies(&self, entries: &[(&str, &str)]) -> Result<usize> {
        self.movie_repo().create_many(entries).await
    }

    pub async fn update_movie(&self, id: i32, title: &str, year: &str) -> Result<bool> {
        self.movie_repo().update(id, title, year).await
    }

    pub async fn remove_movie(&self, id: i32) -> Result<bool> {
        self.movie_repo().delete(id).await
    }

    // Credentials

    pub async fn get_owner(&self) -> Result<Option<User>> {
        self.user_repo().get_owner().await
    }

    pub async fn get_owner_with_password(&self) -> Result<Option<(User, Option<String>)>> {
        self.user_repo().get_owner_with_password().await
    }

    pub async fn get_user(&self, id: i32) -> Result<Option<User>> {
        self.user_repo().get_by_id(id).await
    }

    pub async fn count_users(&self) -> Result<u64> {
        self.user_repo().count().await
    }

    pub async fn update_user_name(&self, id: i32, name: &str) -> Result<bool> {
        self.user_repo().update_name(id, name).await
    }

    pub async fn update_user_password(
        &self,
        id: i32,
        new_password: &str,
        config: &SecurityConfig,
    ) -> Result<()> {
        let hash = repositories::user::hash_password_blocking(new_password, config).await?;
        self.user_repo().update_password_hash(id, hash).await
    }

    pub async fn upsert_owner_credentials(
        &self,
        username: &str,
        password: &str,
        default_name: &str,
        config: &SecurityConfig,
    ) -> Result<OwnerWrite> {
        let hash = repositories::user::hash_password_blocking(password, config).await?;
        self.user_repo()
            .upsert_owner_credentials(username, hash, default_name)
            .await
    }

    pub async fn upsert_owner_name(&self, name: &str) -> Result<OwnerWrite> {
        self.user_repo().upsert_owner_name(name).await
    }
}
