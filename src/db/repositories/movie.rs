use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, EntityTrait, ModelTrait, PaginatorTrait, QueryOrder, Set,
    TransactionTrait,
};

use crate::entities::movies;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Movie {
    pub id: i32,
    pub title: String,
    pub year: String,
}

impl From<movies::Model> for Movie {
    fn from(model: movies::Model) -> Self {
        Self {
            id: model.id,
            title: model.title,
            year: model.year,
        }
    }
}

pub struct MovieRepository {
    conn: DatabaseConnection,
}

impl MovieRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn list_all(&self) -> Result<Vec<Movie>> {
        let rows = movies::Entity::find()
            .order_by_asc(movies::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to list movies")?;

        Ok(rows.into_iter().map(Movie::from).collect())
    }

    pub async fn get(&self, id: i32) -> Result<Option<Movie>> {
        let row = movies::Entity::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query movie by ID")?;

        Ok(row.map(Movie::from))
    }

    pub async fn count(&self) -> Result<u64> {
        movies::Entity::find()
            .count(&self.conn)
            .await
            .context("Failed to count movies")
    }

    pub async fn create(&self, title: &str, year: &str) -> Result<Movie> {
        let model = movies::ActiveModel {
            title: Set(title.to_string()),
            year: Set(year.to_string()),
            ..Default::default()
        }
        .insert(&self.conn)
        .await
        .context("Failed to insert movie")?;

        Ok(Movie::from(model))
    }

    /// Insert a batch in one transaction; used for demo data.
    pub async fn create_many(&self, entries: &[(&str, &str)]) -> Result<usize> {
        let txn = self.conn.begin().await?;

        for (title, year) in entries {
            movies::ActiveModel {
                title: Set((*title).to_string()),
                year: Set((*year).to_string()),
                ..Default::default()
            }
            .insert(&txn)
            .await
            .context("Failed to insert movie")?;
        }

        txn.commit().await?;
        Ok(entries.len())
    }

    /// Returns `false` when no movie has this id.
    pub async fn update(&self, id: i32, title: &str, year: &str) -> Result<bool> {
        let Some(row) = movies::Entity::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query movie for update")?
        else {
            return Ok(false);
        };

        let mut active: movies::ActiveModel = row.into();
        active.title = Set(title.to_string());
        active.year = Set(year.to_string());
        active.update(&self.conn).await?;

        Ok(true)
    }

    /// Returns `false` when no movie has this id.
    pub async fn delete(&self, id: i32) -> Result<bool> {
        let Some(row) = movies::Entity::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query movie for delete")?
        else {
            return Ok(false);
        };

        row.delete(&self.conn).await?;
        Ok(true)
    }
}
