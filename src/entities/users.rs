use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Display name shown in the page header.
    #[sea_orm(column_type = "String(StringLen::N(20))")]
    pub name: String,

    /// Login identifier. Unset until the `admin` command assigns credentials.
    #[sea_orm(unique, nullable)]
    pub username: Option<String>,

    /// Argon2id password hash in PHC format
    #[sea_orm(nullable)]
    pub password_hash: Option<String>,

    pub created_at: String,

    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
