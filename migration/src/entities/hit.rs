//! Hit entity: one recorded visit against a hittable target

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "hits")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Polymorphic discriminator of the target entity
    pub hittable_type: String,
    pub hittable_id: i64,
    pub ip: String,
    #[sea_orm(column_type = "Text")]
    pub user_agent: String,
    pub user_id: Option<i64>,
    pub referer: Option<String>,
    pub method: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub url: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
