use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::TagList;

/// An over-the-counter health item, managed from the back-office
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[sea_orm(table_name = "health_products")]
#[serde(rename_all = "camelCase")]
#[schema(as = HealthProduct)]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub generic_name: Option<String>,
    #[sea_orm(column_type = "Double")]
    pub price: f64,
    pub category: String,
    #[sea_orm(column_type = "Json")]
    pub tags: TagList,
    pub image_url: Option<String>,
    pub in_stock: bool,
    pub stock: i32,
    #[sea_orm(column_type = "Double")]
    pub rating: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
