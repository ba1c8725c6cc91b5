pub mod health_product;
pub mod prescription;
pub mod product;
pub mod user;

use sea_orm::FromJsonQueryResult;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Free-form product tags, stored as a JSON array
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult, ToSchema)]
#[serde(transparent)]
pub struct TagList(pub Vec<String>);
