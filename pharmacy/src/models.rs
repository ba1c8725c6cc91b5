use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// Query parameters accepted by every list endpoint.
///
/// Every value is kept as the raw string the client sent. Each resource reads
/// only the dimensions on its own allow-list; the rest are ignored.
///
/// # Filtering
/// - `category`: exact match; `all` or an invalid name means no constraint
/// - `inStock`: `true` filters in-stock items, any other value filters out-of-stock ones
/// - `prescription`: `required` or `none`; anything else means no constraint
/// - `q`: case-insensitive substring match on the resource's name-like fields
/// - `priceMin` / `priceMax`: inclusive bounds; non-numeric bounds are ignored
/// - `type`: `medicine` or `health`
/// - `status`: prescription status (`approved`, `pending`, `rejected` and their aliases)
///
/// # Sorting
/// `price_asc`, `price_desc` or `rating_desc`. Anything else sorts newest first.
///
/// # Pagination
/// `page` is 1-based. `limit` is clamped server-side to the resource's maximum.
#[derive(Debug, Clone, Default, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    #[param(example = "Pain Relief")]
    pub category: Option<String>,
    #[param(example = "true")]
    pub in_stock: Option<String>,
    #[param(example = "required")]
    pub prescription: Option<String>,
    #[param(example = "amoxi")]
    pub q: Option<String>,
    #[param(example = "5")]
    pub price_min: Option<String>,
    #[param(example = "100")]
    pub price_max: Option<String>,
    #[serde(rename = "type")]
    #[param(example = "medicine")]
    pub kind: Option<String>,
    #[param(example = "pending")]
    pub status: Option<String>,
    #[param(example = "price_asc")]
    pub sort: Option<String>,
    #[param(example = "1")]
    pub page: Option<String>,
    #[param(example = "12")]
    pub limit: Option<String>,
}

impl ListQuery {
    /// Build from raw query pairs. The first occurrence of a key wins; unknown keys are ignored.
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut query = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_ref() {
                "category" => &mut query.category,
                "inStock" => &mut query.in_stock,
                "prescription" => &mut query.prescription,
                "q" => &mut query.q,
                "priceMin" => &mut query.price_min,
                "priceMax" => &mut query.price_max,
                "type" => &mut query.kind,
                "status" => &mut query.status,
                "sort" => &mut query.sort,
                "page" => &mut query.page,
                "limit" => &mut query.limit,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value.into());
            }
        }
        query
    }
}

/// One page of a list endpoint
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ListResponse<T> {
    pub data: Vec<T>,
    pub page: u64,
    pub pages: u64,
    pub total: u64,
}

/// Catalog section a product belongs to
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "lowercase")]
pub enum ProductKind {
    #[sea_orm(string_value = "medicine")]
    Medicine,
    #[sea_orm(string_value = "health")]
    Health,
}

impl ProductKind {
    /// Parse the exact wire name; anything else is rejected
    #[must_use]
    pub fn from_wire(value: &str) -> Option<Self> {
        match value {
            "medicine" => Some(Self::Medicine),
            "health" => Some(Self::Health),
            _ => None,
        }
    }
}

/// Lifecycle state of a prescription as stored
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "lowercase")]
pub enum PrescriptionStatus {
    #[sea_orm(string_value = "active")]
    Active,
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "expired")]
    Expired,
}

impl PrescriptionStatus {
    /// Parse the stored status name exactly (`active`, `pending`, `expired`)
    #[must_use]
    pub fn from_wire(value: &str) -> Option<Self> {
        match value {
            "active" => Some(Self::Active),
            "pending" => Some(Self::Pending),
            "expired" => Some(Self::Expired),
            _ => None,
        }
    }

    /// Map a back-office status label onto the stored status.
    ///
    /// The admin UI says `approved`/`rejected` where the store says
    /// `active`/`expired`; both spellings are accepted, case-insensitively.
    #[must_use]
    pub fn from_ui(value: &str) -> Option<Self> {
        match value.to_lowercase().as_str() {
            "approved" | "active" => Some(Self::Active),
            "pending" => Some(Self::Pending),
            "rejected" | "expired" => Some(Self::Expired),
            _ => None,
        }
    }
}
