//! Bindings of each listable entity to the list contract: which filters it
//! allows, how it sorts, and what a listed row looks like.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use pharmacy::{
    ListResource, PrescriptionStatus,
    filtering::{ADMIN_PAGE_LIMITS, CATALOG_PAGE_LIMITS, FilterColumns, PageLimits, SortColumns, SortKey},
};
use sea_orm::{ColumnTrait, DatabaseConnection, DbErr, EntityTrait, Order, QueryFilter, QuerySelect};
use serde::Serialize;
use std::collections::HashMap;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entities::{health_product, prescription, product, user};

pub struct ProductResource;

#[async_trait]
impl ListResource for ProductResource {
    type EntityType = product::Entity;
    type ColumnType = product::Column;
    type ListModel = product::Model;

    const RESOURCE_NAME: &'static str = "products";
    const ID_COLUMN: product::Column = product::Column::Id;
    const PAGE_LIMITS: PageLimits = CATALOG_PAGE_LIMITS;

    fn filter_columns() -> FilterColumns<product::Column> {
        FilterColumns::new()
            .kind(product::Column::Kind)
            .category(product::Column::Category)
            .in_stock(product::Column::InStock)
            .prescription(product::Column::Prescription)
            .price(product::Column::Price)
            .search([product::Column::Name, product::Column::GenericName])
    }

    fn order_by(key: SortKey) -> Vec<(product::Column, Order)> {
        let columns = SortColumns {
            price: product::Column::Price,
            rating: product::Column::Rating,
            created_at: product::Column::CreatedAt,
        };
        vec![columns.order_for(key)]
    }

    async fn present(
        _db: &DatabaseConnection,
        rows: Vec<product::Model>,
    ) -> Result<Vec<product::Model>, DbErr> {
        Ok(rows)
    }
}

pub struct HealthProductResource;

#[async_trait]
impl ListResource for HealthProductResource {
    type EntityType = health_product::Entity;
    type ColumnType = health_product::Column;
    type ListModel = health_product::Model;

    const RESOURCE_NAME: &'static str = "health_products";
    const ID_COLUMN: health_product::Column = health_product::Column::Id;
    const PAGE_LIMITS: PageLimits = CATALOG_PAGE_LIMITS;

    fn filter_columns() -> FilterColumns<health_product::Column> {
        FilterColumns::new()
            .category(health_product::Column::Category)
            .in_stock(health_product::Column::InStock)
            .price(health_product::Column::Price)
            .search([health_product::Column::Name, health_product::Column::GenericName])
    }

    fn order_by(key: SortKey) -> Vec<(health_product::Column, Order)> {
        let columns = SortColumns {
            price: health_product::Column::Price,
            rating: health_product::Column::Rating,
            created_at: health_product::Column::CreatedAt,
        };
        vec![columns.order_for(key)]
    }

    async fn present(
        _db: &DatabaseConnection,
        rows: Vec<health_product::Model>,
    ) -> Result<Vec<health_product::Model>, DbErr> {
        Ok(rows)
    }
}

/// A prescription with its owner embedded, as the back-office shows it
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PrescriptionWithUser {
    #[serde(flatten)]
    pub prescription: prescription::Model,
    /// `None` only if the owner was deleted between the two reads
    pub user: Option<user::UserSummary>,
}

/// Load the owners of `rows` in one query and attach them
///
/// # Errors
///
/// Returns a `DbErr` if the user lookup fails.
pub async fn attach_users(
    db: &DatabaseConnection,
    rows: Vec<prescription::Model>,
) -> Result<Vec<PrescriptionWithUser>, DbErr> {
    let mut ids: Vec<Uuid> = rows.iter().map(|row| row.user_id).collect();
    ids.sort_unstable();
    ids.dedup();

    let users: HashMap<Uuid, user::UserSummary> = if ids.is_empty() {
        HashMap::new()
    } else {
        user::Entity::find()
            .filter(user::Column::Id.is_in(ids))
            .all(db)
            .await?
            .into_iter()
            .map(|model| (model.id, user::UserSummary::from(model)))
            .collect()
    };

    Ok(rows
        .into_iter()
        .map(|prescription| {
            let user = users.get(&prescription.user_id).cloned();
            PrescriptionWithUser { prescription, user }
        })
        .collect())
}

pub struct AdminPrescriptionResource;

#[async_trait]
impl ListResource for AdminPrescriptionResource {
    type EntityType = prescription::Entity;
    type ColumnType = prescription::Column;
    type ListModel = PrescriptionWithUser;

    const RESOURCE_NAME: &'static str = "admin_prescriptions";
    const ID_COLUMN: prescription::Column = prescription::Column::Id;
    const PAGE_LIMITS: PageLimits = ADMIN_PAGE_LIMITS;

    fn filter_columns() -> FilterColumns<prescription::Column> {
        FilterColumns::new()
            .status(prescription::Column::Status)
            .search([
                prescription::Column::Name,
                prescription::Column::Doctor,
                prescription::Column::RxNumber,
            ])
    }

    /// Most recently touched first, whatever the client asks for
    fn order_by(_key: SortKey) -> Vec<(prescription::Column, Order)> {
        vec![(prescription::Column::UpdatedAt, Order::Desc)]
    }

    async fn present(
        db: &DatabaseConnection,
        rows: Vec<prescription::Model>,
    ) -> Result<Vec<PrescriptionWithUser>, DbErr> {
        attach_users(db, rows).await
    }
}

/// Per-patient prescription counts, in back-office vocabulary
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PrescriptionStats {
    pub approved: u64,
    pub pending: u64,
    pub rejected: u64,
    pub total: u64,
    pub last_updated: Option<DateTime<Utc>>,
}

impl PrescriptionStats {
    fn record(&mut self, status: PrescriptionStatus, count: u64, last_updated: Option<DateTime<Utc>>) {
        match status {
            PrescriptionStatus::Active => self.approved += count,
            PrescriptionStatus::Pending => self.pending += count,
            PrescriptionStatus::Expired => self.rejected += count,
        }
        self.total += count;
        self.last_updated = self.last_updated.max(last_updated);
    }
}

/// One row of the patient roster
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RosterEntry {
    pub user: user::UserSummary,
    pub stats: PrescriptionStats,
}

/// Aggregate prescription counts for `user_ids` only
///
/// # Errors
///
/// Returns a `DbErr` if the lookup fails.
pub async fn prescription_stats(
    db: &DatabaseConnection,
    user_ids: Vec<Uuid>,
) -> Result<HashMap<Uuid, PrescriptionStats>, DbErr> {
    if user_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let rows: Vec<(Uuid, PrescriptionStatus, DateTime<Utc>)> = prescription::Entity::find()
        .select_only()
        .column(prescription::Column::UserId)
        .column(prescription::Column::Status)
        .column(prescription::Column::UpdatedAt)
        .filter(prescription::Column::UserId.is_in(user_ids))
        .into_tuple()
        .all(db)
        .await?;

    let mut stats: HashMap<Uuid, PrescriptionStats> = HashMap::new();
    for (user_id, status, updated_at) in rows {
        stats.entry(user_id).or_default().record(status, 1, Some(updated_at));
    }
    Ok(stats)
}

pub struct UserRosterResource;

#[async_trait]
impl ListResource for UserRosterResource {
    type EntityType = user::Entity;
    type ColumnType = user::Column;
    type ListModel = RosterEntry;

    const RESOURCE_NAME: &'static str = "admin_users";
    const ID_COLUMN: user::Column = user::Column::Id;
    const PAGE_LIMITS: PageLimits = ADMIN_PAGE_LIMITS;

    fn filter_columns() -> FilterColumns<user::Column> {
        FilterColumns::new().search([user::Column::Name, user::Column::Email])
    }

    /// Newest patients first
    fn order_by(_key: SortKey) -> Vec<(user::Column, Order)> {
        vec![(user::Column::CreatedAt, Order::Desc)]
    }

    async fn present(db: &DatabaseConnection, rows: Vec<user::Model>) -> Result<Vec<RosterEntry>, DbErr> {
        let mut stats = prescription_stats(db, rows.iter().map(|row| row.id).collect()).await?;
        Ok(rows
            .into_iter()
            .map(|model| RosterEntry {
                stats: stats.remove(&model.id).unwrap_or_default(),
                user: user::UserSummary::from(model),
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_map_statuses_to_back_office_labels() {
        let early = DateTime::parse_from_rfc3339("2025-01-01T00:00:00Z").unwrap().with_timezone(&Utc);
        let late = DateTime::parse_from_rfc3339("2025-03-01T00:00:00Z").unwrap().with_timezone(&Utc);

        let mut stats = PrescriptionStats::default();
        stats.record(PrescriptionStatus::Active, 2, Some(early));
        stats.record(PrescriptionStatus::Expired, 1, Some(late));
        stats.record(PrescriptionStatus::Pending, 3, None);

        assert_eq!(
            stats,
            PrescriptionStats {
                approved: 2,
                pending: 3,
                rejected: 1,
                total: 6,
                last_updated: Some(late),
            }
        );
    }

    #[test]
    fn test_admin_lists_ignore_sort_keyword() {
        for key in [SortKey::PriceAsc, SortKey::RatingDesc, SortKey::Newest] {
            assert!(matches!(
                AdminPrescriptionResource::order_by(key).as_slice(),
                [(prescription::Column::UpdatedAt, Order::Desc)]
            ));
            assert!(matches!(
                UserRosterResource::order_by(key).as_slice(),
                [(user::Column::CreatedAt, Order::Desc)]
            ));
        }
    }

    #[test]
    fn test_health_catalog_has_no_kind_or_prescription_filter() {
        let columns = HealthProductResource::filter_columns();
        assert!(columns.kind.is_none());
        assert!(columns.prescription.is_none());
        assert_eq!(columns.search.len(), 2);
    }
}
