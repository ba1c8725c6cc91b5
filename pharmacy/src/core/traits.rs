use async_trait::async_trait;
use sea_orm::{ColumnTrait, DatabaseConnection, DbErr, EntityTrait, Order};
use serde::Serialize;

use crate::filtering::{FilterColumns, PageLimits, SortKey};

/// A store-backed collection served by a paginated list endpoint.
///
/// Implementors declare which filter dimensions they accept, how each sort
/// key maps onto their columns, and how fetched rows are turned into the
/// response shape. [`list_resource`](crate::core::list_resource) does the rest.
#[async_trait]
pub trait ListResource: Send + Sync {
    type EntityType: EntityTrait<Column = Self::ColumnType> + Sync;
    type ColumnType: ColumnTrait + std::fmt::Debug + Send + Sync;
    type ListModel: Serialize + Send;

    /// Used in log lines
    const RESOURCE_NAME: &'static str;
    /// Final ordering key, so equal sort values never reorder between pages
    const ID_COLUMN: Self::ColumnType;
    const PAGE_LIMITS: PageLimits;

    /// The allow-list of filter dimensions and their columns
    fn filter_columns() -> FilterColumns<Self::ColumnType>;

    /// Primary orderings for `key`. The id tie-breaker is appended by the caller.
    fn order_by(key: SortKey) -> Vec<(Self::ColumnType, Order)>;

    /// Turn one page of rows into response items
    ///
    /// # Errors
    ///
    /// Returns a `DbErr` if loading related data fails.
    async fn present(
        db: &DatabaseConnection,
        rows: Vec<<Self::EntityType as EntityTrait>::Model>,
    ) -> Result<Vec<Self::ListModel>, DbErr>;
}
