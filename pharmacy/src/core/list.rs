use sea_orm::{
    Condition, DatabaseConnection, DbErr, EntityTrait, Order, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Select,
};

use super::traits::ListResource;
use crate::filtering::{PageSpec, SafeFilter, parse_pagination, parse_sort};
use crate::models::{ListQuery, ListResponse};

/// Everything a list request resolves to, computed once per request.
///
/// The count and the page fetch are both derived from `condition`, so the
/// reported total always describes the same rows the pages are cut from.
#[derive(Debug)]
pub struct ListPlan<R: ListResource> {
    pub filter: SafeFilter<R::ColumnType>,
    pub condition: Condition,
    pub ordering: Vec<(R::ColumnType, Order)>,
    pub page: PageSpec,
}

impl<R: ListResource> ListPlan<R> {
    #[must_use]
    pub fn for_resource(query: &ListQuery) -> Self {
        let filter = SafeFilter::from_query(query, &R::filter_columns());
        let condition = filter.to_condition();

        let mut ordering = R::order_by(parse_sort(query.sort.as_deref()));
        ordering.push((R::ID_COLUMN, Order::Asc));

        let page = parse_pagination(query.page.as_deref(), query.limit.as_deref(), R::PAGE_LIMITS);

        Self {
            filter,
            condition,
            ordering,
            page,
        }
    }

    /// Rows matching the filter, unordered and unpaged
    #[must_use]
    pub fn count_query(&self) -> Select<R::EntityType> {
        R::EntityType::find().filter(self.condition.clone())
    }

    /// One ordered page of rows matching the filter
    #[must_use]
    pub fn list_query(&self) -> Select<R::EntityType> {
        let query = self
            .ordering
            .iter()
            .fold(self.count_query(), |query, (column, order)| {
                query.order_by(*column, order.clone())
            });
        query.offset(self.page.skip).limit(self.page.limit)
    }
}

/// Serve one page of a list endpoint.
///
/// Malformed query values never fail the request; they fall back to "no
/// constraint" or to the default window.
///
/// # Errors
///
/// Returns a `DbErr` when the store fails.
pub async fn list_resource<R>(
    db: &DatabaseConnection,
    query: &ListQuery,
) -> Result<ListResponse<R::ListModel>, DbErr>
where
    R: ListResource,
    <R::EntityType as EntityTrait>::Model: Sync,
{
    let plan = ListPlan::<R>::for_resource(query);
    tracing::debug!(
        resource = R::RESOURCE_NAME,
        filter = ?plan.filter.predicates(),
        page = plan.page.page,
        limit = plan.page.limit,
        "Listing resource"
    );

    let (total, rows) = futures::try_join!(
        plan.count_query().count(db),
        plan.list_query().all(db)
    )?;

    let data = R::present(db, rows).await?;
    Ok(ListResponse {
        data,
        page: plan.page.page,
        pages: plan.page.page_count(total),
        total,
    })
}
