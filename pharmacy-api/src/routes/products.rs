use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::Utc;
use pharmacy::{
    ApiError, ErrorResponse, JsonBody, ListParams, ListQuery, ListResponse, list_resource,
    filtering::parse_product_kind,
};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QuerySelect, Set};
use utoipa_axum::{router::OpenApiRouter, routes};
use uuid::Uuid;

use super::parse_id;
use crate::{
    auth::AdminUser,
    entities::{TagList, product},
    payload::{CatalogPayload, NewCatalogItem},
    resources::ProductResource,
    state::AppState,
};

pub fn router(state: &AppState) -> OpenApiRouter {
    OpenApiRouter::new()
        .routes(routes!(list_products, create_product))
        .routes(routes!(product_categories))
        .routes(routes!(get_product))
        .with_state(state.clone())
}

#[utoipa::path(
    get,
    path = "/",
    tag = "products",
    params(ListQuery),
    responses(
        (status = OK, description = "One page of products", body = ListResponse<product::Model>),
        (status = INTERNAL_SERVER_ERROR, description = "Server error", body = ErrorResponse)
    ),
    summary = "List products",
    description = "Filterable by `type`, `category`, `inStock`, `prescription`, `q` (name or generic name) and `priceMin`/`priceMax`. Malformed filter values are ignored."
)]
pub async fn list_products(
    State(state): State<AppState>,
    ListParams(query): ListParams,
) -> Result<Json<ListResponse<product::Model>>, ApiError> {
    Ok(Json(list_resource::<ProductResource>(&state.db, &query).await?))
}

#[utoipa::path(
    get,
    path = "/categories",
    tag = "products",
    params(("type" = Option<String>, Query, description = "`medicine` or `health`")),
    responses(
        (status = OK, description = "Distinct categories, ascending", body = [String]),
        (status = INTERNAL_SERVER_ERROR, description = "Server error", body = ErrorResponse)
    ),
    summary = "List product categories"
)]
pub async fn product_categories(
    State(state): State<AppState>,
    ListParams(query): ListParams,
) -> Result<Json<Vec<String>>, ApiError> {
    let mut select = product::Entity::find()
        .select_only()
        .column(product::Column::Category)
        .distinct();
    if let Some(kind) = parse_product_kind(query.kind.as_deref()) {
        select = select.filter(product::Column::Kind.eq(kind));
    }

    let mut categories: Vec<String> = select.into_tuple().all(&state.db).await?;
    categories.sort();
    Ok(Json(categories))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = "products",
    params(("id" = String, Path, description = "Product id (UUID)")),
    responses(
        (status = OK, description = "The product", body = product::Model),
        (status = BAD_REQUEST, description = "Malformed id", body = ErrorResponse),
        (status = NOT_FOUND, description = "No such product", body = ErrorResponse)
    ),
    summary = "Get one product"
)]
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<product::Model>, ApiError> {
    let id = parse_id(&id)?;
    let product = product::Entity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(ApiError::not_found)?;
    Ok(Json(product))
}

fn new_product(item: NewCatalogItem) -> product::ActiveModel {
    let now = Utc::now();
    product::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(item.name),
        description: Set(item.description),
        generic_name: Set(item.generic_name),
        price: Set(item.price),
        kind: Set(item.kind),
        category: Set(item.category),
        tags: Set(TagList(item.tags)),
        image_url: Set(item.image_url),
        in_stock: Set(item.in_stock),
        stock: Set(item.stock),
        prescription: Set(item.prescription),
        rating: Set(item.rating.unwrap_or_default()),
        created_at: Set(now),
        updated_at: Set(now),
    }
}

#[utoipa::path(
    post,
    path = "/",
    tag = "products",
    request_body = CatalogPayload,
    security(("bearer" = [])),
    responses(
        (status = CREATED, description = "Product created", body = product::Model),
        (status = BAD_REQUEST, description = "Missing or invalid required fields", body = ErrorResponse),
        (status = UNAUTHORIZED, description = "Missing or invalid token", body = ErrorResponse),
        (status = FORBIDDEN, description = "Not an admin", body = ErrorResponse)
    ),
    summary = "Create a product (admin)"
)]
pub async fn create_product(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    JsonBody(payload): JsonBody<CatalogPayload>,
) -> Result<(StatusCode, Json<product::Model>), ApiError> {
    let item = payload.into_new_item()?;
    let created = new_product(item).insert(&state.db).await?;
    tracing::info!(id = %created.id, admin = %admin.id, "Product created");
    Ok((StatusCode::CREATED, Json(created)))
}
