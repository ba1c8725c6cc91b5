use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::Utc;
use pharmacy::{ApiError, ErrorResponse, JsonBody, ListParams, ListQuery, ListResponse, list_resource};
use sea_orm::{ActiveModelTrait, EntityTrait, IntoActiveModel, ModelTrait, QuerySelect, Set};
use utoipa_axum::{router::OpenApiRouter, routes};
use uuid::Uuid;

use super::parse_id;
use crate::{
    auth::AdminUser,
    entities::{TagList, health_product},
    payload::{CatalogPayload, CatalogUpdate, NewCatalogItem},
    resources::HealthProductResource,
    state::AppState,
};

pub fn router(state: &AppState) -> OpenApiRouter {
    OpenApiRouter::new()
        .routes(routes!(list_health_products, create_health_product))
        .routes(routes!(health_categories))
        .routes(routes!(get_health_product, update_health_product, delete_health_product))
        .with_state(state.clone())
}

#[utoipa::path(
    get,
    path = "/",
    tag = "health-products",
    params(ListQuery),
    responses(
        (status = OK, description = "One page of health products", body = ListResponse<health_product::Model>),
        (status = INTERNAL_SERVER_ERROR, description = "Server error", body = ErrorResponse)
    ),
    summary = "List health products",
    description = "Filterable by `category`, `inStock`, `q` (name or generic name) and `priceMin`/`priceMax`."
)]
pub async fn list_health_products(
    State(state): State<AppState>,
    ListParams(query): ListParams,
) -> Result<Json<ListResponse<health_product::Model>>, ApiError> {
    Ok(Json(list_resource::<HealthProductResource>(&state.db, &query).await?))
}

/// Shortest names first, then alphabetical ignoring case
fn sort_categories(categories: &mut [String]) {
    categories.sort_by(|a, b| {
        a.chars()
            .count()
            .cmp(&b.chars().count())
            .then_with(|| a.to_lowercase().cmp(&b.to_lowercase()))
    });
}

#[utoipa::path(
    get,
    path = "/categories",
    tag = "health-products",
    responses(
        (status = OK, description = "Distinct categories, shortest first", body = [String]),
        (status = INTERNAL_SERVER_ERROR, description = "Server error", body = ErrorResponse)
    ),
    summary = "List health product categories"
)]
pub async fn health_categories(State(state): State<AppState>) -> Result<Json<Vec<String>>, ApiError> {
    let mut categories: Vec<String> = health_product::Entity::find()
        .select_only()
        .column(health_product::Column::Category)
        .distinct()
        .into_tuple()
        .all(&state.db)
        .await?;
    sort_categories(&mut categories);
    Ok(Json(categories))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = "health-products",
    params(("id" = String, Path, description = "Health product id (UUID)")),
    responses(
        (status = OK, description = "The health product", body = health_product::Model),
        (status = BAD_REQUEST, description = "Malformed id", body = ErrorResponse),
        (status = NOT_FOUND, description = "No such health product", body = ErrorResponse)
    ),
    summary = "Get one health product"
)]
pub async fn get_health_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<health_product::Model>, ApiError> {
    let id = parse_id(&id)?;
    let item = health_product::Entity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(ApiError::not_found)?;
    Ok(Json(item))
}

fn new_health_product(item: NewCatalogItem) -> health_product::ActiveModel {
    let now = Utc::now();
    health_product::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(item.name),
        description: Set(item.description),
        generic_name: Set(item.generic_name),
        price: Set(item.price),
        category: Set(item.category),
        tags: Set(TagList(item.tags)),
        image_url: Set(item.image_url),
        in_stock: Set(item.in_stock),
        stock: Set(item.stock),
        rating: Set(item.rating.unwrap_or_default()),
        created_at: Set(now),
        updated_at: Set(now),
    }
}

fn apply_update(model: health_product::Model, update: CatalogUpdate) -> health_product::ActiveModel {
    let mut active = model.into_active_model();
    if let Some(name) = update.name {
        active.name = Set(name);
    }
    if let Some(description) = update.description {
        active.description = Set(description);
    }
    if let Some(generic_name) = update.generic_name {
        active.generic_name = Set(Some(generic_name));
    }
    if let Some(price) = update.price {
        active.price = Set(price);
    }
    if let Some(category) = update.category {
        active.category = Set(category);
    }
    if let Some(image_url) = update.image_url {
        active.image_url = Set(Some(image_url));
    }
    if let Some(in_stock) = update.in_stock {
        active.in_stock = Set(in_stock);
    }
    if let Some(stock) = update.stock {
        active.stock = Set(stock);
    }
    if let Some(tags) = update.tags {
        active.tags = Set(TagList(tags));
    }
    if let Some(rating) = update.rating {
        active.rating = Set(rating);
    }
    active.updated_at = Set(Utc::now());
    active
}

#[utoipa::path(
    post,
    path = "/",
    tag = "health-products",
    request_body = CatalogPayload,
    security(("bearer" = [])),
    responses(
        (status = CREATED, description = "Health product created", body = health_product::Model),
        (status = BAD_REQUEST, description = "Missing or invalid required fields", body = ErrorResponse),
        (status = UNAUTHORIZED, description = "Missing or invalid token", body = ErrorResponse),
        (status = FORBIDDEN, description = "Not an admin", body = ErrorResponse)
    ),
    summary = "Create a health product (admin)"
)]
pub async fn create_health_product(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    JsonBody(payload): JsonBody<CatalogPayload>,
) -> Result<(StatusCode, Json<health_product::Model>), ApiError> {
    let item = payload.into_new_item()?;
    let created = new_health_product(item).insert(&state.db).await?;
    tracing::info!(id = %created.id, admin = %admin.id, "Health product created");
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    put,
    path = "/{id}",
    tag = "health-products",
    params(("id" = String, Path, description = "Health product id (UUID)")),
    request_body = CatalogPayload,
    security(("bearer" = [])),
    responses(
        (status = OK, description = "The updated health product", body = health_product::Model),
        (status = BAD_REQUEST, description = "Malformed id or no valid fields", body = ErrorResponse),
        (status = UNAUTHORIZED, description = "Missing or invalid token", body = ErrorResponse),
        (status = FORBIDDEN, description = "Not an admin", body = ErrorResponse),
        (status = NOT_FOUND, description = "No such health product", body = ErrorResponse)
    ),
    summary = "Update a health product (admin)",
    description = "Only the usable fields of the body are applied. Fields of the wrong type are ignored."
)]
pub async fn update_health_product(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<String>,
    JsonBody(payload): JsonBody<CatalogPayload>,
) -> Result<Json<health_product::Model>, ApiError> {
    let id = parse_id(&id)?;
    let update = payload.into_update()?;
    let existing = health_product::Entity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(ApiError::not_found)?;

    let updated = apply_update(existing, update).update(&state.db).await?;
    tracing::info!(id = %updated.id, admin = %admin.id, "Health product updated");
    Ok(Json(updated))
}

#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "health-products",
    params(("id" = String, Path, description = "Health product id (UUID)")),
    security(("bearer" = [])),
    responses(
        (status = NO_CONTENT, description = "Deleted"),
        (status = BAD_REQUEST, description = "Malformed id", body = ErrorResponse),
        (status = UNAUTHORIZED, description = "Missing or invalid token", body = ErrorResponse),
        (status = FORBIDDEN, description = "Not an admin", body = ErrorResponse),
        (status = NOT_FOUND, description = "No such health product", body = ErrorResponse)
    ),
    summary = "Delete a health product (admin)"
)]
pub async fn delete_health_product(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(&id)?;
    let existing = health_product::Entity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(ApiError::not_found)?;

    existing.delete(&state.db).await?;
    tracing::info!(%id, admin = %admin.id, "Health product deleted");
    Ok(StatusCode::NO_CONTENT)
}
