use axum::{Json, extract::State};
use pharmacy::{ApiError, ErrorResponse, ListParams, ListQuery, ListResponse, list_resource};
use sea_orm::EntityTrait;
use utoipa_axum::{router::OpenApiRouter, routes};

use crate::{
    auth::AdminUser,
    entities::user,
    resources::{RosterEntry, UserRosterResource},
    state::AppState,
};

pub fn router(state: &AppState) -> OpenApiRouter {
    OpenApiRouter::new()
        .routes(routes!(list_users))
        .routes(routes!(admin_profile))
        .with_state(state.clone())
}

#[utoipa::path(
    get,
    path = "/users",
    tag = "admin",
    params(ListQuery),
    security(("bearer" = [])),
    responses(
        (status = OK, description = "One page of the patient roster", body = ListResponse<RosterEntry>),
        (status = UNAUTHORIZED, description = "Missing or invalid token", body = ErrorResponse),
        (status = FORBIDDEN, description = "Not an admin", body = ErrorResponse)
    ),
    summary = "Patient roster with prescription stats (admin)",
    description = "Searchable by `q` (name or email). Newest patients first."
)]
pub async fn list_users(
    State(state): State<AppState>,
    _admin: AdminUser,
    ListParams(query): ListParams,
) -> Result<Json<ListResponse<RosterEntry>>, ApiError> {
    Ok(Json(list_resource::<UserRosterResource>(&state.db, &query).await?))
}

#[utoipa::path(
    get,
    path = "/me",
    tag = "admin",
    security(("bearer" = [])),
    responses(
        (status = OK, description = "The calling admin", body = user::Model),
        (status = UNAUTHORIZED, description = "Missing or invalid token", body = ErrorResponse),
        (status = FORBIDDEN, description = "Not an admin", body = ErrorResponse),
        (status = NOT_FOUND, description = "Admin not found", body = ErrorResponse)
    ),
    summary = "Profile of the calling admin"
)]
pub async fn admin_profile(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
) -> Result<Json<user::Model>, ApiError> {
    let profile = user::Entity::find_by_id(admin.id)
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::not_found_with("Admin not found"))?;
    Ok(Json(profile))
}
