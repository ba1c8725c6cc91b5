use axum::{
    Json,
    extract::{Path, State},
};
use chrono::{Duration, Utc};
use pharmacy::{ApiError, ErrorResponse, JsonBody, ListParams, ListQuery, ListResponse, PrescriptionStatus, list_resource};
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, IntoActiveModel, Set};
use serde::Deserialize;
use utoipa::ToSchema;
use utoipa_axum::{router::OpenApiRouter, routes};
use uuid::Uuid;

use super::{parse_id, prescriptions::REFILL_INTERVAL_DAYS};
use crate::{
    auth::AdminUser,
    entities::prescription,
    resources::{AdminPrescriptionResource, PrescriptionWithUser, attach_users},
    state::AppState,
};

pub fn router(state: &AppState) -> OpenApiRouter {
    OpenApiRouter::new()
        .routes(routes!(list_prescriptions))
        .routes(routes!(get_prescription))
        .routes(routes!(update_status))
        .with_state(state.clone())
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct StatusUpdate {
    /// `approved`, `pending` or `rejected` (stored names are accepted too)
    #[schema(example = "approved")]
    pub status: Option<String>,
}

async fn with_user(db: &DatabaseConnection, row: prescription::Model) -> Result<PrescriptionWithUser, ApiError> {
    attach_users(db, vec![row])
        .await?
        .pop()
        .ok_or_else(|| ApiError::internal("prescription lost while attaching its user"))
}

#[utoipa::path(
    get,
    path = "/",
    tag = "admin",
    params(ListQuery),
    security(("bearer" = [])),
    responses(
        (status = OK, description = "One page of prescriptions with their owners", body = ListResponse<PrescriptionWithUser>),
        (status = UNAUTHORIZED, description = "Missing or invalid token", body = ErrorResponse),
        (status = FORBIDDEN, description = "Not an admin", body = ErrorResponse)
    ),
    summary = "List all prescriptions (admin)",
    description = "Filterable by `status` (back-office labels) and `q` (name, doctor or Rx number). Always sorted by last update, newest first."
)]
pub async fn list_prescriptions(
    State(state): State<AppState>,
    _admin: AdminUser,
    ListParams(query): ListParams,
) -> Result<Json<ListResponse<PrescriptionWithUser>>, ApiError> {
    Ok(Json(list_resource::<AdminPrescriptionResource>(&state.db, &query).await?))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = "admin",
    params(("id" = String, Path, description = "Prescription id (UUID)")),
    security(("bearer" = [])),
    responses(
        (status = OK, description = "The prescription with its owner", body = PrescriptionWithUser),
        (status = BAD_REQUEST, description = "Malformed id", body = ErrorResponse),
        (status = UNAUTHORIZED, description = "Missing or invalid token", body = ErrorResponse),
        (status = FORBIDDEN, description = "Not an admin", body = ErrorResponse),
        (status = NOT_FOUND, description = "No such prescription", body = ErrorResponse)
    ),
    summary = "Get one prescription (admin)"
)]
pub async fn get_prescription(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<String>,
) -> Result<Json<PrescriptionWithUser>, ApiError> {
    let id = parse_id(&id)?;
    let row = prescription::Entity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(ApiError::not_found)?;
    Ok(Json(with_user(&state.db, row).await?))
}

fn transition(model: prescription::Model, status: PrescriptionStatus) -> prescription::ActiveModel {
    let now = Utc::now();
    let missing_refill_date = model.next_refill_at.is_none();

    let mut active = model.into_active_model();
    active.status = Set(status);
    match status {
        PrescriptionStatus::Active if missing_refill_date => {
            active.next_refill_at = Set(Some(now + Duration::days(REFILL_INTERVAL_DAYS)));
        }
        PrescriptionStatus::Expired => active.expired_at = Set(Some(now)),
        _ => {}
    }
    active.updated_at = Set(now);
    active
}

#[utoipa::path(
    patch,
    path = "/{id}/status",
    tag = "admin",
    params(("id" = String, Path, description = "Prescription id (UUID)")),
    request_body = StatusUpdate,
    security(("bearer" = [])),
    responses(
        (status = OK, description = "The updated prescription with its owner", body = PrescriptionWithUser),
        (status = BAD_REQUEST, description = "Malformed id or invalid status", body = ErrorResponse),
        (status = UNAUTHORIZED, description = "Missing or invalid token", body = ErrorResponse),
        (status = FORBIDDEN, description = "Not an admin", body = ErrorResponse),
        (status = NOT_FOUND, description = "No such prescription", body = ErrorResponse)
    ),
    summary = "Approve, reject or reset a prescription (admin)",
    description = "Approving fills in the next refill date when it is missing. Rejecting stamps the expiry time."
)]
pub async fn update_status(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<String>,
    JsonBody(body): JsonBody<StatusUpdate>,
) -> Result<Json<PrescriptionWithUser>, ApiError> {
    let id: Uuid = parse_id(&id)?;
    let status = body
        .status
        .as_deref()
        .and_then(PrescriptionStatus::from_ui)
        .ok_or_else(|| ApiError::bad_request("Invalid status"))?;

    let existing = prescription::Entity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(ApiError::not_found)?;

    let updated = transition(existing, status).update(&state.db).await?;
    tracing::info!(%id, admin = %admin.id, ?status, "Prescription status changed");
    Ok(Json(with_user(&state.db, updated).await?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::ActiveValue;

    fn sample(next_refill_at: Option<chrono::DateTime<Utc>>) -> prescription::Model {
        let now = Utc::now();
        prescription::Model {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            name: "Amoxicillin".to_string(),
            doctor: "Dr. Reyes".to_string(),
            rx_number: "RX-1".to_string(),
            prescribed_at: now,
            next_refill_at,
            expired_at: None,
            refills_left: 2,
            status: PrescriptionStatus::Pending,
            note: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_approval_sets_missing_refill_date() {
        let active = transition(sample(None), PrescriptionStatus::Active);
        assert!(matches!(active.next_refill_at, ActiveValue::Set(Some(_))));
        assert!(matches!(active.status, ActiveValue::Set(PrescriptionStatus::Active)));
    }

    #[test]
    fn test_approval_keeps_existing_refill_date() {
        let existing = Utc::now() + Duration::days(3);
        let active = transition(sample(Some(existing)), PrescriptionStatus::Active);
        assert_eq!(active.next_refill_at.clone().unwrap(), Some(existing));
        assert!(!matches!(active.next_refill_at, ActiveValue::Set(_)));
    }

    #[test]
    fn test_rejection_stamps_expiry() {
        let active = transition(sample(None), PrescriptionStatus::Expired);
        assert!(matches!(active.expired_at, ActiveValue::Set(Some(_))));
        assert!(!matches!(active.next_refill_at, ActiveValue::Set(_)));
    }
}
