//! A patient's own prescriptions. Every route is scoped to the token's user.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::{DateTime, Duration, NaiveDate, Utc};
use pharmacy::{ApiError, ErrorResponse, JsonBody, ListParams, PrescriptionStatus, filtering::to_finite_number};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, IntoActiveModel, QueryFilter, QueryOrder, Set};
use serde::Deserialize;
use serde_json::Value;
use utoipa::ToSchema;
use utoipa_axum::{router::OpenApiRouter, routes};
use uuid::Uuid;

use super::parse_id;
use crate::{auth::AuthUser, entities::prescription, state::AppState};

/// Days added to the refill date on each refill or approval
pub const REFILL_INTERVAL_DAYS: i64 = 30;

const MAX_FIELD_LENGTH: usize = 200;
const MAX_NOTE_LENGTH: usize = 2000;

pub fn router(state: &AppState) -> OpenApiRouter {
    OpenApiRouter::new()
        .routes(routes!(list_my_prescriptions, create_prescription))
        .routes(routes!(request_refill))
        .with_state(state.clone())
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PrescriptionPayload {
    #[schema(value_type = String, example = "Amoxicillin 500mg")]
    pub name: Option<Value>,
    #[schema(value_type = String, example = "Dr. Reyes")]
    pub doctor: Option<Value>,
    #[schema(value_type = String, example = "RX-1001")]
    pub rx_number: Option<Value>,
    /// RFC 3339 timestamp or `YYYY-MM-DD`
    #[schema(value_type = String, example = "2025-01-15")]
    pub prescribed_at: Option<Value>,
    #[schema(value_type = Option<String>)]
    pub next_refill_at: Option<Value>,
    #[schema(value_type = Option<i32>, example = 2)]
    pub refills_left: Option<Value>,
    /// Defaults to `pending`
    #[schema(value_type = Option<String>, example = "pending")]
    pub status: Option<Value>,
    #[schema(value_type = Option<String>)]
    pub note: Option<Value>,
}

fn text(value: Option<&Value>, max: usize) -> Option<String> {
    let trimmed = value?.as_str()?.trim();
    (!trimmed.is_empty()).then(|| trimmed.chars().take(max).collect())
}

/// Accepts an RFC 3339 timestamp or a bare date (midnight UTC)
fn timestamp(value: Option<&Value>) -> Option<DateTime<Utc>> {
    let raw = value?.as_str()?.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

#[allow(clippy::cast_possible_truncation)]
fn refill_count(value: Option<&Value>) -> i32 {
    let count = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => to_finite_number(s),
        _ => None,
    };
    count
        .filter(|n| n.is_finite())
        .map_or(0, |n| n.floor().clamp(0.0, f64::from(i32::MAX)) as i32)
}

fn invalid_status() -> ApiError {
    ApiError::bad_request("Invalid status")
}

impl PrescriptionPayload {
    fn into_active_model(self, user_id: Uuid) -> Result<prescription::ActiveModel, ApiError> {
        let name = text(self.name.as_ref(), MAX_FIELD_LENGTH);
        let doctor = text(self.doctor.as_ref(), MAX_FIELD_LENGTH);
        let rx_number = text(self.rx_number.as_ref(), MAX_FIELD_LENGTH);
        let prescribed_at = timestamp(self.prescribed_at.as_ref());

        let (Some(name), Some(doctor), Some(rx_number), Some(prescribed_at)) =
            (name, doctor, rx_number, prescribed_at)
        else {
            return Err(ApiError::bad_request(
                "name, doctor, rxNumber, prescribedAt are required",
            ));
        };

        let status = match self.status.as_ref() {
            None | Some(Value::Null) => PrescriptionStatus::Pending,
            Some(value) => value
                .as_str()
                .and_then(PrescriptionStatus::from_wire)
                .ok_or_else(invalid_status)?,
        };

        let now = Utc::now();
        Ok(prescription::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(user_id),
            name: Set(name),
            doctor: Set(doctor),
            rx_number: Set(rx_number),
            prescribed_at: Set(prescribed_at),
            next_refill_at: Set(timestamp(self.next_refill_at.as_ref())),
            expired_at: Set(None),
            refills_left: Set(refill_count(self.refills_left.as_ref())),
            status: Set(status),
            note: Set(text(self.note.as_ref(), MAX_NOTE_LENGTH)),
            created_at: Set(now),
            updated_at: Set(now),
        })
    }
}

#[utoipa::path(
    get,
    path = "/",
    tag = "prescriptions",
    params(("status" = Option<String>, Query, description = "`active`, `pending` or `expired`")),
    security(("bearer" = [])),
    responses(
        (status = OK, description = "The caller's prescriptions, most recently updated first", body = [prescription::Model]),
        (status = BAD_REQUEST, description = "Invalid status", body = ErrorResponse),
        (status = UNAUTHORIZED, description = "Missing or invalid token", body = ErrorResponse)
    ),
    summary = "List my prescriptions"
)]
pub async fn list_my_prescriptions(
    State(state): State<AppState>,
    user: AuthUser,
    ListParams(query): ListParams,
) -> Result<Json<Vec<prescription::Model>>, ApiError> {
    let mut select = prescription::Entity::find().filter(prescription::Column::UserId.eq(user.id));
    if let Some(raw) = query.status.as_deref().filter(|raw| !raw.is_empty()) {
        let status = PrescriptionStatus::from_wire(raw).ok_or_else(invalid_status)?;
        select = select.filter(prescription::Column::Status.eq(status));
    }

    let rows = select
        .order_by_desc(prescription::Column::UpdatedAt)
        .order_by_asc(prescription::Column::Id)
        .all(&state.db)
        .await?;
    Ok(Json(rows))
}

#[utoipa::path(
    post,
    path = "/",
    tag = "prescriptions",
    request_body = PrescriptionPayload,
    security(("bearer" = [])),
    responses(
        (status = CREATED, description = "Prescription created", body = prescription::Model),
        (status = BAD_REQUEST, description = "Missing required fields or invalid status", body = ErrorResponse),
        (status = UNAUTHORIZED, description = "Missing or invalid token", body = ErrorResponse)
    ),
    summary = "Add a prescription"
)]
pub async fn create_prescription(
    State(state): State<AppState>,
    user: AuthUser,
    JsonBody(payload): JsonBody<PrescriptionPayload>,
) -> Result<(StatusCode, Json<prescription::Model>), ApiError> {
    let created = payload.into_active_model(user.id)?.insert(&state.db).await?;
    tracing::info!(id = %created.id, user = %user.id, "Prescription created");
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    patch,
    path = "/{id}/request-refill",
    tag = "prescriptions",
    params(("id" = String, Path, description = "Prescription id (UUID)")),
    security(("bearer" = [])),
    responses(
        (status = OK, description = "The refilled prescription", body = prescription::Model),
        (status = BAD_REQUEST, description = "Malformed id, not active, or no refills left", body = ErrorResponse),
        (status = UNAUTHORIZED, description = "Missing or invalid token", body = ErrorResponse),
        (status = NOT_FOUND, description = "No such prescription for this user", body = ErrorResponse)
    ),
    summary = "Request a refill"
)]
pub async fn request_refill(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<prescription::Model>, ApiError> {
    let id = parse_id(&id)?;
    let existing = prescription::Entity::find_by_id(id)
        .filter(prescription::Column::UserId.eq(user.id))
        .one(&state.db)
        .await?
        .ok_or_else(ApiError::not_found)?;

    if existing.status != PrescriptionStatus::Active {
        return Err(ApiError::bad_request("Only active prescriptions can be refilled"));
    }
    if existing.refills_left <= 0 {
        return Err(ApiError::bad_request("No refills left"));
    }

    let now = Utc::now();
    let next_refill_at = existing.next_refill_at.unwrap_or(now) + Duration::days(REFILL_INTERVAL_DAYS);
    let refills_left = existing.refills_left - 1;

    let mut active = existing.into_active_model();
    active.refills_left = Set(refills_left);
    active.next_refill_at = Set(Some(next_refill_at));
    active.updated_at = Set(now);
    let updated = active.update(&state.db).await?;

    tracing::info!(%id, user = %user.id, refills_left, "Refill requested");
    Ok(Json(updated))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_timestamp_accepts_date_or_rfc3339() {
        let date = timestamp(Some(&json!("2025-01-15"))).unwrap();
        assert_eq!(date.to_rfc3339(), "2025-01-15T00:00:00+00:00");

        let full = timestamp(Some(&json!("2025-01-15T10:30:00+02:00"))).unwrap();
        assert_eq!(full.to_rfc3339(), "2025-01-15T08:30:00+00:00");

        assert_eq!(timestamp(Some(&json!("15/01/2025"))), None);
        assert_eq!(timestamp(Some(&json!(20_250_115))), None);
    }

    #[test]
    fn test_refill_count_defaults_to_zero() {
        assert_eq!(refill_count(None), 0);
        assert_eq!(refill_count(Some(&json!("3"))), 3);
        assert_eq!(refill_count(Some(&json!(2.7))), 2);
        assert_eq!(refill_count(Some(&json!(-4))), 0);
        assert_eq!(refill_count(Some(&json!("lots"))), 0);
    }

    #[test]
    fn test_missing_required_field() {
        let payload: PrescriptionPayload = serde_json::from_value(json!({
            "name": "Amoxicillin",
            "doctor": "Dr. Reyes",
            "prescribedAt": "2025-01-15"
        }))
        .unwrap();
        let err = payload.into_active_model(Uuid::new_v4()).unwrap_err();
        assert_eq!(err.user_message(), "name, doctor, rxNumber, prescribedAt are required");
    }

    #[test]
    fn test_status_must_be_a_stored_name() {
        let payload: PrescriptionPayload = serde_json::from_value(json!({
            "name": "Amoxicillin",
            "doctor": "Dr. Reyes",
            "rxNumber": "RX-1",
            "prescribedAt": "2025-01-15",
            "status": "approved"
        }))
        .unwrap();
        let err = payload.into_active_model(Uuid::new_v4()).unwrap_err();
        assert_eq!(err.user_message(), "Invalid status");
    }
}
