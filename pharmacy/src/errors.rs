//! # Error Handling
//!
//! Every handler returns `Result<_, ApiError>`. An `ApiError` becomes a
//! `{"message": ...}` body with the matching status code.
//!
//! Storage failures never reach the client: the response says "Server error"
//! and the underlying `DbErr` is logged with `tracing`.
//!
//! ```rust,ignore
//! use pharmacy::errors::ApiError;
//!
//! async fn show(db: &DatabaseConnection, id: &str) -> Result<Json<Model>, ApiError> {
//!     let id = parse_resource_id(id).ok_or_else(ApiError::invalid_id)?;
//!     let row = Entity::find_by_id(id)
//!         .one(db)
//!         .await?
//!         .ok_or_else(ApiError::not_found)?;
//!     Ok(Json(row))
//! }
//! ```

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::DbErr;
use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;

/// Message sent for every 500
pub const SERVER_ERROR_MESSAGE: &str = "Server error";

pub const INVALID_BODY_MESSAGE: &str = "Invalid JSON body";

/// API error type with automatic logging and sanitized responses
#[derive(Debug)]
pub enum ApiError {
    /// 400 Bad Request: malformed id or unusable body
    BadRequest { message: String },

    /// 404 Not Found
    NotFound { message: String },

    /// 401 Unauthorized: missing or invalid bearer token
    Unauthorized { message: String },

    /// 403 Forbidden: valid token, insufficient role
    Forbidden { message: String },

    /// 500 Internal Server Error from the store (details logged, not exposed)
    Database { internal: DbErr },

    /// 500 Internal Server Error with optional details for the log
    Internal { internal: Option<String> },
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
        }
    }

    /// 400 for an id that does not have the store's format
    #[must_use]
    pub fn invalid_id() -> Self {
        Self::bad_request("Invalid id")
    }

    /// 404 with the generic message
    #[must_use]
    pub fn not_found() -> Self {
        Self::NotFound {
            message: "Not found".to_string(),
        }
    }

    pub fn not_found_with(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn unauthorized() -> Self {
        Self::Unauthorized {
            message: "Unauthorized".to_string(),
        }
    }

    #[must_use]
    pub fn forbidden() -> Self {
        Self::Forbidden {
            message: "Forbidden".to_string(),
        }
    }

    /// Wrap a store error. The details are logged but NOT sent to the user.
    #[must_use]
    pub fn database(err: DbErr) -> Self {
        Self::Database { internal: err }
    }

    pub fn internal(details: impl Into<String>) -> Self {
        Self::Internal {
            internal: Some(details.into()),
        }
    }

    /// HTTP status code for this error
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest { .. } => StatusCode::BAD_REQUEST,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            Self::Forbidden { .. } => StatusCode::FORBIDDEN,
            Self::Database { .. } | Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// User-facing message (sanitized)
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::BadRequest { message }
            | Self::NotFound { message }
            | Self::Unauthorized { message }
            | Self::Forbidden { message } => message.clone(),
            Self::Database { .. } | Self::Internal { .. } => SERVER_ERROR_MESSAGE.to_string(),
        }
    }

    fn log_internal(&self) {
        match self {
            Self::Database { internal } => {
                tracing::error!(error = ?internal, "Database error occurred");
            }
            Self::Internal {
                internal: Some(details),
            } => {
                tracing::error!(details = %details, "Internal error occurred");
            }
            _ => {
                tracing::debug!(
                    error = %self.user_message(),
                    status = %self.status_code(),
                    "API error"
                );
            }
        }
    }
}

/// Error body sent to clients
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        self.log_internal();
        let status = self.status_code();
        let body = ErrorResponse {
            message: self.user_message(),
        };
        (status, Json(body)).into_response()
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.user_message())
    }
}

impl std::error::Error for ApiError {}

/// `DbErr::RecordNotFound` becomes 404; every other store error becomes 500.
impl From<DbErr> for ApiError {
    fn from(err: DbErr) -> Self {
        match err {
            DbErr::RecordNotFound(_) => Self::not_found(),
            other => Self::database(other),
        }
    }
}

/// Malformed, mistyped or non-JSON bodies all read as a 400 with a `{message}` body.
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!(reason = %rejection.body_text(), "Rejected request body");
        Self::bad_request(INVALID_BODY_MESSAGE)
    }
}
