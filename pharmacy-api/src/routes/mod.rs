//! HTTP surface. Each resource module exposes a `router()` whose handlers
//! carry their own OpenAPI description; [`app`] nests them under `/api` and
//! serves the merged document at `/docs`.

pub mod admin_prescriptions;
pub mod admin_users;
pub mod health_products;
pub mod prescriptions;
pub mod products;

use axum::{Json, Router};
use pharmacy::{ApiError, filtering::parse_resource_id};
use serde::Serialize;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::{
    Modify, OpenApi, ToSchema,
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
};
use utoipa_axum::{router::OpenApiRouter, routes};
use utoipa_scalar::{Scalar, Servable};
use uuid::Uuid;

use crate::state::AppState;

pub const WELCOME_MESSAGE: &str = "Welcome to Online Pharmacy API";

/// Validate a path id before any store access
pub(crate) fn parse_id(raw: &str) -> Result<Uuid, ApiError> {
    parse_resource_id(raw).ok_or_else(ApiError::invalid_id)
}

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Online Pharmacy API",
        description = "Storefront catalog, patient prescriptions and the admin back-office"
    ),
    modifiers(&BearerAuth),
    tags(
        (name = "products", description = "Medicine and health catalog"),
        (name = "health-products", description = "Back-office managed health items"),
        (name = "prescriptions", description = "The caller's own prescriptions"),
        (name = "admin", description = "Back-office review and patient roster")
    )
)]
pub struct ApiDoc;

#[derive(Serialize, ToSchema)]
pub struct Welcome {
    pub message: &'static str,
}

#[utoipa::path(
    get,
    path = "/",
    tag = "meta",
    responses((status = OK, description = "Service banner", body = Welcome))
)]
pub async fn welcome() -> Json<Welcome> {
    Json(Welcome {
        message: WELCOME_MESSAGE,
    })
}

/// The complete application: API routes, docs, CORS and request tracing
pub fn app(state: &AppState) -> Router {
    let (router, api) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .routes(routes!(welcome))
        .nest("/api/products", products::router(state))
        .nest("/api/health-products", health_products::router(state))
        .nest("/api/prescriptions", prescriptions::router(state))
        .nest("/api/admin/prescriptions", admin_prescriptions::router(state))
        .nest("/api/admin", admin_users::router(state))
        .split_for_parts();

    router
        .merge(Scalar::with_url("/docs", api))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
