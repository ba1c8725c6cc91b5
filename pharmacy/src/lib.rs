//! # pharmacy
//!
//! The query layer shared by every list endpoint of the online pharmacy API.
//!
//! - [`filtering`]: sanitizers, the filter assembler, pagination and sorting
//! - [`core`]: the [`ListResource`] trait and [`list_resource`], which run
//!   count and page fetch against the same filter
//! - [`models`]: the raw list query, the list response and the domain enums
//! - [`errors`]: [`ApiError`], the one error type handlers return
//!
//! ```rust,ignore
//! use pharmacy::{ListParams, ListResource, list_resource};
//!
//! async fn list_products(
//!     State(state): State<AppState>,
//!     ListParams(query): ListParams,
//! ) -> Result<Json<ListResponse<Product>>, ApiError> {
//!     Ok(Json(list_resource::<ProductResource>(&state.db, &query).await?))
//! }
//! ```

pub mod core;
pub mod errors;
pub mod filtering;
pub mod models;

pub use self::core::{JsonBody, ListParams, ListPlan, ListResource, list_resource};
pub use errors::{ApiError, ErrorResponse};
pub use models::{ListQuery, ListResponse, PrescriptionStatus, ProductKind};
