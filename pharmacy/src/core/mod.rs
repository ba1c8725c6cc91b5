// The list contract: one resource trait, one plan per request

pub mod extract;
pub mod list;
pub mod traits;

pub use extract::{JsonBody, ListParams};
pub use list::{ListPlan, list_resource};
pub use traits::ListResource;
