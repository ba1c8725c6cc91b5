//! # Query Sanitization & Filtering
//!
//! Turns untrusted list query parameters into a bounded, injection-safe
//! sea-orm query. Data flows one way:
//!
//! 1. [`values`]: primitive coercions (finite numbers, resource ids)
//! 2. [`sanitize`] and [`search`]: one raw value in, one typed constraint (or none) out
//! 3. [`conditions`]: the resource's allow-list picks which constraints apply
//!    and binds each to a fixed column
//! 4. [`pagination`] and [`sort`]: a valid page window and ordering, whatever the input
//!
//! ## Query Parameter Examples
//!
//! ```rust,ignore
//! GET /api/products?category=Pain%20Relief&inStock=true
//! GET /api/products?q=amoxi&priceMin=5&priceMax=20&sort=price_asc
//! GET /api/products?type=health&prescription=none&page=2&limit=24
//! GET /api/admin/prescriptions?status=approved&q=RX-1001
//! ```
//!
//! Malformed values never produce an error. An invalid category, price bound
//! or flag simply drops that constraint; out-of-range paging is clamped.

pub mod conditions;
pub mod pagination;
pub mod sanitize;
pub mod search;
pub mod sort;
pub mod values;

// Re-export commonly used items
pub use conditions::{FilterColumns, FilterSpec, Predicate, SafeFilter};
pub use pagination::{ADMIN_PAGE_LIMITS, CATALOG_PAGE_LIMITS, PageLimits, PageSpec, parse_pagination};
pub use sanitize::{
    PrescriptionFlag, PriceRange, build_price_filter, map_ui_status, parse_in_stock_flag,
    parse_prescription_flag, parse_product_kind, sanitize_category,
};
pub use search::{
    ContainsPattern, MAX_SEARCH_QUERY_LENGTH, TextSearch, build_contains_predicate,
    escape_literal_for_contains_match, make_text_search_or,
};
pub use sort::{SortColumns, SortKey, parse_sort};
pub use values::{is_valid_resource_id, parse_resource_id, to_finite_number};
