use super::values::to_finite_number;

/// Default and maximum page size for one resource
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageLimits {
    pub default_limit: u64,
    pub max_limit: u64,
}

impl PageLimits {
    #[must_use]
    pub const fn new(default_limit: u64, max_limit: u64) -> Self {
        Self { default_limit, max_limit }
    }
}

/// Storefront catalogs: products and health products
pub const CATALOG_PAGE_LIMITS: PageLimits = PageLimits::new(12, 50);

/// Back-office lists: prescriptions and the patient roster
pub const ADMIN_PAGE_LIMITS: PageLimits = PageLimits::new(20, 100);

/// Pages beyond this are clamped so the row offset always fits a signed 64-bit bind value
pub const MAX_PAGE: u64 = u32::MAX as u64;

/// A resolved page window. `skip == (page - 1) * limit` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageSpec {
    pub page: u64,
    pub limit: u64,
    pub skip: u64,
}

impl PageSpec {
    /// Number of pages needed for `total` items; never less than 1
    #[must_use]
    pub fn page_count(&self, total: u64) -> u64 {
        total.div_ceil(self.limit).max(1)
    }
}

/// Numeric query value, with zero treated the same as absent
fn nonzero_number(value: Option<&str>) -> Option<f64> {
    value.and_then(to_finite_number).filter(|n| *n != 0.0)
}

/// Resolve page/limit from untrusted values.
///
/// Always returns a valid window: missing, zero, negative, fractional and
/// non-numeric values fall back to safe defaults, and `limit` never exceeds
/// `limits.max_limit` whatever the client asks for.
#[must_use]
pub fn parse_pagination(page: Option<&str>, limit: Option<&str>, limits: PageLimits) -> PageSpec {
    let max_limit = limits.max_limit.max(1);

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
    let page = nonzero_number(page)
        .unwrap_or(1.0)
        .max(1.0)
        .min(MAX_PAGE as f64)
        .trunc() as u64;

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
    let limit = nonzero_number(limit)
        .unwrap_or(limits.default_limit as f64)
        .max(1.0)
        .min(max_limit as f64)
        .trunc() as u64;
    let limit = limit.clamp(1, max_limit);

    let skip = (page - 1) * limit;
    PageSpec { page, limit, skip }
}
