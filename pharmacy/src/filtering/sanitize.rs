//! Field sanitizers: turn one raw query value into a typed constraint, or none.
//!
//! None of these functions fail. Malformed input drops the constraint (or, for
//! `inStock`, pins it to `false`), so a broken search box degrades to "all
//! results" or "no results" rather than an error.

use regex::Regex;
use std::sync::LazyLock;

use super::values::to_finite_number;
use crate::models::{PrescriptionStatus, ProductKind};

/// Sentinel the storefront sends when no category is selected
const ALL_CATEGORIES: &str = "all";

static CATEGORY_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_\s-]{1,64}$").expect("category pattern is valid"));

/// Accept a category name only if it looks like one.
///
/// Returns the trimmed name when it is 1-64 word characters, spaces or
/// hyphens. `"all"`, empty strings and anything else yield `None`.
#[must_use]
pub fn sanitize_category(value: Option<&str>) -> Option<String> {
    let value = value?;
    if value == ALL_CATEGORIES {
        return None;
    }
    let trimmed = value.trim();
    CATEGORY_PATTERN
        .is_match(trimmed)
        .then(|| trimmed.to_string())
}

/// `"true"` is true, any other present value is false, absent is no constraint.
#[must_use]
pub fn parse_in_stock_flag(value: Option<&str>) -> Option<bool> {
    value.map(|v| v == "true")
}

/// Prescription requirement requested by the client
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PrescriptionFlag {
    Required,
    None,
    #[default]
    Any,
}

impl PrescriptionFlag {
    /// The value the `prescription` column must equal, if constrained
    #[must_use]
    pub const fn required(self) -> Option<bool> {
        match self {
            Self::Required => Some(true),
            Self::None => Some(false),
            Self::Any => None,
        }
    }
}

#[must_use]
pub fn parse_prescription_flag(value: Option<&str>) -> PrescriptionFlag {
    match value {
        Some("required") => PrescriptionFlag::Required,
        Some("none") => PrescriptionFlag::None,
        _ => PrescriptionFlag::Any,
    }
}

#[must_use]
pub fn parse_product_kind(value: Option<&str>) -> Option<ProductKind> {
    value.and_then(ProductKind::from_wire)
}

#[must_use]
pub fn map_ui_status(value: Option<&str>) -> Option<PrescriptionStatus> {
    value.and_then(PrescriptionStatus::from_ui)
}

/// Inclusive price bounds. At least one bound is always set.
///
/// `gte > lte` is kept as-is and simply matches nothing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceRange {
    pub gte: Option<f64>,
    pub lte: Option<f64>,
}

/// Build a price range from raw bounds; unparseable bounds are dropped independently.
#[must_use]
pub fn build_price_filter(min: Option<&str>, max: Option<&str>) -> Option<PriceRange> {
    let gte = min.and_then(to_finite_number);
    let lte = max.and_then(to_finite_number);
    if gte.is_none() && lte.is_none() {
        return None;
    }
    Some(PriceRange { gte, lte })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_accepts_plain_names() {
        assert_eq!(sanitize_category(Some("Pain Relief")), Some("Pain Relief".to_string()));
        assert_eq!(sanitize_category(Some("Antibiotics")), Some("Antibiotics".to_string()));
        assert_eq!(sanitize_category(Some("skin-care_2")), Some("skin-care_2".to_string()));
    }

    #[test]
    fn test_category_trims_surrounding_whitespace() {
        assert_eq!(sanitize_category(Some("  Vitamins ")), Some("Vitamins".to_string()));
    }

    #[test]
    fn test_category_rejects_sentinel_and_garbage() {
        let long = "A".repeat(100);
        for raw in ["all", "", "   ", "<script>", "{\"$ne\":null}", "Pain.Relief", long.as_str()] {
            assert_eq!(sanitize_category(Some(raw)), None, "{raw:?} should be ignored");
        }
        assert_eq!(sanitize_category(None), None);
    }

    #[test]
    fn test_category_length_boundary() {
        let max = "A".repeat(64);
        assert_eq!(sanitize_category(Some(&max)), Some(max.clone()));
        assert_eq!(sanitize_category(Some(&"A".repeat(65))), None);
    }

    #[test]
    fn test_in_stock_flag_asymmetry() {
        assert_eq!(parse_in_stock_flag(Some("true")), Some(true));
        assert_eq!(parse_in_stock_flag(Some("false")), Some(false));
        assert_eq!(parse_in_stock_flag(Some("1")), Some(false));
        assert_eq!(parse_in_stock_flag(Some("TRUE")), Some(false));
        assert_eq!(parse_in_stock_flag(Some("")), Some(false));
        assert_eq!(parse_in_stock_flag(None), None);
    }

    #[test]
    fn test_prescription_flag() {
        assert_eq!(parse_prescription_flag(Some("required")).required(), Some(true));
        assert_eq!(parse_prescription_flag(Some("none")).required(), Some(false));
        assert_eq!(parse_prescription_flag(Some("yes")).required(), None);
        assert_eq!(parse_prescription_flag(None), PrescriptionFlag::Any);
    }

    #[test]
    fn test_price_filter_bounds_parse_independently() {
        assert_eq!(build_price_filter(None, None), None);
        assert_eq!(build_price_filter(Some("abc"), Some("")), None);
        assert_eq!(
            build_price_filter(Some("5"), Some("oops")),
            Some(PriceRange { gte: Some(5.0), lte: None })
        );
        assert_eq!(
            build_price_filter(None, Some("20.5")),
            Some(PriceRange { gte: None, lte: Some(20.5) })
        );
    }

    #[test]
    fn test_price_filter_keeps_inverted_bounds() {
        assert_eq!(
            build_price_filter(Some("1000"), Some("5")),
            Some(PriceRange { gte: Some(1000.0), lte: Some(5.0) })
        );
    }

    #[test]
    fn test_product_kind_enumeration() {
        assert_eq!(parse_product_kind(Some("medicine")), Some(ProductKind::Medicine));
        assert_eq!(parse_product_kind(Some("drugs")), None);
        assert_eq!(parse_product_kind(None), None);
    }

    #[test]
    fn test_ui_status_absent() {
        assert_eq!(map_ui_status(None), None);
        assert_eq!(map_ui_status(Some("approved")), Some(PrescriptionStatus::Active));
    }
}
