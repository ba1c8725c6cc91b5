use uuid::Uuid;

/// Coerce a raw value to a finite number.
///
/// Returns `None` for empty input, anything that does not parse, and for
/// NaN or infinite results, so a malformed parameter drops its constraint
/// instead of failing the request.
#[must_use]
pub fn to_finite_number(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Check that `value` has the store's identifier format (a UUID).
///
/// Routes addressed by id call this before touching the database; a `false`
/// here is a client error (400), distinct from a well-formed id that matches
/// nothing (404).
#[must_use]
pub fn is_valid_resource_id(value: &str) -> bool {
    parse_resource_id(value).is_some()
}

/// Parse a resource id, returning `None` when the format is invalid
#[must_use]
pub fn parse_resource_id(value: &str) -> Option<Uuid> {
    Uuid::parse_str(value).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finite_numbers_parse() {
        assert_eq!(to_finite_number("12"), Some(12.0));
        assert_eq!(to_finite_number(" 4.5 "), Some(4.5));
        assert_eq!(to_finite_number("-3"), Some(-3.0));
        assert_eq!(to_finite_number("1e3"), Some(1000.0));
    }

    #[test]
    fn test_non_finite_and_garbage_rejected() {
        for raw in ["", "   ", "abc", "NaN", "inf", "-infinity", "1e400", "12abc", "{\"$gt\":0}"] {
            assert_eq!(to_finite_number(raw), None, "{raw:?} should not parse");
        }
    }

    #[test]
    fn test_resource_id_format() {
        assert!(is_valid_resource_id("550e8400-e29b-41d4-a716-446655440000"));
        assert!(!is_valid_resource_id("not-a-valid-id"));
        assert!(!is_valid_resource_id(""));
        assert!(!is_valid_resource_id("507f1f77bcf86cd79943901"));
        assert!(!is_valid_resource_id("{\"$ne\":null}"));
    }
}
