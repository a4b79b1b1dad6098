//! Product identifier format (`P001`, `P002`, ..., `P1000`).
//!
//! The numeric suffix comes from the `product_id_seq` database sequence;
//! this module only formats and checks the textual form.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;
use validator::ValidationError;

/// Prefix shared by every product id.
pub const PRODUCT_ID_PREFIX: char = 'P';

/// Minimum number of digits after the prefix; longer suffixes are not padded.
pub const PRODUCT_ID_MIN_DIGITS: usize = 3;

/// Message returned for malformed product ids.
pub const PRODUCT_ID_FORMAT_MESSAGE: &str = "Product ID must be in the format 'P001', 'P002', etc.";

static PRODUCT_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^P\d{3,}$").expect("valid regex"));

/// Format a sequence value as a product id, zero-padding to three digits.
pub fn format_product_id(sequence: i64) -> String {
    format!(
        "{PRODUCT_ID_PREFIX}{sequence:0width$}",
        width = PRODUCT_ID_MIN_DIGITS
    )
}

/// Whether `id` has the `P` + at-least-three-digits shape.
pub fn is_valid_product_id(id: &str) -> bool {
    PRODUCT_ID_RE.is_match(id)
}

/// `validator` custom rule for request fields carrying a product id.
pub fn validate_product_id(id: &str) -> Result<(), ValidationError> {
    if is_valid_product_id(id) {
        return Ok(());
    }
    let mut err = ValidationError::new("product_id_format");
    err.message = Some(Cow::Borrowed(PRODUCT_ID_FORMAT_MESSAGE));
    Err(err)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_with_three_digit_padding() {
        assert_eq!(format_product_id(1), "P001");
        assert_eq!(format_product_id(42), "P042");
        assert_eq!(format_product_id(999), "P999");
    }

    #[test]
    fn long_sequences_are_not_truncated() {
        assert_eq!(format_product_id(1000), "P1000");
        assert_eq!(format_product_id(123456), "P123456");
    }

    #[test]
    fn accepts_well_formed_ids() {
        assert!(is_valid_product_id("P001"));
        assert!(is_valid_product_id("P1000"));
    }

    #[test]
    fn rejects_malformed_ids() {
        for id in ["", "P", "P01", "p001", "X001", "P00a", " P001", "P001 ", "123"] {
            assert!(!is_valid_product_id(id), "{id:?} should be rejected");
        }
    }

    #[test]
    fn validator_rule_carries_message() {
        let err = validate_product_id("nope").unwrap_err();
        assert_eq!(err.code, "product_id_format");
        assert_eq!(err.message.as_deref(), Some(PRODUCT_ID_FORMAT_MESSAGE));
    }
}
