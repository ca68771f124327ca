//! Input validation for customer details.
//!
//! Failures are reported as `(key, message)` pairs so the client can attach
//! each message to its form field. Keys use the wire's camelCase names.

use std::sync::LazyLock;

use regex::Regex;

use crate::models::Address;
use crate::response::FieldError;

/// German mobile numbers in normalized `+49` form.
static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+491[5-7]\d{7,9}$").expect("valid regex"));

/// German postal codes.
static PINCODE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{5}$").expect("valid regex"));

/// House numbers like `12`, `12a` or `12/1`.
static BUILDING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]+[a-zA-Z]?(/[0-9a-zA-Z]+)?$").expect("valid regex"));

/// Street names: letters (umlauts included), digits, spaces, dots, hyphens.
static STREET_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\p{L}\d .\-]+$").expect("valid regex"));

/// Normalize a phone number to `+49...` form.
///
/// Strips spaces, hyphens, slashes and parentheses, then rewrites the
/// common prefixes: `00` becomes `+` and a leading `0` becomes `+49`.
#[must_use]
pub fn normalize_phone(raw: &str) -> String {
    let digits: String = raw
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '/' | '(' | ')'))
        .collect();

    if let Some(rest) = digits.strip_prefix("00") {
        format!("+{rest}")
    } else if let Some(rest) = digits.strip_prefix('0') {
        format!("+49{rest}")
    } else {
        digits
    }
}

/// Validate the name/phone contact pair, returning the normalized phone.
#[must_use]
pub fn validate_contact(name: &str, phone: &str) -> (String, Vec<FieldError>) {
    let mut errors = Vec::new();

    if name.trim().is_empty() {
        errors.push(FieldError::new("name", "Please enter the name"));
    }

    let normalized = normalize_phone(phone.trim());
    if !PHONE_RE.is_match(&normalized) {
        errors.push(FieldError::new(
            "phoneNumber",
            "Please enter a valid German mobile number",
        ));
    }

    (normalized, errors)
}

/// Validate a structured delivery address.
#[must_use]
pub fn validate_address(address: &Address) -> Vec<FieldError> {
    let mut errors = Vec::new();

    if !PINCODE_RE.is_match(address.pincode.trim()) {
        errors.push(FieldError::new("pincode", "Please enter a valid 5-digit postcode"));
    }
    if !BUILDING_RE.is_match(address.building_number.trim()) {
        errors.push(FieldError::new("buildingNumber", "Please enter a valid building number"));
    }
    if !STREET_RE.is_match(address.street.trim()) {
        errors.push(FieldError::new("street", "Please enter a valid street"));
    }
    if address.town.trim().is_empty() {
        errors.push(FieldError::new("town", "Please enter the town"));
    }
    if address.display_address.trim().is_empty() {
        errors.push(FieldError::new("displayAddress", "Please enter the address"));
    }

    errors
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn address() -> Address {
        Address {
            pincode: "70173".to_owned(),
            building_number: "12a".to_owned(),
            street: "Königstraße".to_owned(),
            town: "Stuttgart".to_owned(),
            display_address: "Königstraße 12a, 70173 Stuttgart".to_owned(),
        }
    }

    #[test]
    fn test_normalize_leading_zero() {
        assert_eq!(normalize_phone("0151 2345 6789"), "+4915123456789");
    }

    #[test]
    fn test_normalize_double_zero_prefix() {
        assert_eq!(normalize_phone("004915123456789"), "+4915123456789");
    }

    #[test]
    fn test_normalize_keeps_plus_form() {
        assert_eq!(normalize_phone("+49 151-234/56789"), "+4915123456789");
    }

    #[test]
    fn test_valid_contact_passes() {
        let (normalized, errors) = validate_contact("Maria Schmidt", "015123456789");
        assert!(errors.is_empty());
        assert_eq!(normalized, "+4915123456789");
    }

    #[test]
    fn test_landline_is_rejected() {
        // Stuttgart landline prefix 0711 is not a 15/16/17 mobile block.
        let (_, errors) = validate_contact("Maria", "0711 123456");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].key, "phoneNumber");
    }

    #[test]
    fn test_blank_name_and_phone_report_both_fields() {
        let (_, errors) = validate_contact("  ", "abc");
        let keys: Vec<&str> = errors.iter().map(|e| e.key.as_str()).collect();
        assert_eq!(keys, vec!["name", "phoneNumber"]);
    }

    #[test]
    fn test_valid_address_passes() {
        assert!(validate_address(&address()).is_empty());
    }

    #[test]
    fn test_short_pincode_is_rejected() {
        let mut addr = address();
        addr.pincode = "7017".to_owned();
        let errors = validate_address(&addr);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].key, "pincode");
    }

    #[test]
    fn test_building_number_forms() {
        for good in ["12", "12a", "12/1", "3B"] {
            assert!(BUILDING_RE.is_match(good), "{good} should pass");
        }
        for bad in ["", "zwölf", "12 a", "#12"] {
            assert!(!BUILDING_RE.is_match(bad), "{bad} should fail");
        }
    }

    #[test]
    fn test_street_allows_umlauts_and_rejects_symbols() {
        let mut addr = address();
        addr.street = "Bad Cannstatter Str. 5".to_owned();
        assert!(validate_address(&addr).is_empty());

        addr.street = "Königstraße <script>".to_owned();
        let errors = validate_address(&addr);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].key, "street");
    }

    #[test]
    fn test_every_blank_field_is_reported() {
        let addr = Address {
            pincode: String::new(),
            building_number: String::new(),
            street: String::new(),
            town: String::new(),
            display_address: String::new(),
        };
        assert_eq!(validate_address(&addr).len(), 5);
    }
}
