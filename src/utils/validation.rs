//! Input validation utilities

use once_cell::sync::Lazy;
use regex::Regex;

/// Case numbers must carry this literal prefix.
pub const CASE_NUMBER_PREFIX: &str = "MS";

/// Regex for validating custom field internal names
static FIELD_NAME_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z_][a-zA-Z0-9_]*$").unwrap());

/// Validate that a case number is present and starts with the `MS` prefix.
/// Returns a human-readable reason when invalid.
pub fn validate_case_number(case_number: &str) -> Result<(), String> {
    if case_number.is_empty() {
        return Err("Case number is required".to_string());
    }
    if !case_number.starts_with(CASE_NUMBER_PREFIX) {
        return Err(format!(
            "Case numbers should start with {}",
            CASE_NUMBER_PREFIX
        ));
    }
    Ok(())
}

/// Prepend the `MS` prefix when a case number lacks it.
pub fn add_case_number_prefix(case_number: &str) -> String {
    if case_number.is_empty() || case_number.starts_with(CASE_NUMBER_PREFIX) {
        case_number.to_string()
    } else {
        format!("{}{}", CASE_NUMBER_PREFIX, case_number)
    }
}

/// Validate a custom field internal name (identifier-shaped)
pub fn validate_field_name(name: &str) -> bool {
    !name.is_empty() && name.len() <= 64 && FIELD_NAME_REGEX.is_match(name)
}
