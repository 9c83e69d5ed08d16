//! Input validation helpers
//!
//! Centralized text length constants and validation functions.
//! SQLite TEXT has no built-in length enforcement, so limits are
//! enforced here at the handler layer. Every error names the field
//! that failed so the frontend can point at the form control.

use url::Url;

use crate::utils::AppError;

// ── Text length limits ──────────────────────────────────────────────

/// Person / team names
pub const MAX_NAME_LEN: usize = 200;

/// Complaint text, action taken, other reason
pub const MAX_TEXT_LEN: usize = 2000;

/// Short identifiers: phone, connection number, service number, SPK number
pub const MAX_SHORT_TEXT_LEN: usize = 100;

/// Addresses and locations
pub const MAX_ADDRESS_LEN: usize = 500;

/// URLs (Google Maps links)
pub const MAX_URL_LEN: usize = 2048;

/// Passwords (before hashing)
pub const MAX_PASSWORD_LEN: usize = 128;
pub const MIN_PASSWORD_LEN: usize = 6;

// ── Validation helpers ──────────────────────────────────────────────

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::validation(format!("{field} must not be empty")));
    }
    if value.len() > max_len {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            value.len()
        )));
    }
    Ok(())
}

/// Validate that an optional string, if present, is within the length limit.
pub fn validate_optional_text(
    value: &Option<String>,
    field: &str,
    max_len: usize,
) -> Result<(), AppError> {
    if let Some(v) = value
        && v.len() > max_len
    {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            v.len()
        )));
    }
    Ok(())
}

/// Validate that a value is one of an allowed set.
pub fn validate_one_of(value: &str, field: &str, allowed: &[&str]) -> Result<(), AppError> {
    if !allowed.contains(&value) {
        return Err(AppError::validation(format!(
            "{field} must be one of {allowed:?}, got '{value}'"
        )));
    }
    Ok(())
}

/// Validate a maps link: must be a well-formed URL.
/// An empty string is coerced to "unset" rather than rejected,
/// matching how the intake form submits an untouched field.
pub fn validate_maps_link(value: Option<String>) -> Result<Option<String>, AppError> {
    match value {
        None => Ok(None),
        Some(s) if s.is_empty() => Ok(None),
        Some(s) => {
            if s.len() > MAX_URL_LEN {
                return Err(AppError::validation(format!(
                    "mapsLink is too long ({} chars, max {MAX_URL_LEN})",
                    s.len()
                )));
            }
            Url::parse(&s)
                .map_err(|e| AppError::validation(format!("mapsLink is not a valid URL: {e}")))?;
            Ok(Some(s))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_text_rejects_empty_and_whitespace() {
        assert!(validate_required_text("", "customerName", MAX_NAME_LEN).is_err());
        assert!(validate_required_text("   ", "customerName", MAX_NAME_LEN).is_err());
        assert!(validate_required_text("Jane", "customerName", MAX_NAME_LEN).is_ok());
    }

    #[test]
    fn required_text_rejects_over_limit() {
        let long = "x".repeat(MAX_NAME_LEN + 1);
        let err = validate_required_text(&long, "customerName", MAX_NAME_LEN).unwrap_err();
        assert!(err.to_string().contains("customerName"));
    }

    #[test]
    fn optional_text_allows_none() {
        assert!(validate_optional_text(&None, "phone", MAX_SHORT_TEXT_LEN).is_ok());
    }

    #[test]
    fn maps_link_empty_string_coerces_to_unset() {
        assert_eq!(validate_maps_link(Some(String::new())).unwrap(), None);
        assert_eq!(validate_maps_link(None).unwrap(), None);
    }

    #[test]
    fn maps_link_rejects_malformed_url() {
        assert!(validate_maps_link(Some("not a url".to_string())).is_err());
    }

    #[test]
    fn maps_link_accepts_valid_url() {
        let link = "https://maps.google.com/?q=-6.2,106.8".to_string();
        assert_eq!(validate_maps_link(Some(link.clone())).unwrap(), Some(link));
    }

    #[test]
    fn one_of_rejects_unknown_values() {
        assert!(validate_one_of("PERUMDA AM", "serviceCostBy", &["PERUMDA AM", "Langganan"]).is_ok());
        assert!(validate_one_of("Gratis", "serviceCostBy", &["PERUMDA AM", "Langganan"]).is_err());
    }
}
