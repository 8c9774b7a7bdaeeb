//! Contact-detail validation shared by bookings, inquiries and clients.
//!
//! E-mail is the natural key the client directory matches on, so every
//! address is normalized with [`normalize_email`] before it is stored or
//! looked up.

use validator::ValidateEmail;

use crate::error::CoreError;

/// Maximum length of a person or company name.
pub const MAX_NAME_LENGTH: usize = 200;

/// Maximum length of a stored phone number (`+` and up to 16 digits).
pub const MAX_PHONE_LENGTH: usize = 17;

/// Country prefix applied to local numbers.
pub const DEFAULT_COUNTRY_PREFIX: &str = "+254";

/// Canonical form of an e-mail address used for matching.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Validate an e-mail address and return its normalized form.
pub fn validate_email(email: &str) -> Result<String, CoreError> {
    let normalized = normalize_email(email);
    if normalized.is_empty() {
        return Err(CoreError::Validation("E-mail address is required".into()));
    }
    if !normalized.validate_email() {
        return Err(CoreError::Validation(format!(
            "'{normalized}' is not a valid e-mail address"
        )));
    }
    Ok(normalized)
}

/// Validate a display name and return it trimmed.
pub fn validate_name(name: &str) -> Result<String, CoreError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation("Name is required".into()));
    }
    if trimmed.chars().count() > MAX_NAME_LENGTH {
        return Err(CoreError::Validation(format!(
            "Name exceeds maximum length of {MAX_NAME_LENGTH} characters"
        )));
    }
    Ok(trimmed.to_string())
}

/// Normalize a phone number to international form.
///
/// Spaces and dashes are stripped. Local numbers starting with `0` have the
/// leading zero replaced by the default country prefix; bare subscriber
/// numbers starting with `7` or `1` get the prefix prepended. The result
/// must be `+` followed by 9 to 16 digits.
pub fn normalize_phone(phone: &str) -> Result<String, CoreError> {
    let compact: String = phone
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '-')
        .collect();

    let international = if compact.starts_with('+') {
        compact
    } else if let Some(rest) = compact.strip_prefix('0') {
        format!("{DEFAULT_COUNTRY_PREFIX}{rest}")
    } else if compact.starts_with('7') || compact.starts_with('1') {
        format!("{DEFAULT_COUNTRY_PREFIX}{compact}")
    } else {
        compact
    };

    let digits = &international[international.starts_with('+') as usize..];
    let valid = international.starts_with('+')
        && (9..=16).contains(&digits.len())
        && digits.chars().all(|c| c.is_ascii_digit());

    if !valid || international.len() > MAX_PHONE_LENGTH {
        return Err(CoreError::Validation(format!(
            "'{phone}' is not a valid phone number (e.g. +254 700 000 000)"
        )));
    }
    Ok(international)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_is_trimmed_and_lowercased() {
        assert_eq!(normalize_email("  Jane.Doe@Example.COM "), "jane.doe@example.com");
    }

    #[test]
    fn invalid_email_is_rejected() {
        assert!(validate_email("not-an-email").is_err());
        assert!(validate_email("   ").is_err());
        assert_eq!(validate_email("a@b.co").unwrap(), "a@b.co");
    }

    #[test]
    fn name_must_not_be_blank() {
        assert!(validate_name("  ").is_err());
        assert_eq!(validate_name(" Jane Doe ").unwrap(), "Jane Doe");
        assert!(validate_name(&"x".repeat(MAX_NAME_LENGTH + 1)).is_err());
    }

    #[test]
    fn local_numbers_get_country_prefix() {
        assert_eq!(normalize_phone("0712 345 678").unwrap(), "+254712345678");
        assert_eq!(normalize_phone("712-345-678").unwrap(), "+254712345678");
        assert_eq!(normalize_phone("+254712345678").unwrap(), "+254712345678");
    }

    #[test]
    fn garbage_phone_is_rejected() {
        assert!(normalize_phone("call me").is_err());
        assert!(normalize_phone("+12").is_err());
    }
}
