use crate::core::url::normalize;
use crate::utils::error::{CortexError, Result};

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

/// Blank is accepted ("not configured"); anything else must normalize.
pub fn validate_optional_base_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.trim().is_empty() {
        return Ok(());
    }
    match normalize(url_str) {
        Some(_) => Ok(()),
        None => Err(CortexError::InvalidConfigValue {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "Expected an http(s) URL with a host".to_string(),
        }),
    }
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(CortexError::InvalidConfigValue {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(CortexError::InvalidConfigValue {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_optional_base_url() {
        assert!(validate_optional_base_url("cortex.base_url", "").is_ok());
        assert!(validate_optional_base_url("cortex.base_url", "cortex.example.com").is_ok());
        assert!(validate_optional_base_url("cortex.base_url", "http://example.com").is_ok());
        assert!(validate_optional_base_url("cortex.base_url", "ftp://example.com").is_err());
        assert!(validate_optional_base_url("cortex.base_url", "https://").is_err());
    }

    #[test]
    fn test_validate_range() {
        assert!(validate_range("http.request_timeout_seconds", 8, 1, 120).is_ok());
        assert!(validate_range("http.request_timeout_seconds", 0, 1, 120).is_err());
        assert!(validate_range("http.request_timeout_seconds", 121, 1, 120).is_err());
    }

    #[test]
    fn test_validate_non_empty_string() {
        assert!(validate_non_empty_string("http.user_agent", "cortex-links").is_ok());
        assert!(validate_non_empty_string("http.user_agent", "  ").is_err());
    }
}
