//! Field validators for input validation

use lazy_static::lazy_static;
use regex::Regex;
use uuid::Uuid;

lazy_static! {
    /// HTML tag detection pattern
    static ref HTML_TAG_REGEX: Regex = Regex::new(r"<[^>]+>").unwrap();

    /// Script/event handler pattern for XSS detection
    static ref XSS_PATTERN_REGEX: Regex = Regex::new(
        r"(?i)(javascript:|on\w+\s*=|<script|<iframe|<object|<embed)"
    ).unwrap();

    /// Loose email shape: something@something.tld
    static ref EMAIL_REGEX: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
}

/// Validate that a string is not empty after trimming
pub fn validate_required(value: &str, field_name: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        return Err(format!("{} is required", field_name));
    }
    Ok(())
}

/// Validate string length within bounds
pub fn validate_length(value: &str, min: usize, max: usize) -> Result<(), String> {
    let len = value.chars().count();
    if len < min {
        return Err(format!("must be at least {} characters", min));
    }
    if len > max {
        return Err(format!("must be at most {} characters", max));
    }
    Ok(())
}

/// Validate a phone number: at least 10 characters after trimming
pub fn validate_phone(phone: &str) -> Result<(), String> {
    let trimmed = phone.trim();
    if trimmed.is_empty() {
        return Err("phone is required".to_string());
    }
    if trimmed.chars().count() < 10 {
        return Err("must be at least 10 characters".to_string());
    }
    Ok(())
}

/// Validate a review rating: an integer in [1, 5].
///
/// Ratings arrive as JSON numbers, so the check rejects fractional values
/// explicitly rather than letting deserialization truncate them.
pub fn validate_rating(rating: f64) -> Result<(), String> {
    if !rating.is_finite() || rating.fract() != 0.0 {
        return Err("must be an integer between 1 and 5".to_string());
    }
    if !(1.0..=5.0).contains(&rating) {
        return Err("must be an integer between 1 and 5".to_string());
    }
    Ok(())
}

/// Validate that a string parses as a UUID
pub fn validate_uuid(value: &str, field_name: &str) -> Result<(), String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(format!("{} is required", field_name));
    }
    if Uuid::parse_str(trimmed).is_err() {
        return Err(format!("{} must be a valid id", field_name));
    }
    Ok(())
}

/// Validate an email address shape
pub fn validate_email(value: &str) -> Result<(), String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err("email address is required".to_string());
    }
    if !EMAIL_REGEX.is_match(trimmed) {
        return Err("must be a valid email address".to_string());
    }
    Ok(())
}

/// Validate that a string contains no HTML tags
pub fn validate_no_html(value: &str) -> Result<(), String> {
    if HTML_TAG_REGEX.is_match(value) {
        return Err("HTML tags are not allowed".to_string());
    }
    Ok(())
}

/// Validate that a string contains no potential XSS patterns
pub fn validate_no_xss(value: &str) -> Result<(), String> {
    if XSS_PATTERN_REGEX.is_match(value) {
        return Err("potentially unsafe content detected".to_string());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phone_accepts_ten_digits() {
        assert!(validate_phone("9876543210").is_ok());
        assert!(validate_phone("+91 98765 43210").is_ok());
    }

    #[test]
    fn phone_rejects_short_or_empty() {
        assert!(validate_phone("12345").is_err());
        assert!(validate_phone("").is_err());
        assert!(validate_phone("   ").is_err());
    }

    #[test]
    fn rating_accepts_whole_numbers_in_range() {
        for r in 1..=5 {
            assert!(validate_rating(f64::from(r)).is_ok());
        }
    }

    #[test]
    fn rating_rejects_out_of_range() {
        assert!(validate_rating(0.0).is_err());
        assert!(validate_rating(6.0).is_err());
        assert!(validate_rating(-1.0).is_err());
    }

    #[test]
    fn rating_rejects_fractional_values() {
        assert!(validate_rating(4.5).is_err());
        assert!(validate_rating(f64::NAN).is_err());
    }

    #[test]
    fn uuid_validation() {
        assert!(validate_uuid("550e8400-e29b-41d4-a716-446655440000", "reviewer_id").is_ok());
        assert!(validate_uuid("u1", "reviewer_id").is_err());
        assert!(validate_uuid("", "reviewer_id").is_err());
    }

    #[test]
    fn length_bounds() {
        assert!(validate_length("hello", 1, 10).is_ok());
        assert!(validate_length("", 1, 10).is_err());
        assert!(validate_length("hello world!", 1, 5).is_err());
    }

    #[test]
    fn email_shape() {
        assert!(validate_email("asha@example.com").is_ok());
        assert!(validate_email("not-an-email").is_err());
        assert!(validate_email("a@b").is_err());
    }

    #[test]
    fn no_html_and_no_xss() {
        assert!(validate_no_html("plain text").is_ok());
        assert!(validate_no_html("<b>bold</b>").is_err());
        assert!(validate_no_xss("normal text").is_ok());
        assert!(validate_no_xss("javascript:alert(1)").is_err());
        assert!(validate_no_xss("onclick=alert(1)").is_err());
    }
}
