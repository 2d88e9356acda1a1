//! Input sanitization functions

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Pattern to match HTML tags
    static ref HTML_TAG_PATTERN: Regex = Regex::new(r"<[^>]*>").unwrap();

    /// Pattern to match multiple whitespace characters
    static ref MULTI_WHITESPACE: Regex = Regex::new(r"\s+").unwrap();
}

/// Trim leading and trailing whitespace from a string
pub fn trim(value: &str) -> String {
    value.trim().to_string()
}

/// Trim an optional string in place, dropping it when it becomes empty
pub fn trim_optional(value: &mut Option<String>) {
    if let Some(ref mut s) = value {
        *s = s.trim().to_string();
        if s.is_empty() {
            *value = None;
        }
    }
}

/// Strip all HTML tags from a string
pub fn strip_html(value: &str) -> String {
    HTML_TAG_PATTERN.replace_all(value, "").to_string()
}

/// Collapse runs of whitespace into single spaces
pub fn normalize_whitespace(value: &str) -> String {
    MULTI_WHITESPACE.replace_all(value.trim(), " ").to_string()
}

/// Sanitize a display name: trim, strip HTML, normalize whitespace
pub fn sanitize_name(value: &str) -> String {
    normalize_whitespace(&strip_html(value))
}

/// Sanitize free text (descriptions, comments): trim and strip HTML,
/// dropping the value when nothing remains
pub fn sanitize_text_optional(value: &mut Option<String>) {
    if let Some(ref mut s) = value {
        *s = strip_html(s).trim().to_string();
        if s.is_empty() {
            *value = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trim_removes_surrounding_whitespace() {
        assert_eq!(trim("  hello  "), "hello");
    }

    #[test]
    fn trim_optional_drops_empty() {
        let mut v = Some("   ".to_string());
        trim_optional(&mut v);
        assert!(v.is_none());

        let mut v = Some(" kept ".to_string());
        trim_optional(&mut v);
        assert_eq!(v.as_deref(), Some("kept"));
    }

    #[test]
    fn strip_html_removes_tags() {
        assert_eq!(strip_html("<b>Asha</b> Tailors"), "Asha Tailors");
    }

    #[test]
    fn sanitize_name_normalizes() {
        assert_eq!(sanitize_name("  Asha   <i>Tailors</i>  "), "Asha Tailors");
    }

    #[test]
    fn sanitize_text_optional_drops_tag_only_input() {
        let mut v = Some("<script></script>".to_string());
        sanitize_text_optional(&mut v);
        assert!(v.is_none());
    }
}
