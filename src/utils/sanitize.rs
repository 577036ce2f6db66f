// Sanitization utilities

/// Sanitize HTML content using ammonia library for comprehensive XSS protection
pub fn sanitize_html(text: &str) -> String {
    ammonia::clean(text)
}

/// Trim user-entered plain text; blank input becomes `None`.
/// Escaping happens at render time in the templates.
pub fn clean_text(text: &str, max_len: usize) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(truncate(trimmed, max_len))
    }
}

/// Truncate text to at most `max_len` characters, marking the cut with "..."
pub fn truncate(text: &str, max_len: usize) -> String {
    if text.chars().count() <= max_len {
        text.to_string()
    } else {
        let kept: String = text.chars().take(max_len.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_html() {
        assert!(!sanitize_html("<script>alert('xss')</script>").contains("script"));

        let safe_html = "<p>Spacious <strong>3BHK</strong></p>";
        let sanitized = sanitize_html(safe_html);
        assert!(sanitized.contains("<p>"));
        assert!(sanitized.contains("<strong>"));
    }

    #[test]
    fn test_clean_text() {
        assert_eq!(clean_text("  nice flat \n", 100), Some("nice flat".to_string()));
        assert_eq!(clean_text("   ", 100), None);
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("hello", 10), "hello");
        assert_eq!(truncate("hello world", 8), "hello...");
        // Multi-byte characters are never split
        assert_eq!(truncate("₹₹₹₹₹₹", 5), "₹₹...");
    }
}
