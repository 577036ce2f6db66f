// Utility functions
pub mod sanitize;
pub mod validation;

/// Resolve an image URL against a base URL.
/// Absolute URLs are returned as-is; relative ones are joined onto the base.
pub fn resolve_image_url(image_url: &str, base_url: &str) -> Option<String> {
    if image_url.trim().is_empty() {
        return None;
    }

    if url::Url::parse(image_url).is_ok() {
        return Some(image_url.to_string());
    }

    if let Ok(base) = url::Url::parse(base_url) {
        if let Ok(resolved) = base.join(image_url) {
            return Some(resolved.to_string());
        }
    }

    None
}
