// Validation utilities
use crate::error::{Error, Result};
use regex::Regex;
use std::sync::OnceLock;
use tracing::warn;
use url::Url;

pub const MIN_NAME_LEN: usize = 2;
pub const MIN_PASSWORD_LEN: usize = 6;

fn email_regex() -> &'static Regex {
    static EMAIL_RE: OnceLock<Regex> = OnceLock::new();
    EMAIL_RE.get_or_init(|| {
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid")
    })
}

/// Validate an email address and return it trimmed
pub fn validate_email(email: &str) -> Result<String> {
    let email = email.trim();
    if !email_regex().is_match(email) {
        return Err(Error::Validation(
            "Please enter a valid email address".to_string(),
        ));
    }
    Ok(email.to_string())
}

/// Validate a display name and return it trimmed
pub fn validate_full_name(name: &str) -> Result<String> {
    let name = name.trim();
    if name.chars().count() < MIN_NAME_LEN {
        return Err(Error::Validation(format!(
            "Name must be at least {MIN_NAME_LEN} characters"
        )));
    }
    Ok(name.to_string())
}

/// Check a new password and its confirmation
pub fn validate_password(password: &str, confirmation: &str) -> Result<()> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(Error::Validation(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    if password != confirmation {
        return Err(Error::Validation("Passwords do not match".to_string()));
    }
    Ok(())
}

/// Validate a listing image URL: absolute, http or https, with a host
pub fn validate_image_url(url_str: &str) -> Result<Url> {
    let url = Url::parse(url_str)?;

    match url.scheme() {
        "http" | "https" => {}
        scheme => {
            warn!("Rejected image URL with scheme {}: {}", scheme, url_str);
            return Err(Error::Validation(format!(
                "Image URL must use http or https scheme: {url_str}"
            )));
        }
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(Error::Validation(
            "Image URL must have a valid host".to_string(),
        ));
    }

    Ok(url)
}
