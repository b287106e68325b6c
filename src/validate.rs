//! Source URL validation for the submission form.

use url::Url;

use crate::error::AppError;

/// Parse `input` as an absolute `http`/`https` URL.
/// Surrounding whitespace is ignored, as the form trims the field before submitting.
pub fn validate_source_url(input: &str) -> Result<Url, AppError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(AppError::InvalidUrl);
    }
    let url = Url::parse(trimmed).map_err(|_| AppError::InvalidUrl)?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        _ => Err(AppError::InvalidUrl),
    }
}

pub fn is_valid_url(input: &str) -> bool {
    validate_source_url(input).is_ok()
}
