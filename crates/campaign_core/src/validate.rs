//! Live classification of the multiline URL box.
//!
//! Everything here is pure: the same text always yields the same candidates
//! and the same invalid set, and the input is never modified.

use thiserror::Error;
use url::Url;

pub const MIN_URLS_PER_CAMPAIGN: usize = 1;
pub const MAX_URLS_PER_CAMPAIGN: usize = 200;

/// Schemes that carry a network authority.
const RECOGNIZED_SCHEMES: &[&str] = &["http", "https", "ftp", "ws", "wss"];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{count} invalid URL(s) found. Fix or remove them before submitting.")]
    InvalidUrls { count: usize },
    #[error("Enter at least one URL.")]
    NoUrls,
    #[error("Too many URLs: {count} entered, at most {max} are allowed per campaign.")]
    TooManyUrls { count: usize, max: usize },
}

/// Splits on line breaks, trims every line and drops empty ones.
/// Order and duplicates are preserved.
pub fn candidate_urls(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}

/// An absolute URL with a recognized scheme and a non-empty host.
pub fn is_valid_url(candidate: &str) -> bool {
    match Url::parse(candidate) {
        Ok(url) => {
            RECOGNIZED_SCHEMES.contains(&url.scheme())
                && url.host_str().is_some_and(|host| !host.is_empty())
        }
        Err(_) => false,
    }
}

/// The ordered subsequence of candidates that fail [`is_valid_url`].
pub fn invalid_urls(text: &str) -> Vec<String> {
    candidate_urls(text)
        .into_iter()
        .filter(|candidate| !is_valid_url(candidate))
        .collect()
}

/// Submission guard: every candidate valid, and between
/// [`MIN_URLS_PER_CAMPAIGN`] and [`MAX_URLS_PER_CAMPAIGN`] of them (inclusive).
pub fn validate_batch(text: &str) -> Result<Vec<String>, ValidationError> {
    let candidates = candidate_urls(text);
    let invalid = candidates
        .iter()
        .filter(|candidate| !is_valid_url(candidate))
        .count();
    if invalid > 0 {
        return Err(ValidationError::InvalidUrls { count: invalid });
    }
    if candidates.len() < MIN_URLS_PER_CAMPAIGN {
        return Err(ValidationError::NoUrls);
    }
    if candidates.len() > MAX_URLS_PER_CAMPAIGN {
        return Err(ValidationError::TooManyUrls {
            count: candidates.len(),
            max: MAX_URLS_PER_CAMPAIGN,
        });
    }
    Ok(candidates)
}
