//! Input validation for link submissions.
//!
//! The two predicates are pure and deterministic. Length limits are part of the
//! same contract but are applied by
//! [`crate::application::services::ShorteningService`], which owns the order
//! in which the checks run.

use regex::Regex;
use std::sync::LazyLock;
use url::Url;

/// Minimum alias length, in characters.
pub const ALIAS_MIN_LENGTH: usize = 5;

/// Maximum alias length, in characters.
pub const ALIAS_MAX_LENGTH: usize = 50;

/// Maximum target URL length, in characters.
pub const URL_MAX_LENGTH: usize = 2000;

/// Compiled regex for alias validation.
static ALIAS_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").expect("alias pattern is valid"));

/// Reasons a link submission is rejected.
///
/// `Display` yields the user-facing message; [`ValidationError::reason`]
/// yields a stable machine-readable code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Invalid. Input field is empty.")]
    Empty,

    #[error("Invalid URL. Please enter a valid URL.")]
    BadUrl,

    #[error("Invalid alias. Please enter a valid alias.")]
    BadAlias,

    #[error("Invalid. Input field is too long.")]
    TooLong,

    #[error("Invalid. Alias must be at least 5 characters.")]
    TooShort,
}

impl ValidationError {
    /// Stable reason code, reported in error details.
    pub fn reason(&self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::BadUrl => "bad_url",
            Self::BadAlias => "bad_alias",
            Self::TooLong => "too_long",
            Self::TooShort => "too_short",
        }
    }
}

/// Returns `true` if `candidate` parses as an absolute URL with a host.
///
/// Relative references (`example.com`, `/path`) and host-less URLs
/// (`mailto:`, `data:`, `javascript:`) are rejected. So is any candidate
/// holding an ASCII control character: the URL parser drops tab, CR and LF
/// silently, but the raw text is what gets stored and later redirected to.
///
/// # Examples
///
/// ```ignore
/// assert!(is_valid_url("https://example.com/page?q=1"));
/// assert!(!is_valid_url("example.com"));
/// assert!(!is_valid_url("not a url"));
/// ```
pub fn is_valid_url(candidate: &str) -> bool {
    if candidate.chars().any(|c| c.is_ascii_control()) {
        return false;
    }

    Url::parse(candidate)
        .map(|url| url.has_host())
        .unwrap_or(false)
}

/// Returns `true` if `candidate` is non-empty and consists only of ASCII
/// letters, digits, hyphens and underscores.
pub fn is_valid_alias(candidate: &str) -> bool {
    ALIAS_REGEX.is_match(candidate)
}
