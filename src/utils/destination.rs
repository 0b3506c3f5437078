//! Destination URL validation.

use url::Url;

/// Errors that can occur while validating a destination.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DestinationError {
    #[error("Invalid URL format: {0}")]
    InvalidFormat(String),

    #[error("Only HTTP and HTTPS protocols are allowed")]
    UnsupportedProtocol,

    #[error("URL must include a host")]
    MissingHost,

    #[error("URL must not contain whitespace around it or control characters")]
    IllegalCharacters,
}

/// Checks that a destination is an absolute HTTP(S) URL.
///
/// The destination is stored exactly as given; parsing is only used for the
/// check, so resolving a code returns the caller's original string. Control
/// characters (which the parser would drop) and surrounding whitespace are
/// rejected, so a stored destination is always a valid `Location` value.
///
/// # Security
///
/// Rejects potentially dangerous protocols like `javascript:`, `data:`, `file:`, etc.
pub fn validate_destination(destination: &str) -> Result<(), DestinationError> {
    if destination.trim() != destination || destination.chars().any(char::is_control) {
        return Err(DestinationError::IllegalCharacters);
    }

    let parsed = Url::parse(destination)
        .map_err(|e| DestinationError::InvalidFormat(e.to_string()))?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(DestinationError::UnsupportedProtocol);
    }

    if parsed.host_str().is_none_or(str::is_empty) {
        return Err(DestinationError::MissingHost);
    }

    Ok(())
}
