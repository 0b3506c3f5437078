//! Short code generation, validation and normalization utilities.
//!
//! Provides cryptographically secure random code generation and validation
//! for custom user-provided codes.

use std::sync::LazyLock;

use base64::Engine as _;
use regex::Regex;

use crate::error::AppError;

/// Length of generated short codes.
pub const DEFAULT_CODE_LENGTH: usize = 6;

/// Custom code length bounds.
pub const MIN_CUSTOM_CODE_LENGTH: usize = 3;
pub const MAX_CUSTOM_CODE_LENGTH: usize = 32;

/// Top-level path segments owned by other routes. A code with one of these
/// names could never be reached at `/{code}`.
pub const RESERVED_CODES: &[&str] = &["api", "health", "urls"];

/// Random bytes drawn per generated code. 8 bytes encode to 11 base64
/// characters, enough for any length up to [`MAX_GENERATED_CODE_LENGTH`].
const ENTROPY_BYTES: usize = 8;

pub const MAX_GENERATED_CODE_LENGTH: usize = 11;

static CODE_CHARSET: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").expect("static regex is valid"));

/// Generates a cryptographically secure random short code.
///
/// Uses `getrandom` for entropy and encodes the result as URL-safe base64
/// without padding, truncated to `length` characters and lowercased so the
/// code is already in its stored form.
///
/// # Errors
///
/// Returns the OS error if the system random number generator fails.
///
/// # Examples
///
/// ```ignore
/// let code = generate_code(6)?;
/// assert_eq!(code.len(), 6);
/// assert!(code.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
/// ```
pub fn generate_code(length: usize) -> Result<String, getrandom::Error> {
    let mut buffer = [0u8; ENTROPY_BYTES];

    getrandom::fill(&mut buffer)?;

    let mut code = base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(buffer);
    code.truncate(length.min(MAX_GENERATED_CODE_LENGTH));
    code.make_ascii_lowercase();
    Ok(code)
}

/// Validates a user-provided custom short code.
///
/// # Rules
///
/// - Length: 3-32 characters
/// - Allowed characters: letters, digits, hyphens, underscores
/// - Not one of [`RESERVED_CODES`]
///
/// Case is not checked here; codes are lowercased by [`normalize_code`].
///
/// # Errors
///
/// Returns [`AppError::InvalidCode`] if any rule is violated.
pub fn validate_custom_code(code: &str) -> Result<(), AppError> {
    if !CODE_CHARSET.is_match(code) {
        return Err(AppError::InvalidCode(
            "short code can only contain letters, numbers, hyphens, and underscores".to_string(),
        ));
    }

    if !(MIN_CUSTOM_CODE_LENGTH..=MAX_CUSTOM_CODE_LENGTH).contains(&code.len()) {
        return Err(AppError::InvalidCode(format!(
            "short code must be {}-{} characters, got {}",
            MIN_CUSTOM_CODE_LENGTH,
            MAX_CUSTOM_CODE_LENGTH,
            code.len()
        )));
    }

    if is_reserved_code(code) {
        return Err(AppError::InvalidCode(format!(
            "short code '{}' is reserved",
            code.to_ascii_lowercase()
        )));
    }

    Ok(())
}

/// Returns true if `code` clashes with a route name, in any case.
pub fn is_reserved_code(code: &str) -> bool {
    RESERVED_CODES
        .iter()
        .any(|reserved| reserved.eq_ignore_ascii_case(code))
}

/// Returns true if `code` only uses the short code alphabet.
pub fn is_code_charset(code: &str) -> bool {
    CODE_CHARSET.is_match(code)
}

/// Brings a code into its stored form.
///
/// Strips any path prefix (`"urls/abc"`, `"/abc"`, full short URLs), trims
/// whitespace and lowercases. Idempotent.
pub fn normalize_code(raw: &str) -> String {
    raw.trim()
        .rsplit('/')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_generate_code_has_requested_length() {
        assert_eq!(generate_code(6).unwrap().len(), 6);
        assert_eq!(generate_code(10).unwrap().len(), 10);
    }

    #[test]
    fn test_generate_code_length_is_capped() {
        assert_eq!(generate_code(64).unwrap().len(), MAX_GENERATED_CODE_LENGTH);
    }

    #[test]
    fn test_generate_code_is_stored_form() {
        for _ in 0..100 {
            let code = generate_code(DEFAULT_CODE_LENGTH).unwrap();
            assert!(is_code_charset(&code));
            assert_eq!(normalize_code(&code), code);
            assert!(!code.contains('='));
        }
    }

    #[test]
    fn test_generate_code_is_mostly_unique() {
        let codes: HashSet<String> = (0..1000)
            .map(|_| generate_code(DEFAULT_CODE_LENGTH).unwrap())
            .collect();

        // 38 symbols ^ 6 positions; a handful of collisions would already be suspicious.
        assert!(codes.len() >= 995);
    }

    #[test]
    fn test_validate_accepts_mixed_case_and_symbols() {
        assert!(validate_custom_code("MyLink1").is_ok());
        assert!(validate_custom_code("my_link-2").is_ok());
        assert!(validate_custom_code("abc").is_ok());
    }

    #[test]
    fn test_validate_rejects_space() {
        let err = validate_custom_code("my link").unwrap_err();
        assert!(matches!(err, AppError::InvalidCode(_)));
    }

    #[test]
    fn test_validate_rejects_special_characters() {
        assert!(validate_custom_code("my@code").is_err());
        assert!(validate_custom_code("ünïcode").is_err());
        assert!(validate_custom_code("a/b").is_err());
    }

    #[test]
    fn test_validate_length_bounds() {
        assert!(validate_custom_code("ab").is_err());
        assert!(validate_custom_code(&"a".repeat(32)).is_ok());
        assert!(validate_custom_code(&"a".repeat(33)).is_err());
        assert!(validate_custom_code("").is_err());
    }

    #[test]
    fn test_validate_rejects_route_names() {
        for code in ["health", "HEALTH", "Api", "urls"] {
            assert!(
                matches!(validate_custom_code(code), Err(AppError::InvalidCode(_))),
                "{code}"
            );
        }
        assert!(validate_custom_code("healthy").is_ok());
    }

    #[test]
    fn test_normalize_strips_prefix_and_lowercases() {
        assert_eq!(normalize_code("urls/MyLink1"), "mylink1");
        assert_eq!(normalize_code("/AbC"), "abc");
        assert_eq!(normalize_code("https://s.example.com/urls/XyZ"), "xyz");
        assert_eq!(normalize_code("  Code  "), "code");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        for raw in ["urls/MyLink1", "ABC", " x/Y ", "a-b_C", "", "/", "urls/"] {
            let once = normalize_code(raw);
            assert_eq!(normalize_code(&once), once, "not idempotent for {raw:?}");
        }
    }
}
