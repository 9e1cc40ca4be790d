//! Bearer credential extraction.

use error::AuthError;

/// Case-sensitive prefix of an `Authorization` header carrying a token.
pub const BEARER_PREFIX: &str = "Bearer ";

/// Extract the token from an `Authorization` header value.
///
/// The header must start with exactly `Bearer ` (one space). Whatever
/// follows is returned untouched, even if empty; an empty token fails
/// verification later rather than here.
pub fn bearer_token(header: Option<&str>) -> Result<&str, AuthError> {
    header
        .and_then(|value| value.strip_prefix(BEARER_PREFIX))
        .ok_or(AuthError::MissingBearer)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_token_after_prefix() {
        assert_eq!(bearer_token(Some("Bearer abc.def.ghi")), Ok("abc.def.ghi"));
    }

    #[test]
    fn test_missing_header() {
        assert_eq!(bearer_token(None), Err(AuthError::MissingBearer));
    }

    #[test]
    fn test_prefix_is_case_sensitive() {
        assert_eq!(bearer_token(Some("bearer abc")), Err(AuthError::MissingBearer));
        assert_eq!(bearer_token(Some("BEARER abc")), Err(AuthError::MissingBearer));
    }

    #[test]
    fn test_prefix_needs_the_space() {
        assert_eq!(bearer_token(Some("Bearerabc")), Err(AuthError::MissingBearer));
        assert_eq!(bearer_token(Some("Basic dXNlcjpwYXNz")), Err(AuthError::MissingBearer));
    }

    #[test]
    fn test_empty_token_is_passed_through() {
        assert_eq!(bearer_token(Some("Bearer ")), Ok(""));
    }
}
