use crate::error::AuthError;

pub const BEARER_PREFIX: &str = "Bearer ";

/// Extract the token of an `Authorization: Bearer <token>` header value.
pub fn parse_bearer(header: Option<&str>) -> Result<&str, AuthError> {
    let token = header
        .and_then(|value| value.strip_prefix(BEARER_PREFIX))
        .map(str::trim)
        .ok_or(AuthError::MissingBearerToken)?;
    if token.is_empty() {
        return Err(AuthError::MissingBearerToken);
    }
    Ok(token)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bearer() {
        assert_eq!(parse_bearer(Some("Bearer abc")).unwrap(), "abc");
    }

    #[test]
    fn test_missing_or_malformed() {
        for header in [None, Some(""), Some("Bearer"), Some("Bearer "), Some("Basic abc"), Some("bearer abc")] {
            assert!(
                matches!(parse_bearer(header), Err(AuthError::MissingBearerToken)),
                "header {:?} should be rejected",
                header
            );
        }
    }
}
