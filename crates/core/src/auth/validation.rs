use chrono::{DateTime, Utc};

use super::{is_token_expired, AuthError, Claims, TokenKind};

/// Extracts the token from an `Authorization: Bearer <token>` header value.
///
/// # Examples
///
/// ```
/// use campus_core::auth::parse_bearer;
///
/// assert_eq!(parse_bearer("Bearer abc.def.ghi"), Some("abc.def.ghi"));
/// assert_eq!(parse_bearer("Basic dXNlcg=="), None);
/// assert_eq!(parse_bearer("Bearer "), None);
/// ```
pub fn parse_bearer(header: &str) -> Option<&str> {
    header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Checks decoded claims against the expected kind, issuer and clock.
///
/// Signature checks happen before this, when the token is decoded.
pub fn validate_claims(
    claims: &Claims,
    expected: TokenKind,
    issuer: &str,
    now: DateTime<Utc>,
) -> Result<(), AuthError> {
    if claims.kind != expected {
        return Err(AuthError::WrongTokenKind {
            expected,
            actual: claims.kind,
        });
    }
    if claims.iss != issuer {
        return Err(AuthError::WrongIssuer(claims.iss.clone()));
    }
    if is_token_expired(claims, now) {
        return Err(AuthError::TokenExpired);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;
    use crate::school::Role;

    fn claims(kind: TokenKind, exp_offset: Duration) -> Claims {
        let now = Utc::now();
        Claims {
            sub: 1,
            username: "bob".to_string(),
            role: Role::Student,
            kind,
            iss: "campus".to_string(),
            iat: now.timestamp(),
            exp: (now + exp_offset).timestamp(),
        }
    }

    // ==================== parse_bearer tests ====================

    #[test]
    fn test_parse_bearer_accepts_token() {
        assert_eq!(parse_bearer("Bearer token123"), Some("token123"));
    }

    #[test]
    fn test_parse_bearer_rejects_other_schemes() {
        assert_eq!(parse_bearer("Token token123"), None);
        assert_eq!(parse_bearer("bearer token123"), None);
    }

    #[test]
    fn test_parse_bearer_rejects_empty_token() {
        assert_eq!(parse_bearer("Bearer    "), None);
    }

    // ==================== validate_claims tests ====================

    #[test]
    fn test_accepts_matching_claims() {
        let c = claims(TokenKind::Access, Duration::hours(1));
        assert!(validate_claims(&c, TokenKind::Access, "campus", Utc::now()).is_ok());
    }

    #[test]
    fn test_rejects_refresh_token_used_as_access() {
        let c = claims(TokenKind::Refresh, Duration::hours(1));
        assert_eq!(
            validate_claims(&c, TokenKind::Access, "campus", Utc::now()),
            Err(AuthError::WrongTokenKind {
                expected: TokenKind::Access,
                actual: TokenKind::Refresh,
            })
        );
    }

    #[test]
    fn test_rejects_foreign_issuer() {
        let c = claims(TokenKind::Access, Duration::hours(1));
        assert_eq!(
            validate_claims(&c, TokenKind::Access, "someone-else", Utc::now()),
            Err(AuthError::WrongIssuer("campus".to_string()))
        );
    }

    #[test]
    fn test_rejects_expired_claims() {
        let c = claims(TokenKind::Access, Duration::hours(-1));
        assert_eq!(
            validate_claims(&c, TokenKind::Access, "campus", Utc::now()),
            Err(AuthError::TokenExpired)
        );
    }
}
