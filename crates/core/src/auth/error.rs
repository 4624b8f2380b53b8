use thiserror::Error;

use super::TokenKind;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("invalid username, email or password")]
    InvalidCredentials,

    #[error("missing bearer token")]
    MissingToken,

    #[error("invalid token: {0}")]
    InvalidToken(String),

    #[error("token expired")]
    TokenExpired,

    #[error("expected {expected} token, got {actual}")]
    WrongTokenKind {
        expected: TokenKind,
        actual: TokenKind,
    },

    #[error("token issued by unexpected issuer: {0}")]
    WrongIssuer(String),

    #[error("insufficient role: {0} required")]
    Forbidden(&'static str),

    #[error("password hashing failed: {0}")]
    Hashing(String),

    #[error("token signing failed: {0}")]
    Signing(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrong_kind_display_names_both_kinds() {
        let error = AuthError::WrongTokenKind {
            expected: TokenKind::Access,
            actual: TokenKind::Refresh,
        };
        assert_eq!(error.to_string(), "expected access token, got refresh");
    }

    #[test]
    fn test_invalid_credentials_does_not_say_which_part() {
        assert_eq!(
            AuthError::InvalidCredentials.to_string(),
            "invalid username, email or password"
        );
    }
}
