//! JWT issuance and verification.
//!
//! Tokens are signed with HS256. Access and refresh tokens share the claim
//! set and differ only in `kind` and lifetime.

use campus_core::auth::{
    build_claims, validate_claims, AuthError as CoreError, Claims, TokenKind, TokenPair,
};
use campus_core::school::User;
use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind as JwtErrorKind, Algorithm, DecodingKey, EncodingKey,
    Header, Validation,
};

use crate::config::AuthConfig;
use crate::error::AuthError;

/// Signs and verifies tokens with a shared secret.
#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    issuer: String,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl TokenService {
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            encoding: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            decoding: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            issuer: config.issuer.clone(),
            access_ttl: config.access_ttl,
            refresh_ttl: config.refresh_ttl,
        }
    }

    /// Issues a fresh access/refresh pair for `user`.
    pub fn issue_pair(&self, user: &User) -> Result<TokenPair, AuthError> {
        let now = Utc::now();
        let access = build_claims(user, TokenKind::Access, &self.issuer, now, self.access_ttl);
        let refresh = build_claims(
            user,
            TokenKind::Refresh,
            &self.issuer,
            now,
            self.refresh_ttl,
        );

        Ok(TokenPair {
            access_token: self.sign(&access)?,
            refresh_token: self.sign(&refresh)?,
            token_type: "Bearer".to_string(),
            expires_in: self.access_ttl.num_seconds(),
        })
    }

    /// Decodes `token`, checking its signature, kind, issuer and expiry.
    pub fn verify(&self, token: &str, expected: TokenKind) -> Result<Claims, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&self.issuer]);
        validation.leeway = 0;

        let data = decode::<Claims>(token, &self.decoding, &validation).map_err(|e| {
            match e.kind() {
                JwtErrorKind::ExpiredSignature => CoreError::TokenExpired,
                JwtErrorKind::InvalidIssuer => CoreError::WrongIssuer("unexpected".to_string()),
                _ => CoreError::InvalidToken(e.to_string()),
            }
        })?;

        validate_claims(&data.claims, expected, &self.issuer, Utc::now())?;
        Ok(data.claims)
    }

    fn sign(&self, claims: &Claims) -> Result<String, AuthError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding)
            .map_err(|e| CoreError::Signing(e.to_string()).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use campus_core::school::Role;

    fn user() -> User {
        User {
            id: 5,
            username: "carol".to_string(),
            email: "carol@example.com".to_string(),
            password_hash: "hash".to_string(),
            role: Role::Student,
        }
    }

    fn service() -> TokenService {
        TokenService::new(&AuthConfig::default())
    }

    #[test]
    fn test_issued_access_token_verifies() {
        let tokens = service();
        let pair = tokens.issue_pair(&user()).unwrap();
        assert_eq!(pair.token_type, "Bearer");
        assert_eq!(pair.expires_in, 24 * 3600);

        let claims = tokens.verify(&pair.access_token, TokenKind::Access).unwrap();
        assert_eq!(claims.sub, 5);
        assert_eq!(claims.username, "carol");
        assert_eq!(claims.role, Role::Student);
    }

    #[test]
    fn test_refresh_token_is_not_an_access_token() {
        let tokens = service();
        let pair = tokens.issue_pair(&user()).unwrap();

        assert!(tokens.verify(&pair.refresh_token, TokenKind::Refresh).is_ok());
        let err = tokens
            .verify(&pair.refresh_token, TokenKind::Access)
            .unwrap_err();
        assert!(matches!(
            err,
            AuthError::Core(CoreError::WrongTokenKind { .. })
        ));
    }

    #[test]
    fn test_token_signed_with_other_secret_is_rejected() {
        let other = TokenService::new(&AuthConfig {
            jwt_secret: "another-secret-entirely".to_string(),
            ..AuthConfig::default()
        });
        let pair = other.issue_pair(&user()).unwrap();

        let err = service()
            .verify(&pair.access_token, TokenKind::Access)
            .unwrap_err();
        assert!(matches!(err, AuthError::Core(CoreError::InvalidToken(_))));
    }

    #[test]
    fn test_token_from_other_issuer_is_rejected() {
        let other = TokenService::new(&AuthConfig {
            issuer: "elsewhere".to_string(),
            ..AuthConfig::default()
        });
        let pair = other.issue_pair(&user()).unwrap();

        let err = service()
            .verify(&pair.access_token, TokenKind::Access)
            .unwrap_err();
        assert!(matches!(err, AuthError::Core(CoreError::WrongIssuer(_))));
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let tokens = service();
        let now = Utc::now();
        let claims = build_claims(
            &user(),
            TokenKind::Access,
            "campus",
            now - Duration::hours(2),
            Duration::hours(1),
        );
        let token = tokens.sign(&claims).unwrap();

        let err = tokens.verify(&token, TokenKind::Access).unwrap_err();
        assert!(matches!(err, AuthError::Core(CoreError::TokenExpired)));
    }

    #[test]
    fn test_garbage_is_rejected() {
        let err = service()
            .verify("not.a.token", TokenKind::Access)
            .unwrap_err();
        assert!(matches!(err, AuthError::Core(CoreError::InvalidToken(_))));
    }
}
