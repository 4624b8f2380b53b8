//! Axum extractors for authentication.

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};
use campus_core::auth::{parse_bearer, AuthError as CoreError, Claims, TokenKind};
use campus_core::school::Role;

use crate::error::AuthError;
use crate::AuthState;

/// Identity carried by a verified access token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub id: i64,
    pub username: String,
    pub role: Role,
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self {
            id: claims.sub,
            username: claims.username,
            role: claims.role,
        }
    }
}

/// Verifies the bearer access token in `headers`.
pub(crate) fn authenticate(state: &AuthState, headers: &HeaderMap) -> Result<AuthUser, AuthError> {
    let header = headers
        .get(AUTHORIZATION)
        .ok_or(CoreError::MissingToken)?
        .to_str()
        .map_err(|_| CoreError::InvalidToken("non-ASCII authorization header".to_string()))?;

    let token = parse_bearer(header).ok_or(CoreError::MissingToken)?;
    let claims = state.tokens.verify(token, TokenKind::Access)?;

    Ok(claims.into())
}

/// Extractor for authenticated user. Returns 401 if not authenticated.
pub struct CurrentUser(pub AuthUser);

impl<S> FromRequestParts<S> for CurrentUser
where
    AuthState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let auth_state = AuthState::from_ref(state);
        authenticate(&auth_state, &parts.headers).map(CurrentUser)
    }
}

/// Extractor for an authenticated admin. Returns 403 for other roles.
pub struct AdminUser(pub AuthUser);

impl<S> FromRequestParts<S> for AdminUser
where
    AuthState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let CurrentUser(user) = CurrentUser::from_request_parts(parts, state).await?;
        if user.role != Role::Admin {
            return Err(CoreError::Forbidden("admin").into());
        }
        Ok(AdminUser(user))
    }
}
