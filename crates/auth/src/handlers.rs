//! HTTP handlers for user routes.

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use campus_core::auth::{classify_login_key, AuthError as CoreError, LoginKey, TokenKind, TokenPair};
use campus_core::school::{
    validate_password_format, validate_registration, LoginRequest, RefreshRequest,
    RegisterRequest, Role, UserProfile,
};

use crate::error::AuthError;
use crate::extractors::{authenticate, CurrentUser};
use crate::password::{hash_password_blocking, verify_password_blocking};
use crate::AuthState;

/// Creates the user router.
///
/// Routes:
/// - `POST /user/register` - Create an account
/// - `POST /user/login` - Exchange a username or email and password for tokens
/// - `POST /user/refresh` - Exchange a refresh token for a new pair
/// - `GET /user/info` - Get the current user's profile
pub fn auth_routes() -> Router<AuthState> {
    Router::new()
        .route("/user/register", post(register))
        .route("/user/login", post(login))
        .route("/user/refresh", post(refresh))
        .route("/user/info", get(info))
}

async fn register(
    State(state): State<AuthState>,
    headers: HeaderMap,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<UserProfile>), AuthError> {
    validate_registration(&req)?;

    // Self-registration always yields a student. Admins may create admins.
    if req.role == Role::Admin {
        let caller = authenticate(&state, &headers).map_err(|_| CoreError::Forbidden("admin"))?;
        if caller.role != Role::Admin {
            return Err(CoreError::Forbidden("admin").into());
        }
    }

    let hash = hash_password_blocking(req.password.clone()).await?;
    let user = state.users.create_user(&req.into_new_user(hash)).await?;

    tracing::info!(user_id = user.id, username = %user.username, role = %user.role, "Registered user");

    Ok((StatusCode::CREATED, Json(user.profile())))
}

async fn login(
    State(state): State<AuthState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<TokenPair>, AuthError> {
    if validate_password_format(&req.password).is_err() {
        return Err(CoreError::InvalidCredentials.into());
    }

    let user = match classify_login_key(&req.login_key) {
        LoginKey::Email(email) => state.users.get_user_by_email(&email.to_lowercase()).await?,
        LoginKey::Username(username) => state.users.get_user_by_username(username).await?,
    }
    .ok_or(CoreError::InvalidCredentials)?;

    if !verify_password_blocking(req.password, user.password_hash.clone()).await? {
        tracing::debug!(user_id = user.id, "Rejected login with wrong password");
        return Err(CoreError::InvalidCredentials.into());
    }

    tracing::info!(user_id = user.id, "User logged in");
    Ok(Json(state.tokens.issue_pair(&user)?))
}

async fn refresh(
    State(state): State<AuthState>,
    Json(req): Json<RefreshRequest>,
) -> Result<Json<TokenPair>, AuthError> {
    let claims = state.tokens.verify(&req.refresh_token, TokenKind::Refresh)?;

    let user = state
        .users
        .get_user(claims.sub)
        .await?
        .ok_or_else(|| CoreError::InvalidToken("user no longer exists".to_string()))?;

    Ok(Json(state.tokens.issue_pair(&user)?))
}

async fn info(
    CurrentUser(current): CurrentUser,
    State(state): State<AuthState>,
) -> Result<Json<UserProfile>, AuthError> {
    let user = state
        .users
        .get_user(current.id)
        .await?
        .ok_or_else(|| campus_core::storage::RepositoryError::not_found("User", current.id))?;

    Ok(Json(user.profile()))
}
