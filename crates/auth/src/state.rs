//! Application state for auth.

use axum::extract::FromRef;
use campus_core::storage::UserRepository;
use std::sync::Arc;

use crate::config::AuthConfig;
use crate::tokens::TokenService;

/// Shared state for auth handlers and extractors.
#[derive(Clone)]
pub struct AuthState {
    pub users: Arc<dyn UserRepository>,
    pub tokens: TokenService,
}

impl AuthState {
    /// Creates a new AuthState over the (cached) user repository.
    pub fn new(users: Arc<dyn UserRepository>, config: &AuthConfig) -> Self {
        Self {
            users,
            tokens: TokenService::new(config),
        }
    }
}

/// Allows AuthState to be extracted from a parent state.
impl<S> FromRef<S> for AuthState
where
    S: AsRef<AuthState>,
{
    fn from_ref(state: &S) -> Self {
        state.as_ref().clone()
    }
}
