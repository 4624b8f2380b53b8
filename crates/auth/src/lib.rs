//! Authentication for campus.
//!
//! This crate provides:
//! - Argon2 password hashing
//! - HS256 access and refresh tokens
//! - The `/user/*` routes (register, login, refresh, info)
//! - Seeding the first admin from the environment
//! - Axum extractors for authentication

mod bootstrap;
mod config;
mod error;
mod extractors;
mod handlers;
mod password;
mod state;
mod tokens;

pub use bootstrap::{ensure_admin, AdminSeed};
pub use config::AuthConfig;
pub use error::AuthError;
pub use extractors::{AdminUser, AuthUser, CurrentUser};
pub use handlers::auth_routes;
pub use password::{hash_password, verify_password};
pub use state::AuthState;
pub use tokens::TokenService;
