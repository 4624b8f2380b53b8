//! Startup seeding of the first admin account.
//!
//! Registration never grants the admin role to an anonymous caller, so the
//! first admin comes from the environment.

use campus_core::school::{validate_registration, RegisterRequest, Role, User};
use campus_core::storage::UserRepository;

use crate::error::AuthError;
use crate::password::hash_password_blocking;

/// Credentials for the admin created at startup.
#[derive(Clone)]
pub struct AdminSeed {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for AdminSeed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminSeed")
            .field("username", &self.username)
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

impl AdminSeed {
    /// Reads `ADMIN_USERNAME`, `ADMIN_EMAIL` and `ADMIN_PASSWORD`.
    ///
    /// Returns `None` unless all three are set and non-empty.
    pub fn from_env() -> Option<Self> {
        let var = |name: &str| std::env::var(name).ok().filter(|v| !v.is_empty());
        Some(Self {
            username: var("ADMIN_USERNAME")?,
            email: var("ADMIN_EMAIL")?,
            password: var("ADMIN_PASSWORD")?,
        })
    }
}

/// Creates the seeded admin unless a user with that username already exists.
///
/// An existing user is returned as is, whatever its role.
pub async fn ensure_admin(users: &dyn UserRepository, seed: &AdminSeed) -> Result<User, AuthError> {
    let req = RegisterRequest {
        username: seed.username.clone(),
        email: seed.email.clone(),
        password: seed.password.clone(),
        role: Role::Admin,
    };
    validate_registration(&req)?;

    if let Some(existing) = users.get_user_by_username(req.username.trim()).await? {
        if existing.role != Role::Admin {
            tracing::warn!(user_id = existing.id, "Seed admin username belongs to a non-admin");
        }
        return Ok(existing);
    }

    let hash = hash_password_blocking(req.password.clone()).await?;
    let admin = users.create_user(&req.into_new_user(hash)).await?;
    tracing::info!(user_id = admin.id, username = %admin.username, "Seeded admin account");
    Ok(admin)
}
