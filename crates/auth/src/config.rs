use chrono::Duration;

use crate::error::AuthError;

/// Secret used when `JWT_SECRET` is unset. Only suitable for local development.
const DEV_SECRET: &str = "campus-dev-secret-not-for-production-use";

/// Token signing configuration.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub issuer: String,
    pub access_ttl: Duration,
    pub refresh_ttl: Duration,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: DEV_SECRET.to_string(),
            issuer: "campus".to_string(),
            access_ttl: Duration::hours(24),
            refresh_ttl: Duration::hours(168),
        }
    }
}

impl AuthConfig {
    /// Load from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `JWT_SECRET`: HMAC signing secret (default: a development secret, with a warning)
    /// - `JWT_ISSUER`: `iss` claim written and required on tokens (default: `campus`)
    /// - `JWT_EXPIRATION_HOURS`: Access token lifetime in hours (default: 24)
    /// - `JWT_REFRESH_EXPIRATION_HOURS`: Refresh token lifetime in hours (default: 168)
    ///
    /// # Errors
    ///
    /// Returns an error if a lifetime is not a positive number of hours.
    pub fn from_env() -> Result<Self, AuthError> {
        let defaults = Self::default();

        let jwt_secret = match std::env::var("JWT_SECRET") {
            Ok(secret) if !secret.is_empty() => secret,
            _ => {
                tracing::warn!("JWT_SECRET not set, using the development secret");
                defaults.jwt_secret
            }
        };

        let issuer = std::env::var("JWT_ISSUER").unwrap_or(defaults.issuer);

        let access_ttl = hours_from_env("JWT_EXPIRATION_HOURS")?.unwrap_or(defaults.access_ttl);
        let refresh_ttl =
            hours_from_env("JWT_REFRESH_EXPIRATION_HOURS")?.unwrap_or(defaults.refresh_ttl);

        Ok(Self {
            jwt_secret,
            issuer,
            access_ttl,
            refresh_ttl,
        })
    }
}

fn hours_from_env(name: &str) -> Result<Option<Duration>, AuthError> {
    let Ok(raw) = std::env::var(name) else {
        return Ok(None);
    };
    match raw.parse::<i64>() {
        Ok(hours) if hours > 0 => Ok(Some(Duration::hours(hours))),
        _ => Err(AuthError::Config(format!(
            "{name} must be a positive number of hours, got {raw:?}"
        ))),
    }
}
