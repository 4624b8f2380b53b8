use chrono::{DateTime, Duration, Utc};

use super::{Claims, LoginKey, TokenKind};
use crate::school::{is_email, User};

/// Classifies a login key: anything containing both `@` and `.` is an email.
pub fn classify_login_key(key: &str) -> LoginKey<'_> {
    let key = key.trim();
    if is_email(key) {
        LoginKey::Email(key)
    } else {
        LoginKey::Username(key)
    }
}

/// Builds the claims for a token of `kind` issued to `user` at `now`.
pub fn build_claims(
    user: &User,
    kind: TokenKind,
    issuer: &str,
    now: DateTime<Utc>,
    ttl: Duration,
) -> Claims {
    Claims {
        sub: user.id,
        username: user.username.clone(),
        role: user.role,
        kind,
        iss: issuer.to_string(),
        iat: now.timestamp(),
        exp: calculate_expiry(now, ttl).timestamp(),
    }
}

/// Calculate token expiry from issue time and TTL.
pub fn calculate_expiry(issued_at: DateTime<Utc>, ttl: Duration) -> DateTime<Utc> {
    issued_at + ttl
}

/// Check if the claims have expired.
pub fn is_token_expired(claims: &Claims, now: DateTime<Utc>) -> bool {
    claims.exp <= now.timestamp()
}
