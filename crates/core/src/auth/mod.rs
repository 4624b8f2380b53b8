mod error;
mod functions;
mod types;
mod validation;

pub use error::AuthError;
pub use functions::{build_claims, calculate_expiry, classify_login_key, is_token_expired};
pub use types::{Claims, LoginKey, TokenKind, TokenPair};
pub use validation::{parse_bearer, validate_claims};
