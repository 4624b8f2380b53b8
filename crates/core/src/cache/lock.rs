use rand::{distr::Alphanumeric, Rng};

/// Proof of ownership for a distributed lock.
///
/// Returned by a successful acquisition and required to release the lock.
/// The token value is what the store holds under the lock key, so a release
/// presented with a stale token (the lock expired and was re-acquired by
/// someone else) can be told apart from a release by the current holder.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LockToken {
    key: String,
    token: String,
}

impl LockToken {
    /// Creates a token with a fresh random value for the given lock key.
    pub fn generate(key: impl Into<String>) -> Self {
        let token = rand::rng()
            .sample_iter(&Alphanumeric)
            .take(32)
            .map(char::from)
            .collect();
        Self {
            key: key.into(),
            token,
        }
    }

    /// Returns the lock key this token guards.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Returns the opaque value stored under the lock key.
    pub fn value(&self) -> &str {
        &self.token
    }
}

impl std::fmt::Display for LockToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key)
    }
}
