//! Cached user repository decorator.
//!
//! A user row is mirrored under three keys (id, username, email). Any read
//! populates all three under the lock of the id key, so the aliases never
//! disagree about which row they mirror.

use std::sync::Arc;

use async_trait::async_trait;

use campus_core::cache::{user_email_key, user_id_key, user_keys, user_username_key, KeyValueStore};
use campus_core::school::{NewUser, User};
use campus_core::storage::{Result, UserRepository};

use super::{CacheAside, CachePolicy};

fn keys_for(user: &User) -> Vec<String> {
    user_keys(user.id, &user.username, &user.email)
}

/// Cached user repository decorator.
///
/// Username and email misses are negatively cached so that probing for
/// unregistered accounts is absorbed by the cache.
pub struct CachedUserRepository<R, C>
where
    R: UserRepository,
    C: KeyValueStore,
{
    repository: Arc<R>,
    aside: CacheAside<C>,
    policy: CachePolicy,
}

impl<R, C> CachedUserRepository<R, C>
where
    R: UserRepository,
    C: KeyValueStore,
{
    pub fn new(repository: Arc<R>, cache: Arc<C>, policy: CachePolicy) -> Self {
        Self {
            repository,
            aside: CacheAside::new(cache, &policy),
            policy,
        }
    }
}

#[async_trait]
impl<R, C> UserRepository for CachedUserRepository<R, C>
where
    R: UserRepository + 'static,
    C: KeyValueStore + 'static,
{
    async fn get_user(&self, id: i64) -> Result<Option<User>> {
        self.aside
            .read_aliased(
                &user_id_key(id),
                self.policy.entity(),
                self.repository.get_user(id),
                keys_for,
            )
            .await
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        self.aside
            .read_aliased(
                &user_username_key(username),
                self.policy.entity_with_negative(),
                self.repository.get_user_by_username(username),
                keys_for,
            )
            .await
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        self.aside
            .read_aliased(
                &user_email_key(email),
                self.policy.entity_with_negative(),
                self.repository.get_user_by_email(email),
                keys_for,
            )
            .await
    }

    async fn create_user(&self, user: &NewUser) -> Result<User> {
        // Clears negative markers left by earlier lookups of this username or email.
        let created = self
            .aside
            .write(None, self.repository.create_user(user), keys_for)
            .await?;

        tracing::debug!(user_id = created.id, username = %created.username, "Created user");
        self.aside
            .write_through(&keys_for(&created), &created, self.policy.entity_ttl)
            .await;
        Ok(created)
    }
}
