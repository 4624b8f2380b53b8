//! Application state with repository-based storage.
//!
//! This module defines the shared application state that is passed to all
//! request handlers. Every repository is a cached decorator over the
//! system of record; the backend combination is chosen via feature flags.

use std::sync::Arc;

use campus_auth::{AuthConfig, AuthState};
use campus_core::cache::KeyValueStore;
use campus_core::storage::{
    CourseRepository, EnrollmentRepository, TodoRepository, UserRepository,
};

use crate::config::Config;
use crate::storage::cached::{
    CachePolicy, CachedCourseRepository, CachedEnrollmentRepository, CachedTodoRepository,
    CachedUserRepository,
};

/// A system of record that backs every entity family.
pub trait SystemOfRecord:
    UserRepository + CourseRepository + EnrollmentRepository + TodoRepository + 'static
{
}

impl<T> SystemOfRecord for T where
    T: UserRepository + CourseRepository + EnrollmentRepository + TodoRepository + 'static
{
}

/// Shared application state.
///
/// This is cloned for each request handler and contains the cached
/// repositories as trait objects.
#[derive(Clone)]
pub struct AppState {
    pub courses: Arc<dyn CourseRepository>,
    pub enrollments: Arc<dyn EnrollmentRepository>,
    pub todos: Arc<dyn TodoRepository>,
    /// The raw key-value store, for readiness probes.
    pub cache: Arc<dyn KeyValueStore>,
    /// User routes and token extractors.
    pub auth: AuthState,
}

impl AppState {
    /// Wraps `store` in the cached decorators, all sharing `cache`.
    pub fn from_parts<R, C>(
        store: Arc<R>,
        cache: Arc<C>,
        policy: CachePolicy,
        auth_config: &AuthConfig,
    ) -> Self
    where
        R: SystemOfRecord,
        C: KeyValueStore + 'static,
    {
        let users: Arc<dyn UserRepository> = Arc::new(CachedUserRepository::new(
            store.clone(),
            cache.clone(),
            policy,
        ));

        Self {
            courses: Arc::new(CachedCourseRepository::new(
                store.clone(),
                cache.clone(),
                policy,
            )),
            enrollments: Arc::new(CachedEnrollmentRepository::new(
                store.clone(),
                cache.clone(),
                policy,
            )),
            todos: Arc::new(CachedTodoRepository::new(store, cache.clone(), policy)),
            cache,
            auth: AuthState::new(users, auth_config),
        }
    }

    /// Creates AppState with the backends selected by feature flags.
    pub async fn new(config: &Config, auth_config: &AuthConfig) -> Result<Self, anyhow::Error> {
        let store = backends::open_store(config).await?;
        let cache = backends::open_cache(config).await?;
        tracing::info!(
            store = backends::STORE,
            cache = backends::CACHE,
            "Storage backends ready"
        );

        Ok(Self::from_parts(
            store,
            cache,
            config.cache_policy(),
            auth_config,
        ))
    }
}

impl AsRef<AuthState> for AppState {
    fn as_ref(&self) -> &AuthState {
        &self.auth
    }
}

#[cfg(all(feature = "inmemory", feature = "memory"))]
impl Default for AppState {
    /// In-memory storage and cache with default settings.
    /// Useful for testing without any external dependencies.
    fn default() -> Self {
        use crate::cache::MemoryCache;
        use crate::storage::InMemoryRepository;

        Self::from_parts(
            Arc::new(InMemoryRepository::new()),
            Arc::new(MemoryCache::new(10_000)),
            CachePolicy::default(),
            &AuthConfig::default(),
        )
    }
}

mod backends {
    use std::sync::Arc;

    use crate::config::Config;

    #[cfg(feature = "inmemory")]
    pub const STORE: &str = "inmemory";

    #[cfg(feature = "sqlite")]
    pub const STORE: &str = "sqlite";

    #[cfg(feature = "memory")]
    pub const CACHE: &str = "memory";

    #[cfg(feature = "redis")]
    pub const CACHE: &str = "redis";

    #[cfg(feature = "inmemory")]
    pub async fn open_store(
        _config: &Config,
    ) -> Result<Arc<crate::storage::InMemoryRepository>, anyhow::Error> {
        Ok(Arc::new(crate::storage::InMemoryRepository::new()))
    }

    #[cfg(feature = "sqlite")]
    pub async fn open_store(
        config: &Config,
    ) -> Result<Arc<crate::storage::SqliteRepository>, anyhow::Error> {
        Ok(Arc::new(
            crate::storage::SqliteRepository::new(&config.sqlite_path).await?,
        ))
    }

    #[cfg(feature = "memory")]
    pub async fn open_cache(
        config: &Config,
    ) -> Result<Arc<crate::cache::MemoryCache>, anyhow::Error> {
        anyhow::ensure!(
            config.cache_max_entries > 0,
            "CACHE_MAX_ENTRIES must be greater than zero"
        );
        Ok(Arc::new(crate::cache::MemoryCache::new(
            config.cache_max_entries,
        )))
    }

    #[cfg(feature = "redis")]
    pub async fn open_cache(
        config: &Config,
    ) -> Result<Arc<crate::cache::RedisCache>, anyhow::Error> {
        Ok(Arc::new(crate::cache::RedisCache::new(&config.redis_url).await?))
    }
}

#[cfg(all(test, feature = "inmemory", feature = "memory"))]
mod tests {
    use super::*;
    use campus_core::school::{NewCourse, NewUser, Role};

    #[tokio::test]
    async fn test_repositories_share_one_store() {
        let state = AppState::default();

        let user = state
            .auth
            .users
            .create_user(&NewUser {
                username: "rita".to_string(),
                email: "rita@example.com".to_string(),
                password_hash: "$argon2id$stub".to_string(),
                role: Role::Student,
            })
            .await
            .unwrap();
        let course = state
            .courses
            .create_course(&NewCourse {
                name: "Ethics".to_string(),
                capacity: 3,
            })
            .await
            .unwrap();

        state.enrollments.pick_course(user.id, course.id).await.unwrap();

        let course = state.courses.get_course(course.id).await.unwrap().unwrap();
        assert_eq!(course.enrolled, 1);
    }

    #[tokio::test]
    async fn test_new_uses_config() {
        let config = Config {
            cache_max_entries: 0,
            ..Config::from_env()
        };

        assert!(AppState::new(&config, &AuthConfig::default()).await.is_err());
    }

    #[tokio::test]
    async fn test_seeded_admin_is_created_once() {
        let state = AppState::default();
        let seed = campus_auth::AdminSeed {
            username: "root".to_string(),
            email: "root@example.com".to_string(),
            password: "hunter2".to_string(),
        };

        let admin = campus_auth::ensure_admin(&*state.auth.users, &seed)
            .await
            .unwrap();
        assert_eq!(admin.role, Role::Admin);

        let again = campus_auth::ensure_admin(&*state.auth.users, &seed)
            .await
            .unwrap();
        assert_eq!(again.id, admin.id);
    }
}
