//! Cached course repository decorator.

use std::sync::Arc;

use async_trait::async_trait;

use campus_core::cache::{all_courses_key, course_key, KeyValueStore};
use campus_core::school::{Course, NewCourse};
use campus_core::storage::{CourseRepository, Result};

use super::{CacheAside, CachePolicy};

/// Cached course repository decorator.
///
/// Single courses are cached at `course:{id}` with negative caching; the
/// full list is cached at `course:all` with the shorter list TTL.
pub struct CachedCourseRepository<R, C>
where
    R: CourseRepository,
    C: KeyValueStore,
{
    repository: Arc<R>,
    aside: CacheAside<C>,
    policy: CachePolicy,
}

impl<R, C> CachedCourseRepository<R, C>
where
    R: CourseRepository,
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
impl<R, C> CourseRepository for CachedCourseRepository<R, C>
where
    R: CourseRepository + 'static,
    C: KeyValueStore + 'static,
{
    async fn list_courses(&self) -> Result<Vec<Course>> {
        let load = async { self.repository.list_courses().await.map(Some) };
        let courses = self
            .aside
            .read(&all_courses_key(), self.policy.list(), load)
            .await?;
        Ok(courses.unwrap_or_default())
    }

    async fn get_course(&self, id: i64) -> Result<Option<Course>> {
        self.aside
            .read(
                &course_key(id),
                self.policy.entity_with_negative(),
                self.repository.get_course(id),
            )
            .await
    }

    async fn create_course(&self, course: &NewCourse) -> Result<Course> {
        let created = self
            .aside
            .write(None, self.repository.create_course(course), |c: &Course| {
                vec![all_courses_key(), course_key(c.id)]
            })
            .await?;

        tracing::debug!(course_id = created.id, name = %created.name, "Created course");
        self.aside
            .write_through(&[course_key(created.id)], &created, self.policy.entity_ttl)
            .await;
        Ok(created)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use tokio::sync::RwLock;

    use super::*;
    use crate::storage::cached::test_support::FlakyCache;
    use campus_core::storage::RepositoryError;

    /// Mock repository that counts system-of-record calls.
    #[derive(Default)]
    struct MockCourseRepository {
        courses: RwLock<Vec<Course>>,
        get_calls: AtomicUsize,
        list_calls: AtomicUsize,
    }

    impl MockCourseRepository {
        async fn set_enrolled(&self, id: i64, enrolled: i64) {
            let mut courses = self.courses.write().await;
            if let Some(course) = courses.iter_mut().find(|c| c.id == id) {
                course.enrolled = enrolled;
            }
        }
    }

    #[async_trait]
    impl CourseRepository for MockCourseRepository {
        async fn list_courses(&self) -> Result<Vec<Course>> {
            self.list_calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.courses.read().await.clone())
        }

        async fn get_course(&self, id: i64) -> Result<Option<Course>> {
            self.get_calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.courses.read().await.iter().find(|c| c.id == id).cloned())
        }

        async fn create_course(&self, course: &NewCourse) -> Result<Course> {
            let mut courses = self.courses.write().await;
            let created = Course::new(course.name.clone(), course.capacity)
                .with_id(courses.len() as i64 + 1);
            courses.push(created.clone());
            Ok(created)
        }
    }

    fn new_course(name: &str) -> NewCourse {
        NewCourse {
            name: name.to_string(),
            capacity: 2,
        }
    }

    fn setup() -> (
        Arc<MockCourseRepository>,
        Arc<FlakyCache>,
        CachedCourseRepository<MockCourseRepository, FlakyCache>,
    ) {
        let repo = Arc::new(MockCourseRepository::default());
        let cache = Arc::new(FlakyCache::new());
        let cached =
            CachedCourseRepository::new(repo.clone(), cache.clone(), CachePolicy::default());
        (repo, cache, cached)
    }

    #[tokio::test]
    async fn test_get_course_read_through() {
        let (repo, cache, cached) = setup();
        let course = repo.create_course(&new_course("Compilers")).await.unwrap();

        assert_eq!(cached.get_course(course.id).await.unwrap(), Some(course.clone()));
        assert_eq!(cached.get_course(course.id).await.unwrap(), Some(course));
        assert_eq!(repo.get_calls.load(Ordering::SeqCst), 1);

        let ttl = cache.last_ttl().unwrap();
        let base = CachePolicy::default().entity_ttl.as_secs_f64();
        assert!(ttl.as_secs_f64() >= base * 0.9 && ttl.as_secs_f64() < base * 1.1);
    }

    #[tokio::test]
    async fn test_missing_course_is_negatively_cached() {
        let (repo, _cache, cached) = setup();

        assert_eq!(cached.get_course(42).await.unwrap(), None);
        assert_eq!(cached.get_course(42).await.unwrap(), None);

        assert_eq!(repo.get_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_create_invalidates_list_and_clears_negative_marker() {
        let (repo, _cache, cached) = setup();

        assert!(cached.list_courses().await.unwrap().is_empty());
        assert_eq!(cached.get_course(1).await.unwrap(), None);

        let created = cached.create_course(&new_course("Networks")).await.unwrap();

        assert_eq!(cached.list_courses().await.unwrap(), vec![created.clone()]);
        assert_eq!(cached.get_course(1).await.unwrap(), Some(created));
        assert_eq!(repo.list_calls.load(Ordering::SeqCst), 2);
        // Served by write-through.
        assert_eq!(repo.get_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_list_is_cached() {
        let (repo, _cache, cached) = setup();
        repo.create_course(&new_course("Databases")).await.unwrap();

        cached.list_courses().await.unwrap();
        cached.list_courses().await.unwrap();

        assert_eq!(repo.list_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_stale_read_only_when_invalidation_fails() {
        let (repo, cache, cached) = setup();
        let course = cached.create_course(&new_course("Security")).await.unwrap();

        // Another writer updates the row and fails to invalidate.
        repo.set_enrolled(course.id, 1).await;
        cache.fail_delete.store(true, Ordering::SeqCst);
        let err = cached
            .aside
            .write(None, async { Ok(()) }, |_| vec![course_key(course.id)])
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::CacheInvalidationFailed { .. }));

        let stale = cached.get_course(course.id).await.unwrap().unwrap();
        assert_eq!(stale.enrolled, 0);
    }

    #[tokio::test]
    async fn test_cache_down_serves_from_storage() {
        let (repo, cache, cached) = setup();
        let course = repo.create_course(&new_course("Graphics")).await.unwrap();
        cache.fail_get.store(true, Ordering::SeqCst);

        assert_eq!(cached.get_course(course.id).await.unwrap(), Some(course.clone()));
        assert_eq!(cached.get_course(course.id).await.unwrap(), Some(course));
        assert_eq!(repo.get_calls.load(Ordering::SeqCst), 2);
    }
}
