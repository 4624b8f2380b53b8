//! Cached enrollment repository decorator.
//!
//! Picks and drops take a write lock scoped to the (student, course) pair
//! before touching the system of record. The lock only sheds duplicate
//! submissions; seat accounting is enforced by the transaction itself, so
//! picks by different students for the last seat still race safely.

use std::sync::Arc;

use async_trait::async_trait;

use campus_core::cache::{
    drop_lock_key, enrollment_change_keys, pick_lock_key, student_enrollments_key, KeyValueStore,
};
use campus_core::school::Enrollment;
use campus_core::storage::{EnrollmentRepository, Result};

use super::{CacheAside, CachePolicy};

/// Cached enrollment repository decorator.
pub struct CachedEnrollmentRepository<R, C>
where
    R: EnrollmentRepository,
    C: KeyValueStore,
{
    repository: Arc<R>,
    aside: CacheAside<C>,
    policy: CachePolicy,
}

impl<R, C> CachedEnrollmentRepository<R, C>
where
    R: EnrollmentRepository,
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
impl<R, C> EnrollmentRepository for CachedEnrollmentRepository<R, C>
where
    R: EnrollmentRepository + 'static,
    C: KeyValueStore + 'static,
{
    async fn pick_course(&self, student_id: i64, course_id: i64) -> Result<Enrollment> {
        let lock = pick_lock_key(student_id, course_id);
        let enrollment = self
            .aside
            .write(
                Some(lock.as_str()),
                self.repository.pick_course(student_id, course_id),
                |_| enrollment_change_keys(student_id, course_id),
            )
            .await?;

        tracing::debug!(student_id, course_id, "Picked course");
        Ok(enrollment)
    }

    async fn drop_course(&self, student_id: i64, course_id: i64) -> Result<()> {
        let lock = drop_lock_key(student_id, course_id);
        self.aside
            .write(
                Some(lock.as_str()),
                self.repository.drop_course(student_id, course_id),
                |_| enrollment_change_keys(student_id, course_id),
            )
            .await?;

        tracing::debug!(student_id, course_id, "Dropped course");
        Ok(())
    }

    async fn list_enrollments(&self, student_id: i64) -> Result<Vec<Enrollment>> {
        let load = async { self.repository.list_enrollments(student_id).await.map(Some) };
        let enrollments = self
            .aside
            .read(&student_enrollments_key(student_id), self.policy.list(), load)
            .await?;
        Ok(enrollments.unwrap_or_default())
    }
}
