//! SQLite repository implementation.
//!
//! Implements the repository traits from `campus_core::storage` using SQLite.
//! Every operation that checks an invariant before writing runs in an
//! `IMMEDIATE` transaction, so the check and the write see the same rows.
//! Domain rejections are returned as `Ok(Err(..))` from the connection
//! closure; dropping the uncommitted transaction rolls it back.

use async_trait::async_trait;
use rusqlite::{OptionalExtension, TransactionBehavior};
use tokio_rusqlite::Connection;

use campus_core::school::{
    Course, Enrollment, NewCourse, NewTodo, NewUser, TodoBoard, TodoTask, User,
};
use campus_core::storage::{
    CourseRepository, EnrollmentRepository, RepositoryError, Result, TodoRepository,
    UserRepository,
};

use super::conversions::{row_to_course, row_to_enrollment, row_to_todo, row_to_user};
use super::error::map_tokio_rusqlite_error;
use super::schema;

/// Helper to wrap rusqlite errors for tokio_rusqlite closures.
fn wrap_err(e: rusqlite::Error) -> tokio_rusqlite::Error {
    tokio_rusqlite::Error::Rusqlite(e)
}

/// SQLite-based repository implementation.
///
/// Provides async access to SQLite storage for all entity types.
pub struct SqliteRepository {
    conn: Connection,
}

impl SqliteRepository {
    /// Creates a new repository with a file-based database.
    ///
    /// The database file will be created if it doesn't exist.
    /// Schema tables are created automatically.
    pub async fn new(path: &str) -> Result<Self> {
        let conn = Connection::open(path)
            .await
            .map_err(|e| RepositoryError::ConnectionFailed(e.to_string()))?;

        Self::init_schema(&conn).await?;
        tracing::info!(path = %path, "Opened SQLite database");

        Ok(Self { conn })
    }

    /// Creates a new repository with an in-memory database.
    ///
    /// Useful for testing - data is lost when the connection is dropped.
    pub async fn new_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .await
            .map_err(|e| RepositoryError::ConnectionFailed(e.to_string()))?;

        Self::init_schema(&conn).await?;

        Ok(Self { conn })
    }

    /// Initialize the database schema.
    async fn init_schema(conn: &Connection) -> Result<()> {
        conn.call(|conn| {
            conn.execute_batch(schema::CREATE_TABLES)
                .map_err(wrap_err)?;
            Ok(())
        })
        .await
        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))
    }

    async fn get_user_where(
        &self,
        query: &'static str,
        value: String,
        id: String,
    ) -> Result<Option<User>> {
        self.conn
            .call(move |conn| {
                let mut stmt = conn.prepare(query).map_err(wrap_err)?;
                match stmt.query_row([&value], row_to_user) {
                    Ok(user) => Ok(Some(user)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(wrap_err(e)),
                }
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "User", id))
    }
}

// ============================================================================
// UserRepository implementation
// ============================================================================

#[async_trait]
impl UserRepository for SqliteRepository {
    async fn get_user(&self, id: i64) -> Result<Option<User>> {
        self.get_user_where(schema::SELECT_USER_BY_ID, id.to_string(), id.to_string())
            .await
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        self.get_user_where(
            schema::SELECT_USER_BY_USERNAME,
            username.to_string(),
            username.to_string(),
        )
        .await
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        self.get_user_where(
            schema::SELECT_USER_BY_EMAIL,
            email.to_string(),
            email.to_string(),
        )
        .await
    }

    async fn create_user(&self, user: &NewUser) -> Result<User> {
        let user = user.clone();
        let username = user.username.clone();

        self.conn
            .call(move |conn| {
                let tx = conn
                    .transaction_with_behavior(TransactionBehavior::Immediate)
                    .map_err(wrap_err)?;

                let taken: i64 = tx
                    .query_row(schema::COUNT_USERS_BY_USERNAME, [&user.username], |row| {
                        row.get(0)
                    })
                    .map_err(wrap_err)?;
                if taken > 0 {
                    return Ok(Err(RepositoryError::UsernameTaken(user.username)));
                }

                let taken: i64 = tx
                    .query_row(schema::COUNT_USERS_BY_EMAIL, [&user.email], |row| row.get(0))
                    .map_err(wrap_err)?;
                if taken > 0 {
                    return Ok(Err(RepositoryError::EmailTaken(user.email)));
                }

                tx.execute(
                    schema::INSERT_USER,
                    rusqlite::params![
                        user.username,
                        user.email,
                        user.password_hash,
                        user.role.as_str()
                    ],
                )
                .map_err(wrap_err)?;
                let id = tx.last_insert_rowid();
                tx.commit().map_err(wrap_err)?;

                Ok(Ok(User {
                    id,
                    username: user.username,
                    email: user.email,
                    password_hash: user.password_hash,
                    role: user.role,
                }))
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "User", username))?
    }
}

// ============================================================================
// CourseRepository implementation
// ============================================================================

#[async_trait]
impl CourseRepository for SqliteRepository {
    async fn list_courses(&self) -> Result<Vec<Course>> {
        self.conn
            .call(|conn| {
                let mut stmt = conn.prepare(schema::SELECT_ALL_COURSES).map_err(wrap_err)?;
                let rows = stmt.query_map([], row_to_course).map_err(wrap_err)?;

                let mut courses = Vec::new();
                for row_result in rows {
                    courses.push(row_result.map_err(wrap_err)?);
                }
                Ok(courses)
            })
            .await
            .map_err(|e| RepositoryError::QueryFailed(e.to_string()))
    }

    async fn get_course(&self, id: i64) -> Result<Option<Course>> {
        self.conn
            .call(move |conn| {
                let mut stmt = conn.prepare(schema::SELECT_COURSE_BY_ID).map_err(wrap_err)?;
                match stmt.query_row([id], row_to_course) {
                    Ok(course) => Ok(Some(course)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(wrap_err(e)),
                }
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Course", id))
    }

    async fn create_course(&self, course: &NewCourse) -> Result<Course> {
        let name = course.name.clone();
        let capacity = course.capacity;

        self.conn
            .call(move |conn| {
                conn.execute(schema::INSERT_COURSE, rusqlite::params![name, capacity])
                    .map_err(wrap_err)?;
                let id = conn.last_insert_rowid();
                Ok(Course::new(name, capacity).with_id(id))
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Course", course.name.as_str()))
    }
}

// ============================================================================
// EnrollmentRepository implementation
// ============================================================================

#[async_trait]
impl EnrollmentRepository for SqliteRepository {
    async fn pick_course(&self, student_id: i64, course_id: i64) -> Result<Enrollment> {
        self.conn
            .call(move |conn| {
                let tx = conn
                    .transaction_with_behavior(TransactionBehavior::Immediate)
                    .map_err(wrap_err)?;

                let students: i64 = tx
                    .query_row(schema::COUNT_USERS_BY_ID, [student_id], |row| row.get(0))
                    .map_err(wrap_err)?;
                if students == 0 {
                    return Ok(Err(RepositoryError::not_found("User", student_id)));
                }

                let Some(course) = tx
                    .query_row(schema::SELECT_COURSE_BY_ID, [course_id], row_to_course)
                    .optional()
                    .map_err(wrap_err)?
                else {
                    return Ok(Err(RepositoryError::not_found("Course", course_id)));
                };

                let existing: i64 = tx
                    .query_row(schema::COUNT_ENROLLMENT, [student_id, course_id], |row| {
                        row.get(0)
                    })
                    .map_err(wrap_err)?;
                if existing > 0 {
                    return Ok(Err(RepositoryError::AlreadyEnrolled {
                        student_id,
                        course_id,
                    }));
                }

                if course.is_full() {
                    return Ok(Err(RepositoryError::CapacityExceeded { course_id }));
                }

                tx.execute(schema::INSERT_ENROLLMENT, [student_id, course_id])
                    .map_err(wrap_err)?;
                let id = tx.last_insert_rowid();

                // Conditional increment; a zero row count means another
                // writer took the last seat first.
                if tx
                    .execute(schema::INCREMENT_ENROLLED, [course_id])
                    .map_err(wrap_err)?
                    == 0
                {
                    return Ok(Err(RepositoryError::CapacityExceeded { course_id }));
                }

                tx.commit().map_err(wrap_err)?;
                Ok(Ok(Enrollment {
                    id,
                    student_id,
                    course_id,
                }))
            })
            .await
            .map_err(|e| {
                map_tokio_rusqlite_error(e, "Enrollment", format!("{student_id}:{course_id}"))
            })?
    }

    async fn drop_course(&self, student_id: i64, course_id: i64) -> Result<()> {
        let enrollment_id = format!("{student_id}:{course_id}");

        self.conn
            .call(move |conn| {
                let tx = conn
                    .transaction_with_behavior(TransactionBehavior::Immediate)
                    .map_err(wrap_err)?;

                let removed = tx
                    .execute(schema::DELETE_ENROLLMENT, [student_id, course_id])
                    .map_err(wrap_err)?;
                if removed == 0 {
                    return Ok(Err(RepositoryError::not_found(
                        "Enrollment",
                        format!("{student_id}:{course_id}"),
                    )));
                }

                tx.execute(schema::DECREMENT_ENROLLED, [course_id])
                    .map_err(wrap_err)?;
                tx.commit().map_err(wrap_err)?;
                Ok(Ok(()))
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Enrollment", enrollment_id))?
    }

    async fn list_enrollments(&self, student_id: i64) -> Result<Vec<Enrollment>> {
        self.conn
            .call(move |conn| {
                let mut stmt = conn
                    .prepare(schema::SELECT_ENROLLMENTS_BY_STUDENT)
                    .map_err(wrap_err)?;
                let rows = stmt
                    .query_map([student_id], row_to_enrollment)
                    .map_err(wrap_err)?;

                let mut enrollments = Vec::new();
                for row_result in rows {
                    enrollments.push(row_result.map_err(wrap_err)?);
                }
                Ok(enrollments)
            })
            .await
            .map_err(|e| RepositoryError::QueryFailed(e.to_string()))
    }
}

// ============================================================================
// TodoRepository implementation
// ============================================================================

#[async_trait]
impl TodoRepository for SqliteRepository {
    async fn get_board(&self, user_id: i64) -> Result<TodoBoard> {
        self.conn
            .call(move |conn| {
                let mut stmt = conn.prepare(schema::SELECT_TODOS_BY_USER).map_err(wrap_err)?;
                let rows = stmt.query_map([user_id], row_to_todo).map_err(wrap_err)?;

                let mut tasks = Vec::new();
                for row_result in rows {
                    tasks.push(row_result.map_err(wrap_err)?);
                }
                Ok(TodoBoard::from_tasks(tasks))
            })
            .await
            .map_err(|e| RepositoryError::QueryFailed(e.to_string()))
    }

    async fn create_todo(&self, todo: &NewTodo) -> Result<TodoTask> {
        let todo = todo.clone();
        let user_id = todo.user_id;

        self.conn
            .call(move |conn| {
                conn.execute(
                    schema::INSERT_TODO,
                    rusqlite::params![todo.user_id, todo.title, todo.description],
                )
                .map_err(wrap_err)?;

                Ok(TodoTask {
                    id: conn.last_insert_rowid(),
                    user_id: todo.user_id,
                    title: todo.title,
                    description: todo.description,
                    completed: false,
                })
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "TodoTask", user_id))
    }

    async fn finish_todo(&self, user_id: i64, task_id: i64) -> Result<()> {
        self.conn
            .call(move |conn| {
                let rows = conn
                    .execute(schema::FINISH_TODO, [task_id, user_id])
                    .map_err(wrap_err)?;
                if rows == 0 {
                    Err(wrap_err(rusqlite::Error::QueryReturnedNoRows))
                } else {
                    Ok(())
                }
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "TodoTask", task_id))
    }

    async fn delete_todo(&self, user_id: i64, task_id: i64) -> Result<()> {
        self.conn
            .call(move |conn| {
                let rows = conn
                    .execute(schema::DELETE_TODO, [task_id, user_id])
                    .map_err(wrap_err)?;
                if rows == 0 {
                    Err(wrap_err(rusqlite::Error::QueryReturnedNoRows))
                } else {
                    Ok(())
                }
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "TodoTask", task_id))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use campus_core::school::Role;

    async fn repo() -> SqliteRepository {
        SqliteRepository::new_in_memory().await.unwrap()
    }

    fn new_user(username: &str) -> NewUser {
        NewUser {
            username: username.to_string(),
            email: format!("{username}@example.com"),
            password_hash: "$argon2id$stub".to_string(),
            role: Role::Student,
        }
    }

    fn new_course(capacity: i64) -> NewCourse {
        NewCourse {
            name: "Operating Systems".to_string(),
            capacity,
        }
    }

    #[tokio::test]
    async fn test_create_and_lookup_user() {
        let repo = repo().await;
        let user = repo.create_user(&new_user("ada")).await.unwrap();
        assert_eq!(user.id, 1);

        assert_eq!(repo.get_user(user.id).await.unwrap(), Some(user.clone()));
        assert_eq!(
            repo.get_user_by_username("ada").await.unwrap(),
            Some(user.clone())
        );
        assert_eq!(
            repo.get_user_by_email("ada@example.com").await.unwrap(),
            Some(user)
        );
        assert_eq!(repo.get_user(99).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_duplicate_username_and_email_rejected() {
        let repo = repo().await;
        repo.create_user(&new_user("ada")).await.unwrap();

        let err = repo.create_user(&new_user("ada")).await.unwrap_err();
        assert_eq!(err, RepositoryError::UsernameTaken("ada".to_string()));

        let mut other = new_user("lovelace");
        other.email = "ada@example.com".to_string();
        let err = repo.create_user(&other).await.unwrap_err();
        assert_eq!(err, RepositoryError::EmailTaken("ada@example.com".to_string()));
    }

    #[tokio::test]
    async fn test_ids_come_from_the_database() {
        let repo = repo().await;
        let a = repo.create_course(&new_course(3)).await.unwrap();
        let b = repo.create_course(&new_course(3)).await.unwrap();

        assert_eq!((a.id, b.id), (1, 2));
        assert_eq!(repo.list_courses().await.unwrap(), vec![a, b]);
    }

    #[tokio::test]
    async fn test_pick_and_drop_keep_count_in_step() {
        let repo = repo().await;
        let student = repo.create_user(&new_user("ben")).await.unwrap();
        let course = repo.create_course(&new_course(2)).await.unwrap();

        let enrollment = repo.pick_course(student.id, course.id).await.unwrap();
        assert_eq!(enrollment.course_id, course.id);
        assert_eq!(repo.get_course(course.id).await.unwrap().unwrap().enrolled, 1);
        assert_eq!(
            repo.list_enrollments(student.id).await.unwrap(),
            vec![enrollment]
        );

        let err = repo.pick_course(student.id, course.id).await.unwrap_err();
        assert!(matches!(err, RepositoryError::AlreadyEnrolled { .. }));
        assert_eq!(repo.get_course(course.id).await.unwrap().unwrap().enrolled, 1);

        repo.drop_course(student.id, course.id).await.unwrap();
        assert_eq!(repo.get_course(course.id).await.unwrap().unwrap().enrolled, 0);

        let err = repo.drop_course(student.id, course.id).await.unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound { entity_type: "Enrollment", .. }));
    }

    #[tokio::test]
    async fn test_pick_unknown_student_or_course() {
        let repo = repo().await;
        let student = repo.create_user(&new_user("cal")).await.unwrap();
        let course = repo.create_course(&new_course(1)).await.unwrap();

        let err = repo.pick_course(99, course.id).await.unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound { entity_type: "User", .. }));

        let err = repo.pick_course(student.id, 99).await.unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound { entity_type: "Course", .. }));
    }

    #[tokio::test]
    async fn test_concurrent_picks_for_last_seat() {
        let repo = Arc::new(repo().await);
        let a = repo.create_user(&new_user("dee")).await.unwrap();
        let b = repo.create_user(&new_user("eli")).await.unwrap();
        let course = repo.create_course(&new_course(1)).await.unwrap();

        let (ra, rb) = tokio::join!(
            repo.pick_course(a.id, course.id),
            repo.pick_course(b.id, course.id)
        );

        assert_eq!([&ra, &rb].iter().filter(|r| r.is_ok()).count(), 1);
        let failed = if ra.is_ok() { rb } else { ra };
        assert!(matches!(
            failed,
            Err(RepositoryError::CapacityExceeded { .. })
        ));
        assert_eq!(repo.get_course(course.id).await.unwrap().unwrap().enrolled, 1);
    }

    #[tokio::test]
    async fn test_todo_board_is_owner_scoped() {
        let repo = repo().await;
        let owner = repo.create_user(&new_user("fay")).await.unwrap();
        let other = repo.create_user(&new_user("gus")).await.unwrap();

        let task = repo
            .create_todo(&NewTodo {
                user_id: owner.id,
                title: "Problem set".to_string(),
                description: "Chapter 4".to_string(),
            })
            .await
            .unwrap();

        let err = repo.finish_todo(other.id, task.id).await.unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound { .. }));
        let err = repo.delete_todo(other.id, task.id).await.unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound { .. }));

        repo.finish_todo(owner.id, task.id).await.unwrap();
        let board = repo.get_board(owner.id).await.unwrap();
        assert!(board.pending.is_empty());
        assert_eq!(board.done[0].title, "Problem set");
        assert!(repo.get_board(other.id).await.unwrap().is_empty());

        repo.delete_todo(owner.id, task.id).await.unwrap();
        assert!(repo.get_board(owner.id).await.unwrap().is_empty());
    }
}
