use async_trait::async_trait;

use crate::school::{Course, Enrollment, NewCourse, NewTodo, NewUser, TodoBoard, TodoTask, User};

use super::Result;

/// Repository for user operations.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Gets a user by their ID.
    async fn get_user(&self, id: i64) -> Result<Option<User>>;

    /// Gets a user by their username.
    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>>;

    /// Gets a user by their email address.
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>>;

    /// Creates a new user, rejecting a taken username or email.
    async fn create_user(&self, user: &NewUser) -> Result<User>;
}

/// Repository for course operations.
#[async_trait]
pub trait CourseRepository: Send + Sync {
    /// Lists every course.
    async fn list_courses(&self) -> Result<Vec<Course>>;

    /// Gets a course by its ID.
    async fn get_course(&self, id: i64) -> Result<Option<Course>>;

    /// Creates a new course with no enrollments.
    async fn create_course(&self, course: &NewCourse) -> Result<Course>;
}

/// Repository for enrollment operations.
///
/// Picking and dropping run their checks and updates in a single
/// transaction, so the enrolled count never drifts from the enrollments.
#[async_trait]
pub trait EnrollmentRepository: Send + Sync {
    /// Enrolls a student in a course and increments its enrolled count.
    ///
    /// Fails with `NotFound` for an unknown student or course,
    /// `CapacityExceeded` when the course is full and `AlreadyEnrolled`
    /// on a duplicate.
    async fn pick_course(&self, student_id: i64, course_id: i64) -> Result<Enrollment>;

    /// Removes a student's enrollment and decrements the enrolled count.
    async fn drop_course(&self, student_id: i64, course_id: i64) -> Result<()>;

    /// Lists a student's enrollments.
    async fn list_enrollments(&self, student_id: i64) -> Result<Vec<Enrollment>>;
}

/// Repository for to-do operations.
#[async_trait]
pub trait TodoRepository: Send + Sync {
    /// Gets a user's tasks split into pending and done.
    async fn get_board(&self, user_id: i64) -> Result<TodoBoard>;

    /// Creates a pending task.
    async fn create_todo(&self, todo: &NewTodo) -> Result<TodoTask>;

    /// Marks one of the user's tasks as done.
    async fn finish_todo(&self, user_id: i64, task_id: i64) -> Result<()>;

    /// Deletes one of the user's tasks.
    async fn delete_todo(&self, user_id: i64, task_id: i64) -> Result<()>;
}
