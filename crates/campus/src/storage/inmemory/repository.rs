//! In-memory repository implementation.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use campus_core::school::{
    Course, Enrollment, NewCourse, NewTodo, NewUser, TodoBoard, TodoTask, User,
};
use campus_core::storage::{
    CourseRepository, EnrollmentRepository, RepositoryError, Result, TodoRepository,
    UserRepository,
};

/// All tables behind one lock, so multi-table checks and writes are atomic.
#[derive(Debug, Default)]
struct Tables {
    users: BTreeMap<i64, User>,
    courses: BTreeMap<i64, Course>,
    enrollments: BTreeMap<i64, Enrollment>,
    todos: BTreeMap<i64, TodoTask>,
    last_user_id: i64,
    last_course_id: i64,
    last_enrollment_id: i64,
    last_todo_id: i64,
}

fn next_id(last: &mut i64) -> i64 {
    *last += 1;
    *last
}

/// In-memory storage backend for testing.
///
/// Ids are assigned per table from monotonically increasing counters and
/// never reused. Data is not persisted and will be lost when the
/// repository is dropped.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRepository {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryRepository {
    /// Creates a new empty in-memory repository.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryRepository {
    async fn get_user(&self, id: i64) -> Result<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables.users.get(&id).cloned())
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .values()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables.users.values().find(|u| u.email == email).cloned())
    }

    async fn create_user(&self, user: &NewUser) -> Result<User> {
        let mut tables = self.tables.write().await;
        if tables.users.values().any(|u| u.username == user.username) {
            return Err(RepositoryError::UsernameTaken(user.username.clone()));
        }
        if tables.users.values().any(|u| u.email == user.email) {
            return Err(RepositoryError::EmailTaken(user.email.clone()));
        }

        let created = User {
            id: next_id(&mut tables.last_user_id),
            username: user.username.clone(),
            email: user.email.clone(),
            password_hash: user.password_hash.clone(),
            role: user.role,
        };
        tables.users.insert(created.id, created.clone());
        Ok(created)
    }
}

#[async_trait]
impl CourseRepository for InMemoryRepository {
    async fn list_courses(&self) -> Result<Vec<Course>> {
        let tables = self.tables.read().await;
        Ok(tables.courses.values().cloned().collect())
    }

    async fn get_course(&self, id: i64) -> Result<Option<Course>> {
        let tables = self.tables.read().await;
        Ok(tables.courses.get(&id).cloned())
    }

    async fn create_course(&self, course: &NewCourse) -> Result<Course> {
        let mut tables = self.tables.write().await;
        let id = next_id(&mut tables.last_course_id);
        let created = Course::new(course.name.clone(), course.capacity).with_id(id);
        tables.courses.insert(id, created.clone());
        Ok(created)
    }
}

#[async_trait]
impl EnrollmentRepository for InMemoryRepository {
    async fn pick_course(&self, student_id: i64, course_id: i64) -> Result<Enrollment> {
        let mut tables = self.tables.write().await;

        if !tables.users.contains_key(&student_id) {
            return Err(RepositoryError::not_found("User", student_id));
        }
        let course = tables
            .courses
            .get(&course_id)
            .ok_or_else(|| RepositoryError::not_found("Course", course_id))?;
        if tables
            .enrollments
            .values()
            .any(|e| e.student_id == student_id && e.course_id == course_id)
        {
            return Err(RepositoryError::AlreadyEnrolled {
                student_id,
                course_id,
            });
        }
        if course.is_full() {
            return Err(RepositoryError::CapacityExceeded { course_id });
        }

        let enrollment = Enrollment {
            id: next_id(&mut tables.last_enrollment_id),
            student_id,
            course_id,
        };
        tables.enrollments.insert(enrollment.id, enrollment.clone());
        if let Some(course) = tables.courses.get_mut(&course_id) {
            course.enrolled += 1;
        }
        Ok(enrollment)
    }

    async fn drop_course(&self, student_id: i64, course_id: i64) -> Result<()> {
        let mut tables = self.tables.write().await;

        let id = tables
            .enrollments
            .values()
            .find(|e| e.student_id == student_id && e.course_id == course_id)
            .map(|e| e.id)
            .ok_or_else(|| {
                RepositoryError::not_found("Enrollment", format!("{student_id}:{course_id}"))
            })?;

        tables.enrollments.remove(&id);
        if let Some(course) = tables.courses.get_mut(&course_id) {
            course.enrolled = (course.enrolled - 1).max(0);
        }
        Ok(())
    }

    async fn list_enrollments(&self, student_id: i64) -> Result<Vec<Enrollment>> {
        let tables = self.tables.read().await;
        Ok(tables
            .enrollments
            .values()
            .filter(|e| e.student_id == student_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl TodoRepository for InMemoryRepository {
    async fn get_board(&self, user_id: i64) -> Result<TodoBoard> {
        let tables = self.tables.read().await;
        Ok(TodoBoard::from_tasks(
            tables
                .todos
                .values()
                .filter(|t| t.user_id == user_id)
                .cloned(),
        ))
    }

    async fn create_todo(&self, todo: &NewTodo) -> Result<TodoTask> {
        let mut tables = self.tables.write().await;
        if !tables.users.contains_key(&todo.user_id) {
            return Err(RepositoryError::InvalidData(format!(
                "Unknown owner for TodoTask: {}",
                todo.user_id
            )));
        }

        let task = TodoTask {
            id: next_id(&mut tables.last_todo_id),
            user_id: todo.user_id,
            title: todo.title.clone(),
            description: todo.description.clone(),
            completed: false,
        };
        tables.todos.insert(task.id, task.clone());
        Ok(task)
    }

    async fn finish_todo(&self, user_id: i64, task_id: i64) -> Result<()> {
        let mut tables = self.tables.write().await;
        match tables.todos.get_mut(&task_id) {
            Some(task) if task.user_id == user_id => {
                task.completed = true;
                Ok(())
            }
            _ => Err(RepositoryError::not_found("TodoTask", task_id)),
        }
    }

    async fn delete_todo(&self, user_id: i64, task_id: i64) -> Result<()> {
        let mut tables = self.tables.write().await;
        match tables.todos.get(&task_id) {
            Some(task) if task.user_id == user_id => {
                tables.todos.remove(&task_id);
                Ok(())
            }
            _ => Err(RepositoryError::not_found("TodoTask", task_id)),
        }
    }
}
