//! API request types and storage inputs for school operations.
//!
//! Following the Functional Core pattern, these are pure data types with no I/O.

use serde::{Deserialize, Serialize};

use super::types::Role;

/// A user to insert. The password is already hashed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
}

/// A course to insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCourse {
    pub name: String,
    pub capacity: i64,
}

/// A to-do task to insert for `user_id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTodo {
    pub user_id: i64,
    pub title: String,
    pub description: String,
}

/// Request payload for registering a user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub role: Role,
}

impl RegisterRequest {
    /// Converts into a storage input, attaching the computed password hash.
    pub fn into_new_user(self, password_hash: String) -> NewUser {
        NewUser {
            username: self.username.trim().to_string(),
            email: self.email.trim().to_lowercase(),
            password_hash,
            role: self.role,
        }
    }
}

/// Request payload for logging in with a username or an email.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    #[serde(alias = "loginKey")]
    pub login_key: String,
    pub password: String,
}

/// Request payload for exchanging a refresh token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Request payload for creating a course.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddCourseRequest {
    pub name: String,
    #[serde(alias = "capital")]
    pub capacity: i64,
}

impl AddCourseRequest {
    pub fn into_new_course(self) -> NewCourse {
        NewCourse {
            name: self.name.trim().to_string(),
            capacity: self.capacity,
        }
    }
}

/// Request payload for picking or dropping a course.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct EnrollmentRequest {
    pub course_id: i64,
}

/// Request payload for creating a to-do task.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTodoRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
}

impl CreateTodoRequest {
    /// Converts into a storage input owned by `user_id`.
    pub fn into_new_todo(self, user_id: i64) -> NewTodo {
        NewTodo {
            user_id,
            title: self.title.trim().to_string(),
            description: self.description,
        }
    }
}

/// Request payload addressing one to-do task.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TodoIdRequest {
    #[serde(alias = "task_id")]
    pub todo_id: i64,
}
