use serde::{Deserialize, Serialize};

/// Authorization role of a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    #[default]
    Student,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Student => "student",
        }
    }

    /// Parses a stored role name. Unknown names are rejected.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "admin" => Some(Role::Admin),
            "student" => Some(Role::Student),
            _ => None,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A registered user as stored in the system of record.
///
/// Carries the password hash, so it is only ever serialized into the
/// internal cache. API responses use [`UserProfile`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
}

impl User {
    /// Returns the public view of this user.
    pub fn profile(&self) -> UserProfile {
        UserProfile {
            id: self.id,
            username: self.username.clone(),
            email: self.email.clone(),
            role: self.role,
        }
    }
}

/// Public view of a user, without credentials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub role: Role,
}

/// A course students can enroll in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    pub id: i64,
    pub name: String,
    /// Maximum number of enrolled students.
    pub capacity: i64,
    /// Number of students currently enrolled.
    pub enrolled: i64,
}

impl Course {
    /// Creates an unsaved course with no enrollments. The id is assigned by storage.
    pub fn new(name: impl Into<String>, capacity: i64) -> Self {
        Self {
            id: 0,
            name: name.into(),
            capacity,
            enrolled: 0,
        }
    }

    /// Sets a specific ID for this course (useful for testing).
    pub fn with_id(mut self, id: i64) -> Self {
        self.id = id;
        self
    }

    /// Sets the enrolled count (useful for testing).
    pub fn with_enrolled(mut self, enrolled: i64) -> Self {
        self.enrolled = enrolled;
        self
    }

    /// Returns the number of seats still open.
    pub fn seats_remaining(&self) -> i64 {
        (self.capacity - self.enrolled).max(0)
    }

    /// Returns true if no seats remain.
    pub fn is_full(&self) -> bool {
        self.enrolled >= self.capacity
    }
}

/// A student's enrollment in a course.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enrollment {
    pub id: i64,
    pub student_id: i64,
    pub course_id: i64,
}

/// A to-do item owned by a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoTask {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub description: String,
    pub completed: bool,
}

/// A user's to-do items split by completion.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoBoard {
    pub pending: Vec<TodoTask>,
    pub done: Vec<TodoTask>,
}

impl TodoBoard {
    /// Builds a board from tasks, preserving their relative order.
    pub fn from_tasks(tasks: impl IntoIterator<Item = TodoTask>) -> Self {
        let (done, pending) = tasks.into_iter().partition(|t| t.completed);
        Self { pending, done }
    }

    pub fn len(&self) -> usize {
        self.pending.len() + self.done.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty() && self.done.is_empty()
    }
}
