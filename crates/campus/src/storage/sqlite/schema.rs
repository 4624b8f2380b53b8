//! SQLite schema definitions and SQL query constants.
//!
//! This module contains all SQL statements used by the SQLite repository,
//! following the Functional Core pattern - pure data, no I/O.

/// SQL statement to create all tables.
///
/// Ids are `AUTOINCREMENT` so a deleted row's id is never handed out again;
/// cache keys built from ids stay unambiguous across deletes.
pub const CREATE_TABLES: &str = r#"
PRAGMA foreign_keys = ON;

-- Users table
CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    username TEXT NOT NULL UNIQUE,
    email TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,
    role TEXT NOT NULL
);

-- Courses table
CREATE TABLE IF NOT EXISTS courses (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    capacity INTEGER NOT NULL CHECK (capacity > 0),
    enrolled INTEGER NOT NULL DEFAULT 0 CHECK (enrolled >= 0 AND enrolled <= capacity)
);

-- Enrollments table
CREATE TABLE IF NOT EXISTS enrollments (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    student_id INTEGER NOT NULL,
    course_id INTEGER NOT NULL,
    UNIQUE (student_id, course_id),
    FOREIGN KEY (student_id) REFERENCES users(id) ON DELETE CASCADE,
    FOREIGN KEY (course_id) REFERENCES courses(id) ON DELETE CASCADE
);

-- To-do tasks table
CREATE TABLE IF NOT EXISTS todos (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id INTEGER NOT NULL,
    title TEXT NOT NULL,
    description TEXT NOT NULL DEFAULT '',
    completed INTEGER NOT NULL DEFAULT 0,
    FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE CASCADE
);

-- Indexes for efficient queries
CREATE INDEX IF NOT EXISTS idx_enrollments_student_id ON enrollments(student_id);
CREATE INDEX IF NOT EXISTS idx_todos_user_id ON todos(user_id);
"#;

// ============================================================================
// User queries
// ============================================================================

pub const SELECT_USER_BY_ID: &str = r#"
SELECT id, username, email, password_hash, role
FROM users
WHERE id = ?1
"#;

pub const SELECT_USER_BY_USERNAME: &str = r#"
SELECT id, username, email, password_hash, role
FROM users
WHERE username = ?1
"#;

pub const SELECT_USER_BY_EMAIL: &str = r#"
SELECT id, username, email, password_hash, role
FROM users
WHERE email = ?1
"#;

pub const COUNT_USERS_BY_USERNAME: &str = "SELECT COUNT(*) FROM users WHERE username = ?1";

pub const COUNT_USERS_BY_EMAIL: &str = "SELECT COUNT(*) FROM users WHERE email = ?1";

pub const COUNT_USERS_BY_ID: &str = "SELECT COUNT(*) FROM users WHERE id = ?1";

pub const INSERT_USER: &str = r#"
INSERT INTO users (username, email, password_hash, role)
VALUES (?1, ?2, ?3, ?4)
"#;

// ============================================================================
// Course queries
// ============================================================================

pub const SELECT_ALL_COURSES: &str = r#"
SELECT id, name, capacity, enrolled
FROM courses
ORDER BY id
"#;

pub const SELECT_COURSE_BY_ID: &str = r#"
SELECT id, name, capacity, enrolled
FROM courses
WHERE id = ?1
"#;

pub const INSERT_COURSE: &str = r#"
INSERT INTO courses (name, capacity, enrolled)
VALUES (?1, ?2, 0)
"#;

/// Takes one seat. Affects no row when the course is full.
pub const INCREMENT_ENROLLED: &str = r#"
UPDATE courses
SET enrolled = enrolled + 1
WHERE id = ?1 AND enrolled < capacity
"#;

pub const DECREMENT_ENROLLED: &str = r#"
UPDATE courses
SET enrolled = enrolled - 1
WHERE id = ?1 AND enrolled > 0
"#;

// ============================================================================
// Enrollment queries
// ============================================================================

pub const COUNT_ENROLLMENT: &str = r#"
SELECT COUNT(*) FROM enrollments
WHERE student_id = ?1 AND course_id = ?2
"#;

pub const INSERT_ENROLLMENT: &str = r#"
INSERT INTO enrollments (student_id, course_id)
VALUES (?1, ?2)
"#;

pub const DELETE_ENROLLMENT: &str = r#"
DELETE FROM enrollments
WHERE student_id = ?1 AND course_id = ?2
"#;

pub const SELECT_ENROLLMENTS_BY_STUDENT: &str = r#"
SELECT id, student_id, course_id
FROM enrollments
WHERE student_id = ?1
ORDER BY id
"#;

// ============================================================================
// To-do queries
// ============================================================================

pub const SELECT_TODOS_BY_USER: &str = r#"
SELECT id, user_id, title, description, completed
FROM todos
WHERE user_id = ?1
ORDER BY id
"#;

pub const INSERT_TODO: &str = r#"
INSERT INTO todos (user_id, title, description, completed)
VALUES (?1, ?2, ?3, 0)
"#;

/// Scoped to the owner so one user can never touch another's task.
pub const FINISH_TODO: &str = r#"
UPDATE todos
SET completed = 1
WHERE id = ?1 AND user_id = ?2
"#;

pub const DELETE_TODO: &str = r#"
DELETE FROM todos
WHERE id = ?1 AND user_id = ?2
"#;
