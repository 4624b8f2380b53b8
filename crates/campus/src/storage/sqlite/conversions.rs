//! SQLite row conversion functions.
//!
//! Pure functions for converting between SQLite rows and domain types.
//! These are testable in isolation without database access.

use campus_core::school::{Course, Enrollment, Role, TodoTask, User};
use rusqlite::Row;

/// Convert a SQLite row to a User.
///
/// Expected columns: id, username, email, password_hash, role
pub fn row_to_user(row: &Row) -> rusqlite::Result<User> {
    let role: String = row.get(4)?;

    Ok(User {
        id: row.get(0)?,
        username: row.get(1)?,
        email: row.get(2)?,
        password_hash: row.get(3)?,
        role: parse_role(&role)?,
    })
}

/// Convert a SQLite row to a Course.
///
/// Expected columns: id, name, capacity, enrolled
pub fn row_to_course(row: &Row) -> rusqlite::Result<Course> {
    Ok(Course {
        id: row.get(0)?,
        name: row.get(1)?,
        capacity: row.get(2)?,
        enrolled: row.get(3)?,
    })
}

/// Convert a SQLite row to an Enrollment.
///
/// Expected columns: id, student_id, course_id
pub fn row_to_enrollment(row: &Row) -> rusqlite::Result<Enrollment> {
    Ok(Enrollment {
        id: row.get(0)?,
        student_id: row.get(1)?,
        course_id: row.get(2)?,
    })
}

/// Convert a SQLite row to a TodoTask.
///
/// Expected columns: id, user_id, title, description, completed
pub fn row_to_todo(row: &Row) -> rusqlite::Result<TodoTask> {
    Ok(TodoTask {
        id: row.get(0)?,
        user_id: row.get(1)?,
        title: row.get(2)?,
        description: row.get(3)?,
        completed: row.get(4)?,
    })
}

/// Parse Role from its stored string.
fn parse_role(s: &str) -> rusqlite::Result<Role> {
    Role::parse(s).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            4,
            rusqlite::types::Type::Text,
            Box::new(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("Unknown role: {}", s),
            )),
        )
    })
}
