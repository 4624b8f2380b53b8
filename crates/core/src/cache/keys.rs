/// Prefix that namespaces lock keys away from value keys.
pub const LOCK_PREFIX: &str = "lock:";

/// Returns the cache key for a user looked up by id.
pub fn user_id_key(user_id: i64) -> String {
    format!("user:id:{}", user_id)
}

/// Returns the cache key for a user looked up by username.
pub fn user_username_key(username: &str) -> String {
    format!("user:username:{}", username)
}

/// Returns the cache key for a user looked up by email.
pub fn user_email_key(email: &str) -> String {
    format!("user:email:{}", email)
}

/// Returns all cache keys that mirror the same user row.
pub fn user_keys(user_id: i64, username: &str, email: &str) -> Vec<String> {
    vec![
        user_id_key(user_id),
        user_username_key(username),
        user_email_key(email),
    ]
}

/// Returns the cache key for a single course.
pub fn course_key(course_id: i64) -> String {
    format!("course:{}", course_id)
}

/// Returns the cache key for the aggregate list of all courses.
pub fn all_courses_key() -> String {
    "course:all".to_string()
}

/// Returns the cache key for the enrollments of one student.
pub fn student_enrollments_key(student_id: i64) -> String {
    format!("enroll:student:{}", student_id)
}

/// Returns the cache key for a user's to-do board.
pub fn todo_board_key(user_id: i64) -> String {
    format!("todo:user:{}:board", user_id)
}

/// Returns the lock key guarding population of a value key.
///
/// # Examples
///
/// ```
/// use campus_core::cache::{course_key, lock_key};
///
/// assert_eq!(lock_key(&course_key(7)), "lock:course:7");
/// ```
pub fn lock_key(key: &str) -> String {
    format!("{}{}", LOCK_PREFIX, key)
}

/// Returns the write lock key serializing pick-course requests.
pub fn pick_lock_key(student_id: i64, course_id: i64) -> String {
    format!("{}pick:{}:{}", LOCK_PREFIX, student_id, course_id)
}

/// Returns the write lock key serializing drop-course requests.
pub fn drop_lock_key(student_id: i64, course_id: i64) -> String {
    format!("{}drop:{}:{}", LOCK_PREFIX, student_id, course_id)
}

/// Checks if a key lives in the lock namespace.
pub fn is_lock_key(key: &str) -> bool {
    key.starts_with(LOCK_PREFIX)
}

/// Returns every key a change to the enrollment of `student_id` in
/// `course_id` makes stale.
pub fn enrollment_change_keys(student_id: i64, course_id: i64) -> Vec<String> {
    vec![
        all_courses_key(),
        course_key(course_id),
        student_enrollments_key(student_id),
    ]
}
