use super::error::ValidationError;
use super::requests::{AddCourseRequest, CreateTodoRequest, RegisterRequest};

/// Validates a registration request before hashing the password.
pub fn validate_registration(req: &RegisterRequest) -> Result<(), ValidationError> {
    let username = req.username.trim();
    if username.is_empty() {
        return Err(ValidationError::EmptyUsername);
    }
    if username.len() > 64 {
        return Err(ValidationError::UsernameTooLong);
    }
    if !is_email(req.email.trim()) {
        return Err(ValidationError::InvalidEmail(req.email.clone()));
    }
    validate_password_format(&req.password)
}

/// Checks that a password is non-empty and made only of ASCII letters and digits.
pub fn validate_password_format(password: &str) -> Result<(), ValidationError> {
    if password.is_empty() || !password.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(ValidationError::InvalidPasswordFormat);
    }
    Ok(())
}

/// Validates a course creation request.
pub fn validate_course(req: &AddCourseRequest) -> Result<(), ValidationError> {
    if req.name.trim().is_empty() {
        return Err(ValidationError::EmptyCourseName);
    }
    if req.capacity <= 0 {
        return Err(ValidationError::InvalidCapacity);
    }
    Ok(())
}

/// Validates a to-do creation request.
pub fn validate_todo(req: &CreateTodoRequest) -> Result<(), ValidationError> {
    if req.title.trim().is_empty() {
        return Err(ValidationError::EmptyTitle);
    }
    if req.title.len() > 200 {
        return Err(ValidationError::TitleTooLong);
    }
    Ok(())
}

/// Returns true if `value` is shaped like an email: it contains both `@` and `.`.
///
/// The same rule decides whether a login key is an email or a username.
pub fn is_email(value: &str) -> bool {
    value.contains('@') && value.contains('.')
}
