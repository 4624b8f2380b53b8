mod error;
mod operations;
mod requests;
mod types;

pub use error::ValidationError;
pub use operations::{
    is_email, validate_course, validate_password_format, validate_registration, validate_todo,
};
pub use requests::{
    AddCourseRequest, CreateTodoRequest, EnrollmentRequest, LoginRequest, NewCourse, NewTodo,
    NewUser, RefreshRequest, RegisterRequest, TodoIdRequest,
};
pub use types::{Course, Enrollment, Role, TodoBoard, TodoTask, User, UserProfile};
