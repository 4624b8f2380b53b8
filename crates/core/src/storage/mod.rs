mod error;
mod http_mapping;
mod traits;

pub use error::{ErrorKind, RepositoryError, Result};
pub use http_mapping::{repository_error_to_status_code, STALE_CACHE_WARNING};
pub use traits::{CourseRepository, EnrollmentRepository, TodoRepository, UserRepository};
