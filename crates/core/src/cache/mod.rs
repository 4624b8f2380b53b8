mod error;
mod jitter;
mod keys;
mod lock;
mod serialization;
mod traits;

pub use error::{CacheError, Result};
pub use jitter::{jittered_duration, jittered_duration_with};
pub use keys::{
    all_courses_key, course_key, drop_lock_key, enrollment_change_keys, is_lock_key, lock_key,
    pick_lock_key, student_enrollments_key, todo_board_key, user_email_key, user_id_key,
    user_keys, user_username_key, LOCK_PREFIX,
};
pub use lock::LockToken;
pub use serialization::{deserialize_entry, serialize_entry, CacheEntry, SerializationError};
pub use traits::{KeyValueStore, KeyValueStoreExt};
