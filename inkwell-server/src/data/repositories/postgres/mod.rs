pub(crate) mod comment_repository;
pub(crate) mod engagement_repository;
pub(crate) mod post_repository;
pub(crate) mod user_repository;

use sqlx::error::DatabaseError;

const UNIQUE_VIOLATION: &str = "23505";
const FOREIGN_KEY_VIOLATION: &str = "23503";

pub(crate) fn is_unique_violation(db_err: &dyn DatabaseError) -> bool {
    db_err.code().as_deref() == Some(UNIQUE_VIOLATION)
}

pub(crate) fn is_foreign_key_violation(db_err: &dyn DatabaseError) -> bool {
    db_err.code().as_deref() == Some(FOREIGN_KEY_VIOLATION)
}
