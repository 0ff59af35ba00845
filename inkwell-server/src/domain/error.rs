use thiserror::Error;

#[derive(Debug, Error)]
pub(crate) enum DomainError {
    #[error("validation failed for '{field}': {message}")]
    Validation {
        field: &'static str,
        message: &'static str,
    },

    #[error("resource not found: {0}")]
    NotFound(String),

    #[error("resource already exists: {0}")]
    AlreadyExists(String),

    #[error("forbidden")]
    Forbidden,

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("unauthenticated")]
    Unauthenticated,

    #[error("unexpected domain error: {0}")]
    Unexpected(String),
}

impl DomainError {
    pub(crate) fn post_not_found(id: i64) -> Self {
        Self::NotFound(format!("post id: {id}"))
    }

    pub(crate) fn comment_not_found(id: i64) -> Self {
        Self::NotFound(format!("comment id: {id}"))
    }

    pub(crate) fn user_not_found(id: i64) -> Self {
        Self::NotFound(format!("user id: {id}"))
    }
}

/// Parses a path identifier. Anything that is not a positive integer is
/// reported the same way as a missing resource.
pub(crate) fn parse_resource_id(resource: &str, raw: &str) -> Result<i64, DomainError> {
    raw.trim()
        .parse::<i64>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or_else(|| DomainError::NotFound(format!("{resource} id: {raw}")))
}
