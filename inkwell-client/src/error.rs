use thiserror::Error;

#[derive(Debug, Error)]
/// Errors returned by `inkwell-client`.
pub enum InkwellClientError {
    /// Transport failure or an undecodable response (`reqwest`).
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The session is missing, expired or was rejected.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// The session is valid but does not own the resource.
    #[error("forbidden")]
    Forbidden,

    /// The requested post, comment or user does not exist.
    #[error("not found")]
    NotFound,

    /// Username or email already taken.
    #[error("conflict: {0}")]
    Conflict(String),

    /// The server rejected the request payload.
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

/// Result of `inkwell-client` operations.
pub type InkwellClientResult<T> = Result<T, InkwellClientError>;

impl InkwellClientError {
    pub(crate) fn from_http_status(status: reqwest::StatusCode, message: Option<String>) -> Self {
        let message = message.unwrap_or_else(|| format!("http status {status}"));
        match status {
            reqwest::StatusCode::UNAUTHORIZED => Self::Unauthorized(message),
            reqwest::StatusCode::FORBIDDEN => Self::Forbidden,
            reqwest::StatusCode::NOT_FOUND => Self::NotFound,
            reqwest::StatusCode::CONFLICT => Self::Conflict(message),
            _ => Self::InvalidRequest(message),
        }
    }

    pub(crate) fn from_reqwest(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            return Self::from_http_status(status, None);
        }
        Self::Http(err)
    }
}
