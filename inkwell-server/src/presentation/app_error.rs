use crate::domain::error::DomainError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;
use validator::ValidationErrors;

#[derive(Debug, Error)]
pub(crate) enum AppError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("validation error: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("not found")]
    NotFound,

    #[error("unauthorized")]
    Unauthorized,
}

pub(crate) type AppResult<T> = Result<T, AppError>;

#[derive(Debug, Serialize)]
pub(crate) struct ErrorBody {
    pub(crate) error: String,
}

impl AppError {
    pub(crate) fn status(&self) -> StatusCode {
        match self {
            AppError::Domain(err) => match err {
                DomainError::Validation { .. } => StatusCode::BAD_REQUEST,
                DomainError::AlreadyExists(_) => StatusCode::CONFLICT,
                DomainError::InvalidCredentials | DomainError::Unauthenticated => {
                    StatusCode::UNAUTHORIZED
                }
                DomainError::NotFound(_) => StatusCode::NOT_FOUND,
                DomainError::Forbidden => StatusCode::FORBIDDEN,
                DomainError::Unexpected(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let msg = match &self {
            AppError::Domain(DomainError::Unexpected(detail)) => {
                error!(%detail, "request failed");
                "internal error".to_string()
            }
            other => other.to_string(),
        };

        (status, Json(ErrorBody { error: msg })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use axum::{body::to_bytes, http::StatusCode, response::IntoResponse};

    use super::AppError;
    use crate::domain::error::DomainError;

    #[test]
    fn domain_errors_map_to_statuses() {
        let cases = [
            (DomainError::Unauthenticated, StatusCode::UNAUTHORIZED),
            (DomainError::InvalidCredentials, StatusCode::UNAUTHORIZED),
            (DomainError::Forbidden, StatusCode::FORBIDDEN),
            (DomainError::post_not_found(1), StatusCode::NOT_FOUND),
            (
                DomainError::AlreadyExists("email".to_string()),
                StatusCode::CONFLICT,
            ),
            (
                DomainError::Validation {
                    field: "title",
                    message: "must be 1..255 chars",
                },
                StatusCode::BAD_REQUEST,
            ),
            (
                DomainError::Unexpected("boom".to_string()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, expected) in cases {
            assert_eq!(AppError::from(err).status(), expected);
        }
    }

    #[tokio::test]
    async fn unexpected_error_hides_details() {
        let response =
            AppError::from(DomainError::Unexpected("password_hash column".to_string()))
                .into_response();
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body must be readable");
        let body: serde_json::Value = serde_json::from_slice(&body).expect("body must be json");
        assert_eq!(body["error"], "internal error");
    }

    #[tokio::test]
    async fn error_body_uses_error_field() {
        let response = AppError::from(DomainError::Forbidden).into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body must be readable");
        let body: serde_json::Value = serde_json::from_slice(&body).expect("body must be json");
        assert_eq!(body["error"], "forbidden");
    }
}
