use std::time::Duration;

use axum::{BoxError, Json, Router, error_handling::HandleErrorLayer, http::StatusCode};
use tower::ServiceBuilder;
use tower::timeout::error::Elapsed;
use tower_http::limit::RequestBodyLimitLayer;
use tracing::warn;

use crate::infrastructure::settings::Settings;
use crate::presentation::app_error::ErrorBody;

/// Caps request bodies and bounds how long a single request may run.
pub(crate) fn apply_limits(router: Router, settings: &Settings) -> Router {
    router.layer(
        ServiceBuilder::new()
            .layer(HandleErrorLayer::new(handle_middleware_error))
            .timeout(Duration::from_secs(settings.http_request_timeout_secs))
            .layer(RequestBodyLimitLayer::new(
                settings.http_request_body_limit_bytes,
            )),
    )
}

async fn handle_middleware_error(err: BoxError) -> (StatusCode, Json<ErrorBody>) {
    if err.is::<Elapsed>() {
        warn!("request timed out");
        return (
            StatusCode::REQUEST_TIMEOUT,
            Json(ErrorBody {
                error: "request timed out".to_string(),
            }),
        );
    }
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorBody {
            error: "internal error".to_string(),
        }),
    )
}
