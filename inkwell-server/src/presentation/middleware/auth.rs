use axum::{
    extract::{FromRequestParts, Request, State},
    http::{HeaderMap, header, request::Parts},
    middleware::Next,
    response::Response,
};

use crate::domain::user::User;
use crate::presentation::AppState;
use crate::presentation::app_error::AppError;

/// Caller resolved by [`jwt_auth_middleware`].
#[derive(Debug, Clone)]
pub(crate) struct AuthenticatedUser {
    pub(crate) user: User,
}

/// Caller resolved by [`optional_auth_middleware`]; `None` for anonymous requests.
#[derive(Debug, Clone)]
pub(crate) struct OptionalUser(pub(crate) Option<User>);

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or(AppError::Unauthorized)
    }
}

impl<S> FromRequestParts<S> for OptionalUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts
            .extensions
            .get::<OptionalUser>()
            .cloned()
            .unwrap_or(OptionalUser(None)))
    }
}

/// Extracts the token from `Authorization: Bearer <token>`. Anything else,
/// including a missing header, yields `None`.
pub(crate) fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let auth_header = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())?;

    let mut parts = auth_header.split_whitespace();
    let scheme = parts.next()?;
    let token = parts.next()?;
    if parts.next().is_some() || !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    Some(token)
}

pub(crate) async fn jwt_auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer_token(request.headers()).map(str::to_owned);
    let user = state
        .auth_service
        .require_identity(token.as_deref())
        .await?;

    request.extensions_mut().insert(AuthenticatedUser { user });

    Ok(next.run(request).await)
}

pub(crate) async fn optional_auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let token = bearer_token(request.headers()).map(str::to_owned);
    let user = state.auth_service.optional_identity(token.as_deref()).await;

    request.extensions_mut().insert(OptionalUser(user));

    next.run(request).await
}
