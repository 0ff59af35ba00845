use axum::{Json, extract::State, http::StatusCode};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::domain::user::{LoginRequest, RegisterRequest, User};
use crate::presentation::AppState;
use crate::presentation::app_error::AppResult;
use crate::presentation::middleware::auth::AuthenticatedUser;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub(crate) struct SignupDto {
    /// Generated from the email when omitted.
    #[validate(length(max = 64))]
    pub(crate) username: Option<String>,
    #[validate(length(min = 3, max = 254))]
    pub(crate) email: String,
    #[validate(length(min = 6, max = 128))]
    pub(crate) password: String,
    #[validate(length(min = 1, max = 100))]
    pub(crate) full_name: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub(crate) struct LoginDto {
    #[validate(length(min = 1, max = 254))]
    pub(crate) email: String,
    #[validate(length(min = 1))]
    pub(crate) password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct AuthResponseDto {
    pub(crate) access_token: String,
    pub(crate) user: UserDto,
}

/// The caller's own account.
#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct UserDto {
    pub(crate) id: i64,
    pub(crate) username: String,
    pub(crate) email: String,
    pub(crate) full_name: String,
    pub(crate) bio: Option<String>,
    pub(crate) avatar_url: Option<String>,
    pub(crate) created_at: DateTime<Utc>,
}

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            full_name: user.full_name,
            bio: user.bio,
            avatar_url: user.avatar_url,
            created_at: user.created_at,
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/auth/signup",
    tag = "auth",
    request_body = SignupDto,
    responses(
        (status = 201, description = "Registered successfully", body = AuthResponseDto),
        (status = 400, description = "Validation error"),
        (status = 409, description = "Username or email already taken"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn signup(
    State(state): State<AppState>,
    Json(dto): Json<SignupDto>,
) -> AppResult<(StatusCode, Json<AuthResponseDto>)> {
    dto.validate()?;

    let req = RegisterRequest {
        username: dto.username,
        email: dto.email,
        password: dto.password,
        full_name: dto.full_name,
    };

    let result = state.auth_service.register(req).await?;

    Ok((
        StatusCode::CREATED,
        Json(AuthResponseDto {
            access_token: result.access_token,
            user: result.user.into(),
        }),
    ))
}

#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "auth",
    request_body = LoginDto,
    responses(
        (status = 200, description = "Login successful", body = AuthResponseDto),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Invalid credentials"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn login(
    State(state): State<AppState>,
    Json(dto): Json<LoginDto>,
) -> AppResult<(StatusCode, Json<AuthResponseDto>)> {
    dto.validate()?;

    let req = LoginRequest {
        email: dto.email,
        password: dto.password,
    };

    let result = state.auth_service.login(req).await?;

    Ok((
        StatusCode::OK,
        Json(AuthResponseDto {
            access_token: result.access_token,
            user: result.user.into(),
        }),
    ))
}

#[utoipa::path(
    get,
    path = "/api/auth/me",
    tag = "auth",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current user", body = UserDto),
        (status = 401, description = "Unauthenticated")
    )
)]
pub(crate) async fn me(AuthenticatedUser { user }: AuthenticatedUser) -> Json<UserDto> {
    Json(user.into())
}
