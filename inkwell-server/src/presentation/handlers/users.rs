use axum::{
    Json,
    extract::{Path, State},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::domain::error::parse_resource_id;
use crate::domain::user::{UpdateProfileRequest, User};
use crate::presentation::AppState;
use crate::presentation::app_error::AppResult;
use crate::presentation::handlers::auth::UserDto;
use crate::presentation::handlers::posts::FeedPostDto;
use crate::presentation::middleware::auth::AuthenticatedUser;

/// Profile as shown to other users; the email stays private.
#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct PublicProfileDto {
    pub(crate) id: i64,
    pub(crate) username: String,
    pub(crate) full_name: String,
    pub(crate) bio: Option<String>,
    pub(crate) avatar_url: Option<String>,
    pub(crate) created_at: DateTime<Utc>,
}

impl From<User> for PublicProfileDto {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            full_name: user.full_name,
            bio: user.bio,
            avatar_url: user.avatar_url,
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub(crate) struct UpdateProfileDto {
    #[validate(length(max = 100))]
    pub(crate) full_name: Option<String>,
    #[validate(length(max = 500))]
    pub(crate) bio: Option<String>,
    pub(crate) avatar_url: Option<String>,
    #[validate(length(max = 128))]
    pub(crate) password: Option<String>,
    pub(crate) confirm_password: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/users/{id}",
    tag = "users",
    params(
        ("id" = String, Path, description = "User id")
    ),
    responses(
        (status = 200, description = "Public profile", body = PublicProfileDto),
        (status = 404, description = "User not found"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn get_profile(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<PublicProfileDto>> {
    let user_id = parse_resource_id("user", &id)?;
    let user = state.user_service.get_profile(user_id).await?;
    Ok(Json(user.into()))
}

#[utoipa::path(
    put,
    path = "/api/users/profile",
    tag = "users",
    security(("bearer_auth" = [])),
    request_body = UpdateProfileDto,
    responses(
        (status = 200, description = "Profile updated", body = UserDto),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthenticated"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn update_profile(
    State(state): State<AppState>,
    AuthenticatedUser { user }: AuthenticatedUser,
    Json(dto): Json<UpdateProfileDto>,
) -> AppResult<Json<UserDto>> {
    dto.validate()?;

    let req = UpdateProfileRequest {
        full_name: dto.full_name,
        bio: dto.bio,
        avatar_url: dto.avatar_url,
        password: dto.password,
        confirm_password: dto.confirm_password,
    };
    let user = state.user_service.update_profile(&user, req).await?;
    Ok(Json(user.into()))
}

#[utoipa::path(
    get,
    path = "/api/users/bookmarks",
    tag = "users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Bookmarked posts, most recent bookmark first", body = [FeedPostDto]),
        (status = 401, description = "Unauthenticated"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn list_bookmarks(
    State(state): State<AppState>,
    AuthenticatedUser { user }: AuthenticatedUser,
) -> AppResult<Json<Vec<FeedPostDto>>> {
    let posts = state.blog_service.list_bookmarked_posts(&user).await?;
    Ok(Json(posts.into_iter().map(FeedPostDto::from).collect()))
}
