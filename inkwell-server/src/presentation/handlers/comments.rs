use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::domain::comment::CommentView;
use crate::domain::error::parse_resource_id;
use crate::presentation::AppState;
use crate::presentation::app_error::AppResult;
use crate::presentation::handlers::posts::AuthorDto;
use crate::presentation::middleware::auth::AuthenticatedUser;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub(crate) struct CommentContentDto {
    #[validate(length(min = 1, max = 5000))]
    pub(crate) content: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct CommentDto {
    pub(crate) id: i64,
    pub(crate) post_id: i64,
    pub(crate) content: String,
    pub(crate) author: AuthorDto,
    pub(crate) created_at: DateTime<Utc>,
    pub(crate) updated_at: DateTime<Utc>,
}

impl From<CommentView> for CommentDto {
    fn from(view: CommentView) -> Self {
        Self {
            id: view.comment.id,
            post_id: view.comment.post_id,
            content: view.comment.content,
            author: view.author.into(),
            created_at: view.comment.created_at,
            updated_at: view.comment.updated_at,
        }
    }
}

fn parse_comment_path(post_id: &str, comment_id: &str) -> AppResult<(i64, i64)> {
    Ok((
        parse_resource_id("post", post_id)?,
        parse_resource_id("comment", comment_id)?,
    ))
}

#[utoipa::path(
    post,
    path = "/api/posts/{id}/comment",
    tag = "comments",
    security(("bearer_auth" = [])),
    params(
        ("id" = String, Path, description = "Post id")
    ),
    request_body = CommentContentDto,
    responses(
        (status = 201, description = "Comment added", body = CommentDto),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthenticated"),
        (status = 404, description = "Post not found"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn add_comment(
    State(state): State<AppState>,
    AuthenticatedUser { user }: AuthenticatedUser,
    Path(id): Path<String>,
    Json(dto): Json<CommentContentDto>,
) -> AppResult<(StatusCode, Json<CommentDto>)> {
    let post_id = parse_resource_id("post", &id)?;
    dto.validate()?;

    let view = state
        .comment_service
        .add_comment(post_id, &user, &dto.content)
        .await?;
    Ok((StatusCode::CREATED, Json(view.into())))
}

#[utoipa::path(
    put,
    path = "/api/posts/{id}/comments/{comment_id}",
    tag = "comments",
    security(("bearer_auth" = [])),
    params(
        ("id" = String, Path, description = "Post id"),
        ("comment_id" = String, Path, description = "Comment id")
    ),
    request_body = CommentContentDto,
    responses(
        (status = 200, description = "Comment updated", body = CommentDto),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthenticated"),
        (status = 403, description = "Not the comment author"),
        (status = 404, description = "Comment not found on this post"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn edit_comment(
    State(state): State<AppState>,
    AuthenticatedUser { user }: AuthenticatedUser,
    Path((id, comment_id)): Path<(String, String)>,
    Json(dto): Json<CommentContentDto>,
) -> AppResult<Json<CommentDto>> {
    let (post_id, comment_id) = parse_comment_path(&id, &comment_id)?;

    // Content is checked by the service once the caller may edit the comment.
    let view = state
        .comment_service
        .edit_comment(post_id, comment_id, &user, &dto.content)
        .await?;
    Ok(Json(view.into()))
}

#[utoipa::path(
    delete,
    path = "/api/posts/{id}/comments/{comment_id}",
    tag = "comments",
    security(("bearer_auth" = [])),
    params(
        ("id" = String, Path, description = "Post id"),
        ("comment_id" = String, Path, description = "Comment id")
    ),
    responses(
        (status = 204, description = "Comment deleted"),
        (status = 401, description = "Unauthenticated"),
        (status = 403, description = "Neither the comment author nor the post author"),
        (status = 404, description = "Comment not found on this post"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn delete_comment(
    State(state): State<AppState>,
    AuthenticatedUser { user }: AuthenticatedUser,
    Path((id, comment_id)): Path<(String, String)>,
) -> AppResult<StatusCode> {
    let (post_id, comment_id) = parse_comment_path(&id, &comment_id)?;
    state
        .comment_service
        .delete_comment(post_id, comment_id, &user)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
