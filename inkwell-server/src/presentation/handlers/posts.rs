use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::application::blog_service::PostDetail;
use crate::domain::error::parse_resource_id;
use crate::domain::feed::{AnnotatedPost, FeedQuery};
use crate::domain::post::{CreatePostRequest, Post, UpdatePostRequest};
use crate::domain::user::AuthorSummary;
use crate::presentation::AppState;
use crate::presentation::app_error::AppResult;
use crate::presentation::handlers::comments::CommentDto;
use crate::presentation::middleware::auth::{AuthenticatedUser, OptionalUser};

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub(crate) struct CreatePostDto {
    #[validate(length(min = 1, max = 255))]
    pub(crate) title: String,
    #[validate(length(min = 1))]
    pub(crate) content: String,
    pub(crate) image_url: Option<String>,
}

/// Omitted or blank fields keep their stored value.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub(crate) struct UpdatePostDto {
    #[validate(length(max = 255))]
    pub(crate) title: Option<String>,
    pub(crate) content: Option<String>,
    pub(crate) image_url: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub(crate) struct FeedParams {
    /// Case-insensitive substring of the title.
    pub(crate) search: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct AuthorDto {
    pub(crate) id: i64,
    pub(crate) username: String,
    pub(crate) full_name: String,
    pub(crate) avatar_url: Option<String>,
}

impl From<AuthorSummary> for AuthorDto {
    fn from(author: AuthorSummary) -> Self {
        Self {
            id: author.id,
            username: author.username,
            full_name: author.full_name,
            avatar_url: author.avatar_url,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct PostDto {
    pub(crate) id: i64,
    pub(crate) title: String,
    pub(crate) content: String,
    pub(crate) image_url: Option<String>,
    pub(crate) author_id: i64,
    pub(crate) created_at: DateTime<Utc>,
    pub(crate) updated_at: DateTime<Utc>,
}

impl From<Post> for PostDto {
    fn from(post: Post) -> Self {
        Self {
            id: post.id,
            title: post.title,
            content: post.content,
            image_url: post.image_url,
            author_id: post.author_id,
            created_at: post.created_at,
            updated_at: post.updated_at,
        }
    }
}

/// A post with its author, engagement counts and the caller's own flags.
#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct FeedPostDto {
    pub(crate) id: i64,
    pub(crate) title: String,
    pub(crate) content: String,
    pub(crate) image_url: Option<String>,
    pub(crate) author: AuthorDto,
    pub(crate) likes_count: i64,
    pub(crate) comments_count: i64,
    pub(crate) is_liked: bool,
    pub(crate) is_bookmarked: bool,
    pub(crate) created_at: DateTime<Utc>,
    pub(crate) updated_at: DateTime<Utc>,
}

impl From<AnnotatedPost> for FeedPostDto {
    fn from(item: AnnotatedPost) -> Self {
        Self {
            id: item.post.id,
            title: item.post.title,
            content: item.post.content,
            image_url: item.post.image_url,
            author: item.author.into(),
            likes_count: item.likes_count,
            comments_count: item.comments_count,
            is_liked: item.is_liked,
            is_bookmarked: item.is_bookmarked,
            created_at: item.post.created_at,
            updated_at: item.post.updated_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct PostDetailDto {
    pub(crate) post: FeedPostDto,
    pub(crate) comments: Vec<CommentDto>,
}

impl From<PostDetail> for PostDetailDto {
    fn from(detail: PostDetail) -> Self {
        Self {
            post: detail.post.into(),
            comments: detail.comments.into_iter().map(CommentDto::from).collect(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct LikeStateDto {
    pub(crate) liked: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct BookmarkStateDto {
    pub(crate) bookmarked: bool,
}

#[utoipa::path(
    get,
    path = "/api/posts",
    tag = "posts",
    params(FeedParams),
    responses(
        (status = 200, description = "Newest posts first", body = [FeedPostDto]),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn list_posts(
    State(state): State<AppState>,
    OptionalUser(viewer): OptionalUser,
    Query(params): Query<FeedParams>,
) -> AppResult<Json<Vec<FeedPostDto>>> {
    let query = FeedQuery::latest().with_title_filter(params.search);
    let feed = state
        .blog_service
        .list_posts(viewer.as_ref(), &query)
        .await?;
    Ok(Json(feed.into_iter().map(FeedPostDto::from).collect()))
}

#[utoipa::path(
    get,
    path = "/api/posts/trending",
    tag = "posts",
    params(FeedParams),
    responses(
        (status = 200, description = "Up to six most liked posts", body = [FeedPostDto]),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn trending_posts(
    State(state): State<AppState>,
    OptionalUser(viewer): OptionalUser,
    Query(params): Query<FeedParams>,
) -> AppResult<Json<Vec<FeedPostDto>>> {
    let query = FeedQuery::trending().with_title_filter(params.search);
    let feed = state
        .blog_service
        .list_posts(viewer.as_ref(), &query)
        .await?;
    Ok(Json(feed.into_iter().map(FeedPostDto::from).collect()))
}

#[utoipa::path(
    get,
    path = "/api/posts/{id}",
    tag = "posts",
    params(
        ("id" = String, Path, description = "Post id")
    ),
    responses(
        (status = 200, description = "Post with comments", body = PostDetailDto),
        (status = 404, description = "Post not found"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn get_post(
    State(state): State<AppState>,
    OptionalUser(viewer): OptionalUser,
    Path(id): Path<String>,
) -> AppResult<Json<PostDetailDto>> {
    let post_id = parse_resource_id("post", &id)?;
    let detail = state
        .blog_service
        .get_post(post_id, viewer.as_ref())
        .await?;
    Ok(Json(detail.into()))
}

#[utoipa::path(
    post,
    path = "/api/posts",
    tag = "posts",
    security(("bearer_auth" = [])),
    request_body = CreatePostDto,
    responses(
        (status = 201, description = "Post created", body = PostDto),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthenticated"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn create_post(
    State(state): State<AppState>,
    AuthenticatedUser { user }: AuthenticatedUser,
    Json(dto): Json<CreatePostDto>,
) -> AppResult<(StatusCode, Json<PostDto>)> {
    dto.validate()?;

    let req = CreatePostRequest {
        title: dto.title,
        content: dto.content,
        image_url: dto.image_url,
    };
    let post = state.blog_service.create_post(&user, req).await?;

    Ok((StatusCode::CREATED, Json(post.into())))
}

#[utoipa::path(
    put,
    path = "/api/posts/{id}",
    tag = "posts",
    security(("bearer_auth" = [])),
    params(
        ("id" = String, Path, description = "Post id")
    ),
    request_body = UpdatePostDto,
    responses(
        (status = 200, description = "Post updated", body = PostDto),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthenticated"),
        (status = 403, description = "Not the author"),
        (status = 404, description = "Post not found"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn update_post(
    State(state): State<AppState>,
    AuthenticatedUser { user }: AuthenticatedUser,
    Path(id): Path<String>,
    Json(dto): Json<UpdatePostDto>,
) -> AppResult<Json<PostDto>> {
    let post_id = parse_resource_id("post", &id)?;
    dto.validate()?;

    let req = UpdatePostRequest {
        title: dto.title,
        content: dto.content,
        image_url: dto.image_url,
    };
    let post = state.blog_service.update_post(&user, post_id, req).await?;

    Ok(Json(post.into()))
}

#[utoipa::path(
    delete,
    path = "/api/posts/{id}",
    tag = "posts",
    security(("bearer_auth" = [])),
    params(
        ("id" = String, Path, description = "Post id")
    ),
    responses(
        (status = 204, description = "Post deleted"),
        (status = 401, description = "Unauthenticated"),
        (status = 403, description = "Not the author"),
        (status = 404, description = "Post not found"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn delete_post(
    State(state): State<AppState>,
    AuthenticatedUser { user }: AuthenticatedUser,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    let post_id = parse_resource_id("post", &id)?;
    state.blog_service.delete_post(&user, post_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/api/posts/{id}/like",
    tag = "posts",
    security(("bearer_auth" = [])),
    params(
        ("id" = String, Path, description = "Post id")
    ),
    responses(
        (status = 200, description = "Like state after the toggle", body = LikeStateDto),
        (status = 401, description = "Unauthenticated"),
        (status = 404, description = "Post not found"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn toggle_like(
    State(state): State<AppState>,
    AuthenticatedUser { user }: AuthenticatedUser,
    Path(id): Path<String>,
) -> AppResult<Json<LikeStateDto>> {
    let post_id = parse_resource_id("post", &id)?;
    let liked = state.engagement_service.toggle_like(&user, post_id).await?;
    Ok(Json(LikeStateDto { liked }))
}

#[utoipa::path(
    post,
    path = "/api/posts/{id}/bookmark",
    tag = "posts",
    security(("bearer_auth" = [])),
    params(
        ("id" = String, Path, description = "Post id")
    ),
    responses(
        (status = 200, description = "Bookmark state after the toggle", body = BookmarkStateDto),
        (status = 401, description = "Unauthenticated"),
        (status = 404, description = "Post not found"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn toggle_bookmark(
    State(state): State<AppState>,
    AuthenticatedUser { user }: AuthenticatedUser,
    Path(id): Path<String>,
) -> AppResult<Json<BookmarkStateDto>> {
    let post_id = parse_resource_id("post", &id)?;
    let bookmarked = state
        .engagement_service
        .toggle_bookmark(&user, post_id)
        .await?;
    Ok(Json(BookmarkStateDto { bookmarked }))
}
