use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::presentation::handlers::auth::{AuthResponseDto, LoginDto, SignupDto, UserDto};
use crate::presentation::handlers::comments::{CommentContentDto, CommentDto};
use crate::presentation::handlers::posts::{
    AuthorDto, BookmarkStateDto, CreatePostDto, FeedPostDto, LikeStateDto, PostDetailDto, PostDto,
    UpdatePostDto,
};
use crate::presentation::handlers::users::{PublicProfileDto, UpdateProfileDto};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::presentation::handlers::auth::signup,
        crate::presentation::handlers::auth::login,
        crate::presentation::handlers::auth::me,
        crate::presentation::handlers::posts::list_posts,
        crate::presentation::handlers::posts::trending_posts,
        crate::presentation::handlers::posts::get_post,
        crate::presentation::handlers::posts::create_post,
        crate::presentation::handlers::posts::update_post,
        crate::presentation::handlers::posts::delete_post,
        crate::presentation::handlers::posts::toggle_like,
        crate::presentation::handlers::posts::toggle_bookmark,
        crate::presentation::handlers::comments::add_comment,
        crate::presentation::handlers::comments::edit_comment,
        crate::presentation::handlers::comments::delete_comment,
        crate::presentation::handlers::users::get_profile,
        crate::presentation::handlers::users::update_profile,
        crate::presentation::handlers::users::list_bookmarks
    ),
    components(
        schemas(
            SignupDto,
            LoginDto,
            AuthResponseDto,
            UserDto,
            AuthorDto,
            CreatePostDto,
            UpdatePostDto,
            PostDto,
            FeedPostDto,
            PostDetailDto,
            LikeStateDto,
            BookmarkStateDto,
            CommentContentDto,
            CommentDto,
            PublicProfileDto,
            UpdateProfileDto
        )
    ),
    tags(
        (name = "auth", description = "Signup, login and the current session"),
        (name = "posts", description = "Feeds, posts, likes and bookmarks"),
        (name = "comments", description = "Comments on posts"),
        (name = "users", description = "Profiles and saved posts")
    ),
    modifiers(&SecurityAddon)
)]
pub(crate) struct ApiDoc;

pub(crate) struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let mut components = openapi.components.take().unwrap_or_default();
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
        openapi.components = Some(components);
    }
}

#[cfg(test)]
mod tests {
    use utoipa::OpenApi;

    use super::ApiDoc;

    #[test]
    fn document_lists_every_route() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/auth/signup",
            "/api/auth/me",
            "/api/posts/trending",
            "/api/posts/{id}/like",
            "/api/posts/{id}/comments/{comment_id}",
            "/api/users/bookmarks",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }
}
