use std::sync::Arc;

use sqlx::PgPool;

use crate::application::auth_service::AuthService;
use crate::application::blog_service::BlogService;
use crate::application::comment_service::CommentService;
use crate::application::engagement_service::EngagementService;
use crate::application::user_service::UserService;
use crate::data::repositories::postgres::comment_repository::PostgresCommentRepository;
use crate::data::repositories::postgres::engagement_repository::PostgresEngagementRepository;
use crate::data::repositories::postgres::post_repository::PostgresPostRepository;
use crate::data::repositories::postgres::user_repository::PostgresUserRepository;
use crate::infrastructure::jwt::JwtService;

pub(crate) mod app_error;
pub(crate) mod handlers;
pub(crate) mod http_handlers;
pub(crate) mod middleware;
pub(crate) mod openapi;
pub(crate) mod routes;

pub(crate) type PgAuthService = AuthService<PostgresUserRepository>;
pub(crate) type PgBlogService =
    BlogService<PostgresPostRepository, PostgresEngagementRepository, PostgresCommentRepository>;
pub(crate) type PgEngagementService = EngagementService<PostgresEngagementRepository>;
pub(crate) type PgCommentService =
    CommentService<PostgresPostRepository, PostgresCommentRepository>;
pub(crate) type PgUserService = UserService<PostgresUserRepository>;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) auth_service: Arc<PgAuthService>,
    pub(crate) blog_service: Arc<PgBlogService>,
    pub(crate) engagement_service: Arc<PgEngagementService>,
    pub(crate) comment_service: Arc<PgCommentService>,
    pub(crate) user_service: Arc<PgUserService>,
}

impl AppState {
    /// Wires every service onto the same pool.
    pub(crate) fn new(pool: PgPool, jwt: JwtService) -> Self {
        let users = PostgresUserRepository::new(pool.clone());
        let posts = PostgresPostRepository::new(pool.clone());
        let engagement = PostgresEngagementRepository::new(pool.clone());
        let comments = PostgresCommentRepository::new(pool);

        Self {
            auth_service: Arc::new(AuthService::new(users.clone(), jwt)),
            blog_service: Arc::new(BlogService::new(
                posts.clone(),
                engagement.clone(),
                comments.clone(),
            )),
            engagement_service: Arc::new(EngagementService::new(engagement)),
            comment_service: Arc::new(CommentService::new(posts, comments)),
            user_service: Arc::new(UserService::new(users)),
        }
    }
}
