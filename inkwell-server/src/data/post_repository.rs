use async_trait::async_trait;

use crate::domain::error::DomainError;
use crate::domain::post::{AuthoredPost, Post};

#[derive(Debug, Clone)]
pub(crate) struct NewPost {
    pub(crate) title: String,
    pub(crate) content: String,
    pub(crate) image_url: Option<String>,
    pub(crate) author_id: i64,
}

/// Fields left as `None` keep their stored value.
#[derive(Debug, Clone, Default)]
pub(crate) struct PostPatch {
    pub(crate) title: Option<String>,
    pub(crate) content: Option<String>,
    pub(crate) image_url: Option<String>,
}

#[async_trait]
pub(crate) trait PostRepository: Send + Sync {
    async fn create_post(&self, input: NewPost) -> Result<Post, DomainError>;
    async fn get_post(&self, id: i64) -> Result<Option<Post>, DomainError>;
    async fn get_authored_post(&self, id: i64) -> Result<Option<AuthoredPost>, DomainError>;
    async fn update_post_owned(
        &self,
        post_id: i64,
        owner_id: i64,
        patch: PostPatch,
    ) -> Result<Option<Post>, DomainError>;
    async fn delete_post(&self, id: i64) -> Result<bool, DomainError>;
    async fn list_authored_posts(&self) -> Result<Vec<AuthoredPost>, DomainError>;
    /// Posts bookmarked by `user_id`, most recently bookmarked first.
    async fn list_bookmarked_posts(&self, user_id: i64) -> Result<Vec<AuthoredPost>, DomainError>;
}
