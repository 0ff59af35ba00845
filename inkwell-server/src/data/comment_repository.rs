use async_trait::async_trait;

use crate::domain::comment::{Comment, CommentView};
use crate::domain::error::DomainError;

#[derive(Debug, Clone)]
pub(crate) struct NewComment {
    pub(crate) post_id: i64,
    pub(crate) author_id: i64,
    pub(crate) content: String,
}

#[async_trait]
pub(crate) trait CommentRepository: Send + Sync {
    async fn create_comment(&self, input: NewComment) -> Result<CommentView, DomainError>;
    async fn get_comment(&self, id: i64) -> Result<Option<Comment>, DomainError>;
    /// Every comment on the post, newest first.
    async fn list_for_post(&self, post_id: i64) -> Result<Vec<CommentView>, DomainError>;
    async fn update_content(&self, id: i64, content: String)
    -> Result<Option<CommentView>, DomainError>;
    async fn delete_comment(&self, id: i64) -> Result<bool, DomainError>;
}
