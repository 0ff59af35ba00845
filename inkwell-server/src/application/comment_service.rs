use tracing::info;

use crate::data::comment_repository::{CommentRepository, NewComment};
use crate::data::post_repository::PostRepository;
use crate::domain::access::{can_delete_comment, can_edit_comment};
use crate::domain::comment::{Comment, CommentView, normalize_comment_content};
use crate::domain::error::DomainError;
use crate::domain::user::User;

pub(crate) struct CommentService<P: PostRepository, C: CommentRepository> {
    posts: P,
    comments: C,
}

impl<P: PostRepository, C: CommentRepository> CommentService<P, C> {
    pub(crate) fn new(posts: P, comments: C) -> Self {
        Self { posts, comments }
    }

    pub(crate) async fn add_comment(
        &self,
        post_id: i64,
        author: &User,
        content: &str,
    ) -> Result<CommentView, DomainError> {
        if self.posts.get_post(post_id).await?.is_none() {
            return Err(DomainError::post_not_found(post_id));
        }
        let content = normalize_comment_content(content)?;

        let view = self
            .comments
            .create_comment(NewComment {
                post_id,
                author_id: author.id,
                content,
            })
            .await?;
        info!(comment_id = view.comment.id, post_id, author_id = author.id, "comment added");
        Ok(view)
    }

    pub(crate) async fn edit_comment(
        &self,
        post_id: i64,
        comment_id: i64,
        viewer: &User,
        content: &str,
    ) -> Result<CommentView, DomainError> {
        let comment = self.comment_on_post(post_id, comment_id).await?;
        if !can_edit_comment(viewer.id, &comment) {
            return Err(DomainError::Forbidden);
        }
        let content = normalize_comment_content(content)?;

        self.comments
            .update_content(comment_id, content)
            .await?
            .ok_or_else(|| DomainError::comment_not_found(comment_id))
    }

    pub(crate) async fn delete_comment(
        &self,
        post_id: i64,
        comment_id: i64,
        viewer: &User,
    ) -> Result<(), DomainError> {
        let comment = self.comment_on_post(post_id, comment_id).await?;
        let post = self
            .posts
            .get_post(post_id)
            .await?
            .ok_or_else(|| DomainError::post_not_found(post_id))?;

        if !can_delete_comment(viewer.id, &comment, &post) {
            return Err(DomainError::Forbidden);
        }

        if !self.comments.delete_comment(comment_id).await? {
            return Err(DomainError::comment_not_found(comment_id));
        }
        info!(comment_id, post_id, actor_id = viewer.id, "comment deleted");
        Ok(())
    }

    // A comment addressed through a different post is treated as missing.
    async fn comment_on_post(&self, post_id: i64, comment_id: i64) -> Result<Comment, DomainError> {
        self.comments
            .get_comment(comment_id)
            .await?
            .filter(|comment| comment.post_id == post_id)
            .ok_or_else(|| DomainError::comment_not_found(comment_id))
    }
}

#[cfg(test)]
mod tests {
    use super::CommentService;
    use crate::data::repositories::memory::InMemoryStore;
    use crate::domain::error::DomainError;
    use crate::domain::post::Post;
    use crate::domain::user::User;

    struct Fixture {
        store: InMemoryStore,
        service: CommentService<InMemoryStore, InMemoryStore>,
        post_author: User,
        commenter: User,
        bystander: User,
        post: Post,
    }

    fn fixture() -> Fixture {
        let store = InMemoryStore::new();
        let post_author = store.seed_user("post_author");
        let commenter = store.seed_user("commenter");
        let bystander = store.seed_user("bystander");
        let post = store.seed_post(post_author.id, "Open thread");
        Fixture {
            service: CommentService::new(store.clone(), store.clone()),
            store,
            post_author,
            commenter,
            bystander,
            post,
        }
    }

    #[tokio::test]
    async fn add_comment_trims_and_attaches_author() {
        let fx = fixture();
        let view = fx
            .service
            .add_comment(fx.post.id, &fx.commenter, "  nice post  ")
            .await
            .expect("comment must be added");
        assert_eq!(view.comment.content, "nice post");
        assert_eq!(view.author.id, fx.commenter.id);
        assert_eq!(view.author.username, "commenter");
    }

    #[tokio::test]
    async fn add_comment_rejects_blank_and_missing_post() {
        let fx = fixture();
        let err = fx
            .service
            .add_comment(fx.post.id, &fx.commenter, "   ")
            .await
            .expect_err("blank must fail");
        assert!(matches!(err, DomainError::Validation { field: "content", .. }));

        let err = fx
            .service
            .add_comment(fx.post.id + 100, &fx.commenter, "hello")
            .await
            .expect_err("missing post must fail");
        assert!(matches!(err, DomainError::NotFound(_)));
    }

    #[tokio::test]
    async fn only_comment_author_may_edit() {
        let fx = fixture();
        let view = fx
            .service
            .add_comment(fx.post.id, &fx.commenter, "first draft")
            .await
            .expect("comment must be added");

        let err = fx
            .service
            .edit_comment(fx.post.id, view.comment.id, &fx.post_author, "hijacked")
            .await
            .expect_err("post author cannot edit someone else's comment");
        assert!(matches!(err, DomainError::Forbidden));

        let err = fx
            .service
            .edit_comment(fx.post.id, view.comment.id, &fx.commenter, " ")
            .await
            .expect_err("blank edit must fail");
        assert!(matches!(err, DomainError::Validation { .. }));

        let edited = fx
            .service
            .edit_comment(fx.post.id, view.comment.id, &fx.commenter, "final")
            .await
            .expect("author edit must succeed");
        assert_eq!(edited.comment.content, "final");
        assert!(edited.comment.updated_at > view.comment.updated_at);
    }

    #[tokio::test]
    async fn comment_author_may_delete() {
        let fx = fixture();
        let view = fx
            .service
            .add_comment(fx.post.id, &fx.commenter, "mine")
            .await
            .expect("comment must be added");

        fx.service
            .delete_comment(fx.post.id, view.comment.id, &fx.commenter)
            .await
            .expect("comment author delete must succeed");
        assert_eq!(fx.store.comment_rows(fx.post.id), 0);
    }

    #[tokio::test]
    async fn post_author_may_delete_any_comment() {
        let fx = fixture();
        let view = fx
            .service
            .add_comment(fx.post.id, &fx.commenter, "moderate me")
            .await
            .expect("comment must be added");

        fx.service
            .delete_comment(fx.post.id, view.comment.id, &fx.post_author)
            .await
            .expect("post author delete must succeed");
        assert_eq!(fx.store.comment_rows(fx.post.id), 0);
    }

    #[tokio::test]
    async fn third_party_delete_is_forbidden() {
        let fx = fixture();
        let view = fx
            .service
            .add_comment(fx.post.id, &fx.commenter, "keep me")
            .await
            .expect("comment must be added");

        let err = fx
            .service
            .delete_comment(fx.post.id, view.comment.id, &fx.bystander)
            .await
            .expect_err("bystander must be refused");
        assert!(matches!(err, DomainError::Forbidden));
        assert_eq!(fx.store.comment_rows(fx.post.id), 1);
    }

    #[tokio::test]
    async fn comment_addressed_through_other_post_is_not_found() {
        let fx = fixture();
        let other_post = fx.store.seed_post(fx.bystander.id, "Other thread");
        let view = fx
            .service
            .add_comment(fx.post.id, &fx.commenter, "wrong door")
            .await
            .expect("comment must be added");

        let err = fx
            .service
            .edit_comment(other_post.id, view.comment.id, &fx.commenter, "edit")
            .await
            .expect_err("mismatched post must fail");
        assert!(matches!(err, DomainError::NotFound(_)));

        // the other post's author must not be able to delete through their own post
        let err = fx
            .service
            .delete_comment(other_post.id, view.comment.id, &fx.bystander)
            .await
            .expect_err("mismatched post must fail");
        assert!(matches!(err, DomainError::NotFound(_)));
        assert_eq!(fx.store.comment_rows(fx.post.id), 1);
    }

    #[tokio::test]
    async fn edit_checks_access_before_content() {
        let fx = fixture();
        let view = fx
            .service
            .add_comment(fx.post.id, &fx.commenter, "keep me")
            .await
            .expect("comment must be added");

        let err = fx
            .service
            .edit_comment(fx.post.id, view.comment.id, &fx.post_author, "")
            .await
            .expect_err("non-author edit must fail");
        assert!(matches!(err, DomainError::Forbidden));

        let err = fx
            .service
            .edit_comment(fx.post.id, 12_345, &fx.commenter, "")
            .await
            .expect_err("missing comment must fail");
        assert!(matches!(err, DomainError::NotFound(_)));

        let err = fx
            .service
            .edit_comment(fx.post.id, view.comment.id, &fx.commenter, &"x".repeat(5_001))
            .await
            .expect_err("oversized edit must fail");
        assert!(matches!(err, DomainError::Validation { field: "content", .. }));
    }

    #[tokio::test]
    async fn missing_comment_is_not_found() {
        let fx = fixture();
        let err = fx
            .service
            .delete_comment(fx.post.id, 12_345, &fx.post_author)
            .await
            .expect_err("missing comment must fail");
        assert!(matches!(err, DomainError::NotFound(_)));
    }
}
