use tracing::info;

use crate::data::comment_repository::CommentRepository;
use crate::data::engagement_repository::EngagementRepository;
use crate::data::post_repository::{NewPost, PostPatch, PostRepository};
use crate::domain::access::can_modify_post;
use crate::domain::comment::{CommentView, sort_newest_first};
use crate::domain::engagement::EngagementIndex;
use crate::domain::error::DomainError;
use crate::domain::feed::{AnnotatedPost, FeedQuery, annotate, build_feed};
use crate::domain::post::{AuthoredPost, CreatePostRequest, Post, UpdatePostRequest};
use crate::domain::user::User;

/// A single post as seen by one viewer, with its whole discussion.
#[derive(Debug, Clone)]
pub(crate) struct PostDetail {
    pub(crate) post: AnnotatedPost,
    pub(crate) comments: Vec<CommentView>,
}

pub(crate) struct BlogService<P, E, C>
where
    P: PostRepository,
    E: EngagementRepository,
    C: CommentRepository,
{
    posts: P,
    engagement: E,
    comments: C,
}

impl<P, E, C> BlogService<P, E, C>
where
    P: PostRepository,
    E: EngagementRepository,
    C: CommentRepository,
{
    pub(crate) fn new(posts: P, engagement: E, comments: C) -> Self {
        Self {
            posts,
            engagement,
            comments,
        }
    }

    pub(crate) async fn create_post(
        &self,
        author: &User,
        req: CreatePostRequest,
    ) -> Result<Post, DomainError> {
        let req = req.validate()?;

        let post = self
            .posts
            .create_post(NewPost {
                title: req.title,
                content: req.content,
                image_url: req.image_url,
                author_id: author.id,
            })
            .await?;
        info!(post_id = post.id, author_id = author.id, "post created");
        Ok(post)
    }

    pub(crate) async fn update_post(
        &self,
        actor: &User,
        post_id: i64,
        req: UpdatePostRequest,
    ) -> Result<Post, DomainError> {
        self.owned_post(actor, post_id).await?;
        let req = req.validate()?;

        let patch = PostPatch {
            title: req.title,
            content: req.content,
            image_url: req.image_url,
        };
        // a concurrent delete between the ownership check and the write surfaces as missing
        self.posts
            .update_post_owned(post_id, actor.id, patch)
            .await?
            .ok_or_else(|| DomainError::post_not_found(post_id))
    }

    pub(crate) async fn delete_post(&self, actor: &User, post_id: i64) -> Result<(), DomainError> {
        self.owned_post(actor, post_id).await?;

        if !self.posts.delete_post(post_id).await? {
            return Err(DomainError::post_not_found(post_id));
        }
        info!(post_id, author_id = actor.id, "post deleted");
        Ok(())
    }

    pub(crate) async fn list_posts(
        &self,
        viewer: Option<&User>,
        query: &FeedQuery,
    ) -> Result<Vec<AnnotatedPost>, DomainError> {
        let posts = self.posts.list_authored_posts().await?;
        let viewer_id = viewer.map(|viewer| viewer.id);
        let index = self.engagement_index(&posts, viewer_id).await?;
        Ok(build_feed(posts, &index, viewer_id, query))
    }

    pub(crate) async fn get_post(
        &self,
        post_id: i64,
        viewer: Option<&User>,
    ) -> Result<PostDetail, DomainError> {
        let authored = self
            .posts
            .get_authored_post(post_id)
            .await?
            .ok_or_else(|| DomainError::post_not_found(post_id))?;

        let viewer_id = viewer.map(|viewer| viewer.id);
        let index = self
            .engagement_index(std::slice::from_ref(&authored), viewer_id)
            .await?;
        let mut comments = self.comments.list_for_post(post_id).await?;
        sort_newest_first(&mut comments);

        Ok(PostDetail {
            post: annotate(authored, &index, viewer_id),
            comments,
        })
    }

    /// Most recently bookmarked first.
    pub(crate) async fn list_bookmarked_posts(
        &self,
        viewer: &User,
    ) -> Result<Vec<AnnotatedPost>, DomainError> {
        let posts = self.posts.list_bookmarked_posts(viewer.id).await?;
        let index = self.engagement_index(&posts, Some(viewer.id)).await?;
        Ok(posts
            .into_iter()
            .map(|authored| annotate(authored, &index, Some(viewer.id)))
            .collect())
    }

    async fn owned_post(&self, actor: &User, post_id: i64) -> Result<Post, DomainError> {
        let post = self
            .posts
            .get_post(post_id)
            .await?
            .ok_or_else(|| DomainError::post_not_found(post_id))?;

        if !can_modify_post(actor.id, &post) {
            return Err(DomainError::Forbidden);
        }
        Ok(post)
    }

    async fn engagement_index(
        &self,
        posts: &[AuthoredPost],
        viewer_id: Option<i64>,
    ) -> Result<EngagementIndex, DomainError> {
        let post_ids: Vec<i64> = posts.iter().map(|authored| authored.post.id).collect();
        let counts = self.engagement.counts_for_posts(&post_ids).await?;
        let marks = match viewer_id {
            Some(viewer_id) => {
                self.engagement
                    .marks_for_viewer(viewer_id, &post_ids)
                    .await?
            }
            None => Vec::new(),
        };
        Ok(EngagementIndex::new(counts, marks))
    }
}
