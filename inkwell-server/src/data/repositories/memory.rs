//! In-memory repositories for service tests. Mirrors the constraints of the
//! Postgres schema: unique (user, post) likes and bookmarks, foreign keys to
//! posts, cascading deletes.

use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};

use crate::data::comment_repository::{CommentRepository, NewComment};
use crate::data::engagement_repository::EngagementRepository;
use crate::data::post_repository::{NewPost, PostPatch, PostRepository};
use crate::data::user_repository::{NewUser, ProfilePatch, UserCredentials, UserRepository};
use crate::domain::comment::{Comment, CommentView};
use crate::domain::engagement::{EngagementKind, EngagementMark, InsertOutcome, PostCounts};
use crate::domain::error::DomainError;
use crate::domain::post::{AuthoredPost, Post};
use crate::domain::user::User;

#[derive(Debug, Clone)]
struct Relation {
    id: i64,
    user_id: i64,
    post_id: i64,
}

#[derive(Debug)]
struct State {
    next_id: i64,
    now: DateTime<Utc>,
    users: Vec<UserCredentials>,
    posts: Vec<Post>,
    likes: Vec<Relation>,
    bookmarks: Vec<Relation>,
    comments: Vec<Comment>,
}

impl State {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    // Every write moves the clock forward so insertion order is visible in timestamps.
    fn tick(&mut self) -> DateTime<Utc> {
        self.now += Duration::seconds(1);
        self.now
    }

    fn relations_mut(&mut self, kind: EngagementKind) -> &mut Vec<Relation> {
        match kind {
            EngagementKind::Like => &mut self.likes,
            EngagementKind::Bookmark => &mut self.bookmarks,
        }
    }

    fn user(&self, id: i64) -> Option<&User> {
        self.users
            .iter()
            .map(|creds| &creds.user)
            .find(|user| user.id == id)
    }

    fn authored(&self, post: &Post) -> Result<AuthoredPost, DomainError> {
        let author = self
            .user(post.author_id)
            .ok_or_else(|| DomainError::Unexpected("dangling author".to_string()))?;
        Ok(AuthoredPost {
            post: post.clone(),
            author: author.summary(),
        })
    }

    fn comment_view(&self, comment: &Comment) -> Result<CommentView, DomainError> {
        let author = self
            .user(comment.author_id)
            .ok_or_else(|| DomainError::Unexpected("dangling commenter".to_string()))?;
        Ok(CommentView {
            comment: comment.clone(),
            author: author.summary(),
        })
    }
}

#[derive(Debug, Clone)]
pub(crate) struct InMemoryStore {
    state: Arc<Mutex<State>>,
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStore {
    pub(crate) fn new() -> Self {
        let now = Utc
            .with_ymd_and_hms(2024, 1, 1, 0, 0, 0)
            .single()
            .expect("valid base timestamp");
        Self {
            state: Arc::new(Mutex::new(State {
                next_id: 0,
                now,
                users: Vec::new(),
                posts: Vec::new(),
                likes: Vec::new(),
                bookmarks: Vec::new(),
                comments: Vec::new(),
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().expect("in-memory store mutex poisoned")
    }

    pub(crate) fn seed_user(&self, username: &str) -> User {
        let mut state = self.lock();
        let id = state.next_id();
        let created_at = state.tick();
        let user = User::new(
            id,
            username,
            format!("{username}@example.com"),
            username.to_uppercase(),
            created_at,
        )
        .expect("seeded user must be valid");
        state.users.push(UserCredentials {
            user: user.clone(),
            password_hash: "not-a-real-hash".to_string(),
        });
        user
    }

    pub(crate) fn seed_post(&self, author_id: i64, title: &str) -> Post {
        let mut state = self.lock();
        let id = state.next_id();
        let created_at = state.tick();
        let post = Post::new(id, title, "seeded content", author_id, created_at, created_at)
            .expect("seeded post must be valid");
        state.posts.push(post.clone());
        post
    }

    pub(crate) fn relation_rows(&self, kind: EngagementKind, user_id: i64, post_id: i64) -> usize {
        self.lock()
            .relations_mut(kind)
            .iter()
            .filter(|rel| rel.user_id == user_id && rel.post_id == post_id)
            .count()
    }

    pub(crate) fn comment_rows(&self, post_id: i64) -> usize {
        self.lock()
            .comments
            .iter()
            .filter(|comment| comment.post_id == post_id)
            .count()
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn create_user(&self, input: NewUser) -> Result<User, DomainError> {
        let mut state = self.lock();
        if state.users.iter().any(|c| c.user.username == input.username) {
            return Err(DomainError::AlreadyExists("username".to_string()));
        }
        if state.users.iter().any(|c| c.user.email == input.email) {
            return Err(DomainError::AlreadyExists("email".to_string()));
        }
        let id = state.next_id();
        let created_at = state.tick();
        let user = User::new(id, input.username, input.email, input.full_name, created_at)?;
        state.users.push(UserCredentials {
            user: user.clone(),
            password_hash: input.password_hash,
        });
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserCredentials>, DomainError> {
        Ok(self
            .lock()
            .users
            .iter()
            .find(|c| c.user.email == email)
            .cloned())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, DomainError> {
        Ok(self.lock().user(id).cloned())
    }

    async fn update_profile(
        &self,
        id: i64,
        patch: ProfilePatch,
    ) -> Result<Option<User>, DomainError> {
        let mut state = self.lock();
        let Some(creds) = state.users.iter_mut().find(|c| c.user.id == id) else {
            return Ok(None);
        };
        if let Some(full_name) = patch.full_name {
            creds.user.full_name = full_name;
        }
        if let Some(bio) = patch.bio {
            creds.user.bio = Some(bio);
        }
        if let Some(avatar_url) = patch.avatar_url {
            creds.user.avatar_url = Some(avatar_url);
        }
        if let Some(password_hash) = patch.password_hash {
            creds.password_hash = password_hash;
        }
        Ok(Some(creds.user.clone()))
    }
}

#[async_trait]
impl PostRepository for InMemoryStore {
    async fn create_post(&self, input: NewPost) -> Result<Post, DomainError> {
        let mut state = self.lock();
        if state.user(input.author_id).is_none() {
            return Err(DomainError::NotFound("author".to_string()));
        }
        let id = state.next_id();
        let created_at = state.tick();
        let post = Post::new(
            id,
            input.title,
            input.content,
            input.author_id,
            created_at,
            created_at,
        )?
        .with_image_url(input.image_url);
        state.posts.push(post.clone());
        Ok(post)
    }

    async fn get_post(&self, id: i64) -> Result<Option<Post>, DomainError> {
        Ok(self.lock().posts.iter().find(|p| p.id == id).cloned())
    }

    async fn get_authored_post(&self, id: i64) -> Result<Option<AuthoredPost>, DomainError> {
        let state = self.lock();
        state
            .posts
            .iter()
            .find(|p| p.id == id)
            .map(|post| state.authored(post))
            .transpose()
    }

    async fn update_post_owned(
        &self,
        post_id: i64,
        owner_id: i64,
        patch: PostPatch,
    ) -> Result<Option<Post>, DomainError> {
        let mut state = self.lock();
        let updated_at = state.tick();
        let Some(post) = state
            .posts
            .iter_mut()
            .find(|p| p.id == post_id && p.author_id == owner_id)
        else {
            return Ok(None);
        };
        if let Some(title) = patch.title {
            post.title = title;
        }
        if let Some(content) = patch.content {
            post.content = content;
        }
        if let Some(image_url) = patch.image_url {
            post.image_url = Some(image_url);
        }
        post.updated_at = updated_at;
        Ok(Some(post.clone()))
    }

    async fn delete_post(&self, id: i64) -> Result<bool, DomainError> {
        let mut state = self.lock();
        let before = state.posts.len();
        state.posts.retain(|p| p.id != id);
        let deleted = state.posts.len() < before;
        if deleted {
            state.likes.retain(|rel| rel.post_id != id);
            state.bookmarks.retain(|rel| rel.post_id != id);
            state.comments.retain(|comment| comment.post_id != id);
        }
        Ok(deleted)
    }

    async fn list_authored_posts(&self) -> Result<Vec<AuthoredPost>, DomainError> {
        let state = self.lock();
        state.posts.iter().map(|post| state.authored(post)).collect()
    }

    async fn list_bookmarked_posts(&self, user_id: i64) -> Result<Vec<AuthoredPost>, DomainError> {
        let state = self.lock();
        // bookmark ids grow with insertion, so reversing yields newest first
        let mut bookmarks: Vec<&Relation> = state
            .bookmarks
            .iter()
            .filter(|rel| rel.user_id == user_id)
            .collect();
        bookmarks.sort_by(|a, b| b.id.cmp(&a.id));

        bookmarks
            .into_iter()
            .filter_map(|rel| state.posts.iter().find(|p| p.id == rel.post_id))
            .map(|post| state.authored(post))
            .collect()
    }
}

#[async_trait]
impl EngagementRepository for InMemoryStore {
    async fn insert(
        &self,
        kind: EngagementKind,
        user_id: i64,
        post_id: i64,
    ) -> Result<InsertOutcome, DomainError> {
        let mut state = self.lock();
        if !state.posts.iter().any(|p| p.id == post_id) {
            return Err(DomainError::post_not_found(post_id));
        }
        if state
            .relations_mut(kind)
            .iter()
            .any(|rel| rel.user_id == user_id && rel.post_id == post_id)
        {
            return Ok(InsertOutcome::AlreadyPresent);
        }
        let id = state.next_id();
        state.tick();
        state.relations_mut(kind).push(Relation {
            id,
            user_id,
            post_id,
        });
        Ok(InsertOutcome::Inserted)
    }

    async fn remove(
        &self,
        kind: EngagementKind,
        user_id: i64,
        post_id: i64,
    ) -> Result<bool, DomainError> {
        let mut state = self.lock();
        let relations = state.relations_mut(kind);
        let before = relations.len();
        relations.retain(|rel| !(rel.user_id == user_id && rel.post_id == post_id));
        Ok(relations.len() < before)
    }

    async fn counts_for_posts(&self, post_ids: &[i64]) -> Result<Vec<PostCounts>, DomainError> {
        let state = self.lock();
        Ok(post_ids
            .iter()
            .filter(|id| state.posts.iter().any(|p| p.id == **id))
            .map(|&post_id| PostCounts {
                post_id,
                likes: state.likes.iter().filter(|r| r.post_id == post_id).count() as i64,
                comments: state
                    .comments
                    .iter()
                    .filter(|c| c.post_id == post_id)
                    .count() as i64,
            })
            .collect())
    }

    async fn marks_for_viewer(
        &self,
        user_id: i64,
        post_ids: &[i64],
    ) -> Result<Vec<EngagementMark>, DomainError> {
        let state = self.lock();
        let likes = state
            .likes
            .iter()
            .map(|rel| (EngagementKind::Like, rel));
        let bookmarks = state
            .bookmarks
            .iter()
            .map(|rel| (EngagementKind::Bookmark, rel));

        Ok(likes
            .chain(bookmarks)
            .filter(|(_, rel)| rel.user_id == user_id && post_ids.contains(&rel.post_id))
            .map(|(kind, rel)| EngagementMark {
                kind,
                user_id: rel.user_id,
                post_id: rel.post_id,
            })
            .collect())
    }
}

#[async_trait]
impl CommentRepository for InMemoryStore {
    async fn create_comment(&self, input: NewComment) -> Result<CommentView, DomainError> {
        let mut state = self.lock();
        if !state.posts.iter().any(|p| p.id == input.post_id) {
            return Err(DomainError::post_not_found(input.post_id));
        }
        let id = state.next_id();
        let created_at = state.tick();
        let comment = Comment {
            id,
            post_id: input.post_id,
            author_id: input.author_id,
            content: input.content,
            created_at,
            updated_at: created_at,
        };
        state.comments.push(comment.clone());
        state.comment_view(&comment)
    }

    async fn get_comment(&self, id: i64) -> Result<Option<Comment>, DomainError> {
        Ok(self.lock().comments.iter().find(|c| c.id == id).cloned())
    }

    async fn list_for_post(&self, post_id: i64) -> Result<Vec<CommentView>, DomainError> {
        let state = self.lock();
        // Insertion order; callers sort.
        state
            .comments
            .iter()
            .filter(|c| c.post_id == post_id)
            .map(|c| state.comment_view(c))
            .collect()
    }

    async fn update_content(
        &self,
        id: i64,
        content: String,
    ) -> Result<Option<CommentView>, DomainError> {
        let mut state = self.lock();
        let updated_at = state.tick();
        let Some(comment) = state.comments.iter_mut().find(|c| c.id == id) else {
            return Ok(None);
        };
        comment.content = content;
        comment.updated_at = updated_at;
        let comment = comment.clone();
        state.comment_view(&comment).map(Some)
    }

    async fn delete_comment(&self, id: i64) -> Result<bool, DomainError> {
        let mut state = self.lock();
        let before = state.comments.len();
        state.comments.retain(|c| c.id != id);
        Ok(state.comments.len() < before)
    }
}
