use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Credential for authenticated calls. Every call that needs one takes it
/// explicitly; the client never stores it.
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    token: String,
}

impl Session {
    /// Wraps a bearer token obtained from signup or login.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }

    /// The raw bearer token.
    pub fn token(&self) -> &str {
        &self.token
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session").field("token", &"<redacted>").finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
/// The caller's own account.
pub struct User {
    /// User id.
    pub id: i64,
    /// Unique handle.
    pub username: String,
    /// Login email.
    pub email: String,
    /// Display name.
    pub full_name: String,
    /// Free-form bio.
    pub bio: Option<String>,
    /// Avatar image URL.
    pub avatar_url: Option<String>,
    /// Account creation time (UTC).
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
/// Another user's profile, without their email.
pub struct PublicProfile {
    /// User id.
    pub id: i64,
    /// Unique handle.
    pub username: String,
    /// Display name.
    pub full_name: String,
    /// Free-form bio.
    pub bio: Option<String>,
    /// Avatar image URL.
    pub avatar_url: Option<String>,
    /// Account creation time (UTC).
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
/// Author info embedded into posts and comments.
pub struct Author {
    /// User id.
    pub id: i64,
    /// Unique handle.
    pub username: String,
    /// Display name.
    pub full_name: String,
    /// Avatar image URL.
    pub avatar_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
/// Response of signup and login.
pub struct AuthResponse {
    /// JWT access token.
    pub access_token: String,
    /// The authenticated account.
    pub user: User,
}

impl AuthResponse {
    /// Session for subsequent authenticated calls.
    pub fn session(&self) -> Session {
        Session::new(self.access_token.clone())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
/// A post as stored, returned by create and update.
pub struct Post {
    /// Post id.
    pub id: i64,
    /// Title.
    pub title: String,
    /// Body.
    pub content: String,
    /// Cover image URL.
    pub image_url: Option<String>,
    /// Author's user id.
    pub author_id: i64,
    /// Creation time (UTC).
    pub created_at: DateTime<Utc>,
    /// Last update time (UTC).
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
/// A post in a feed, with counts and the caller's own flags.
pub struct FeedPost {
    /// Post id.
    pub id: i64,
    /// Title.
    pub title: String,
    /// Body.
    pub content: String,
    /// Cover image URL.
    pub image_url: Option<String>,
    /// Post author.
    pub author: Author,
    /// Number of likes.
    pub likes_count: i64,
    /// Number of comments.
    pub comments_count: i64,
    /// Whether the caller likes the post. Always `false` without a session.
    pub is_liked: bool,
    /// Whether the caller bookmarked the post. Always `false` without a session.
    pub is_bookmarked: bool,
    /// Creation time (UTC).
    pub created_at: DateTime<Utc>,
    /// Last update time (UTC).
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
/// A comment with its author.
pub struct Comment {
    /// Comment id.
    pub id: i64,
    /// Post the comment belongs to.
    pub post_id: i64,
    /// Comment text.
    pub content: String,
    /// Comment author.
    pub author: Author,
    /// Creation time (UTC).
    pub created_at: DateTime<Utc>,
    /// Last edit time (UTC).
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
/// A single post with its comments, newest first.
pub struct PostDetail {
    /// The annotated post.
    pub post: FeedPost,
    /// Comments, newest first.
    pub comments: Vec<Comment>,
}

#[derive(Debug, Clone, Default, Serialize)]
/// Signup payload. `username` is generated by the server when omitted.
pub struct SignupRequest {
    /// Desired handle.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// Login email.
    pub email: String,
    /// Password, 6..=128 chars.
    pub password: String,
    /// Display name.
    pub full_name: String,
}

#[derive(Debug, Clone, Default, Serialize)]
/// Payload for a new post.
pub struct NewPost {
    /// Title.
    pub title: String,
    /// Body.
    pub content: String,
    /// Cover image URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
/// Partial post update; `None` keeps the stored value.
pub struct PostUpdate {
    /// New title.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// New body.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// New cover image URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
/// Partial profile update; `None` keeps the stored value.
pub struct ProfileUpdate {
    /// New display name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    /// New bio.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    /// New avatar URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    /// New password.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    /// Must match `password` when given.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confirm_password: Option<String>,
}
