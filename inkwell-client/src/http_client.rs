use reqwest::{Client, Method, RequestBuilder};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use std::time::Duration;

use crate::error::{InkwellClientError, InkwellClientResult};
use crate::models::{
    AuthResponse, Comment, FeedPost, NewPost, Post, PostDetail, PostUpdate, ProfileUpdate,
    PublicProfile, Session, SignupRequest, User,
};

#[derive(Debug, Serialize)]
struct LoginRequestDto<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Serialize)]
struct CommentContentDto<'a> {
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct FeedQuery<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    search: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponseDto {
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LikeStateDto {
    liked: bool,
}

#[derive(Debug, Deserialize)]
struct BookmarkStateDto {
    bookmarked: bool,
}

#[derive(Debug, Clone)]
/// HTTP client for the Inkwell REST API.
///
/// Holds no credentials: authenticated calls take a [`Session`] argument.
pub struct InkwellClient {
    base_url: String,
    client: Client,
}

impl InkwellClient {
    /// Creates a client for the server at `base_url`, e.g. `http://127.0.0.1:5000`.
    pub fn new(base_url: impl Into<String>) -> InkwellClientResult<Self> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .timeout(Duration::from_secs(15))
            .build()?;

        Ok(Self {
            base_url: base_url.into(),
            client,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    fn request(&self, method: Method, path: &str, session: Option<&Session>) -> RequestBuilder {
        let request = self.client.request(method, self.endpoint(path));
        match session {
            Some(session) => request.bearer_auth(session.token()),
            None => request,
        }
    }

    async fn decode_error(response: reqwest::Response) -> InkwellClientError {
        let status = response.status();

        let message = match response.json::<ErrorResponseDto>().await {
            Ok(body) => body
                .error
                .unwrap_or_else(|| format!("http status {status}")),
            Err(_) => format!("http status {status}"),
        };
        InkwellClientError::from_http_status(status, Some(message))
    }

    async fn execute(request: RequestBuilder) -> InkwellClientResult<reqwest::Response> {
        let response = request
            .send()
            .await
            .map_err(InkwellClientError::from_reqwest)?;
        if !response.status().is_success() {
            return Err(Self::decode_error(response).await);
        }
        Ok(response)
    }

    async fn execute_json<TRes>(request: RequestBuilder) -> InkwellClientResult<TRes>
    where
        TRes: DeserializeOwned,
    {
        Self::execute(request)
            .await?
            .json::<TRes>()
            .await
            .map_err(InkwellClientError::from_reqwest)
    }

    /// Sends `body` as JSON and decodes a JSON response.
    async fn send_json<TReq, TRes>(
        &self,
        method: Method,
        path: &str,
        body: &TReq,
        session: Option<&Session>,
    ) -> InkwellClientResult<TRes>
    where
        TReq: Serialize + ?Sized,
        TRes: DeserializeOwned,
    {
        Self::execute_json(self.request(method, path, session).json(body)).await
    }

    async fn feed(
        &self,
        path: &str,
        session: Option<&Session>,
        search: Option<&str>,
    ) -> InkwellClientResult<Vec<FeedPost>> {
        let request = self
            .request(Method::GET, path, session)
            .query(&FeedQuery { search });
        Self::execute_json(request).await
    }

    /// Creates an account. The returned response carries a session.
    pub async fn signup(&self, request: &SignupRequest) -> InkwellClientResult<AuthResponse> {
        self.send_json(Method::POST, "/api/auth/signup", request, None)
            .await
    }

    /// Logs in by email.
    pub async fn login(&self, email: &str, password: &str) -> InkwellClientResult<AuthResponse> {
        let payload = LoginRequestDto { email, password };
        self.send_json(Method::POST, "/api/auth/login", &payload, None)
            .await
    }

    /// Returns the account behind `session`.
    pub async fn me(&self, session: &Session) -> InkwellClientResult<User> {
        Self::execute_json(self.request(Method::GET, "/api/auth/me", Some(session))).await
    }

    /// Latest feed, newest first. With a session, `is_liked`/`is_bookmarked`
    /// reflect the caller.
    pub async fn list_posts(
        &self,
        session: Option<&Session>,
        search: Option<&str>,
    ) -> InkwellClientResult<Vec<FeedPost>> {
        self.feed("/api/posts", session, search).await
    }

    /// Up to six posts ordered by like count.
    pub async fn trending_posts(
        &self,
        session: Option<&Session>,
        search: Option<&str>,
    ) -> InkwellClientResult<Vec<FeedPost>> {
        self.feed("/api/posts/trending", session, search).await
    }

    /// A single post with its comments.
    pub async fn get_post(
        &self,
        session: Option<&Session>,
        id: i64,
    ) -> InkwellClientResult<PostDetail> {
        let request = self.request(Method::GET, &format!("/api/posts/{id}"), session);
        Self::execute_json(request).await
    }

    /// Publishes a post as the session's user.
    pub async fn create_post(
        &self,
        session: &Session,
        post: &NewPost,
    ) -> InkwellClientResult<Post> {
        self.send_json(Method::POST, "/api/posts", post, Some(session))
            .await
    }

    /// Updates a post owned by the session's user.
    pub async fn update_post(
        &self,
        session: &Session,
        id: i64,
        update: &PostUpdate,
    ) -> InkwellClientResult<Post> {
        self.send_json(
            Method::PUT,
            &format!("/api/posts/{id}"),
            update,
            Some(session),
        )
        .await
    }

    /// Deletes a post owned by the session's user.
    pub async fn delete_post(&self, session: &Session, id: i64) -> InkwellClientResult<()> {
        let request = self.request(Method::DELETE, &format!("/api/posts/{id}"), Some(session));
        Self::execute(request).await?;
        Ok(())
    }

    /// Flips the like; returns whether the post is liked afterwards.
    pub async fn toggle_like(&self, session: &Session, id: i64) -> InkwellClientResult<bool> {
        let request = self.request(
            Method::POST,
            &format!("/api/posts/{id}/like"),
            Some(session),
        );
        let state: LikeStateDto = Self::execute_json(request).await?;
        Ok(state.liked)
    }

    /// Flips the bookmark; returns whether the post is bookmarked afterwards.
    pub async fn toggle_bookmark(&self, session: &Session, id: i64) -> InkwellClientResult<bool> {
        let request = self.request(
            Method::POST,
            &format!("/api/posts/{id}/bookmark"),
            Some(session),
        );
        let state: BookmarkStateDto = Self::execute_json(request).await?;
        Ok(state.bookmarked)
    }

    /// Comments on a post.
    pub async fn add_comment(
        &self,
        session: &Session,
        post_id: i64,
        content: &str,
    ) -> InkwellClientResult<Comment> {
        self.send_json(
            Method::POST,
            &format!("/api/posts/{post_id}/comment"),
            &CommentContentDto { content },
            Some(session),
        )
        .await
    }

    /// Edits one of the session user's comments.
    pub async fn edit_comment(
        &self,
        session: &Session,
        post_id: i64,
        comment_id: i64,
        content: &str,
    ) -> InkwellClientResult<Comment> {
        self.send_json(
            Method::PUT,
            &format!("/api/posts/{post_id}/comments/{comment_id}"),
            &CommentContentDto { content },
            Some(session),
        )
        .await
    }

    /// Deletes a comment. Allowed for its author and for the post's author.
    pub async fn delete_comment(
        &self,
        session: &Session,
        post_id: i64,
        comment_id: i64,
    ) -> InkwellClientResult<()> {
        let request = self.request(
            Method::DELETE,
            &format!("/api/posts/{post_id}/comments/{comment_id}"),
            Some(session),
        );
        Self::execute(request).await?;
        Ok(())
    }

    /// Posts the session's user bookmarked, most recent bookmark first.
    pub async fn bookmarks(&self, session: &Session) -> InkwellClientResult<Vec<FeedPost>> {
        Self::execute_json(self.request(Method::GET, "/api/users/bookmarks", Some(session))).await
    }

    /// Public profile of any user.
    pub async fn get_profile(&self, id: i64) -> InkwellClientResult<PublicProfile> {
        Self::execute_json(self.request(Method::GET, &format!("/api/users/{id}"), None)).await
    }

    /// Updates the session user's own profile.
    pub async fn update_profile(
        &self,
        session: &Session,
        update: &ProfileUpdate,
    ) -> InkwellClientResult<User> {
        self.send_json(Method::PUT, "/api/users/profile", update, Some(session))
            .await
    }
}
