use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use super::is_foreign_key_violation;
use crate::data::post_repository::{NewPost, PostPatch, PostRepository};
use crate::domain::error::DomainError;
use crate::domain::post::{AuthoredPost, Post};
use crate::domain::user::AuthorSummary;

#[derive(Debug, Clone)]
pub(crate) struct PostgresPostRepository {
    pool: PgPool,
}

impl PostgresPostRepository {
    pub(crate) fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct PostRow {
    id: i64,
    title: String,
    content: String,
    image_url: Option<String>,
    author_id: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(sqlx::FromRow)]
struct AuthoredPostRow {
    #[sqlx(flatten)]
    post: PostRow,
    author_username: String,
    author_full_name: String,
    author_avatar_url: Option<String>,
}

const AUTHORED_POST_SELECT: &str = r#"
    SELECT
        p.id,
        p.title,
        p.content,
        p.image_url,
        p.author_id,
        p.created_at,
        p.updated_at,
        u.username AS author_username,
        u.full_name AS author_full_name,
        u.avatar_url AS author_avatar_url
    FROM posts p
    JOIN users u ON u.id = p.author_id
"#;

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn create_post(&self, input: NewPost) -> Result<Post, DomainError> {
        let row = sqlx::query_as::<_, PostRow>(
            r#"
            INSERT INTO posts (title, content, image_url, author_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id, title, content, image_url, author_id, created_at, updated_at
            "#,
        )
        .bind(input.title)
        .bind(input.content)
        .bind(input.image_url)
        .bind(input.author_id)
        .fetch_one(&self.pool)
        .await
        .map_err(map_post_db_error)?;

        map_row_to_post(row)
    }

    async fn get_post(&self, id: i64) -> Result<Option<Post>, DomainError> {
        let row = sqlx::query_as::<_, PostRow>(
            r#"
            SELECT
            id,
            title,
            content,
            image_url,
            author_id,
            created_at,
            updated_at
            FROM posts
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_post_db_error)?;

        row.map(map_row_to_post).transpose()
    }

    async fn get_authored_post(&self, id: i64) -> Result<Option<AuthoredPost>, DomainError> {
        let row = sqlx::query_as::<_, AuthoredPostRow>(&format!(
            "{AUTHORED_POST_SELECT} WHERE p.id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_post_db_error)?;

        row.map(map_row_to_authored_post).transpose()
    }

    async fn update_post_owned(
        &self,
        post_id: i64,
        owner_id: i64,
        patch: PostPatch,
    ) -> Result<Option<Post>, DomainError> {
        let row = sqlx::query_as::<_, PostRow>(
            r#"
            UPDATE posts
            SET title = COALESCE($3, title),
                content = COALESCE($4, content),
                image_url = COALESCE($5, image_url),
                updated_at = NOW()
            WHERE id = $1 AND author_id = $2
            RETURNING id, title, content, image_url, author_id, created_at, updated_at
            "#,
        )
        .bind(post_id)
        .bind(owner_id)
        .bind(patch.title)
        .bind(patch.content)
        .bind(patch.image_url)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_post_db_error)?;

        row.map(map_row_to_post).transpose()
    }

    async fn delete_post(&self, id: i64) -> Result<bool, DomainError> {
        let result = sqlx::query(
            r#"
            DELETE FROM posts
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(map_post_db_error)?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_authored_posts(&self) -> Result<Vec<AuthoredPost>, DomainError> {
        let rows = sqlx::query_as::<_, AuthoredPostRow>(&format!(
            "{AUTHORED_POST_SELECT} ORDER BY p.created_at DESC, p.id ASC"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(map_post_db_error)?;

        rows.into_iter().map(map_row_to_authored_post).collect()
    }

    async fn list_bookmarked_posts(&self, user_id: i64) -> Result<Vec<AuthoredPost>, DomainError> {
        let rows = sqlx::query_as::<_, AuthoredPostRow>(&format!(
            r#"
            {AUTHORED_POST_SELECT}
            JOIN bookmarks b ON b.post_id = p.id
            WHERE b.user_id = $1
            ORDER BY b.created_at DESC, b.id DESC
            "#
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_post_db_error)?;

        rows.into_iter().map(map_row_to_authored_post).collect()
    }
}

fn map_row_to_post(row: PostRow) -> Result<Post, DomainError> {
    Post::new(
        row.id,
        row.title,
        row.content,
        row.author_id,
        row.created_at,
        row.updated_at,
    )
    .map(|post| post.with_image_url(row.image_url))
    .map_err(|err| DomainError::Unexpected(err.to_string()))
}

fn map_row_to_authored_post(row: AuthoredPostRow) -> Result<AuthoredPost, DomainError> {
    let author = AuthorSummary {
        id: row.post.author_id,
        username: row.author_username,
        full_name: row.author_full_name,
        avatar_url: row.author_avatar_url,
    };
    Ok(AuthoredPost {
        post: map_row_to_post(row.post)?,
        author,
    })
}

fn map_post_db_error(err: sqlx::Error) -> DomainError {
    if let sqlx::Error::Database(db_err) = &err
        && is_foreign_key_violation(db_err.as_ref())
    {
        return DomainError::NotFound("author".to_string());
    }
    DomainError::Unexpected(err.to_string())
}
