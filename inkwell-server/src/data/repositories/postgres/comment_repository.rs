use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use super::is_foreign_key_violation;
use crate::data::comment_repository::{CommentRepository, NewComment};
use crate::domain::comment::{Comment, CommentView};
use crate::domain::error::DomainError;
use crate::domain::user::AuthorSummary;

#[derive(Debug, Clone)]
pub(crate) struct PostgresCommentRepository {
    pool: PgPool,
}

impl PostgresCommentRepository {
    pub(crate) fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct CommentRow {
    id: i64,
    post_id: i64,
    user_id: i64,
    content: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(sqlx::FromRow)]
struct CommentViewRow {
    #[sqlx(flatten)]
    comment: CommentRow,
    author_username: String,
    author_full_name: String,
    author_avatar_url: Option<String>,
}

// Joins the author onto a CTE or table aliased `c`.
const AUTHOR_JOIN_COLUMNS: &str = r#"
    c.id,
    c.post_id,
    c.user_id,
    c.content,
    c.created_at,
    c.updated_at,
    u.username AS author_username,
    u.full_name AS author_full_name,
    u.avatar_url AS author_avatar_url
"#;

#[async_trait]
impl CommentRepository for PostgresCommentRepository {
    async fn create_comment(&self, input: NewComment) -> Result<CommentView, DomainError> {
        let post_id = input.post_id;
        let row = sqlx::query_as::<_, CommentViewRow>(&format!(
            r#"
            WITH c AS (
                INSERT INTO comments (post_id, user_id, content)
                VALUES ($1, $2, $3)
                RETURNING id, post_id, user_id, content, created_at, updated_at
            )
            SELECT {AUTHOR_JOIN_COLUMNS}
            FROM c
            JOIN users u ON u.id = c.user_id
            "#
        ))
        .bind(input.post_id)
        .bind(input.author_id)
        .bind(input.content)
        .fetch_one(&self.pool)
        .await
        .map_err(|err| map_comment_db_error(err, post_id))?;

        Ok(map_row_to_view(row))
    }

    async fn get_comment(&self, id: i64) -> Result<Option<Comment>, DomainError> {
        let row = sqlx::query_as::<_, CommentRow>(
            r#"
            SELECT id, post_id, user_id, content, created_at, updated_at
            FROM comments
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|err| DomainError::Unexpected(err.to_string()))?;

        Ok(row.map(map_row_to_comment))
    }

    async fn list_for_post(&self, post_id: i64) -> Result<Vec<CommentView>, DomainError> {
        let rows = sqlx::query_as::<_, CommentViewRow>(&format!(
            r#"
            SELECT {AUTHOR_JOIN_COLUMNS}
            FROM comments c
            JOIN users u ON u.id = c.user_id
            WHERE c.post_id = $1
            ORDER BY c.created_at DESC, c.id DESC
            "#
        ))
        .bind(post_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|err| DomainError::Unexpected(err.to_string()))?;

        Ok(rows.into_iter().map(map_row_to_view).collect())
    }

    async fn update_content(
        &self,
        id: i64,
        content: String,
    ) -> Result<Option<CommentView>, DomainError> {
        let row = sqlx::query_as::<_, CommentViewRow>(&format!(
            r#"
            WITH c AS (
                UPDATE comments
                SET content = $2,
                    updated_at = NOW()
                WHERE id = $1
                RETURNING id, post_id, user_id, content, created_at, updated_at
            )
            SELECT {AUTHOR_JOIN_COLUMNS}
            FROM c
            JOIN users u ON u.id = c.user_id
            "#
        ))
        .bind(id)
        .bind(content)
        .fetch_optional(&self.pool)
        .await
        .map_err(|err| DomainError::Unexpected(err.to_string()))?;

        Ok(row.map(map_row_to_view))
    }

    async fn delete_comment(&self, id: i64) -> Result<bool, DomainError> {
        let result = sqlx::query(
            r#"
            DELETE FROM comments
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|err| DomainError::Unexpected(err.to_string()))?;

        Ok(result.rows_affected() > 0)
    }
}

fn map_row_to_comment(row: CommentRow) -> Comment {
    Comment {
        id: row.id,
        post_id: row.post_id,
        author_id: row.user_id,
        content: row.content,
        created_at: row.created_at,
        updated_at: row.updated_at,
    }
}

fn map_row_to_view(row: CommentViewRow) -> CommentView {
    let author = AuthorSummary {
        id: row.comment.user_id,
        username: row.author_username,
        full_name: row.author_full_name,
        avatar_url: row.author_avatar_url,
    };
    CommentView {
        comment: map_row_to_comment(row.comment),
        author,
    }
}

fn map_comment_db_error(err: sqlx::Error, post_id: i64) -> DomainError {
    if let sqlx::Error::Database(db_err) = &err
        && is_foreign_key_violation(db_err.as_ref())
    {
        return DomainError::post_not_found(post_id);
    }
    DomainError::Unexpected(err.to_string())
}
