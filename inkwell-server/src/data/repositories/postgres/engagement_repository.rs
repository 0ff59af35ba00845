use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;

use super::{is_foreign_key_violation, is_unique_violation};
use crate::data::engagement_repository::EngagementRepository;
use crate::domain::engagement::{EngagementKind, EngagementMark, InsertOutcome, PostCounts};
use crate::domain::error::DomainError;

#[derive(Debug, Clone)]
pub(crate) struct PostgresEngagementRepository {
    pool: PgPool,
}

impl PostgresEngagementRepository {
    pub(crate) fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct PostCountsRow {
    post_id: i64,
    likes: i64,
    comments: i64,
}

#[derive(sqlx::FromRow)]
struct MarkRow {
    kind: String,
    user_id: i64,
    post_id: i64,
}

fn insert_sql(kind: EngagementKind) -> &'static str {
    match kind {
        EngagementKind::Like => "INSERT INTO likes (user_id, post_id) VALUES ($1, $2)",
        EngagementKind::Bookmark => "INSERT INTO bookmarks (user_id, post_id) VALUES ($1, $2)",
    }
}

fn delete_sql(kind: EngagementKind) -> &'static str {
    match kind {
        EngagementKind::Like => "DELETE FROM likes WHERE user_id = $1 AND post_id = $2",
        EngagementKind::Bookmark => "DELETE FROM bookmarks WHERE user_id = $1 AND post_id = $2",
    }
}

#[async_trait]
impl EngagementRepository for PostgresEngagementRepository {
    async fn insert(
        &self,
        kind: EngagementKind,
        user_id: i64,
        post_id: i64,
    ) -> Result<InsertOutcome, DomainError> {
        let result = sqlx::query(insert_sql(kind))
            .bind(user_id)
            .bind(post_id)
            .execute(&self.pool)
            .await;

        match result {
            Ok(_) => Ok(InsertOutcome::Inserted),
            Err(sqlx::Error::Database(db_err)) if is_unique_violation(db_err.as_ref()) => {
                debug!(
                    kind = kind.as_str(),
                    user_id,
                    post_id,
                    "duplicate insert rejected by unique constraint"
                );
                Ok(InsertOutcome::AlreadyPresent)
            }
            Err(sqlx::Error::Database(db_err)) if is_foreign_key_violation(db_err.as_ref()) => {
                Err(DomainError::post_not_found(post_id))
            }
            Err(err) => Err(DomainError::Unexpected(err.to_string())),
        }
    }

    async fn remove(
        &self,
        kind: EngagementKind,
        user_id: i64,
        post_id: i64,
    ) -> Result<bool, DomainError> {
        let result = sqlx::query(delete_sql(kind))
            .bind(user_id)
            .bind(post_id)
            .execute(&self.pool)
            .await
            .map_err(|err| DomainError::Unexpected(err.to_string()))?;

        Ok(result.rows_affected() > 0)
    }

    async fn counts_for_posts(&self, post_ids: &[i64]) -> Result<Vec<PostCounts>, DomainError> {
        if post_ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows = sqlx::query_as::<_, PostCountsRow>(
            r#"
            SELECT
                p.id AS post_id,
                (SELECT COUNT(*) FROM likes l WHERE l.post_id = p.id) AS likes,
                (SELECT COUNT(*) FROM comments c WHERE c.post_id = p.id) AS comments
            FROM posts p
            WHERE p.id = ANY($1)
            "#,
        )
        .bind(post_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(|err| DomainError::Unexpected(err.to_string()))?;

        Ok(rows
            .into_iter()
            .map(|row| PostCounts {
                post_id: row.post_id,
                likes: row.likes,
                comments: row.comments,
            })
            .collect())
    }

    async fn marks_for_viewer(
        &self,
        user_id: i64,
        post_ids: &[i64],
    ) -> Result<Vec<EngagementMark>, DomainError> {
        if post_ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows = sqlx::query_as::<_, MarkRow>(
            r#"
            SELECT 'like'::TEXT AS kind, user_id, post_id
            FROM likes
            WHERE user_id = $1 AND post_id = ANY($2)
            UNION ALL
            SELECT 'bookmark'::TEXT AS kind, user_id, post_id
            FROM bookmarks
            WHERE user_id = $1 AND post_id = ANY($2)
            "#,
        )
        .bind(user_id)
        .bind(post_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(|err| DomainError::Unexpected(err.to_string()))?;

        rows.into_iter().map(map_row_to_mark).collect()
    }
}

fn map_row_to_mark(row: MarkRow) -> Result<EngagementMark, DomainError> {
    let kind = match row.kind.as_str() {
        "like" => EngagementKind::Like,
        "bookmark" => EngagementKind::Bookmark,
        other => {
            return Err(DomainError::Unexpected(format!(
                "unknown engagement kind: {other}"
            )));
        }
    };
    Ok(EngagementMark {
        kind,
        user_id: row.user_id,
        post_id: row.post_id,
    })
}
