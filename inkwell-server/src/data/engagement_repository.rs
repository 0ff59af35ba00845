use async_trait::async_trait;

use crate::domain::engagement::{EngagementKind, EngagementMark, InsertOutcome, PostCounts};
use crate::domain::error::DomainError;

#[async_trait]
pub(crate) trait EngagementRepository: Send + Sync {
    /// Inserts a `(user_id, post_id)` row. A duplicate rejected by the unique
    /// constraint is reported as [`InsertOutcome::AlreadyPresent`], never as an error.
    async fn insert(
        &self,
        kind: EngagementKind,
        user_id: i64,
        post_id: i64,
    ) -> Result<InsertOutcome, DomainError>;

    /// Returns `true` when a row was removed.
    async fn remove(&self, kind: EngagementKind, user_id: i64, post_id: i64)
    -> Result<bool, DomainError>;

    /// Like and comment totals for each of `post_ids` that has any.
    async fn counts_for_posts(&self, post_ids: &[i64]) -> Result<Vec<PostCounts>, DomainError>;

    /// Likes and bookmarks owned by `user_id` among `post_ids`.
    async fn marks_for_viewer(
        &self,
        user_id: i64,
        post_ids: &[i64],
    ) -> Result<Vec<EngagementMark>, DomainError>;
}
