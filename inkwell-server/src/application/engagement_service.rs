use tracing::debug;

use crate::data::engagement_repository::EngagementRepository;
use crate::domain::engagement::{EngagementKind, InsertOutcome};
use crate::domain::error::DomainError;
use crate::domain::user::User;

pub(crate) struct EngagementService<E: EngagementRepository> {
    repo: E,
}

impl<E: EngagementRepository> EngagementService<E> {
    pub(crate) fn new(repo: E) -> Self {
        Self { repo }
    }

    /// Returns whether the viewer likes the post afterwards.
    pub(crate) async fn toggle_like(
        &self,
        viewer: &User,
        post_id: i64,
    ) -> Result<bool, DomainError> {
        self.toggle(EngagementKind::Like, viewer, post_id).await
    }

    /// Returns whether the viewer has the post bookmarked afterwards.
    pub(crate) async fn toggle_bookmark(
        &self,
        viewer: &User,
        post_id: i64,
    ) -> Result<bool, DomainError> {
        self.toggle(EngagementKind::Bookmark, viewer, post_id).await
    }

    // Delete first: if a row went away the relation is now off. Otherwise try
    // to create it; losing an insert race to the unique constraint still means on.
    async fn toggle(
        &self,
        kind: EngagementKind,
        viewer: &User,
        post_id: i64,
    ) -> Result<bool, DomainError> {
        if self.repo.remove(kind, viewer.id, post_id).await? {
            debug!(kind = kind.as_str(), user_id = viewer.id, post_id, "relation removed");
            return Ok(false);
        }

        match self.repo.insert(kind, viewer.id, post_id).await? {
            InsertOutcome::Inserted => {
                debug!(kind = kind.as_str(), user_id = viewer.id, post_id, "relation added");
            }
            InsertOutcome::AlreadyPresent => {
                debug!(
                    kind = kind.as_str(),
                    user_id = viewer.id,
                    post_id,
                    "relation added concurrently"
                );
            }
        }
        Ok(true)
    }
}
