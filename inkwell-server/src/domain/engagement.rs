use std::collections::{HashMap, HashSet};

/// The two unique per-(user, post) relations a viewer can toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum EngagementKind {
    Like,
    Bookmark,
}

impl EngagementKind {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Self::Like => "like",
            Self::Bookmark => "bookmark",
        }
    }
}

/// Result of inserting a relation row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum InsertOutcome {
    Inserted,
    /// The unique constraint rejected the row: it already exists.
    AlreadyPresent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct PostCounts {
    pub(crate) post_id: i64,
    pub(crate) likes: i64,
    pub(crate) comments: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct EngagementMark {
    pub(crate) kind: EngagementKind,
    pub(crate) user_id: i64,
    pub(crate) post_id: i64,
}

/// Engagement rows for a set of posts, keyed for lookup while annotating.
///
/// Marks are stored with their owner so a lookup for one viewer can never
/// pick up another user's like or bookmark.
#[derive(Debug, Default)]
pub(crate) struct EngagementIndex {
    counts: HashMap<i64, PostCounts>,
    marks: HashSet<EngagementMark>,
}

impl EngagementIndex {
    pub(crate) fn new(
        counts: impl IntoIterator<Item = PostCounts>,
        marks: impl IntoIterator<Item = EngagementMark>,
    ) -> Self {
        Self {
            counts: counts
                .into_iter()
                .map(|counts| (counts.post_id, counts))
                .collect(),
            marks: marks.into_iter().collect(),
        }
    }

    pub(crate) fn likes_count(&self, post_id: i64) -> i64 {
        self.counts.get(&post_id).map_or(0, |counts| counts.likes)
    }

    pub(crate) fn comments_count(&self, post_id: i64) -> i64 {
        self.counts.get(&post_id).map_or(0, |counts| counts.comments)
    }

    pub(crate) fn has_mark(
        &self,
        kind: EngagementKind,
        viewer_id: Option<i64>,
        post_id: i64,
    ) -> bool {
        viewer_id.is_some_and(|user_id| {
            self.marks.contains(&EngagementMark {
                kind,
                user_id,
                post_id,
            })
        })
    }
}
