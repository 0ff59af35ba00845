//! Viewer-relative annotation and ranking of posts.
//!
//! Everything here is pure: repositories hand over rows, these functions turn
//! them into the ordered view the API returns.

use std::cmp::Ordering;

use super::engagement::{EngagementIndex, EngagementKind};
use super::post::{AuthoredPost, Post};
use super::user::AuthorSummary;

pub(crate) const TRENDING_LIMIT: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FeedOrder {
    /// Newest first.
    Recency,
    /// Most liked first, capped at [`TRENDING_LIMIT`].
    Popularity,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct FeedQuery {
    pub(crate) title_contains: Option<String>,
    pub(crate) order: FeedOrder,
}

impl FeedQuery {
    pub(crate) fn latest() -> Self {
        Self {
            title_contains: None,
            order: FeedOrder::Recency,
        }
    }

    pub(crate) fn trending() -> Self {
        Self {
            title_contains: None,
            order: FeedOrder::Popularity,
        }
    }

    pub(crate) fn with_title_filter(mut self, needle: Option<String>) -> Self {
        self.title_contains = needle
            .map(|needle| needle.trim().to_lowercase())
            .filter(|needle| !needle.is_empty());
        self
    }

    /// Case-insensitive substring match on the title. The body is never searched.
    pub(crate) fn matches(&self, post: &Post) -> bool {
        match &self.title_contains {
            Some(needle) => post.title.to_lowercase().contains(needle.as_str()),
            None => true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct AnnotatedPost {
    pub(crate) post: Post,
    pub(crate) author: AuthorSummary,
    pub(crate) likes_count: i64,
    pub(crate) comments_count: i64,
    pub(crate) is_liked: bool,
    pub(crate) is_bookmarked: bool,
}

pub(crate) fn annotate(
    authored: AuthoredPost,
    index: &EngagementIndex,
    viewer_id: Option<i64>,
) -> AnnotatedPost {
    let post_id = authored.post.id;
    AnnotatedPost {
        likes_count: index.likes_count(post_id),
        comments_count: index.comments_count(post_id),
        is_liked: index.has_mark(EngagementKind::Like, viewer_id, post_id),
        is_bookmarked: index.has_mark(EngagementKind::Bookmark, viewer_id, post_id),
        post: authored.post,
        author: authored.author,
    }
}

/// Filters, annotates and orders `posts`. Posts without engagement rows stay
/// in the result with zero counts.
pub(crate) fn build_feed(
    posts: Vec<AuthoredPost>,
    index: &EngagementIndex,
    viewer_id: Option<i64>,
    query: &FeedQuery,
) -> Vec<AnnotatedPost> {
    let mut feed: Vec<AnnotatedPost> = posts
        .into_iter()
        .filter(|authored| query.matches(&authored.post))
        .map(|authored| annotate(authored, index, viewer_id))
        .collect();

    rank(&mut feed, query.order);
    if query.order == FeedOrder::Popularity {
        feed.truncate(TRENDING_LIMIT);
    }
    feed
}

pub(crate) fn rank(feed: &mut [AnnotatedPost], order: FeedOrder) {
    match order {
        FeedOrder::Recency => feed.sort_by(by_recency),
        FeedOrder::Popularity => feed.sort_by(|a, b| {
            b.likes_count
                .cmp(&a.likes_count)
                .then_with(|| by_recency(a, b))
        }),
    }
}

fn by_recency(a: &AnnotatedPost, b: &AnnotatedPost) -> Ordering {
    b.post
        .created_at
        .cmp(&a.post.created_at)
        .then_with(|| a.post.id.cmp(&b.post.id))
}
