//! Ownership rules for mutating posts and comments.

use super::comment::Comment;
use super::post::Post;

pub(crate) fn can_modify_post(viewer_id: i64, post: &Post) -> bool {
    post.author_id == viewer_id
}

pub(crate) fn can_edit_comment(viewer_id: i64, comment: &Comment) -> bool {
    comment.author_id == viewer_id
}

/// A comment may be removed by whoever wrote it or by the author of the post
/// it was left on.
pub(crate) fn can_delete_comment(viewer_id: i64, comment: &Comment, post: &Post) -> bool {
    comment.author_id == viewer_id || post.author_id == viewer_id
}
