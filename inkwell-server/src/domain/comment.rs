use chrono::{DateTime, Utc};

use super::error::DomainError;
use super::user::AuthorSummary;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Comment {
    pub(crate) id: i64,
    pub(crate) post_id: i64,
    pub(crate) author_id: i64,
    pub(crate) content: String,
    pub(crate) created_at: DateTime<Utc>,
    pub(crate) updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct CommentView {
    pub(crate) comment: Comment,
    pub(crate) author: AuthorSummary,
}

pub(crate) fn normalize_comment_content(content: &str) -> Result<String, DomainError> {
    let content = content.trim();
    if content.is_empty() {
        return Err(DomainError::Validation {
            field: "content",
            message: "must not be empty",
        });
    }
    if content.chars().count() > 5_000 {
        return Err(DomainError::Validation {
            field: "content",
            message: "must be at most 5000 chars",
        });
    }
    Ok(content.to_string())
}

/// Newest first; equal timestamps fall back to the newer id.
pub(crate) fn sort_newest_first(comments: &mut [CommentView]) {
    comments.sort_by(|a, b| {
        b.comment
            .created_at
            .cmp(&a.comment.created_at)
            .then_with(|| b.comment.id.cmp(&a.comment.id))
    });
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};

    use super::{Comment, CommentView, normalize_comment_content, sort_newest_first};
    use crate::domain::error::DomainError;
    use crate::domain::user::AuthorSummary;

    #[test]
    fn blank_content_is_rejected() {
        let err = normalize_comment_content(" \n\t ").expect_err("blank must fail");
        assert!(matches!(
            err,
            DomainError::Validation {
                field: "content",
                ..
            }
        ));
    }

    #[test]
    fn content_length_is_capped_in_characters() {
        let longest = "ж".repeat(5_000);
        assert_eq!(normalize_comment_content(&longest).expect("at the cap"), longest);
        assert!(normalize_comment_content(&"ж".repeat(5_001)).is_err());
    }

    #[test]
    fn content_is_trimmed() {
        assert_eq!(
            normalize_comment_content("  nice post  ").expect("valid"),
            "nice post"
        );
    }

    #[test]
    fn comments_sort_newest_first_with_id_tiebreak() {
        let now = Utc::now();
        let mut comments = vec![
            view(1, now - Duration::minutes(5)),
            view(2, now),
            view(3, now),
        ];

        sort_newest_first(&mut comments);

        let ids: Vec<i64> = comments.iter().map(|c| c.comment.id).collect();
        assert_eq!(ids, vec![3, 2, 1]);
    }

    fn view(id: i64, created_at: chrono::DateTime<Utc>) -> CommentView {
        CommentView {
            comment: Comment {
                id,
                post_id: 1,
                author_id: 1,
                content: "c".to_string(),
                created_at,
                updated_at: created_at,
            },
            author: AuthorSummary {
                id: 1,
                username: "reader".to_string(),
                full_name: "Reader".to_string(),
                avatar_url: None,
            },
        }
    }
}
