use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::DomainError;
use super::user::AuthorSummary;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct Post {
    pub(crate) id: i64,
    pub(crate) title: String,
    pub(crate) content: String,
    pub(crate) image_url: Option<String>,
    pub(crate) author_id: i64,
    pub(crate) created_at: DateTime<Utc>,
    pub(crate) updated_at: DateTime<Utc>,
}

/// A post joined with the public summary of its author.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct AuthoredPost {
    pub(crate) post: Post,
    pub(crate) author: AuthorSummary,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct CreatePostRequest {
    pub(crate) title: String,
    pub(crate) content: String,
    pub(crate) image_url: Option<String>,
}

impl CreatePostRequest {
    pub(crate) fn validate(self) -> Result<Self, DomainError> {
        Ok(Self {
            title: normalize_title(&self.title)?,
            content: normalize_content(&self.content)?,
            image_url: normalize_optional(self.image_url),
        })
    }
}

/// Partial update: a field that is `None` (or blank) keeps its stored value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub(crate) struct UpdatePostRequest {
    pub(crate) title: Option<String>,
    pub(crate) content: Option<String>,
    pub(crate) image_url: Option<String>,
}

impl UpdatePostRequest {
    pub(crate) fn validate(self) -> Result<Self, DomainError> {
        Ok(Self {
            title: normalize_optional(self.title)
                .map(|title| normalize_title(&title))
                .transpose()?,
            content: normalize_optional(self.content),
            image_url: normalize_optional(self.image_url),
        })
    }
}

impl Post {
    pub(crate) fn new(
        id: i64,
        title: impl Into<String>,
        content: impl Into<String>,
        author_id: i64,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        validate_positive_i64("id", id)?;
        validate_positive_i64("author_id", author_id)?;
        let title = normalize_title(&title.into())?;
        let content = normalize_content(&content.into())?;

        if updated_at < created_at {
            return Err(DomainError::Validation {
                field: "updated_at",
                message: "must be >= created_at",
            });
        }

        Ok(Self {
            id,
            title,
            content,
            image_url: None,
            author_id,
            created_at,
            updated_at,
        })
    }

    pub(crate) fn with_image_url(mut self, image_url: Option<String>) -> Self {
        self.image_url = normalize_optional(image_url);
        self
    }
}

fn validate_positive_i64(field: &'static str, value: i64) -> Result<(), DomainError> {
    if value <= 0 {
        return Err(DomainError::Validation {
            field,
            message: "must be > 0",
        });
    }
    Ok(())
}

fn normalize_title(title: &str) -> Result<String, DomainError> {
    let title = title.trim();
    if title.is_empty() || title.chars().count() > 255 {
        return Err(DomainError::Validation {
            field: "title",
            message: "must be 1..255 chars",
        });
    }
    Ok(title.to_string())
}

fn normalize_content(content: &str) -> Result<String, DomainError> {
    let content = content.trim();
    if content.is_empty() {
        return Err(DomainError::Validation {
            field: "content",
            message: "must not be empty",
        });
    }
    Ok(content.to_string())
}

fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
