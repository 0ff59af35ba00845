use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::ValidateEmail;

use super::error::DomainError;

pub(crate) const PASSWORD_MIN_CHARS: usize = 6;
pub(crate) const PASSWORD_MAX_CHARS: usize = 128;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct RegisterRequest {
    pub(crate) username: Option<String>,
    pub(crate) email: String,
    pub(crate) password: String,
    pub(crate) full_name: String,
}

impl RegisterRequest {
    pub(crate) fn validate(self) -> Result<Self, DomainError> {
        let username = normalize_optional(self.username)
            .map(|username| normalize_register_username(&username))
            .transpose()?;
        let email = normalize_email(&self.email)?;
        validate_password(&self.password)?;
        let full_name = normalize_full_name(&self.full_name)?;

        Ok(Self {
            username,
            email,
            password: self.password,
            full_name,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct LoginRequest {
    pub(crate) email: String,
    pub(crate) password: String,
}

impl LoginRequest {
    pub(crate) fn validate(self) -> Result<Self, DomainError> {
        let email = self.email.trim().to_lowercase();
        if email.is_empty() || email.len() > 254 {
            return Err(DomainError::Validation {
                field: "email",
                message: "must be 1..254 chars",
            });
        }

        if self.password.is_empty() {
            return Err(DomainError::Validation {
                field: "password",
                message: "must not be empty",
            });
        }
        Ok(Self {
            email,
            password: self.password,
        })
    }
}

/// Partial profile update. `None` keeps the stored value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub(crate) struct UpdateProfileRequest {
    pub(crate) full_name: Option<String>,
    pub(crate) bio: Option<String>,
    pub(crate) avatar_url: Option<String>,
    pub(crate) password: Option<String>,
    pub(crate) confirm_password: Option<String>,
}

impl UpdateProfileRequest {
    pub(crate) fn validate(self) -> Result<Self, DomainError> {
        let full_name = normalize_optional(self.full_name)
            .map(|name| normalize_full_name(&name))
            .transpose()?;

        let bio = normalize_optional(self.bio);
        if bio.as_ref().is_some_and(|bio| bio.chars().count() > 500) {
            return Err(DomainError::Validation {
                field: "bio",
                message: "must be at most 500 chars",
            });
        }

        let avatar_url = normalize_optional(self.avatar_url);

        let password = self.password.filter(|password| !password.is_empty());
        if let Some(password) = &password {
            validate_password(password)?;
            if let Some(confirm) = &self.confirm_password
                && confirm != password
            {
                return Err(DomainError::Validation {
                    field: "confirm_password",
                    message: "passwords do not match",
                });
            }
        }

        Ok(Self {
            full_name,
            bio,
            avatar_url,
            password,
            confirm_password: None,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct User {
    pub(crate) id: i64,
    pub(crate) username: String,
    pub(crate) email: String,
    pub(crate) full_name: String,
    pub(crate) bio: Option<String>,
    pub(crate) avatar_url: Option<String>,
    pub(crate) created_at: DateTime<Utc>,
}

impl User {
    pub(crate) fn new(
        id: i64,
        username: impl Into<String>,
        email: impl Into<String>,
        full_name: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        if id <= 0 {
            return Err(DomainError::Validation {
                field: "id",
                message: "must be > 0",
            });
        }
        let username = normalize_register_username(&username.into())?;
        let email = normalize_email(&email.into())?;

        Ok(Self {
            id,
            username,
            email,
            full_name: full_name.into().trim().to_string(),
            bio: None,
            avatar_url: None,
            created_at,
        })
    }

    pub(crate) fn with_profile(mut self, bio: Option<String>, avatar_url: Option<String>) -> Self {
        self.bio = bio;
        self.avatar_url = avatar_url;
        self
    }

    #[cfg(test)]
    pub(crate) fn summary(&self) -> AuthorSummary {
        AuthorSummary {
            id: self.id,
            username: self.username.clone(),
            full_name: self.full_name.clone(),
            avatar_url: self.avatar_url.clone(),
        }
    }
}

/// Public projection of a user embedded into posts and comments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct AuthorSummary {
    pub(crate) id: i64,
    pub(crate) username: String,
    pub(crate) full_name: String,
    pub(crate) avatar_url: Option<String>,
}

/// Builds a username for signups that did not pick one: the email local part
/// followed by a four digit suffix.
pub(crate) fn generate_username(email: &str, suffix: u16) -> String {
    let local: String = email
        .split('@')
        .next()
        .unwrap_or_default()
        .chars()
        .filter(|ch| !ch.is_whitespace())
        .take(60)
        .collect();
    format!("{local}{:04}", suffix % 10_000)
}

pub(crate) fn normalize_register_username(username: &str) -> Result<String, DomainError> {
    let username = username.trim();
    let len = username.chars().count();
    if !(3..=64).contains(&len) {
        return Err(DomainError::Validation {
            field: "username",
            message: "must be 3..64 chars",
        });
    }
    Ok(username.to_string())
}

fn normalize_email(email: &str) -> Result<String, DomainError> {
    let email = email.trim().to_lowercase();
    if !email.validate_email() {
        return Err(DomainError::Validation {
            field: "email",
            message: "must be a valid email",
        });
    }
    Ok(email)
}

fn normalize_full_name(full_name: &str) -> Result<String, DomainError> {
    let full_name = full_name.trim();
    let len = full_name.chars().count();
    if len == 0 || len > 100 {
        return Err(DomainError::Validation {
            field: "full_name",
            message: "must be 1..100 chars",
        });
    }
    Ok(full_name.to_string())
}

fn validate_password(password: &str) -> Result<(), DomainError> {
    let password_len = password.chars().count();
    if !(PASSWORD_MIN_CHARS..=PASSWORD_MAX_CHARS).contains(&password_len) {
        return Err(DomainError::Validation {
            field: "password",
            message: "must be 6..128 chars",
        });
    }
    Ok(())
}

fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
