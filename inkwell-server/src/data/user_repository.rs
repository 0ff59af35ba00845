use async_trait::async_trait;

use crate::domain::error::DomainError;
use crate::domain::user::User;

#[derive(Debug, Clone)]
pub(crate) struct UserCredentials {
    pub(crate) user: User,
    pub(crate) password_hash: String,
}

#[derive(Debug, Clone)]
pub(crate) struct NewUser {
    pub(crate) username: String,
    pub(crate) email: String,
    pub(crate) password_hash: String,
    pub(crate) full_name: String,
}

/// Fields left as `None` keep their stored value.
#[derive(Debug, Clone, Default)]
pub(crate) struct ProfilePatch {
    pub(crate) full_name: Option<String>,
    pub(crate) bio: Option<String>,
    pub(crate) avatar_url: Option<String>,
    pub(crate) password_hash: Option<String>,
}

#[async_trait]
pub(crate) trait UserRepository: Send + Sync {
    async fn create_user(&self, input: NewUser) -> Result<User, DomainError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<UserCredentials>, DomainError>;
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, DomainError>;
    async fn update_profile(&self, id: i64, patch: ProfilePatch)
    -> Result<Option<User>, DomainError>;
}
