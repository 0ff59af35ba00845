use tracing::info;

use crate::data::user_repository::{ProfilePatch, UserRepository};
use crate::domain::error::DomainError;
use crate::domain::user::{UpdateProfileRequest, User};
use crate::infrastructure::password::hash_password;

pub(crate) struct UserService<U: UserRepository> {
    repo: U,
}

impl<U: UserRepository> UserService<U> {
    pub(crate) fn new(repo: U) -> Self {
        Self { repo }
    }

    pub(crate) async fn get_profile(&self, user_id: i64) -> Result<User, DomainError> {
        self.repo
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| DomainError::user_not_found(user_id))
    }

    /// Applies the non-empty fields of `req` to the viewer's own account.
    pub(crate) async fn update_profile(
        &self,
        viewer: &User,
        req: UpdateProfileRequest,
    ) -> Result<User, DomainError> {
        let req = req.validate()?;
        let password_hash = req.password.as_deref().map(hash_password).transpose()?;
        let password_changed = password_hash.is_some();

        let patch = ProfilePatch {
            full_name: req.full_name,
            bio: req.bio,
            avatar_url: req.avatar_url,
            password_hash,
        };
        let user = self
            .repo
            .update_profile(viewer.id, patch)
            .await?
            .ok_or_else(|| DomainError::user_not_found(viewer.id))?;

        info!(user_id = user.id, password_changed, "profile updated");
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::UserService;
    use crate::data::repositories::memory::InMemoryStore;
    use crate::data::user_repository::UserRepository;
    use crate::domain::error::DomainError;
    use crate::domain::user::UpdateProfileRequest;
    use crate::infrastructure::password::verify_password;

    #[tokio::test]
    async fn get_profile_of_missing_user_is_not_found() {
        let service = UserService::new(InMemoryStore::new());
        let err = service.get_profile(77).await.expect_err("must be missing");
        assert!(matches!(err, DomainError::NotFound(_)));
    }

    #[tokio::test]
    async fn update_profile_applies_only_given_fields() {
        let store = InMemoryStore::new();
        let user = store.seed_user("writer");
        let service = UserService::new(store.clone());

        let updated = service
            .update_profile(
                &user,
                UpdateProfileRequest {
                    bio: Some("I write".to_string()),
                    ..Default::default()
                },
            )
            .await
            .expect("update must succeed");
        assert_eq!(updated.bio.as_deref(), Some("I write"));
        assert_eq!(updated.full_name, user.full_name);

        let fetched = service.get_profile(user.id).await.expect("must exist");
        assert_eq!(fetched, updated);
    }

    #[tokio::test]
    async fn update_profile_rehashes_new_password() {
        let store = InMemoryStore::new();
        let user = store.seed_user("writer");
        let service = UserService::new(store.clone());

        service
            .update_profile(
                &user,
                UpdateProfileRequest {
                    password: Some("brand-new-secret".to_string()),
                    confirm_password: Some("brand-new-secret".to_string()),
                    ..Default::default()
                },
            )
            .await
            .expect("update must succeed");

        let creds = store
            .find_by_email(&user.email)
            .await
            .expect("lookup must succeed")
            .expect("user must exist");
        assert!(verify_password("brand-new-secret", &creds.password_hash).is_ok());
    }

    #[tokio::test]
    async fn update_profile_rejects_mismatched_confirmation() {
        let store = InMemoryStore::new();
        let user = store.seed_user("writer");
        let service = UserService::new(store);

        let err = service
            .update_profile(
                &user,
                UpdateProfileRequest {
                    password: Some("brand-new-secret".to_string()),
                    confirm_password: Some("different-secret".to_string()),
                    ..Default::default()
                },
            )
            .await
            .expect_err("mismatch must fail");
        assert!(matches!(err, DomainError::Validation { .. }));
    }
}
