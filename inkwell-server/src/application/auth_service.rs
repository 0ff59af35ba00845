use tracing::{debug, info};

use crate::data::user_repository::{NewUser, UserRepository};
use crate::domain::error::DomainError;
use crate::domain::user::{LoginRequest, RegisterRequest, User, generate_username};
use crate::infrastructure::jwt::JwtService;
use crate::infrastructure::password::{hash_password, verify_dummy_password, verify_password};

#[derive(Debug, Clone)]
pub(crate) struct AuthResult {
    pub(crate) user: User,
    pub(crate) access_token: String,
}

pub(crate) struct AuthService<R: UserRepository> {
    repo: R,
    jwt: JwtService,
}

impl<R: UserRepository> AuthService<R> {
    const GENERATED_USERNAME_ATTEMPTS: usize = 3;

    pub(crate) fn new(repo: R, jwt: JwtService) -> Self {
        Self { repo, jwt }
    }

    pub(crate) async fn register(&self, req: RegisterRequest) -> Result<AuthResult, DomainError> {
        let req = req.validate()?;
        let password_hash = hash_password(&req.password)?;

        let user = match req.username {
            Some(username) => {
                self.repo
                    .create_user(NewUser {
                        username,
                        email: req.email,
                        password_hash,
                        full_name: req.full_name,
                    })
                    .await?
            }
            None => {
                self.create_with_generated_username(req.email, password_hash, req.full_name)
                    .await?
            }
        };
        info!(user_id = user.id, username = %user.username, "user registered");

        let access_token = self.issue_token(&user)?;
        Ok(AuthResult { user, access_token })
    }

    pub(crate) async fn login(&self, req: LoginRequest) -> Result<AuthResult, DomainError> {
        let req = req.validate()?;

        let Some(user_creds) = self.repo.find_by_email(&req.email).await? else {
            verify_dummy_password(&req.password)?;
            return Err(DomainError::InvalidCredentials);
        };

        verify_password(&req.password, &user_creds.password_hash)?;

        let access_token = self.issue_token(&user_creds.user)?;
        Ok(AuthResult {
            user: user_creds.user,
            access_token,
        })
    }

    /// Resolves a bearer token to a live user. Every failure is reported as
    /// `Unauthenticated`.
    pub(crate) async fn require_identity(&self, token: Option<&str>) -> Result<User, DomainError> {
        let token = token
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or(DomainError::Unauthenticated)?;

        let claims = self.jwt.verify_token(token).map_err(|err| {
            debug!(error = %err, "rejected bearer token");
            DomainError::Unauthenticated
        })?;

        self.repo
            .find_by_id(claims.user_id)
            .await?
            .ok_or(DomainError::Unauthenticated)
    }

    pub(crate) async fn optional_identity(&self, token: Option<&str>) -> Option<User> {
        let token = token?;
        match self.require_identity(Some(token)).await {
            Ok(user) => Some(user),
            Err(err) => {
                debug!(error = %err, "treating request as anonymous");
                None
            }
        }
    }

    async fn create_with_generated_username(
        &self,
        email: String,
        password_hash: String,
        full_name: String,
    ) -> Result<User, DomainError> {
        let mut last_err = DomainError::AlreadyExists("username".to_string());
        for _ in 0..Self::GENERATED_USERNAME_ATTEMPTS {
            let input = NewUser {
                username: generate_username(&email, rand::random::<u16>()),
                email: email.clone(),
                password_hash: password_hash.clone(),
                full_name: full_name.clone(),
            };
            match self.repo.create_user(input).await {
                Ok(user) => return Ok(user),
                Err(DomainError::AlreadyExists(field)) if field == "username" => {
                    last_err = DomainError::AlreadyExists(field);
                }
                Err(err) => return Err(err),
            }
        }
        Err(last_err)
    }

    fn issue_token(&self, user: &User) -> Result<String, DomainError> {
        self.jwt
            .generate_token(user.id, &user.username)
            .map_err(|err| DomainError::Unexpected(err.to_string()))
    }
}
