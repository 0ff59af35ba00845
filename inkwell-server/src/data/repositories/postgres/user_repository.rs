use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use super::is_unique_violation;
use crate::data::user_repository::{NewUser, ProfilePatch, UserCredentials, UserRepository};
use crate::domain::error::DomainError;
use crate::domain::user::User;

#[derive(Debug, Clone)]
pub(crate) struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    pub(crate) fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct UserRow {
    id: i64,
    username: String,
    email: String,
    full_name: String,
    bio: Option<String>,
    avatar_url: Option<String>,
    created_at: DateTime<Utc>,
}

#[derive(sqlx::FromRow)]
struct UserCredentialsRow {
    #[sqlx(flatten)]
    user: UserRow,
    password_hash: String,
}

const USER_COLUMNS: &str = "id, username, email, full_name, bio, avatar_url, created_at";

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn create_user(&self, input: NewUser) -> Result<User, DomainError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            r#"
            INSERT INTO users (username, email, password_hash, full_name)
            VALUES ($1, $2, $3, $4)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(input.username)
        .bind(input.email)
        .bind(input.password_hash)
        .bind(input.full_name)
        .fetch_one(&self.pool)
        .await
        .map_err(map_user_db_error)?;

        map_row_to_user(row)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserCredentials>, DomainError> {
        let row = sqlx::query_as::<_, UserCredentialsRow>(&format!(
            r#"
            SELECT {USER_COLUMNS}, password_hash
            FROM users
            WHERE email = $1
            "#
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_user_db_error)?;

        row.map(map_row_to_credentials).transpose()
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, DomainError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            r#"
            SELECT {USER_COLUMNS}
            FROM users
            WHERE id = $1
            "#
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_user_db_error)?;

        row.map(map_row_to_user).transpose()
    }

    async fn update_profile(
        &self,
        id: i64,
        patch: ProfilePatch,
    ) -> Result<Option<User>, DomainError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            r#"
            UPDATE users
            SET full_name = COALESCE($2, full_name),
                bio = COALESCE($3, bio),
                avatar_url = COALESCE($4, avatar_url),
                password_hash = COALESCE($5, password_hash),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(patch.full_name)
        .bind(patch.bio)
        .bind(patch.avatar_url)
        .bind(patch.password_hash)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_user_db_error)?;

        row.map(map_row_to_user).transpose()
    }
}

fn map_row_to_user(row: UserRow) -> Result<User, DomainError> {
    User::new(row.id, row.username, row.email, row.full_name, row.created_at)
        .map(|user| user.with_profile(row.bio, row.avatar_url))
        .map_err(|err| DomainError::Unexpected(err.to_string()))
}

fn map_row_to_credentials(row: UserCredentialsRow) -> Result<UserCredentials, DomainError> {
    Ok(UserCredentials {
        user: map_row_to_user(row.user)?,
        password_hash: row.password_hash,
    })
}

fn map_user_db_error(err: sqlx::Error) -> DomainError {
    if let sqlx::Error::Database(db_err) = &err
        && is_unique_violation(db_err.as_ref())
    {
        let resource = match db_err.constraint() {
            Some("users_username_key") => "username",
            Some("users_email_key") => "email",
            _ => "user",
        };
        return DomainError::AlreadyExists(resource.to_string());
    }
    DomainError::Unexpected(err.to_string())
}
