use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;

use crate::users::repo_types::{NewUser, User};

/// Unique constraint names Postgres assigns to the inline `UNIQUE` columns.
const NAME_CONSTRAINT: &str = "users_name_key";
const EMAIL_CONSTRAINT: &str = "users_email_key";

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("name already taken")]
    NameTaken,
    #[error("email already taken")]
    EmailTaken,
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// Gateway to the `users` table.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_name(&self, name: &str) -> Result<Option<User>, StoreError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;
    /// Fails with `NameTaken`/`EmailTaken` when the storage constraint rejects the row.
    async fn insert(&self, new: NewUser<'_>) -> Result<User, StoreError>;
    /// Returns the number of rows touched; 0 when no user has that email.
    async fn update_password(&self, email: &str, password_hash: &str) -> Result<u64, StoreError>;
}

#[derive(Clone)]
pub struct PgUserStore {
    db: PgPool,
}

impl PgUserStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn find_by_name(&self, name: &str) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password, profile_picture
            FROM users
            WHERE name = $1
            "#,
        )
        .bind(name)
        .fetch_optional(&self.db)
        .await?;
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password, profile_picture
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.db)
        .await?;
        Ok(user)
    }

    async fn insert(&self, new: NewUser<'_>) -> Result<User, StoreError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (name, email, password, profile_picture)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, email, password, profile_picture
            "#,
        )
        .bind(new.name)
        .bind(new.email)
        .bind(new.password_hash)
        .bind(new.profile_picture)
        .fetch_one(&self.db)
        .await
        .map_err(classify)?;
        debug!(user_id = user.id, "user row inserted");
        Ok(user)
    }

    async fn update_password(&self, email: &str, password_hash: &str) -> Result<u64, StoreError> {
        let res = sqlx::query(r#"UPDATE users SET password = $1 WHERE email = $2"#)
            .bind(password_hash)
            .bind(email)
            .execute(&self.db)
            .await?;
        Ok(res.rows_affected())
    }
}

/// Maps a unique violation on `name` or `email` to its own variant.
fn classify(err: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.code().is_some_and(|code| code == "23505") {
            match db_err.constraint() {
                Some(NAME_CONSTRAINT) => return StoreError::NameTaken,
                Some(EMAIL_CONSTRAINT) => return StoreError::EmailTaken,
                _ => {}
            }
        }
    }
    StoreError::Database(err)
}
