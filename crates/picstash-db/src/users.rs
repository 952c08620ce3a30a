use chrono::Utc;
use picstash_utils::hash_password;
use tracing::debug;

use crate::Store;
use crate::error::{Result, StoreError};
use crate::models::{NewUser, User};

impl Store {
    /// Insert a user, storing only the digest of the password.
    /// Does not check whether `username` is already taken.
    pub async fn save_user(&self, user: NewUser) -> Result<User> {
        let pool = self.pool()?;

        let password_hash = hash_password(&user.password);

        let created: User = sqlx::query_as(
            "INSERT INTO users (username, password, name, email, created_at)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING id, username, password, name, email, created_at",
        )
        .bind(&user.username)
        .bind(&password_hash)
        .bind(&user.name)
        .bind(&user.email)
        .bind(Utc::now())
        .fetch_one(pool)
        .await?;

        debug!("Saved user {}", created.id);
        Ok(created)
    }

    /// Look up by username. With duplicates present, the earliest
    /// registration wins.
    pub async fn get_user(&self, username: &str) -> Result<User> {
        let pool = self.pool()?;

        sqlx::query_as(
            "SELECT id, username, password, name, email, created_at
             FROM users
             WHERE username = $1
             ORDER BY created_at ASC
             LIMIT 1",
        )
        .bind(username)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| StoreError::not_found("user", username))
    }

    /// `false` for a wrong password and for an unknown user alike.
    /// The digest comparison is not constant-time.
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<bool> {
        match self.get_user(username).await {
            Ok(user) => Ok(user.password == hash_password(password)),
            Err(e) if e.is_not_found() => Ok(false),
            Err(e) => Err(e),
        }
    }
}
