//! Record types. `New*` structs are what callers hand to the store; the
//! others map one-to-one onto table rows.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewImage {
    #[serde(default)]
    pub description: String,
    pub url: String,
    #[serde(default)]
    pub likes: i64,
    pub user_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Image {
    pub id: Uuid,
    /// Set by the follow-up write in `save_image`; `None` only for a record
    /// caught between the insert and the patch.
    pub public_id: Option<String>,
    pub description: String,
    pub url: String,
    pub likes: i64,
    pub liked: bool,
    pub tags: Vec<String>,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Deserialize)]
pub struct NewUser {
    pub username: String,
    /// Plaintext. Replaced by its digest before it reaches the store.
    pub password: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
}

impl std::fmt::Debug for NewUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewUser")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("name", &self.name)
            .field("email", &self.email)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    /// Password digest.
    #[serde(skip_serializing)]
    pub password: String,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}
