use thiserror::Error;

pub type Result<T> = std::result::Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum StoreError {
    /// A domain operation ran before `connect` or after `disconnect`.
    #[error("not connected")]
    NotConnected,

    #[error("{resource} not found: {key}")]
    NotFound { resource: &'static str, key: String },

    /// The backing store rejected or failed a query.
    #[error("persistence error: {0}")]
    Persistence(#[from] sqlx::Error),

    /// The like counter is already at its maximum.
    #[error("like counter overflow on image {key}")]
    LikesOverflow { key: String },

    #[error("connection error: {0}")]
    Connection(#[source] sqlx::Error),

    #[error("indexes not ready: {}", pending.join(", "))]
    IndexTimeout { pending: Vec<String> },

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl StoreError {
    pub fn not_found(resource: &'static str, key: impl Into<String>) -> Self {
        Self::NotFound {
            resource,
            key: key.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
