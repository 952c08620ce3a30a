use crate::error::{Result, StoreError};

pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_PORT: u16 = 5432;
pub const DEFAULT_DB: &str = "picstash";
pub const DEFAULT_USER: &str = "postgres";
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Postgres identifiers are truncated past this many bytes.
const MAX_DB_NAME_LEN: usize = 63;

/// Where the store lives and whether `connect` should provision it.
/// Fixed at construction; a `Store` never mutates its config.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub host: String,
    pub port: u16,
    pub db: String,
    pub user: String,
    pub password: Option<String>,
    /// Create the database and tables on connect. Off for stores that are
    /// already provisioned.
    pub setup: bool,
    pub max_connections: u32,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.into(),
            port: DEFAULT_PORT,
            db: DEFAULT_DB.into(),
            user: DEFAULT_USER.into(),
            password: None,
            setup: false,
            max_connections: DEFAULT_MAX_CONNECTIONS,
        }
    }
}

impl StoreConfig {
    pub fn with_db(mut self, db: impl Into<String>) -> Self {
        self.db = db.into();
        self
    }

    pub fn with_setup(mut self, setup: bool) -> Self {
        self.setup = setup;
        self
    }

    /// `host:port/db`, for log lines. Never includes credentials.
    pub fn address(&self) -> String {
        format!("{}:{}/{}", self.host, self.port, self.db)
    }

    /// The database name ends up inside `CREATE DATABASE`, which takes no
    /// bind parameters, so only plain identifiers are accepted.
    pub fn validate(&self) -> Result<()> {
        if self.db.is_empty() || self.db.len() > MAX_DB_NAME_LEN {
            return Err(StoreError::Config(format!(
                "database name must be 1-{} bytes, got {}",
                MAX_DB_NAME_LEN,
                self.db.len()
            )));
        }

        let mut chars = self.db.chars();
        let first_ok = chars
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || c == '_');
        if !first_ok || !chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(StoreError::Config(format!(
                "invalid database name: {:?}",
                self.db
            )));
        }

        if self.max_connections == 0 {
            return Err(StoreError::Config("max_connections must be at least 1".into()));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = StoreConfig::default();
        assert_eq!(config.host, "localhost");
        assert_eq!(config.port, 5432);
        assert_eq!(config.db, "picstash");
        assert!(!config.setup);
        assert_eq!(config.address(), "localhost:5432/picstash");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn accepts_plain_identifiers() {
        for name in ["picstash", "_scratch", "picstash_test_0f3a", "A1"] {
            assert!(StoreConfig::default().with_db(name).validate().is_ok(), "{name}");
        }
    }

    #[test]
    fn rejects_names_that_need_quoting() {
        let long = "a".repeat(64);
        for name in ["", "1picstash", "pic-stash", "pic stash", "pic\"; DROP", long.as_str()] {
            let err = StoreConfig::default().with_db(name).validate().unwrap_err();
            assert!(matches!(err, StoreError::Config(_)), "{name}");
        }
    }

    #[test]
    fn rejects_empty_pool() {
        let config = StoreConfig {
            max_connections: 0,
            ..StoreConfig::default()
        };
        assert!(matches!(config.validate(), Err(StoreError::Config(_))));
    }
}
