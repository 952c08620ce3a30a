use anyhow::{Context, Result, bail};

use picstash_db::StoreConfig;

pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub store: StoreConfig,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Unset keys fall back to defaults; set but malformed keys are errors.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = StoreConfig::default();

        let store = StoreConfig {
            host: lookup("PICSTASH_DB_HOST").unwrap_or(defaults.host),
            port: parse_or(&lookup, "PICSTASH_DB_PORT", defaults.port)?,
            db: lookup("PICSTASH_DB_NAME").unwrap_or(defaults.db),
            user: lookup("PICSTASH_DB_USER").unwrap_or(defaults.user),
            password: lookup("PICSTASH_DB_PASSWORD").or(defaults.password),
            setup: match lookup("PICSTASH_DB_SETUP") {
                Some(raw) => parse_bool(&raw).context("PICSTASH_DB_SETUP")?,
                None => defaults.setup,
            },
            max_connections: parse_or(
                &lookup,
                "PICSTASH_DB_MAX_CONNECTIONS",
                defaults.max_connections,
            )?,
        };

        Ok(Self {
            host: lookup("PICSTASH_HOST").unwrap_or_else(|| "0.0.0.0".into()),
            port: parse_or(&lookup, "PICSTASH_PORT", 3000)?,
            store,
        })
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().with_context(|| format!("{key}={raw:?}")),
        None => Ok(default),
    }
}

fn parse_bool(raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => bail!("expected a boolean, got {other:?}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<ServerConfig> {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServerConfig::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn empty_environment_uses_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 3000);
        assert_eq!(config.store, StoreConfig::default());
    }

    #[test]
    fn reads_store_settings() {
        let config = config_from(&[
            ("PICSTASH_DB_HOST", "db.internal"),
            ("PICSTASH_DB_PORT", "6543"),
            ("PICSTASH_DB_NAME", "pictures"),
            ("PICSTASH_DB_PASSWORD", "s3cret"),
            ("PICSTASH_DB_SETUP", "YES"),
            ("PICSTASH_PORT", "8080"),
        ])
        .unwrap();

        assert_eq!(config.port, 8080);
        assert_eq!(config.store.host, "db.internal");
        assert_eq!(config.store.port, 6543);
        assert_eq!(config.store.db, "pictures");
        assert_eq!(config.store.password.as_deref(), Some("s3cret"));
        assert!(config.store.setup);
    }

    #[test]
    fn malformed_values_are_errors() {
        assert!(config_from(&[("PICSTASH_DB_PORT", "not-a-port")]).is_err());
        assert!(config_from(&[("PICSTASH_DB_SETUP", "maybe")]).is_err());
        assert!(config_from(&[("PICSTASH_PORT", "70000")]).is_err());
    }
}
