pub mod config;
pub mod error;
pub mod images;
pub mod models;
pub mod public_id;
pub mod schema;
pub mod users;

pub use config::StoreConfig;
pub use error::{Result, StoreError};
pub use models::{Image, NewImage, NewUser, User};
pub use sqlx;

use sqlx::PgPool;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use tracing::{debug, info};

/// Data-access handle for images and users.
///
/// Holds one pool against the configured database. Every domain operation
/// fails with `StoreError::NotConnected` unless `connect` has succeeded and
/// `disconnect` has not been called since. Operations share the pool and
/// take no locks of their own, so multi-step operations (`save_image`,
/// `like_image`) are not atomic with respect to each other.
#[derive(Debug)]
pub struct Store {
    config: StoreConfig,
    pool: Option<PgPool>,
}

impl Store {
    pub fn new(config: StoreConfig) -> Self {
        Self { config, pool: None }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn is_connected(&self) -> bool {
        self.pool.is_some()
    }

    /// Open the pool, provisioning the database and tables first when
    /// `setup` is on. Indexes are ensured and awaited on every connect.
    /// A no-op on a store that is already connected.
    pub async fn connect(&mut self) -> Result<()> {
        if self.pool.is_some() {
            debug!("Already connected to {}", self.config.address());
            return Ok(());
        }

        self.config.validate()?;
        let options = self.connect_options();

        if self.config.setup {
            schema::ensure_database(&options, &self.config.db).await?;
        }

        let pool = PgPoolOptions::new()
            .max_connections(self.config.max_connections)
            .connect_with(options.database(&self.config.db))
            .await
            .map_err(StoreError::Connection)?;

        if let Err(e) = schema::bootstrap(&pool, self.config.setup).await {
            pool.close().await;
            return Err(e);
        }

        info!("Connected to {}", self.config.address());
        self.pool = Some(pool);
        Ok(())
    }

    pub async fn disconnect(&mut self) -> Result<()> {
        let pool = self.pool.take().ok_or(StoreError::NotConnected)?;
        pool.close().await;

        info!("Disconnected from {}", self.config.address());
        Ok(())
    }

    /// The connected precondition. Domain operations call this before
    /// looking at their arguments.
    pub(crate) fn pool(&self) -> Result<&PgPool> {
        self.pool.as_ref().ok_or(StoreError::NotConnected)
    }

    fn connect_options(&self) -> PgConnectOptions {
        let options = PgConnectOptions::new()
            .host(&self.config.host)
            .port(self.config.port)
            .username(&self.config.user);

        match &self.config.password {
            Some(password) => options.password(password),
            None => options,
        }
    }
}
