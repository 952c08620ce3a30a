use std::time::Duration;

use sqlx::postgres::{PgConnectOptions, PgConnection};
use sqlx::{Connection, PgPool};
use tracing::{debug, info, warn};

use crate::error::{Result, StoreError};

/// Database every Postgres server has, used to check for and create ours.
const MAINTENANCE_DB: &str = "postgres";

/// SQLSTATE for `duplicate_database`.
const DUPLICATE_DATABASE: &str = "42P04";

const INDEX_READY_ATTEMPTS: u32 = 50;
const INDEX_READY_INTERVAL: Duration = Duration::from_millis(100);

const TABLES: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS images (
        id          UUID PRIMARY KEY DEFAULT gen_random_uuid(),
        public_id   TEXT,
        description TEXT NOT NULL DEFAULT '',
        url         TEXT NOT NULL,
        likes       BIGINT NOT NULL DEFAULT 0 CHECK (likes >= 0),
        liked       BOOLEAN NOT NULL DEFAULT FALSE,
        tags        TEXT[] NOT NULL DEFAULT '{}',
        user_id     TEXT NOT NULL,
        created_at  TIMESTAMPTZ NOT NULL
    )",
    // username is indexed, not UNIQUE: uniqueness is checked by lookup.
    "CREATE TABLE IF NOT EXISTS users (
        id          UUID PRIMARY KEY DEFAULT gen_random_uuid(),
        username    TEXT NOT NULL,
        password    TEXT NOT NULL,
        name        TEXT NOT NULL DEFAULT '',
        email       TEXT NOT NULL DEFAULT '',
        created_at  TIMESTAMPTZ NOT NULL
    )",
];

/// (name, DDL) for every secondary index queries rely on.
pub const INDEXES: &[(&str, &str)] = &[
    (
        "images_created_at_idx",
        "CREATE INDEX IF NOT EXISTS images_created_at_idx ON images (created_at)",
    ),
    (
        "images_user_id_idx",
        "CREATE INDEX IF NOT EXISTS images_user_id_idx ON images (user_id)",
    ),
    (
        "users_username_idx",
        "CREATE INDEX IF NOT EXISTS users_username_idx ON users (username)",
    ),
];

/// Create `db` on the server unless it already exists. `db` must have passed
/// `StoreConfig::validate`.
pub async fn ensure_database(options: &PgConnectOptions, db: &str) -> Result<()> {
    let mut conn = PgConnection::connect_with(&options.clone().database(MAINTENANCE_DB))
        .await
        .map_err(StoreError::Connection)?;

    let result = create_database_if_missing(&mut conn, db).await;
    if let Err(e) = conn.close().await {
        warn!("Failed to close maintenance connection: {}", e);
    }
    result
}

async fn create_database_if_missing(conn: &mut PgConnection, db: &str) -> Result<()> {
    let exists: bool =
        sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM pg_database WHERE datname = $1)")
            .bind(db)
            .fetch_one(&mut *conn)
            .await
            .map_err(StoreError::Connection)?;

    if exists {
        return Ok(());
    }

    // CREATE DATABASE takes no bind parameters.
    let ddl = format!("CREATE DATABASE \"{db}\"");
    match sqlx::raw_sql(&ddl).execute(&mut *conn).await {
        Ok(_) => {
            info!("Created database {}", db);
            Ok(())
        }
        // Another process created it between the check and the create.
        Err(e) if is_duplicate_database(&e) => Ok(()),
        Err(e) => Err(StoreError::Connection(e)),
    }
}

fn is_duplicate_database(e: &sqlx::Error) -> bool {
    e.as_database_error()
        .and_then(|db_err| db_err.code())
        .is_some_and(|code| code == DUPLICATE_DATABASE)
}

/// Tables (when `setup` is on), then indexes, then the readiness barrier.
/// Every statement is `IF NOT EXISTS`, so running this against a
/// provisioned store changes nothing.
pub async fn bootstrap(pool: &PgPool, setup: bool) -> Result<()> {
    if setup {
        for ddl in TABLES {
            sqlx::query(ddl)
                .execute(pool)
                .await
                .map_err(StoreError::Connection)?;
        }
    }

    for (_, ddl) in INDEXES {
        sqlx::query(ddl)
            .execute(pool)
            .await
            .map_err(StoreError::Connection)?;
    }

    wait_for_indexes(pool).await?;

    info!("Schema bootstrap complete");
    Ok(())
}

/// Block until every index in `INDEXES` is valid and ready, so the first
/// lookup after a fresh create cannot miss rows.
async fn wait_for_indexes(pool: &PgPool) -> Result<()> {
    let names: Vec<String> = INDEXES.iter().map(|(name, _)| name.to_string()).collect();
    let mut pending = names.clone();

    for attempt in 1..=INDEX_READY_ATTEMPTS {
        let ready: Vec<String> = sqlx::query_scalar(
            "SELECT c.relname::text
             FROM pg_index i
             JOIN pg_class c ON c.oid = i.indexrelid
             WHERE c.relname::text = ANY($1)
               AND pg_table_is_visible(c.oid)
               AND i.indisready
               AND i.indisvalid",
        )
        .bind(&names)
        .fetch_all(pool)
        .await
        .map_err(StoreError::Connection)?;

        pending.retain(|name| !ready.contains(name));
        if pending.is_empty() {
            return Ok(());
        }

        debug!(attempt, ?pending, "Waiting for indexes");
        tokio::time::sleep(INDEX_READY_INTERVAL).await;
    }

    Err(StoreError::IndexTimeout { pending })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_index_ddl_names_its_index() {
        for (name, ddl) in INDEXES {
            assert!(ddl.contains(&format!("IF NOT EXISTS {name} ")), "{ddl}");
        }
    }

    #[test]
    fn ddl_is_idempotent() {
        for ddl in TABLES {
            assert!(ddl.starts_with("CREATE TABLE IF NOT EXISTS"));
        }
        for (_, ddl) in INDEXES {
            assert!(ddl.starts_with("CREATE INDEX IF NOT EXISTS"));
        }
    }
}
