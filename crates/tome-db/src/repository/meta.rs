//! # Store Metadata Repository
//!
//! Key/value flags about the database itself. The only flag today is the
//! first-run marker that decides whether the root account is bootstrapped.

use sqlx::SqlitePool;
use tracing::info;

use crate::error::DbResult;

const INITIALIZED_KEY: &str = "initialized";

/// Repository for `store_meta` rows.
#[derive(Debug, Clone)]
pub struct MetaRepository {
    pool: SqlitePool,
}

impl MetaRepository {
    pub fn new(pool: SqlitePool) -> Self {
        MetaRepository { pool }
    }

    pub async fn get(&self, key: &str) -> DbResult<Option<String>> {
        let value = sqlx::query_scalar("SELECT value FROM store_meta WHERE key = ?1")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;
        Ok(value)
    }

    pub async fn set(&self, key: &str, value: &str) -> DbResult<()> {
        sqlx::query(
            r#"
            INSERT INTO store_meta (key, value) VALUES (?1, ?2)
            ON CONFLICT (key) DO UPDATE SET value = excluded.value
            "#,
        )
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Whether a previous run has already bootstrapped this database.
    pub async fn is_initialized(&self) -> DbResult<bool> {
        Ok(self.get(INITIALIZED_KEY).await?.as_deref() == Some("true"))
    }

    pub async fn mark_initialized(&self) -> DbResult<()> {
        info!("Marking database as initialized");
        self.set(INITIALIZED_KEY, "true").await
    }
}
