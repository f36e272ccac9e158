//! # Audit Log Repository
//!
//! Persists [`LogEntry`] records when the console is configured to keep the
//! audit log across restarts.

use chrono::{DateTime, Utc};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::DbResult;
use tome_core::LogEntry;

/// One `audit_log` row.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AuditRecord {
    pub seq: i64,
    pub operation: String,
    pub actor: String,
    pub details: String,
    pub recorded_at: DateTime<Utc>,
}

impl From<AuditRecord> for LogEntry {
    fn from(row: AuditRecord) -> Self {
        LogEntry {
            operation: row.operation,
            actor: row.actor,
            details: row.details,
            recorded_at: row.recorded_at,
        }
    }
}

/// Repository for audit rows.
#[derive(Debug, Clone)]
pub struct AuditLogRepository {
    pool: SqlitePool,
}

impl AuditLogRepository {
    pub fn new(pool: SqlitePool) -> Self {
        AuditLogRepository { pool }
    }

    /// Every entry in append order.
    pub async fn list(&self) -> DbResult<Vec<LogEntry>> {
        let rows = sqlx::query_as::<_, AuditRecord>(
            r#"
            SELECT seq, operation, actor, details, recorded_at
            FROM audit_log
            ORDER BY seq
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(LogEntry::from).collect())
    }

    pub async fn count(&self) -> DbResult<i64> {
        let count = sqlx::query_scalar("SELECT COUNT(*) FROM audit_log")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Rewrites the log inside the caller's transaction, preserving order.
    pub(crate) async fn replace_all(conn: &mut SqliteConnection, entries: &[LogEntry]) -> DbResult<()> {
        debug!(count = entries.len(), "Writing audit log");

        sqlx::query("DELETE FROM audit_log").execute(&mut *conn).await?;

        for (seq, entry) in (1_i64..).zip(entries) {
            sqlx::query(
                r#"
                INSERT INTO audit_log (seq, operation, actor, details, recorded_at)
                VALUES (?1, ?2, ?3, ?4, ?5)
                "#,
            )
            .bind(seq)
            .bind(&entry.operation)
            .bind(&entry.actor)
            .bind(&entry.details)
            .bind(entry.recorded_at)
            .execute(&mut *conn)
            .await?;
        }

        Ok(())
    }
}
