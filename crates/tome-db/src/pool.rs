//! # Database Pool Management
//!
//! Connection pool creation and the snapshot load/save boundary.
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Console startup                                                        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Database::new(DbConfig::new(path)) ← create file, pool, migrations     │
//! │       │                                                                 │
//! │       ├── !is_initialized()  → bootstrap root, save, mark_initialized   │
//! │       └──  is_initialized()  → load_snapshot()                          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ... commands run in memory, no database traffic ...                    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  quit / exit / EOF → save_snapshot() → close()                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use crate::migrations;
use crate::repository::account::AccountRepository;
use crate::repository::audit::AuditLogRepository;
use crate::repository::book::BookRepository;
use crate::repository::meta::MetaRepository;
use crate::repository::transaction::TransactionRepository;
use tome_core::Snapshot;

const IN_MEMORY: &str = ":memory:";

// =============================================================================
// Configuration
// =============================================================================

/// Database configuration.
///
/// ## Example
/// ```rust,ignore
/// let config = DbConfig::new("./bookstore.db").max_connections(2);
/// ```
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// Path to the SQLite database file.
    pub database_path: PathBuf,

    /// Maximum number of connections in the pool.
    /// Default: 2 (one command loop, one writer at shutdown)
    pub max_connections: u32,

    /// Minimum number of connections to keep alive.
    /// Default: 1
    pub min_connections: u32,

    /// Connection timeout duration.
    /// Default: 30 seconds
    pub connect_timeout: Duration,

    /// Whether to run migrations on connect.
    /// Default: true
    pub run_migrations: bool,
}

impl DbConfig {
    /// Creates a configuration for the file at `path`, created if missing.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        DbConfig {
            database_path: path.into(),
            max_connections: 2,
            min_connections: 1,
            connect_timeout: Duration::from_secs(30),
            run_migrations: true,
        }
    }

    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    pub fn min_connections(mut self, min: u32) -> Self {
        self.min_connections = min;
        self
    }

    pub fn run_migrations(mut self, run: bool) -> Self {
        self.run_migrations = run;
        self
    }

    /// Creates an in-memory database configuration (for testing).
    pub fn in_memory() -> Self {
        DbConfig {
            database_path: PathBuf::from(IN_MEMORY),
            max_connections: 1, // In-memory requires single connection
            min_connections: 1,
            connect_timeout: Duration::from_secs(5),
            run_migrations: true,
        }
    }

    fn is_in_memory(&self) -> bool {
        self.database_path == Path::new(IN_MEMORY)
    }

    fn connect_options(&self) -> DbResult<SqliteConnectOptions> {
        let options = if self.is_in_memory() {
            SqliteConnectOptions::from_str("sqlite::memory:")
                .map_err(|e| DbError::ConnectionFailed(e.to_string()))?
        } else {
            SqliteConnectOptions::new()
                .filename(&self.database_path)
                .create_if_missing(true)
        };

        Ok(options
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal))
    }
}

// =============================================================================
// Database
// =============================================================================

/// Database handle providing repository access and snapshot I/O.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Opens (or creates) the database and, if enabled, runs migrations.
    pub async fn new(config: DbConfig) -> DbResult<Self> {
        info!(
            path = %config.database_path.display(),
            "Initializing database connection"
        );

        let connect_options = config.connect_options()?;
        debug!("Connection options configured");

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(config.connect_timeout)
            .connect_with(connect_options)
            .await
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?;

        info!(
            max_connections = config.max_connections,
            "Database pool created"
        );

        let db = Database { pool };

        if config.run_migrations {
            db.run_migrations().await?;
        }

        Ok(db)
    }

    pub async fn run_migrations(&self) -> DbResult<()> {
        migrations::run_migrations(&self.pool).await
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub fn accounts(&self) -> AccountRepository {
        AccountRepository::new(self.pool.clone())
    }

    pub fn books(&self) -> BookRepository {
        BookRepository::new(self.pool.clone())
    }

    pub fn transactions(&self) -> TransactionRepository {
        TransactionRepository::new(self.pool.clone())
    }

    pub fn audit_log(&self) -> AuditLogRepository {
        AuditLogRepository::new(self.pool.clone())
    }

    pub fn meta(&self) -> MetaRepository {
        MetaRepository::new(self.pool.clone())
    }

    // =========================================================================
    // Snapshot Boundary
    // =========================================================================

    /// Whether a previous run already bootstrapped this database.
    pub async fn is_initialized(&self) -> DbResult<bool> {
        self.meta().is_initialized().await
    }

    pub async fn mark_initialized(&self) -> DbResult<()> {
        self.meta().mark_initialized().await
    }

    /// Reads every record. The audit log is only read when `include_logs`.
    pub async fn load_snapshot(&self, include_logs: bool) -> DbResult<Snapshot> {
        let snapshot = Snapshot {
            accounts: self.accounts().list().await?,
            books: self.books().list().await?,
            transactions: self.transactions().list().await?,
            logs: if include_logs {
                self.audit_log().list().await?
            } else {
                Vec::new()
            },
        };

        info!(
            accounts = snapshot.accounts.len(),
            books = snapshot.books.len(),
            transactions = snapshot.transactions.len(),
            logs = snapshot.logs.len(),
            "Snapshot loaded"
        );
        Ok(snapshot)
    }

    /// Replaces the stored records with `snapshot` in one SQL transaction.
    ///
    /// When `include_logs` is false the stored audit log is left untouched.
    pub async fn save_snapshot(&self, snapshot: &Snapshot, include_logs: bool) -> DbResult<()> {
        let mut tx = self.pool.begin().await?;

        AccountRepository::replace_all(&mut tx, &snapshot.accounts).await?;
        BookRepository::replace_all(&mut tx, &snapshot.books).await?;
        TransactionRepository::replace_all(&mut tx, &snapshot.transactions).await?;
        if include_logs {
            AuditLogRepository::replace_all(&mut tx, &snapshot.logs).await?;
        }

        tx.commit().await?;

        info!(
            accounts = snapshot.accounts.len(),
            books = snapshot.books.len(),
            transactions = snapshot.transactions.len(),
            include_logs,
            "Snapshot saved"
        );
        Ok(())
    }

    /// Closes the database connection pool.
    pub async fn close(&self) {
        info!("Closing database connection pool");
        self.pool.close().await;
    }

    /// Checks if the database can execute queries.
    pub async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
