//! # tome-db: Snapshot Storage for Tome
//!
//! Persists the bookstore's records in a local SQLite file using sqlx.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Tome Data Flow                                   │
//! │                                                                         │
//! │  apps/console (startup / shutdown only)                                │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     tome-db (THIS CRATE)                        │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌────────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories  │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │                │    │  (embedded)  │  │   │
//! │  │   │               │    │ AccountRepo    │    │ 001_initial  │  │   │
//! │  │   │ load_snapshot │◄───│ BookRepo       │    │   _schema    │  │   │
//! │  │   │ save_snapshot │    │ TransactionRepo│    │              │  │   │
//! │  │   │               │    │ AuditLogRepo   │    │              │  │   │
//! │  │   └───────────────┘    └────────────────┘    └──────────────┘  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite file (TOME_DB_PATH, default ./bookstore.db)                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool and the snapshot boundary
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - One repository per table
//!
//! ## Usage
//!
//! ```rust,ignore
//! use tome_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("bookstore.db")).await?;
//! let snapshot = db.load_snapshot(false).await?;
//! // ... run commands ...
//! db.save_snapshot(&snapshot, false).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

pub use repository::account::AccountRepository;
pub use repository::audit::AuditLogRepository;
pub use repository::book::BookRepository;
pub use repository::meta::MetaRepository;
pub use repository::transaction::TransactionRepository;
