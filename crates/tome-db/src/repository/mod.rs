//! # Repository Module
//!
//! One repository per table.
//!
//! ## Read Path vs Write Path
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  load   db.books().list()          pool-backed, one query per table    │
//! │                                                                         │
//! │  save   Database::save_snapshot                                         │
//! │           BEGIN                                                         │
//! │             AccountRepository::replace_all(&mut tx, ...)                │
//! │             BookRepository::replace_all(&mut tx, ...)                   │
//! │             TransactionRepository::replace_all(&mut tx, ...)            │
//! │             AuditLogRepository::replace_all(&mut tx, ...)   (opt-in)    │
//! │           COMMIT                                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`AccountRepository`](account::AccountRepository) - user accounts
//! - [`BookRepository`](book::BookRepository) - inventory
//! - [`TransactionRepository`](transaction::TransactionRepository) - financial history
//! - [`AuditLogRepository`](audit::AuditLogRepository) - command audit log
//! - [`MetaRepository`](meta::MetaRepository) - first-run marker

pub mod account;
pub mod audit;
pub mod book;
pub mod meta;
pub mod transaction;
