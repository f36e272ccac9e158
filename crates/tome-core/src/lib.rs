//! # tome-core: Pure Business Logic for the Tome Bookstore Console
//!
//! This crate is the **heart** of Tome. It contains the command validation
//! and privilege-authorization engine as pure, synchronous code with zero I/O.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Tome Architecture                               │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 apps/console (stdin → stdout)                   │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ one line at a time                     │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ tome-core (THIS CRATE) ★                        │   │
//! │  │                                                                 │   │
//! │  │  dispatcher ──► tokenizer ──► engine handlers                   │   │
//! │  │                                   │                             │   │
//! │  │        ┌────────────┬─────────────┼─────────────┐               │   │
//! │  │        ▼            ▼             ▼             ▼               │   │
//! │  │   validation    session      selection        store             │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO STDOUT • DETERMINISTIC              │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │ Snapshot                               │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    tome-db (SQLite)                             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`validation`] - Token predicates (user ID, ISBN, keywords, price...)
//! - [`money`] - Integer-cent money type
//! - [`types`] - Domain records (Account, Book, Transaction, LogEntry)
//! - [`store`] - In-memory record store and persistence snapshot
//! - [`session`] - Nested login stack
//! - [`selection`] - Per-identity selected book
//! - [`tokenizer`] - Quote-aware line splitting
//! - [`engine`] - Command handlers and the audit protocol
//! - [`dispatcher`] - Verb routing and the line-level reply
//! - [`report`] - Output formatting
//!
//! ## Example Usage
//!
//! ```rust
//! use tome_core::{Bookstore, Dispatcher, Reply};
//!
//! let mut dispatcher = Dispatcher::new(Bookstore::bootstrap());
//! assert!(matches!(dispatcher.dispatch("su root sjtu"), Reply::Applied(_)));
//! assert!(matches!(dispatcher.dispatch("delete root"), Reply::Rejected(_)));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod dispatcher;
pub mod engine;
pub mod error;
pub mod money;
pub mod report;
pub mod selection;
pub mod session;
pub mod store;
pub mod tokenizer;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use dispatcher::{Dispatcher, Reply};
pub use engine::{Bookstore, LogoutPolicy, Response};
pub use error::{CommandError, CommandResult, ValidationError};
pub use money::Money;
pub use store::{RecordStore, Snapshot};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Identity of the administrator account created on first run.
pub const ROOT_USER_ID: &str = "root";

/// Password of the bootstrap administrator account.
pub const ROOT_PASSWORD: &str = "sjtu";

/// Display name of the bootstrap administrator account.
pub const ROOT_USERNAME: &str = "root";

/// The single user-facing rejection marker.
pub const INVALID_MARKER: &str = "Invalid";
