//! # Error Types
//!
//! Domain-specific error types for tome-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  tome-core errors (this file)                                          │
//! │  ├── ValidationError  - A token failed its lexical grammar             │
//! │  └── CommandError     - Any reason a command is rejected               │
//! │                                                                         │
//! │  tome-db errors (separate crate)                                       │
//! │  └── DbError          - Snapshot load/save failures                    │
//! │                                                                         │
//! │  Flow: ValidationError → CommandError → "Invalid" on stdout            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## One Taxonomy, Many Reasons
//! The user only ever sees `Invalid`. The variants below exist so that the
//! reason survives into diagnostics and tests, never into command output.

use thiserror::Error;

use crate::types::Privilege;

// =============================================================================
// Command Error
// =============================================================================

/// Why a command was rejected.
///
/// A rejected command mutates nothing and writes no audit entry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    /// The verb is not recognised.
    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    /// Wrong number of tokens for the command.
    #[error("{command} takes {min} to {max} tokens, got {actual}")]
    Arity {
        command: &'static str,
        min: usize,
        max: usize,
        actual: usize,
    },

    /// An argument failed its lexical grammar.
    #[error("Invalid argument: {0}")]
    Validation(#[from] ValidationError),

    /// A `-flag=` argument that the command does not accept.
    #[error("Unknown flag: {0}")]
    UnknownFlag(String),

    /// The same `-flag=` appeared more than once.
    #[error("Flag given more than once: {0}")]
    RepeatedFlag(&'static str),

    /// The current session's privilege is below the command's requirement.
    #[error("Requires privilege {required:?}, current is {current:?}")]
    InsufficientPrivilege {
        required: Privilege,
        current: Privilege,
    },

    /// Wrong password, or password omitted without the rank to skip it.
    #[error("Authentication failed for {0}")]
    AuthenticationFailed(String),

    /// Referenced account does not exist.
    #[error("Account not found: {0}")]
    AccountNotFound(String),

    /// Account identity is already taken.
    #[error("Account already exists: {0}")]
    AccountExists(String),

    /// `useradd` may only create ranks strictly below the caller.
    #[error("Cannot grant {requested:?} from {current:?}")]
    PrivilegeNotGrantable {
        requested: Privilege,
        current: Privilege,
    },

    /// The account has at least one frame on the login stack.
    #[error("Account {0} is logged in")]
    AccountActive(String),

    /// Referenced book does not exist.
    #[error("Book not found: {0}")]
    BookNotFound(String),

    /// `modify -ISBN=` to a key that is taken or unchanged.
    #[error("ISBN {0} is unavailable")]
    IsbnUnavailable(String),

    /// Not enough stock for a purchase.
    #[error("Insufficient stock for {isbn}: available {available}, requested {requested}")]
    InsufficientStock {
        isbn: String,
        available: i64,
        requested: i64,
    },

    /// `modify` / `import` without a prior `select`.
    #[error("No book selected")]
    NoSelection,

    /// `import` with a zero total cost.
    #[error("Total cost must be positive")]
    NonPositiveCost,

    /// `show finance N` with N above the transaction count.
    #[error("Requested {requested} transactions, only {available} recorded")]
    CountExceedsHistory { requested: u64, available: usize },

    /// An amount or stock level left the representable range.
    #[error("Arithmetic overflow")]
    Overflow,

    /// Session stack was popped while empty.
    #[error(transparent)]
    Session(#[from] SessionError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Lexical validation errors for a single token.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required value is empty.
    #[error("{field} is required")]
    Required { field: &'static str },

    /// Value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: &'static str, max: usize },

    /// Value contains a character outside its charset.
    #[error("{field} contains invalid character {found:?}")]
    InvalidCharacter { field: &'static str, found: char },

    /// Invalid format (e.g. two decimal points, missing quotes).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat {
        field: &'static str,
        reason: &'static str,
    },

    /// A keyword list repeats one of its segments.
    #[error("keyword '{0}' is repeated")]
    DuplicateKeyword(String),

    /// A numeric value is outside the accepted range.
    #[error("{field} is out of range")]
    OutOfRange { field: &'static str },
}

// =============================================================================
// Session Error
// =============================================================================

/// Login stack misuse.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// `pop` on an empty stack.
    #[error("No active session")]
    EmptyStack,
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CommandError.
pub type CommandResult<T> = Result<T, CommandError>;

// =============================================================================
// Unit Tests
// =============================================================================
