//! # Domain Types
//!
//! Core domain records used throughout Tome.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Account      │   │      Book       │   │  Transaction    │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  user_id (key)  │   │  isbn (key)     │   │  amount         │       │
//! │  │  password       │   │  name, author   │   │  direction      │       │
//! │  │  username       │   │  keywords       │   └─────────────────┘       │
//! │  │  privilege      │   │  price, qty     │                              │
//! │  └─────────────────┘   └─────────────────┘   ┌─────────────────┐       │
//! │                                              │    LogEntry     │       │
//! │  ┌─────────────────┐   ┌─────────────────┐   │  ─────────────  │       │
//! │  │   Privilege     │   │   Direction     │   │  operation      │       │
//! │  │  Guest     0    │   │  Income  (buy)  │   │  actor          │       │
//! │  │  Customer  1    │   │  Expense (imp.) │   │  details        │       │
//! │  │  Staff     3    │   └─────────────────┘   └─────────────────┘       │
//! │  │  Admin     7    │                                                    │
//! │  └─────────────────┘                                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Text fields are plain `String`s. Their length and charset are enforced by
//! [`crate::validation`] before a record is ever built.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::money::Money;

// =============================================================================
// Privilege
// =============================================================================

/// Privilege rank gating command availability.
///
/// Ordering follows the numeric rank, so `current >= required` is the
/// authorization check.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Privilege {
    /// Nobody logged in.
    #[default]
    Guest = 0,
    /// Registered customer.
    Customer = 1,
    /// Shop staff.
    Staff = 3,
    /// Store administrator.
    Admin = 7,
}

impl Privilege {
    /// Numeric rank (0, 1, 3, 7).
    #[inline]
    pub const fn rank(self) -> u8 {
        self as u8
    }

    /// Maps a stored or typed rank back to a privilege.
    ///
    /// Only the ranks an account can hold are accepted; `0` is not an
    /// account privilege.
    pub const fn from_rank(rank: u8) -> Option<Privilege> {
        match rank {
            1 => Some(Privilege::Customer),
            3 => Some(Privilege::Staff),
            7 => Some(Privilege::Admin),
            _ => None,
        }
    }
}

// =============================================================================
// Account
// =============================================================================

/// A user account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Unique identity, `[A-Za-z0-9_]{1,30}`.
    pub user_id: String,

    /// Plaintext password, same grammar as the identity.
    pub password: String,

    /// Display name, printable ASCII, 1-30 characters.
    pub username: String,

    /// Customer, Staff or Admin.
    pub privilege: Privilege,
}

impl Account {
    pub fn new(
        user_id: impl Into<String>,
        password: impl Into<String>,
        username: impl Into<String>,
        privilege: Privilege,
    ) -> Self {
        Account {
            user_id: user_id.into(),
            password: password.into(),
            username: username.into(),
            privilege,
        }
    }
}

// =============================================================================
// Book
// =============================================================================

/// A book in the inventory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    /// Unique key.
    pub isbn: String,

    pub name: String,

    pub author: String,

    /// Pipe-separated keyword list, stored as typed.
    pub keywords: String,

    /// Unit price.
    pub price: Money,

    /// Copies in stock, never negative.
    pub quantity: i64,
}

impl Book {
    /// A freshly selected book: only the ISBN is set.
    pub fn blank(isbn: impl Into<String>) -> Self {
        Book {
            isbn: isbn.into(),
            name: String::new(),
            author: String::new(),
            keywords: String::new(),
            price: Money::zero(),
            quantity: 0,
        }
    }

    /// Iterates the individual keywords.
    ///
    /// An empty keyword string yields no keywords.
    pub fn keyword_list(&self) -> impl Iterator<Item = &str> {
        self.keywords.split('|').filter(|k| !k.is_empty())
    }

    /// Whether the book carries `keyword` as one of its segments.
    pub fn has_keyword(&self, keyword: &str) -> bool {
        self.keyword_list().any(|k| k == keyword)
    }

    /// Whether `quantity` copies can be sold.
    #[inline]
    pub fn can_sell(&self, quantity: i64) -> bool {
        self.quantity >= quantity
    }
}

// =============================================================================
// Transaction
// =============================================================================

/// Which way money moved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Money in, from `buy`.
    Income,
    /// Money out, from `import`.
    Expense,
}

impl Direction {
    pub const fn as_str(self) -> &'static str {
        match self {
            Direction::Income => "income",
            Direction::Expense => "expense",
        }
    }

    pub fn parse(value: &str) -> Option<Direction> {
        match value {
            "income" => Some(Direction::Income),
            "expense" => Some(Direction::Expense),
            _ => None,
        }
    }
}

/// One append-only financial event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Never negative. A sale of a zero-priced book, or an import whose cost
    /// rounds below one cent, records 0.00.
    pub amount: Money,
    pub direction: Direction,
}

impl Transaction {
    pub const fn income(amount: Money) -> Self {
        Transaction {
            amount,
            direction: Direction::Income,
        }
    }

    pub const fn expense(amount: Money) -> Self {
        Transaction {
            amount,
            direction: Direction::Expense,
        }
    }
}

// =============================================================================
// Log Entry
// =============================================================================

/// One audit record, written for each applied command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Command name, e.g. `buy` or `show finance`.
    pub operation: String,

    /// Session identity after the command ran; empty when nobody is logged in.
    pub actor: String,

    /// Command-specific detail, possibly empty.
    pub details: String,

    pub recorded_at: DateTime<Utc>,
}

// =============================================================================
// Unit Tests
// =============================================================================
